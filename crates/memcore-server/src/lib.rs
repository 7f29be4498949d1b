//! memcore server — JSON-RPC tool server over stdio

pub mod rpc;
pub mod server;

pub use server::{Dispatch, Lifecycle, Server, SERVER_NAME};

use memcore_core::{MemcoreConfig, Result};

/// Serve on the process's stdin/stdout until EOF, `exit`, or a fatal
/// initialization error.
pub async fn serve_stdio(config: MemcoreConfig) -> Result<()> {
    let mut server = Server::new(config)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server.run(stdin, stdout).await
}
