//! Stdio server — one JSON-RPC frame per line, handled strictly in order
//!
//! Lifecycle:
//!
//! ```text
//! Uninitialized --initialize--> Initializing --initialized--> Ready
//!       any state --shutdown--> ShuttingDown --exit--> (loop ends)
//! ```
//!
//! `initialize` may be repeated before shutdown; each following
//! `initialized` reloads the memory directory. A required file that cannot
//! be loaded ends the loop with `Error::InitFailed`.

use crate::rpc::{self, to_response};
use memcore_core::{
    Error, InitializeResult, MemcoreConfig, RequestId, Result, RpcRequest, RpcResponse,
    ServerInfo, JSONRPC_VERSION, PROTOCOL_VERSION,
};
use memcore_memory::MemoryStore;
use memcore_tools::{create_default_registry, shared_store, SharedStore, ToolRegistry};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

pub const SERVER_NAME: &str = "memcore";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Ready,
    ShuttingDown,
}

/// What the loop should do after one frame.
#[derive(Debug)]
pub enum Dispatch {
    Reply(RpcResponse),
    Silent,
    Exit,
}

pub struct Server {
    store: SharedStore,
    registry: ToolRegistry,
    lifecycle: Lifecycle,
}

impl Server {
    pub fn new(config: MemcoreConfig) -> Result<Self> {
        let store = shared_store(MemoryStore::new(config)?);
        let registry = create_default_registry(&store);
        debug!("Registered tools: {}", registry.list().join(", "));
        Ok(Self {
            store,
            registry,
            lifecycle: Lifecycle::Uninitialized,
        })
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Serve frames from `reader` until EOF or `exit`. A line that is not
    /// UTF-8 gets a parse error like any other malformed frame.
    pub async fn run<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("memcore v{} serving on stdio", env!("CARGO_PKG_VERSION"));
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            let dispatch = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line).await?,
                Err(e) => {
                    warn!("Frame is not valid UTF-8: {}", e);
                    Dispatch::Reply(RpcResponse::parse_error(format!("parse error: {}", e)))
                }
            };
            match dispatch {
                Dispatch::Reply(response) => {
                    let mut frame = serde_json::to_string(&response)?;
                    frame.push('\n');
                    writer.write_all(frame.as_bytes()).await?;
                    writer.flush().await?;
                }
                Dispatch::Silent => {}
                Dispatch::Exit => {
                    info!("exit received");
                    return Ok(());
                }
            }
        }
        info!("stdin closed");
        Ok(())
    }

    /// Handle one raw line. `Err` only for fatal conditions.
    pub async fn handle_line(&mut self, line: &str) -> Result<Dispatch> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Dispatch::Silent);
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("Unparseable frame: {}", e);
                return Ok(Dispatch::Reply(RpcResponse::parse_error(format!(
                    "parse error: {}",
                    e
                ))));
            }
        };

        let request = match decode_request(value) {
            Ok(req) => req,
            Err((id, message)) => {
                warn!("Invalid request: {}", message);
                return Ok(Dispatch::Reply(RpcResponse::invalid_request(id, message)));
            }
        };
        self.handle_request(request).await
    }

    pub async fn handle_request(&mut self, request: RpcRequest) -> Result<Dispatch> {
        let RpcRequest { id, method, params, .. } = request;
        debug!("<- {} (id={:?})", method, id);

        if self.lifecycle == Lifecycle::ShuttingDown && method != "exit" {
            return Ok(reply(
                id,
                Err(Error::InvalidRequest("server is shutting down".into())),
            ));
        }

        match method.as_str() {
            "initialize" => {
                self.lifecycle = Lifecycle::Initializing;
                info!("initialize received");
                Ok(reply(id, Ok(self.initialize_result()?)))
            }
            "initialized" | "notifications/initialized" => {
                if self.lifecycle == Lifecycle::Uninitialized {
                    warn!("{} before initialize, ignored", method);
                    return Ok(reply(id, Err(Error::NotInitialized)));
                }
                let report = match self.store.write().await.initialize() {
                    Ok(report) => report,
                    Err(e) => {
                        error!("Initialization failed: {}", e);
                        return Err(e);
                    }
                };
                self.lifecycle = Lifecycle::Ready;
                Ok(reply(id, Ok(serde_json::to_value(report)?)))
            }
            "shutdown" => {
                info!("shutdown received");
                self.lifecycle = Lifecycle::ShuttingDown;
                Ok(reply(id, Ok(Value::Null)))
            }
            "exit" => Ok(Dispatch::Exit),
            m if m.starts_with("notifications/") && id.is_none() => {
                debug!("ignoring notification {}", m);
                Ok(Dispatch::Silent)
            }
            m => {
                let result = if rpc::requires_ready(m, &self.registry)
                    && self.lifecycle != Lifecycle::Ready
                {
                    Err(Error::NotInitialized)
                } else {
                    rpc::route_rpc(m, params, &self.registry).await
                };
                if let Err(e) = &result {
                    debug!("{} failed: {}", m, e);
                }
                Ok(reply(id, result))
            }
        }
    }

    fn initialize_result(&self) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            capabilities: json!({ "tools": {} }),
            instructions: Some(
                "Memory tool server. Send notifications/initialized to load the memory \
                 directory, then call tools directly by name or via tools/call."
                    .to_string(),
            ),
        };
        Ok(serde_json::to_value(result)?)
    }
}

/// Requests get a response; notifications never do, even on error.
fn reply(id: Option<RequestId>, result: rpc::RpcResult) -> Dispatch {
    match id {
        Some(id) => Dispatch::Reply(to_response(Some(id), result)),
        None => {
            if let Err(e) = result {
                warn!("notification failed: {}", e);
            }
            Dispatch::Silent
        }
    }
}

/// Validate the JSON-RPC envelope. On failure returns the id (if readable)
/// and a message for the -32600 response.
fn decode_request(value: Value) -> std::result::Result<RpcRequest, (Option<RequestId>, String)> {
    let id = value
        .get("id")
        .cloned()
        .and_then(|v| serde_json::from_value::<RequestId>(v).ok());

    match &value {
        Value::Array(_) => return Err((None, "batch requests are not supported".into())),
        Value::Object(_) => {}
        _ => return Err((None, "request must be a JSON object".into())),
    }
    if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err((id, "jsonrpc must be \"2.0\"".into()));
    }
    // A present but null id is not a notification; only an absent one is.
    if value.get("id").is_some_and(Value::is_null) {
        return Err((None, "id must be a string or number".into()));
    }
    serde_json::from_value::<RpcRequest>(value).map_err(|e| (id, e.to_string()))
}
