//! Error types for memcore

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no memory entries are indexed")]
    EmptyCorpus,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("server not initialized")]
    NotInitialized,

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("initialization failed: {0}")]
    InitFailed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC error codes. The -32000 range is server-defined.
pub mod codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const NOT_FOUND: i32 = -32001;
    pub const NOT_INITIALIZED: i32 = -32002;
    pub const DATA_PARSE_ERROR: i32 = -32003;
    pub const EMPTY_CORPUS: i32 = -32004;
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// The JSON-RPC error code this error is reported under.
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => codes::NOT_FOUND,
            Self::Parse(_) => codes::DATA_PARSE_ERROR,
            Self::EmptyCorpus => codes::EMPTY_CORPUS,
            Self::InvalidArgument(_) => codes::INVALID_PARAMS,
            Self::NotInitialized => codes::NOT_INITIALIZED,
            Self::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            Self::InvalidRequest(_) => codes::INVALID_REQUEST,
            Self::Config(_) | Self::InitFailed(_) | Self::Io(_) | Self::Json(_) => {
                codes::INTERNAL_ERROR
            }
        }
    }

    /// Short machine-readable kind, sent as `error.data.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFoundError",
            Self::Parse(_) => "ParseError",
            Self::EmptyCorpus => "EmptyCorpusError",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::NotInitialized => "NotInitialized",
            Self::MethodNotFound(_) => "MethodNotFound",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::Config(_) => "ConfigError",
            Self::InitFailed(_) => "InitFailed",
            Self::Io(_) => "IoError",
            Self::Json(_) => "JsonError",
        }
    }
}
