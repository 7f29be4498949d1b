//! Tests for memcore-core: wire envelope, error mapping, wonder types, config

use memcore_core::error::codes;
use memcore_core::*;
use serde_json::json;

// ===========================================================================
// Protocol
// ===========================================================================

#[test]
fn request_without_id_is_notification() {
    let req: RpcRequest =
        serde_json::from_value(json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }))
            .unwrap();
    assert!(req.is_notification());
    assert!(req.params.is_null());
}

#[test]
fn request_ids_keep_their_type() {
    let numeric: RpcRequest =
        serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 42, "method": "ping" })).unwrap();
    assert_eq!(numeric.id, Some(RequestId::Number(42)));

    let text: RpcRequest =
        serde_json::from_value(json!({ "jsonrpc": "2.0", "id": "abc", "method": "ping" })).unwrap();
    assert_eq!(text.id, Some(RequestId::from("abc")));
    assert_eq!(text.id.unwrap().to_string(), "abc");
}

#[test]
fn success_response_omits_error() {
    let wire = serde_json::to_value(RpcResponse::ok(Some(1.into()), json!({ "ok": true }))).unwrap();
    assert_eq!(wire, json!({ "jsonrpc": "2.0", "id": 1, "result": { "ok": true } }));
}

#[test]
fn parse_error_response_has_null_id() {
    let wire = serde_json::to_value(RpcResponse::parse_error("bad frame")).unwrap();
    assert!(wire["id"].is_null());
    assert_eq!(wire["error"]["code"], codes::PARSE_ERROR);
    assert!(wire.get("result").is_none());
}

#[test]
fn error_response_carries_kind() {
    let err = RpcError::from(Error::EmptyCorpus);
    assert_eq!(err.code, -32004);
    assert_eq!(err.data, Some(json!({ "kind": "EmptyCorpusError" })));
}

#[test]
fn initialize_result_is_camel_case() {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.into(),
        server_info: ServerInfo { name: "memcore".into(), version: "0.1.0".into() },
        capabilities: json!({ "tools": {} }),
        instructions: None,
    };
    let wire = serde_json::to_value(result).unwrap();
    assert_eq!(wire["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(wire["serverInfo"]["name"], "memcore");
    assert!(wire.get("instructions").is_none());
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn error_codes() {
    assert_eq!(Error::not_found("log.md").rpc_code(), codes::NOT_FOUND);
    assert_eq!(Error::parse("line 3").rpc_code(), codes::DATA_PARSE_ERROR);
    assert_eq!(Error::invalid_argument("limit").rpc_code(), codes::INVALID_PARAMS);
    assert_eq!(Error::NotInitialized.rpc_code(), codes::NOT_INITIALIZED);
    assert_eq!(Error::MethodNotFound("x".into()).rpc_code(), codes::METHOD_NOT_FOUND);
    assert_eq!(Error::InitFailed("x".into()).rpc_code(), codes::INTERNAL_ERROR);
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: Error = io.into();
    assert_eq!(err.kind(), "IoError");
    assert_eq!(err.rpc_code(), codes::INTERNAL_ERROR);
}

// ===========================================================================
// Wonder types
// ===========================================================================

#[test]
fn wonder_types_parse_case_insensitively() {
    assert_eq!("Temporal".parse::<WonderType>().unwrap(), WonderType::Temporal);
    assert_eq!(" metacognitive ".parse::<WonderType>().unwrap(), WonderType::Metacognitive);
    for t in WonderType::all() {
        assert_eq!(t.name().parse::<WonderType>().unwrap(), *t);
    }
}

#[test]
fn unknown_wonder_type_lists_valid_ones() {
    let err = "cosmic".parse::<WonderType>().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    let msg = err.to_string();
    assert!(msg.contains("cosmic"));
    assert!(msg.contains("existential"));
    assert!(msg.contains("metacognitive"));
}

#[test]
fn wonder_serializes_type_field() {
    let wonder = Wonder {
        id: "w1".into(),
        wonder_type: WonderType::Relational,
        context: "trust".into(),
        intensity: 0.5,
        question: "What does trust ask of us?".into(),
        created_at: chrono::Utc::now(),
    };
    let wire = serde_json::to_value(&wonder).unwrap();
    assert_eq!(wire["type"], "relational");
    assert!(wire.get("wonder_type").is_none());
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn empty_config_is_all_defaults() {
    let config = MemcoreConfig::from_json("{}").unwrap();
    assert_eq!(config.search.default_limit, 5);
    assert_eq!(config.wonder.default_intensity, 0.5);
    assert!(config.files.memory_log.required);
    assert!(!config.files.introspection.required);
}

#[test]
fn nested_unknown_keys_are_rejected() {
    let err = MemcoreConfig::from_json(r#"{ "search": { "default_limt": 3 } }"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn profile_rejects_unknown_keys() {
    let result: std::result::Result<CollaboratorProfile, _> =
        serde_json::from_value(json!({ "name": "Sam", "mood": "sunny" }));
    assert!(result.is_err());
}
