//! JSON-RPC 2.0 framing for the fullnode endpoint.
//!
//! The wire protocol is owned by the node; this module only restates it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::call::MoveCallRequest;

/// RPC method executing a Move call on the node.
pub const EXECUTE_MOVE_CALL: &str = "sui_executeMoveCall";

/// Outgoing envelope. Params are passed by name, so the body is exactly the
/// serialized [`MoveCallRequest`].
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a MoveCallRequest,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: &'a MoveCallRequest) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// Incoming envelope. Exactly one of `result` and `error` is populated.
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// Structured error object returned by the node: transaction rejections,
/// insufficient gas budget, signature mismatches and malformed arguments
/// all arrive in this shape.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RpcError {
    /// JSON-RPC error code.
    pub code: i64,
    /// Human-readable rejection reason.
    pub message: String,
    /// Optional structured payload attached by the node.
    #[serde(default)]
    pub data: Option<Value>,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node rejected the call (code {}): {}", self.code, self.message)
    }
}

impl std::error::Error for RpcError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_params_are_the_call_request_by_name() {
        let call = MoveCallRequest::builder(
            "0x2".parse().expect("Valid object id"),
            "phygital",
            "create_asset",
        )
        .argument("tag")
        .gas_budget(1000)
        .sender("0xab".parse().expect("Valid address"))
        .build()
        .expect("Builder has all required fields");

        let envelope = serde_json::to_value(RpcRequest::new(7, EXECUTE_MOVE_CALL, &call))
            .expect("Envelope is serializable");

        assert_eq!(envelope["jsonrpc"], "2.0");
        assert_eq!(envelope["id"], 7);
        assert_eq!(envelope["method"], EXECUTE_MOVE_CALL);
        assert_eq!(
            envelope["params"],
            serde_json::to_value(&call).expect("Request is serializable")
        );
    }

    #[test]
    fn error_envelope_decodes_to_structured_error() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"Gas budget too low"}}"#;
        let response: RpcResponse = serde_json::from_str(raw).expect("Envelope is decodable");

        assert!(response.result.is_none());
        let error = response.error.expect("Error member must be populated");
        assert_eq!(error.code, -32002);
        assert_eq!(error.message, "Gas budget too low");
        assert!(error.data.is_none());
    }
}
