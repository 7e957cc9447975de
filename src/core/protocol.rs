//! JSON-RPC 2.0 envelope types shared by every transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The only JSON-RPC version this server speaks.
pub const JSONRPC_VERSION: &str = "2.0";

/// Invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i32 = -32603;

/// A validated JSON-RPC request or notification.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Request id. `None` means the message is a notification.
    pub id: Option<Value>,
    /// Method name, never empty.
    pub method: String,
    /// Parameters, if any were sent.
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Parse and validate a raw message.
    ///
    /// On failure the ready-to-send error response is returned.
    pub fn parse(raw: &[u8]) -> Result<Self, JsonRpcResponse> {
        let value: Value = serde_json::from_slice(raw)
            .map_err(|_| JsonRpcResponse::parse_error())?;
        Self::from_value(value)
    }

    /// Validate an already decoded JSON value as a request envelope.
    pub fn from_value(value: Value) -> Result<Self, JsonRpcResponse> {
        let Value::Object(mut object) = value else {
            let message = if value.is_array() {
                "Invalid Request: batch requests are not supported"
            } else {
                "Invalid Request: expected a JSON object"
            };
            return Err(JsonRpcResponse::invalid_request(Value::Null, message));
        };

        let id = object.remove("id");
        if let Some(ref id) = id {
            if !(id.is_string() || id.is_number() || id.is_null()) {
                return Err(JsonRpcResponse::invalid_request(
                    Value::Null,
                    "Invalid Request: id must be a string, number or null",
                ));
            }
        }
        let reply_id = id.clone().unwrap_or(Value::Null);

        match object.get("jsonrpc").and_then(Value::as_str) {
            Some(JSONRPC_VERSION) => {}
            _ => {
                return Err(JsonRpcResponse::invalid_request(
                    reply_id,
                    "Invalid Request: jsonrpc must be \"2.0\"",
                ));
            }
        }

        let method = match object.remove("method") {
            Some(Value::String(method)) if !method.is_empty() => method,
            _ => {
                return Err(JsonRpcResponse::invalid_request(
                    reply_id,
                    "Invalid Request: method must be a non-empty string",
                ));
            }
        };

        let params = match object.remove("params") {
            None => None,
            Some(params @ (Value::Object(_) | Value::Array(_))) => Some(params),
            Some(_) => {
                return Err(JsonRpcResponse::invalid_request(
                    reply_id,
                    "Invalid Request: params must be an object or an array",
                ));
            }
        };

        Ok(Self { id, method, params })
    }

    /// Whether the sender expects no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// The id to echo back in a response.
    pub fn reply_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

/// The mutually exclusive body of a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(JsonRpcError),
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: ResponsePayload::Result(result),
        }
    }

    /// Create an error response.
    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            payload: ResponsePayload::Error(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Parse error. The id is always null because it could not be read.
    pub fn parse_error() -> Self {
        Self::error(Value::Null, PARSE_ERROR, "Parse error")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Value, msg: impl Into<String>) -> Self {
        Self::error(id, INVALID_REQUEST, msg)
    }

    /// Method not found error.
    pub fn method_not_found(id: Value, method: &str) -> Self {
        Self::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Invalid params error.
    pub fn invalid_params(id: Value, msg: impl Into<String>) -> Self {
        Self::error(id, INVALID_PARAMS, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Value) -> Self {
        Self::error(id, INTERNAL_ERROR, "Internal error")
    }

    /// Whether this response carries a result.
    pub fn is_success(&self) -> bool {
        matches!(self.payload, ResponsePayload::Result(_))
    }

    /// The result value, if any.
    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            ResponsePayload::Result(value) => Some(value),
            ResponsePayload::Error(_) => None,
        }
    }

    /// The error object, if any.
    pub fn error_object(&self) -> Option<&JsonRpcError> {
        match &self.payload {
            ResponsePayload::Result(_) => None,
            ResponsePayload::Error(error) => Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_code(result: Result<JsonRpcRequest, JsonRpcResponse>) -> i32 {
        result
            .expect_err("should be rejected")
            .error_object()
            .expect("should be an error")
            .code
    }

    #[test]
    fn test_parse_valid_request() {
        let request = JsonRpcRequest::parse(
            br#"{"jsonrpc":"2.0","id":7,"method":"tools/list","params":{}}"#,
        )
        .unwrap();
        assert_eq!(request.id, Some(json!(7)));
        assert_eq!(request.method, "tools/list");
        assert_eq!(request.params, Some(json!({})));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_parse_notification() {
        let request =
            JsonRpcRequest::parse(br#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
                .unwrap();
        assert!(request.is_notification());
        assert_eq!(request.reply_id(), Value::Null);
    }

    #[test]
    fn test_parse_null_id_is_a_request() {
        let request =
            JsonRpcRequest::parse(br#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert!(!request.is_notification());
    }

    #[test]
    fn test_malformed_json() {
        assert_eq!(error_code(JsonRpcRequest::parse(b"{not json")), PARSE_ERROR);
        assert_eq!(error_code(JsonRpcRequest::parse(b"")), PARSE_ERROR);
    }

    #[test]
    fn test_invalid_envelopes() {
        let cases: [&[u8]; 7] = [
            br#"{"id":1,"method":"ping"}"#,
            br#"{"jsonrpc":"1.0","id":1,"method":"ping"}"#,
            br#"{"jsonrpc":"2.0","id":1}"#,
            br#"{"jsonrpc":"2.0","id":1,"method":""}"#,
            br#"{"jsonrpc":"2.0","id":1,"method":5}"#,
            br#"{"jsonrpc":"2.0","id":{"a":1},"method":"ping"}"#,
            br#"[{"jsonrpc":"2.0","id":1,"method":"ping"}]"#,
        ];
        for raw in cases {
            assert_eq!(error_code(JsonRpcRequest::parse(raw)), INVALID_REQUEST);
        }
    }

    #[test]
    fn test_params_must_be_structured() {
        let cases: [&[u8]; 3] = [
            br#"{"jsonrpc":"2.0","id":3,"method":"tools/list","params":5}"#,
            br#"{"jsonrpc":"2.0","id":3,"method":"tools/list","params":"all"}"#,
            br#"{"jsonrpc":"2.0","id":3,"method":"tools/list","params":null}"#,
        ];
        for raw in cases {
            let response = JsonRpcRequest::parse(raw).unwrap_err();
            assert_eq!(response.error_object().unwrap().code, INVALID_REQUEST);
            assert_eq!(response.id, json!(3));
        }

        let request =
            JsonRpcRequest::parse(br#"{"jsonrpc":"2.0","id":3,"method":"ping","params":[]}"#)
                .unwrap();
        assert_eq!(request.params, Some(json!([])));
    }

    #[test]
    fn test_invalid_request_keeps_id_when_readable() {
        let response = JsonRpcRequest::parse(br#"{"jsonrpc":"1.0","id":"abc","method":"x"}"#)
            .unwrap_err();
        assert_eq!(response.id, json!("abc"));
    }

    #[test]
    fn test_response_has_exactly_one_payload() {
        let success = serde_json::to_value(JsonRpcResponse::success(json!(1), json!({})))
            .unwrap();
        assert_eq!(success["jsonrpc"], "2.0");
        assert!(success.get("result").is_some());
        assert!(success.get("error").is_none());

        let failure =
            serde_json::to_value(JsonRpcResponse::method_not_found(json!(2), "nope")).unwrap();
        assert!(failure.get("result").is_none());
        assert_eq!(failure["error"]["code"], METHOD_NOT_FOUND);
        assert!(failure["error"].get("data").is_none());
    }

    #[test]
    fn test_response_serializes_null_id() {
        let value = serde_json::to_value(JsonRpcResponse::parse_error()).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], PARSE_ERROR);
    }
}
