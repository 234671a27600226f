//! Contains the call-gateway logic: framing a [`MoveCallRequest`] into a
//! JSON-RPC invocation, dispatching it exactly once, and relaying the
//! node's answer.

use std::sync::atomic::{AtomicU64, Ordering};

use derive_more::{DebugCustom, Display};
use eyre::{eyre, Result, WrapErr};
use serde_json::Value;
use tracing::{error, trace};

use crate::{
    call::{Address, CallRequestBuilder, MoveCallRequest},
    config::Configuration,
    http::{Headers, Method as HttpMethod, RequestBuilder, Response, StatusCode},
    http_default::DefaultRequestBuilder,
    rpc::{RpcError, RpcRequest, RpcResponse, EXECUTE_MOVE_CALL},
};

const APPLICATION_JSON: &str = "application/json";

/// General trait for all response handlers
pub trait ResponseHandler<T = Vec<u8>> {
    /// What is the output of the handler
    type Output;

    /// Handles HTTP response
    fn handle(self, response: Response<T>) -> Self::Output;
}

/// `Result` with [`ClientCallError`] as an error
pub type CallResult<T> = core::result::Result<T, ClientCallError>;

/// Handler of the execute-call HTTP response.
///
/// On success the node's `result` member is passed through untouched: no
/// field of it is parsed, renamed or dropped by this layer.
#[derive(Clone, Copy)]
pub struct CallResponseHandler;

impl ResponseHandler for CallResponseHandler {
    type Output = CallResult<Value>;

    fn handle(self, resp: Response<Vec<u8>>) -> Self::Output {
        if resp.status() != StatusCode::OK {
            return Err(ResponseReport::with_msg("Unexpected move call response", &resp).into());
        }

        let envelope: RpcResponse = serde_json::from_slice(resp.body()).wrap_err(
            "Failed to decode JSON-RPC envelope from the node. \
             You are likely using a version of the client library \
             that is incompatible with the version of the node software",
        )?;

        if let Some(err) = envelope.error {
            return Err(ClientCallError::Rpc(err));
        }
        envelope.result.ok_or_else(|| {
            ClientCallError::Other(eyre!("JSON-RPC envelope has neither `result` nor `error`"))
        })
    }
}

/// Different errors as a result of a dispatched Move call
#[derive(Debug, thiserror::Error)]
pub enum ClientCallError {
    /// The node accepted the request shape but rejected the call itself
    #[error("RPC error: {0}")]
    Rpc(RpcError),
    /// The operation is declared on the contract surface but its client
    /// wiring does not exist yet; never a silent no-op
    #[error("`{0}` is not implemented yet")]
    Unimplemented(&'static str),
    /// Some other error
    #[error("Other error: {0}")]
    Other(eyre::Error),
}

impl From<eyre::Error> for ClientCallError {
    #[inline]
    fn from(err: eyre::Error) -> Self {
        Self::Other(err)
    }
}

impl From<ResponseReport> for ClientCallError {
    #[inline]
    fn from(ResponseReport(err): ResponseReport) -> Self {
        Self::Other(err)
    }
}

/// Private structure to incapsulate error reporting for HTTP response.
struct ResponseReport(eyre::Report);

impl ResponseReport {
    /// Constructs report with provided message
    fn with_msg<S>(msg: S, response: &Response<Vec<u8>>) -> Self
    where
        S: AsRef<str>,
    {
        let status = response.status();
        let body = String::from_utf8_lossy(response.body());
        let msg = msg.as_ref();

        Self(eyre!("{msg}; status: {status}; response body: {body}"))
    }
}

impl From<ResponseReport> for eyre::Report {
    #[inline]
    fn from(report: ResponseReport) -> Self {
        report.0
    }
}

/// Gateway to the fullnode's Move-call endpoint
#[derive(DebugCustom, Display)]
#[debug(fmt = "Client {{ node: {rpc_url}, sender: {sender} }}")]
#[display(fmt = "{sender}@{rpc_url}")]
pub struct Client {
    /// Url for accessing the fullnode
    rpc_url: String,
    /// Address calls are executed on behalf of, unless a request carries
    /// its own
    sender: Address,
    /// Gas budget applied to requests that do not set their own
    gas_budget: u64,
    /// Http headers which will be appended to each request
    headers: Headers,
    /// Id of the next JSON-RPC request. A framing detail of the envelope,
    /// not cross-call state: every dispatched call is independent.
    request_id: AtomicU64,
}

impl Clone for Client {
    fn clone(&self) -> Self {
        Self {
            rpc_url: self.rpc_url.clone(),
            sender: self.sender.clone(),
            gas_budget: self.gas_budget,
            headers: self.headers.clone(),
            request_id: AtomicU64::new(self.request_id.load(Ordering::Relaxed)),
        }
    }
}

/// Representation of the fullnode gateway client.
impl Client {
    /// Constructor for client from configuration
    ///
    /// # Errors
    /// If configuration isn't valid
    #[inline]
    pub fn new(configuration: &Configuration) -> Result<Self> {
        Self::with_headers(configuration, Headers::new())
    }

    /// Constructor for client from configuration and headers
    ///
    /// *Authentication* header will be added, if `login` and `password` fields are presented
    ///
    /// # Errors
    /// If configuration isn't valid
    pub fn with_headers(configuration: &Configuration, mut headers: Headers) -> Result<Self> {
        if let Some(basic_auth) = &configuration.basic_auth {
            let credentials = format!("{}:{}", basic_auth.web_login, basic_auth.password);
            let encoded = base64::encode(credentials);
            headers.insert(String::from("Authorization"), format!("Basic {}", encoded));
        }

        Ok(Self {
            rpc_url: configuration.rpc_url.clone(),
            sender: configuration.sender.clone(),
            gas_budget: configuration.gas_budget,
            headers,
            request_id: AtomicU64::new(0),
        })
    }

    /// Address the client executes calls on behalf of by default.
    pub fn sender(&self) -> &Address {
        &self.sender
    }

    /// Gas budget applied to calls that do not set their own.
    pub fn gas_budget(&self) -> u64 {
        self.gas_budget
    }

    /// Finishes a [`CallRequestBuilder`], filling the gas budget and the
    /// sender from this client's configuration where the builder left them
    /// out.
    ///
    /// # Errors
    /// Currently infallible for builders produced by this crate; kept
    /// fallible to mirror [`CallRequestBuilder::build`]
    pub fn build_call(&self, builder: CallRequestBuilder) -> Result<MoveCallRequest> {
        builder
            .gas_budget_or(self.gas_budget)
            .sender_or(&self.sender)
            .build()
    }

    /// Move-call API entry point. Dispatches one call to the node and
    /// blocks until its response or failure arrives.
    ///
    /// The call is dispatched exactly once: there is no retry, no backoff
    /// and no local validation of the arguments against the entry
    /// function's signature. On success the node's `result` member is
    /// returned untouched. Every failure is logged once and propagated
    /// unmodified; transient and permanent failures are not distinguished
    /// beyond what [`RpcError`] itself carries.
    ///
    /// # Errors
    /// Fails if sending the call to the node fails or if it responds with
    /// an error
    pub fn execute_call(&self, request: &MoveCallRequest) -> CallResult<Value> {
        trace!(call=?request);
        self.execute_call_inner(request).map_err(|err| {
            error!(
                "Failed to execute `{}::{}`: {err}",
                request.module, request.function
            );
            err
        })
    }

    fn execute_call_inner(&self, request: &MoveCallRequest) -> CallResult<Value> {
        let (req, resp_handler) = self.prepare_call_request::<DefaultRequestBuilder>(request)?;
        let response = req.send().wrap_err_with(|| {
            format!(
                "Failed to send move call `{}::{}`",
                request.module, request.function
            )
        })?;
        resp_handler.handle(response)
    }

    /// Lower-level Move-call API entry point.
    ///
    /// Returns a provided request builder filled with the framed call and a
    /// response handler. Allows to substitute the transport, e.g. with a
    /// recording fake in tests.
    ///
    /// # Errors
    /// Fails if the JSON-RPC envelope cannot be serialized
    pub fn prepare_call_request<B: RequestBuilder>(
        &self,
        request: &MoveCallRequest,
    ) -> Result<(B, CallResponseHandler)> {
        let envelope = RpcRequest::new(self.next_request_id(), EXECUTE_MOVE_CALL, request);
        let body =
            serde_json::to_vec(&envelope).wrap_err("Failed to serialize JSON-RPC envelope")?;

        let mut headers = self.headers.clone();
        headers.insert(String::from("Content-Type"), String::from(APPLICATION_JSON));

        Ok((
            B::new(HttpMethod::POST, &self.rpc_url)
                .headers(headers)
                .body(body),
            CallResponseHandler,
        ))
    }

    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BasicAuth;

    const LOGIN: &str = "mad_hatter";
    const PASSWORD: &str = "ilovetea";
    // `mad_hatter:ilovetea` encoded with base64
    const ENCRYPTED_CREDENTIALS: &str = "bWFkX2hhdHRlcjppbG92ZXRlYQ==";

    #[test]
    fn authorization_header() {
        let basic_auth = BasicAuth {
            web_login: LOGIN.parse().expect("Failed to create valid `WebLogin`"),
            password: String::from(PASSWORD),
        };

        let cfg = Configuration {
            basic_auth: Some(basic_auth),
            ..Configuration::default()
        };
        let client = Client::new(&cfg).expect("Invalid client configuration");

        let value = client
            .headers
            .get("Authorization")
            .expect("Expected `Authorization` header");
        let expected_value = format!("Basic {}", ENCRYPTED_CREDENTIALS);
        assert_eq!(value, &expected_value);
    }

    #[test]
    fn request_ids_grow_per_client() {
        let client =
            Client::new(&Configuration::default()).expect("Invalid client configuration");
        let first = client.next_request_id();
        let second = client.next_request_id();
        assert!(second > first);
    }

    mod call_errors_handling {
        use http::Response;

        use super::*;

        #[test]
        fn non_ok_status_is_indeterminate() {
            let sut = CallResponseHandler;
            let response = Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Vec::<u8>::new())
                .expect("Response is buildable");

            match sut.handle(response) {
                Err(ClientCallError::Other(_)) => {}
                x => panic!("Expected indeterminate, found: {x:?}"),
            }
        }

        #[test]
        fn undecodable_envelope_is_indeterminate() {
            let sut = CallResponseHandler;
            let response = Response::builder()
                .status(StatusCode::OK)
                .body(b"not json at all".to_vec())
                .expect("Response is buildable");

            match sut.handle(response) {
                Err(ClientCallError::Other(_)) => {}
                x => panic!("Expected indeterminate, found: {x:?}"),
            }
        }

        #[test]
        fn envelope_without_result_or_error_is_indeterminate() {
            let sut = CallResponseHandler;
            let response = Response::builder()
                .status(StatusCode::OK)
                .body(br#"{"jsonrpc":"2.0","id":0}"#.to_vec())
                .expect("Response is buildable");

            match sut.handle(response) {
                Err(ClientCallError::Other(_)) => {}
                x => panic!("Expected indeterminate, found: {x:?}"),
            }
        }

        #[test]
        fn error_member_becomes_rpc_error() {
            let sut = CallResponseHandler;
            let response = Response::builder()
                .status(StatusCode::OK)
                .body(
                    br#"{"jsonrpc":"2.0","id":3,"error":{"code":-32602,"message":"Invalid params"}}"#
                        .to_vec(),
                )
                .expect("Response is buildable");

            match sut.handle(response) {
                Err(ClientCallError::Rpc(err)) => {
                    assert_eq!(err.code, -32602);
                    assert_eq!(err.message, "Invalid params");
                }
                x => panic!("Expected rpc error, found: {x:?}"),
            }
        }
    }
}
