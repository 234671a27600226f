//! Crate contains the phygital client which talks to a Sui fullnode via
//! JSON-RPC over http

/// Module with the data model of one Move call
pub mod call;
/// Module with the call gateway itself
pub mod client;
/// Module with client configuration
pub mod config;
/// Module with adapters bound to the deployed phygital package
pub mod contract;
/// Module with general communication primitives like an HTTP request builder.
pub mod http;
mod http_default;
/// Module with the JSON-RPC framing owned by the node
pub mod rpc;

/// Module containing sample configurations for tests and examples.
pub mod samples {
    use crate::config::Configuration;

    /// Get sample client configuration pointed at a local fullnode.
    #[allow(clippy::expect_used)]
    pub fn get_client_config(sender: &str) -> Configuration {
        Configuration {
            sender: sender.parse().expect("Sample sender address should be valid"),
            rpc_url: String::from("http://127.0.0.1:9000"),
            ..Configuration::default()
        }
    }
}
