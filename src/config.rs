use std::{fmt, fs::File, io::BufReader, path::Path, str::FromStr};

use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::call::Address;

/// Fullnode of the devnet the phygital contract is deployed to.
pub const DEFAULT_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";
/// Default ceiling on computation charged to a single call. Callers with
/// heavier entry functions override it per request.
pub const DEFAULT_GAS_BUDGET: u64 = 1000;

const PLACEHOLDER_SENDER: &str = "0xdbeaa48a95cbcb134a32e2c9f21c04fa16e58a70";

/// Wrapper over `String` to provide basic auth login checking
#[derive(Clone, Serialize, Debug)]
pub struct WebLogin(String);

impl WebLogin {
    /// Construct new `WebLogin`
    ///
    /// # Errors
    /// Fails if `login` contains `:` character
    pub fn new(login: &str) -> Result<Self> {
        Self::from_str(login)
    }
}

impl FromStr for WebLogin {
    type Err = eyre::ErrReport;
    fn from_str(login: &str) -> Result<Self> {
        if login.contains(':') {
            return Err(eyre!("WebLogin cannot contain `:` character"));
        }

        Ok(Self(login.to_owned()))
    }
}

impl fmt::Display for WebLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deserializing `WebLogin` with `FromStr` implementation
impl<'de> Deserialize<'de> for WebLogin {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Basic Authentication credentials
#[derive(Clone, Deserialize, Serialize, Debug)]
pub struct BasicAuth {
    /// Login for Basic Authentication
    pub web_login: WebLogin,
    /// Password for Basic Authentication
    pub password: String,
}

/// `Configuration` provides an ability to define client parameters such as
/// the fullnode URL or the default gas budget.
#[derive(Clone, Deserialize, Serialize, Debug)]
#[serde(rename_all = "UPPERCASE")]
#[serde(default)]
pub struct Configuration {
    /// Address calls are sent on behalf of, unless overridden per request.
    pub sender: Address,
    /// Basic Authentication credentials
    pub basic_auth: Option<BasicAuth>,
    /// Fullnode JSON-RPC URL.
    pub rpc_url: String,
    /// Default gas budget applied to requests that do not set their own.
    pub gas_budget: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            sender: Self::placeholder_sender(),
            basic_auth: None,
            rpc_url: DEFAULT_RPC_URL.to_owned(),
            gas_budget: DEFAULT_GAS_BUDGET,
        }
    }
}

impl Configuration {
    /// Sender address used by default for demo purposes
    #[allow(clippy::expect_used)]
    fn placeholder_sender() -> Address {
        PLACEHOLDER_SENDER
            .parse()
            .expect("Placeholder sender address not valid")
    }

    /// This method will build `Configuration` from a json *pretty* formatted file (without `:` in
    /// key names).
    ///
    /// # Errors
    /// If system fails to find a file or read it's content.
    pub fn from_path<P: AsRef<Path> + fmt::Debug>(path: P) -> Result<Configuration> {
        let file = File::open(path).wrap_err("Failed to open the config file")?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).wrap_err("Failed to deserialize json from reader")
    }
}
