//! Data model of a single Move call: the request itself, its typed
//! arguments, and a builder for assembling one piece by piece.

use std::{fmt, str::FromStr};

use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};

/// Identifier of an on-chain object (a package, a capability, an NFT, ...).
///
/// Only the textual shape is checked locally (`0x` prefix, hex payload);
/// whether the object exists and has the expected type is for the fullnode
/// to decide.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// View the id as the `0x`-prefixed hex string it was parsed from.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ObjectId {
    type Err = eyre::ErrReport;

    fn from_str(id: &str) -> Result<Self> {
        parse_hex_identifier(id).map(Self)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deserializing `ObjectId` with `FromStr` implementation
impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Address of an account, used as the sender identity of a call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// View the address as the `0x`-prefixed hex string it was parsed from.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = eyre::ErrReport;

    fn from_str(address: &str) -> Result<Self> {
        parse_hex_identifier(address).map(Self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Deserializing `Address` with `FromStr` implementation
impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex_identifier(id: &str) -> Result<String> {
    let payload = id
        .strip_prefix("0x")
        .ok_or_else(|| eyre!("Identifier `{id}` is missing the `0x` prefix"))?;
    if payload.is_empty() {
        return Err(eyre!("Identifier `{id}` has an empty payload"));
    }
    if let Some(c) = payload.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(eyre!("Identifier `{id}` contains non-hex character `{c}`"));
    }
    Ok(id.to_owned())
}

/// One value argument of a Move call, in the shapes the fullnode accepts
/// over JSON-RPC.
///
/// Numbers wider than `u32` must be passed as [`CallArg::String`]; the node
/// rejects bare JSON numbers for `u64` entry-point parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallArg {
    /// String argument, also the encoding for object ids, addresses and
    /// wide integers.
    String(String),
    /// Unsigned integer argument.
    Number(u64),
    /// Boolean argument.
    Bool(bool),
    /// Vector argument.
    Array(Vec<CallArg>),
}

impl From<&str> for CallArg {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for CallArg {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<u64> for CallArg {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CallArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&ObjectId> for CallArg {
    fn from(id: &ObjectId) -> Self {
        Self::String(id.as_str().to_owned())
    }
}

impl From<&Address> for CallArg {
    fn from(address: &Address) -> Self {
        Self::String(address.as_str().to_owned())
    }
}

impl<T: Into<CallArg>> From<Vec<T>> for CallArg {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.into_iter().map(Into::into).collect())
    }
}

/// Description of one Move call, ready to be framed into a JSON-RPC
/// request.
///
/// A request is built fresh per invocation and never mutated afterwards;
/// the serialized form is a field-for-field restatement of this struct, so
/// `serde_json` round-trips it losslessly (argument order included).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCallRequest {
    /// Package that holds the target module.
    pub package_object_id: ObjectId,
    /// Module within the package.
    pub module: String,
    /// Entry function within the module.
    pub function: String,
    /// Type arguments of the entry function.
    #[serde(default)]
    pub type_arguments: Vec<String>,
    /// Value arguments, in declaration order of the entry function.
    ///
    /// Count and types are *not* checked locally against the entry
    /// function's signature; mismatches surface as an RPC error from the
    /// node.
    pub arguments: Vec<CallArg>,
    /// Upper bound on the computation the node may charge for this call.
    pub gas_budget: u64,
    /// Address the call is executed on behalf of.
    pub sender: Address,
}

impl MoveCallRequest {
    /// Start building a request against the given entry function.
    pub fn builder(
        package_object_id: ObjectId,
        module: impl Into<String>,
        function: impl Into<String>,
    ) -> CallRequestBuilder {
        CallRequestBuilder {
            package_object_id,
            module: module.into(),
            function: function.into(),
            type_arguments: Vec::new(),
            arguments: Vec::new(),
            gas_budget: None,
            sender: None,
        }
    }
}

/// Chainable builder for [`MoveCallRequest`].
///
/// Gas budget and sender are optional here so that [`crate::client::Client`]
/// can fill them from its configuration; [`CallRequestBuilder::build`]
/// requires both to be present.
#[derive(Clone, Debug)]
pub struct CallRequestBuilder {
    package_object_id: ObjectId,
    module: String,
    function: String,
    type_arguments: Vec<String>,
    arguments: Vec<CallArg>,
    gas_budget: Option<u64>,
    sender: Option<Address>,
}

impl CallRequestBuilder {
    /// Append one value argument.
    #[must_use]
    pub fn argument(mut self, arg: impl Into<CallArg>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    /// Append one type argument.
    #[must_use]
    pub fn type_argument(mut self, ty: impl Into<String>) -> Self {
        self.type_arguments.push(ty.into());
        self
    }

    /// Set the gas budget, overriding the client's default.
    #[must_use]
    pub fn gas_budget(mut self, budget: u64) -> Self {
        self.gas_budget = Some(budget);
        self
    }

    /// Set the sender, overriding the client's default.
    #[must_use]
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub(crate) fn gas_budget_or(self, default: u64) -> Self {
        match self.gas_budget {
            Some(_) => self,
            None => self.gas_budget(default),
        }
    }

    pub(crate) fn sender_or(self, default: &Address) -> Self {
        match self.sender {
            Some(_) => self,
            None => self.sender(default.clone()),
        }
    }

    /// Finish building.
    ///
    /// # Errors
    /// Fails if neither the builder nor the client supplied a gas budget or
    /// a sender.
    pub fn build(self) -> Result<MoveCallRequest> {
        let Self {
            package_object_id,
            module,
            function,
            type_arguments,
            arguments,
            gas_budget,
            sender,
        } = self;
        let gas_budget =
            gas_budget.ok_or_else(|| eyre!("Call to `{module}::{function}` has no gas budget"))?;
        let sender = sender.ok_or_else(|| eyre!("Call to `{module}::{function}` has no sender"))?;

        Ok(MoveCallRequest {
            package_object_id,
            module,
            function,
            type_arguments,
            arguments,
            gas_budget,
            sender,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_id() -> ObjectId {
        "0x2".parse().expect("Valid object id")
    }

    fn sender() -> Address {
        "0xab".parse().expect("Valid address")
    }

    #[test]
    fn identifiers_require_hex_payload_with_prefix() {
        assert!("0x3b9a06e1".parse::<ObjectId>().is_ok());
        assert!("3b9a06e1".parse::<ObjectId>().is_err());
        assert!("0x".parse::<ObjectId>().is_err());
        assert!("0xnothex".parse::<Address>().is_err());
    }

    #[test]
    fn request_round_trips_through_json() {
        let request = MoveCallRequest::builder(object_id(), "phygital", "create_asset")
            .argument("tag-001")
            .argument("250")
            .argument(true)
            .type_argument("0x2::sui::SUI")
            .gas_budget(1000)
            .sender(sender())
            .build()
            .expect("Builder has all required fields");

        let json = serde_json::to_string(&request).expect("Request is serializable");
        let decoded: MoveCallRequest =
            serde_json::from_str(&json).expect("Serialized request is decodable");
        assert_eq!(request, decoded);
    }

    #[test]
    fn arguments_keep_their_order_on_the_wire() {
        let request = MoveCallRequest::builder(object_id(), "phygital", "update_item_status")
            .argument("0xa1")
            .argument(2_u64)
            .argument("0xc1")
            .gas_budget(1000)
            .sender(sender())
            .build()
            .expect("Builder has all required fields");

        let json = serde_json::to_value(&request).expect("Request is serializable");
        assert_eq!(
            json["arguments"],
            serde_json::json!(["0xa1", 2, "0xc1"]),
            "Wire order must match declaration order"
        );
    }

    #[test]
    fn builder_without_sender_fails() {
        let result = MoveCallRequest::builder(object_id(), "phygital", "create_asset")
            .gas_budget(1000)
            .build();
        assert!(result.is_err());
    }
}
