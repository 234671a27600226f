//! Adapters bound to one deployment of the `phygital` Move package.
//!
//! Each implemented operation assembles a [`MoveCallRequest`] against the
//! package and hands it to the client; nothing here owns state or talks to
//! the network directly. Operations whose client wiring does not exist yet
//! refuse loudly with [`ClientCallError::Unimplemented`] instead of
//! pretending to succeed.

use eyre::Result;
use serde_json::Value;

use crate::{
    call::{Address, CallRequestBuilder, MoveCallRequest, ObjectId},
    client::{CallResult, Client, ClientCallError},
};

/// Module holding the entry functions within the package.
pub const MODULE: &str = "phygital";

/// Devnet deployment of the phygital package.
pub const PACKAGE_OBJECT_ID: &str = "0x3b9a06e1f223d01936ed71337c4cb44178fd4c9e";

/// Parameters of a new phygital asset.
#[derive(Clone, Debug)]
pub struct NewAsset {
    /// Tag physically attached to the item.
    pub phygital_tag: String,
    /// Display name of the NFT.
    pub name: String,
    /// Description of the NFT.
    pub description: String,
    /// URI the NFT points at.
    pub uri: String,
    /// Royalty in basis points. Encoded as a decimal string on the wire:
    /// the node rejects bare JSON numbers for this parameter.
    pub royalty: u64,
    /// Access-control capability authorizing the creation.
    pub control_cap: ObjectId,
    /// On-chain clock used for timestamping.
    pub clock: ObjectId,
}

/// Access-control role understood by the phygital package.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Role {
    /// May operate existing assets.
    Operator = 1,
    /// May create new assets.
    Creator = 2,
}

/// Handle to one deployment of the phygital package.
#[derive(Clone, Debug)]
pub struct PhygitalContract<'a> {
    client: &'a Client,
    package: ObjectId,
}

impl<'a> PhygitalContract<'a> {
    /// Constructs a handle to the package deployed at `package`.
    pub fn new(client: &'a Client, package: ObjectId) -> Self {
        Self { client, package }
    }

    /// Constructs a handle to the default devnet deployment.
    #[allow(clippy::expect_used)]
    pub fn devnet(client: &'a Client) -> Self {
        Self::new(
            client,
            PACKAGE_OBJECT_ID
                .parse()
                .expect("Default package id not valid"),
        )
    }

    /// Package this handle is bound to.
    pub fn package(&self) -> &ObjectId {
        &self.package
    }

    /// Mints a new phygital asset.
    ///
    /// # Errors
    /// Fails if sending the call to the node fails or if it responds with
    /// an error
    pub fn create_asset(&self, asset: NewAsset) -> CallResult<Value> {
        let request = self.create_asset_request(asset)?;
        self.client.execute_call(&request)
    }

    /// Builds the `create_asset` call without dispatching it.
    ///
    /// # Errors
    /// Fails if the request cannot be completed from the client's
    /// configuration
    pub fn create_asset_request(&self, asset: NewAsset) -> Result<MoveCallRequest> {
        let NewAsset {
            phygital_tag,
            name,
            description,
            uri,
            royalty,
            control_cap,
            clock,
        } = asset;

        self.client.build_call(
            self.entry("create_asset")
                .argument(phygital_tag)
                .argument(name)
                .argument(description)
                .argument(uri)
                // Convert to string, the node wants it that way
                .argument(royalty.to_string())
                .argument(&control_cap)
                .argument(&clock),
        )
    }

    /// Updates the status of a phygital NFT.
    ///
    /// # Errors
    /// Fails if sending the call to the node fails or if it responds with
    /// an error
    pub fn update_item_status(
        &self,
        nft: &ObjectId,
        status: u64,
        clock: &ObjectId,
    ) -> CallResult<Value> {
        let request = self.update_item_status_request(nft, status, clock)?;
        self.client.execute_call(&request)
    }

    /// Builds the `update_item_status` call without dispatching it.
    ///
    /// # Errors
    /// Fails if the request cannot be completed from the client's
    /// configuration
    pub fn update_item_status_request(
        &self,
        nft: &ObjectId,
        status: u64,
        clock: &ObjectId,
    ) -> Result<MoveCallRequest> {
        self.client.build_call(
            self.entry("update_item_status")
                .argument(nft)
                .argument(status)
                .argument(clock),
        )
    }

    /// Grants `role` to `user`.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn grant_role(&self, _user: &Address, _role: Role) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("grant_role"))
    }

    /// Revokes `role` from `user`.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn revoke_role(&self, _user: &Address, _role: Role) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("revoke_role"))
    }

    /// Delegates creation of `asset` to `user`.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn delegate_asset_creation(&self, _user: &Address, _asset: NewAsset) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("delegate_asset_creation"))
    }

    /// Destroys a phygital NFT.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn destroy_asset(&self, _nft: &ObjectId) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("destroy_asset"))
    }

    /// Sets the URL a token points at.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn set_token_uri(&self, _nft: &ObjectId, _url: &str) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("set_token_uri"))
    }

    /// Asserts on-chain that `user` holds the admin capability.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn assert_is_admin(&self, _control_cap: &ObjectId, _user: &Address) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("assert_is_admin"))
    }

    /// Asserts on-chain that `user` holds the operator role.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn assert_is_operator(
        &self,
        _control_cap: &ObjectId,
        _user: &Address,
    ) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("assert_is_operator"))
    }

    /// Asserts on-chain that `user` holds the creator role.
    ///
    /// # Errors
    /// Always returns [`ClientCallError::Unimplemented`]: the entry
    /// function is deployed but its client wiring is pending
    pub fn assert_is_creator(&self, _control_cap: &ObjectId, _user: &Address) -> CallResult<Value> {
        Err(ClientCallError::Unimplemented("assert_is_creator"))
    }

    fn entry(&self, function: &str) -> CallRequestBuilder {
        MoveCallRequest::builder(self.package.clone(), MODULE, function)
    }
}
