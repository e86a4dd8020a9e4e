//! Seams to the external services a launch depends on.
//!
//! The orchestrator only talks to these traits, and always through explicit
//! references handed to it by the caller.

use async_trait::async_trait;

use chain_sol::PartiallySignedTransaction;

use crate::error::{LedgerError, SignerError, StorageError};

/// Object storage that persists a named blob and returns a stable URI.
#[async_trait]
pub trait MetadataStorage: Send + Sync {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;
}

/// Read queries against the ledger plus raw transaction submission.
///
/// This is also the "connection" a wallet submits through.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Minimum lamports for an account of `data_len` bytes to be rent exempt.
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, LedgerError>;

    /// A recent blockhash to anchor a new transaction.
    async fn latest_blockhash(&self) -> Result<[u8; 32], LedgerError>;

    /// Submit fully signed wire bytes; returns the Base58 signature.
    async fn send_transaction(&self, wire: &[u8]) -> Result<String, LedgerError>;

    /// Wait until `signature` reaches the client's commitment level.
    async fn confirm_transaction(&self, signature: &str) -> Result<(), LedgerError>;
}

/// The user's wallet: pays fees, holds the authorities, signs and submits.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// The wallet's public key (fee payer and mint/update authority).
    fn public_key(&self) -> [u8; 32];

    /// Add the wallet signature to `transaction` and submit it through
    /// `connection`. Resolves once the transaction may be built upon.
    async fn sign_and_send(
        &self,
        transaction: PartiallySignedTransaction,
        connection: &dyn LedgerClient,
    ) -> Result<String, SignerError>;
}
