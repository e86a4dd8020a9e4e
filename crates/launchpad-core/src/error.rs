use thiserror::Error;

use chain_sol::SolError;

use crate::types::TransactionStage;

/// Failures reported by a metadata storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("storage http error: {0}")]
    Http(String),

    #[error("malformed upload response: {0}")]
    MalformedResponse(String),
}

/// Failures reported by a ledger collaborator.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("ledger http error: {0}")]
    Http(String),

    #[error("malformed RPC response: {0}")]
    MalformedResponse(String),

    #[error("transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error("transaction {0} was not confirmed in time")]
    ConfirmationTimeout(String),
}

/// Failures reported by a wallet-signing collaborator.
#[derive(Debug, Error)]
pub enum SignerError {
    #[error("wallet declined to sign: {0}")]
    Rejected(String),

    #[error("wallet signing failed: {0}")]
    Signing(#[from] SolError),

    #[error("wallet submission failed: {0}")]
    Submission(#[from] LedgerError),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors surfaced by the token creation flow.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("invalid initial supply: {0}")]
    InvalidSupply(String),

    #[error("mint key generation failed: {0}")]
    KeyGeneration(String),

    #[error("metadata upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("ledger query failed: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{stage} submission failed for mint {mint}: {source}")]
    Submission {
        stage: TransactionStage,
        mint: String,
        #[source]
        source: SignerError,
    },

    #[error("transaction build failed: {0}")]
    TransactionBuild(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<SolError> for LaunchError {
    fn from(e: SolError) -> Self {
        match e {
            SolError::KeyGeneration(reason) => LaunchError::KeyGeneration(reason),
            other => LaunchError::TransactionBuild(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for LaunchError {
    fn from(e: serde_json::Error) -> Self {
        LaunchError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Http(e.to_string())
    }
}

impl From<reqwest::Error> for LedgerError {
    fn from(e: reqwest::Error) -> Self {
        LedgerError::Http(e.to_string())
    }
}
