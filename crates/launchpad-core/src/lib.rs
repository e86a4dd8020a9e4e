//! Token launchpad: creates a Token-2022 mint with self-hosted metadata and
//! mints its initial supply to the creator's associated account.
//!
//! The flow in [`orchestrator::create_token`] only talks to the traits in
//! [`collaborators`]; [`rpc`], [`uploadcare`] and [`signer`] provide the
//! production implementations.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod rpc;
pub mod signer;
pub mod transactions;
pub mod types;
pub mod uploadcare;

pub use collaborators::{LedgerClient, MetadataStorage, WalletSigner};
pub use config::LaunchpadConfig;
pub use error::{ConfigError, LaunchError, LedgerError, SignerError, StorageError};
pub use orchestrator::{create_token, LaunchContext};
pub use rpc::RpcLedgerClient;
pub use signer::LocalKeypairWallet;
pub use types::{parse_supply, LaunchReceipt, TokenRequest, TransactionStage};
pub use uploadcare::UploadcareStorage;
