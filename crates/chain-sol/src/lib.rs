//! Solana chain support for the token launchpad.
//!
//! This crate handles address and PDA derivation, keypairs, manual
//! transaction wire format serialization with multi-signer support, and the
//! System / Token-2022 / associated-token / token-metadata instructions
//! needed to launch a mint, without pulling in `solana-sdk`.
//!
//! The compact binary wire format is implemented by hand, using
//! `ed25519-dalek` for signing, `bs58` for Base58 and `borsh` for the
//! metadata record.

pub mod address;
pub mod error;
pub mod keypair;
pub mod system;
pub mod token_2022;
pub mod token_metadata;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{find_program_address, format_address, is_on_curve, parse_address};
pub use error::SolError;
pub use keypair::Keypair;
pub use system::SYSTEM_PROGRAM_ID;
pub use token_2022::{
    derive_associated_token_address, mint_len, ExtensionType, ASSOCIATED_TOKEN_PROGRAM_ID,
    TOKEN_2022_PROGRAM_ID,
};
pub use token_metadata::TokenMetadata;
pub use transaction::{
    compile_transaction, decode_compact_u16, encode_compact_u16, serialize_message,
    sign_sol_raw_transaction, CompiledInstruction, PartiallySignedTransaction, SolAccountMeta,
    SolInstruction, SolTransaction,
};
