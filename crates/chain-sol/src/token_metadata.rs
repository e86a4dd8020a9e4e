//! On-chain token metadata (the token-metadata interface as hosted by
//! Token-2022 inside the mint account).
//!
//! The record is Borsh-encoded and stored as a TLV entry after the mint's
//! fixed extensions, so its rent cost depends on the string lengths.

use borsh::BorshSerialize;
use sha2::{Digest, Sha256};

use crate::error::SolError;
use crate::token_2022::{LENGTH_SIZE, TYPE_SIZE};
use crate::transaction::{SolAccountMeta, SolInstruction};

/// Hash input for the interface's `Initialize` discriminator.
const INITIALIZE_HASH_INPUT: &[u8] = b"spl_token_metadata_interface:initialize_account";

/// Borsh length prefix for strings and vectors.
const BORSH_LEN_PREFIX: usize = 4;

/// The metadata record stored in the mint account.
///
/// Field order matches the on-chain layout. `update_authority` is an
/// `OptionalNonZeroPubkey`, so 32 zero bytes mean "no authority".
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize)]
pub struct TokenMetadata {
    pub update_authority: [u8; 32],
    pub mint: [u8; 32],
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub additional_metadata: Vec<(String, String)>,
}

impl TokenMetadata {
    /// Borsh-encode the record exactly as the token program stores it.
    pub fn pack(&self) -> Result<Vec<u8>, SolError> {
        Ok(borsh::to_vec(self)?)
    }

    /// Length of [`pack`](Self::pack) without allocating.
    pub fn packed_len(&self) -> usize {
        let string_len = |s: &str| BORSH_LEN_PREFIX + s.len();

        32 + 32
            + string_len(&self.name)
            + string_len(&self.symbol)
            + string_len(&self.uri)
            + BORSH_LEN_PREFIX
            + self
                .additional_metadata
                .iter()
                .map(|(k, v)| string_len(k) + string_len(v))
                .sum::<usize>()
    }

    /// Bytes the record occupies in the account, including its TLV header.
    pub fn tlv_len(&self) -> usize {
        TYPE_SIZE + LENGTH_SIZE + self.packed_len()
    }
}

#[derive(BorshSerialize)]
struct InitializeArgs<'a> {
    name: &'a str,
    symbol: &'a str,
    uri: &'a str,
}

/// First 8 bytes of `sha256("spl_token_metadata_interface:initialize_account")`.
pub fn initialize_discriminator() -> [u8; 8] {
    let hash = Sha256::digest(INITIALIZE_HASH_INPUT);
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

/// Build the token-metadata `Initialize` instruction.
///
/// Accounts: metadata (writable), update authority, mint, mint authority
/// (signer). Data: discriminator | borsh(name, symbol, uri).
#[allow(clippy::too_many_arguments)]
pub fn initialize(
    program_id: &[u8; 32],
    metadata: &[u8; 32],
    update_authority: &[u8; 32],
    mint: &[u8; 32],
    mint_authority: &[u8; 32],
    name: &str,
    symbol: &str,
    uri: &str,
) -> Result<SolInstruction, SolError> {
    let mut data = initialize_discriminator().to_vec();
    data.extend_from_slice(&borsh::to_vec(&InitializeArgs { name, symbol, uri })?);

    Ok(SolInstruction {
        program_id: *program_id,
        accounts: vec![
            SolAccountMeta::writable(*metadata, false),
            SolAccountMeta::readonly(*update_authority, false),
            SolAccountMeta::readonly(*mint, false),
            SolAccountMeta::readonly(*mint_authority, true),
        ],
        data,
    })
}
