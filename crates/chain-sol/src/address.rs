//! Solana address encoding and program-derived addresses.
//!
//! An address is the Base58 encoding of a raw 32-byte Ed25519 public key.
//! Program-derived addresses (PDAs) are SHA-256 outputs that are guaranteed
//! NOT to be valid curve points, so no private key can ever sign for them.

use sha2::{Digest, Sha256};

use crate::error::SolError;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single PDA seed.
pub const MAX_SEED_LEN: usize = 32;

/// Encode a 32-byte key as a Solana address string.
pub fn format_address(key: &[u8; 32]) -> String {
    bs58::encode(key).into_string()
}

/// Decode a Solana address string to its 32-byte representation.
///
/// Fails if the address is not Base58 or does not decode to exactly 32 bytes.
pub fn parse_address(address: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(address.trim())
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

/// Find a valid program-derived address for the given seeds and program.
///
/// Iterates bump seeds from 255 down to 0, computing
/// `SHA-256(seed_0 || ... || bump || program_id || "ProgramDerivedAddress")`
/// and returning the first result that is off the Ed25519 curve.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &[u8; 32],
) -> Result<([u8; 32], u8), SolError> {
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(SolError::InvalidAddress(format!(
            "seed of {} bytes exceeds {MAX_SEED_LEN}",
            seed.len()
        )));
    }

    for bump in (0u8..=255).rev() {
        if let Some(address) = create_program_address(seeds, bump, program_id) {
            return Ok((address, bump));
        }
    }

    Err(SolError::InvalidAddress(
        "could not find valid PDA bump seed".into(),
    ))
}

/// Hash seeds + bump + program id; `None` when the result lands on the curve.
fn create_program_address(seeds: &[&[u8]], bump: u8, program_id: &[u8; 32]) -> Option<[u8; 32]> {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    (!is_on_curve(&hash)).then_some(hash)
}

/// Check if 32 bytes decompress to an Ed25519 point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
