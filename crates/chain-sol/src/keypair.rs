//! Ed25519 keypairs for Solana accounts.
//!
//! The secret half lives inside `ed25519_dalek::SigningKey`, which zeroizes
//! itself on drop. Temporary seed copies go through `Zeroizing`.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand_core::{OsRng, RngCore};
use zeroize::Zeroizing;

use crate::address::format_address;
use crate::error::SolError;

/// Length of the Solana CLI keypair encoding: secret seed || public key.
pub const KEYPAIR_LEN: usize = 64;

/// An Ed25519 signing keypair.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the operating system CSPRNG.
    ///
    /// Fails (rather than panicking) when the OS entropy source is
    /// unavailable.
    pub fn generate() -> Result<Self, SolError> {
        let mut seed = Zeroizing::new([0u8; 32]);
        OsRng
            .try_fill_bytes(&mut seed[..])
            .map_err(|e| SolError::KeyGeneration(e.to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse the 64-byte Solana CLI encoding (secret || public).
    ///
    /// The public half must match the one derived from the secret.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SolError> {
        if bytes.len() != KEYPAIR_LEN {
            return Err(SolError::InvalidKeypair(format!(
                "expected {KEYPAIR_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let mut raw = Zeroizing::new([0u8; KEYPAIR_LEN]);
        raw.copy_from_slice(bytes);
        let signing_key = SigningKey::from_keypair_bytes(&raw)
            .map_err(|e| SolError::InvalidKeypair(format!("public half mismatch: {e}")))?;

        Ok(Self { signing_key })
    }

    /// The 32-byte public key (the account address bytes).
    pub fn pubkey(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The Base58 address of this keypair.
    pub fn address(&self) -> String {
        format_address(&self.pubkey())
    }

    /// Sign an arbitrary message.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Copy of the secret seed, wiped when the returned value is dropped.
    pub fn secret_seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, VerifyingKey};

    #[test]
    fn generated_keypairs_differ() {
        let a = Keypair::generate().unwrap();
        let b = Keypair::generate().unwrap();
        assert_ne!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn from_seed_is_deterministic() {
        let a = Keypair::from_seed(&[0x42; 32]);
        let b = Keypair::from_seed(&[0x42; 32]);
        assert_eq!(a.pubkey(), b.pubkey());
        assert_eq!(*a.secret_seed(), [0x42; 32]);
    }

    #[test]
    fn cli_encoding_roundtrip() {
        let original = Keypair::from_seed(&[0x11; 32]);
        let mut encoded = Vec::with_capacity(KEYPAIR_LEN);
        encoded.extend_from_slice(&*original.secret_seed());
        encoded.extend_from_slice(&original.pubkey());

        let parsed = Keypair::from_bytes(&encoded).unwrap();
        assert_eq!(parsed.pubkey(), original.pubkey());
    }

    #[test]
    fn cli_encoding_rejects_mismatched_public_half() {
        let original = Keypair::from_seed(&[0x11; 32]);
        let mut encoded = Vec::with_capacity(KEYPAIR_LEN);
        encoded.extend_from_slice(&*original.secret_seed());
        encoded.extend_from_slice(&[0x22; 32]);

        let err = Keypair::from_bytes(&encoded).unwrap_err();
        assert!(matches!(err, SolError::InvalidKeypair(_)));
    }

    #[test]
    fn cli_encoding_rejects_wrong_length() {
        assert!(Keypair::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn signatures_verify() {
        let keypair = Keypair::from_seed(&[0x55; 32]);
        let sig = keypair.sign(b"launch");
        let vk = VerifyingKey::from_bytes(&keypair.pubkey()).unwrap();
        assert!(vk.verify_strict(b"launch", &Signature::from_bytes(&sig)).is_ok());
    }

    #[test]
    fn debug_output_hides_secret() {
        let keypair = Keypair::from_seed(&[0x01; 32]);
        let debug = format!("{keypair:?}");
        assert!(debug.contains(&keypair.address()));
        assert!(!debug.contains("signing_key"));
    }
}
