use thiserror::Error;

/// Solana chain operation errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<std::io::Error> for SolError {
    fn from(err: std::io::Error) -> Self {
        SolError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_keypair() {
        let err = SolError::InvalidKeypair("public half mismatch".into());
        assert_eq!(err.to_string(), "invalid keypair: public half mismatch");
    }

    #[test]
    fn display_key_generation() {
        let err = SolError::KeyGeneration("os rng unavailable".into());
        assert_eq!(err.to_string(), "key generation failed: os rng unavailable");
    }

    #[test]
    fn display_invalid_address() {
        let err = SolError::InvalidAddress("bad decode".into());
        assert_eq!(err.to_string(), "invalid address: bad decode");
    }

    #[test]
    fn display_transaction_build_error() {
        let err = SolError::TransactionBuildError("too many accounts".into());
        assert_eq!(err.to_string(), "transaction build error: too many accounts");
    }

    #[test]
    fn display_signing_error() {
        let err = SolError::SigningError("not a required signer".into());
        assert_eq!(err.to_string(), "signing error: not a required signer");
    }

    #[test]
    fn io_error_maps_to_serialization() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "short write");
        let err: SolError = io.into();
        assert!(matches!(err, SolError::SerializationError(_)));
        assert!(err.to_string().contains("short write"));
    }
}
