//! A wallet backed by a local Solana CLI keypair file.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use chain_sol::{format_address, sign_sol_raw_transaction, Keypair, PartiallySignedTransaction};

use crate::collaborators::{LedgerClient, WalletSigner};
use crate::error::{ConfigError, SignerError};

/// Signs with a keypair held in memory and submits through the connection it
/// is handed, optionally waiting for each signature to confirm.
pub struct LocalKeypairWallet {
    keypair: Keypair,
    confirm: bool,
}

impl LocalKeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair,
            confirm: true,
        }
    }

    /// Load a Solana CLI keypair file (a JSON array of 64 bytes).
    ///
    /// A leading `~/` is resolved against `$HOME`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = expand_home(path.as_ref());
        let io_error = |reason: String| ConfigError::Io {
            path: path.display().to_string(),
            reason,
        };

        let content = Zeroizing::new(fs::read_to_string(&path).map_err(|e| io_error(e.to_string()))?);
        let keypair = parse_keypair_json(&content).map_err(|reason| ConfigError::Invalid {
            field: "wallet.keypair_path",
            reason: format!("{}: {reason}", path.display()),
        })?;

        info!(wallet = %keypair.address(), "loaded wallet keypair");
        Ok(Self::new(keypair))
    }

    /// Whether `sign_and_send` waits for confirmation before returning.
    pub fn with_confirmation(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    pub fn address(&self) -> String {
        self.keypair.address()
    }
}

#[async_trait]
impl WalletSigner for LocalKeypairWallet {
    fn public_key(&self) -> [u8; 32] {
        self.keypair.pubkey()
    }

    async fn sign_and_send(
        &self,
        transaction: PartiallySignedTransaction,
        connection: &dyn LedgerClient,
    ) -> Result<String, SignerError> {
        let ours = self.keypair.pubkey();
        if let Some(missing) = transaction
            .message()
            .signer_keys()
            .iter()
            .find(|key| **key != ours && !transaction.is_signed_by(key))
        {
            return Err(SignerError::Rejected(format!(
                "missing co-signature from {}",
                format_address(missing)
            )));
        }

        let wire = sign_sol_raw_transaction(&self.keypair, &transaction.to_wire()?)?;
        let signature = connection.send_transaction(&wire).await?;
        debug!(%signature, bytes = wire.len(), "transaction sent");

        if self.confirm {
            connection.confirm_transaction(&signature).await?;
        }

        Ok(signature)
    }
}

fn parse_keypair_json(content: &str) -> Result<Keypair, String> {
    let bytes: Zeroizing<Vec<u8>> = Zeroizing::new(
        serde_json::from_str(content).map_err(|e| format!("not a JSON byte array: {e}"))?,
    );
    Keypair::from_bytes(&bytes).map_err(|e| e.to_string())
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}
