//! The token creation flow.
//!
//! Steps run strictly in order and each awaits the previous one. Any failure
//! stops the flow; transactions that already landed stay on chain.

use tracing::{debug, error, info};

use chain_sol::{format_address, Keypair, PartiallySignedTransaction};

use crate::collaborators::{LedgerClient, MetadataStorage, WalletSigner};
use crate::error::LaunchError;
use crate::transactions;
use crate::types::{
    LaunchReceipt, TokenRequest, TransactionStage, METADATA_CONTENT_TYPE, METADATA_FILE_NAME,
};

/// The collaborators a launch runs against, passed explicitly per call.
#[derive(Clone, Copy)]
pub struct LaunchContext<'a> {
    pub storage: &'a dyn MetadataStorage,
    pub ledger: &'a dyn LedgerClient,
    pub wallet: &'a dyn WalletSigner,
}

impl<'a> LaunchContext<'a> {
    pub fn new(
        storage: &'a dyn MetadataStorage,
        ledger: &'a dyn LedgerClient,
        wallet: &'a dyn WalletSigner,
    ) -> Self {
        Self {
            storage,
            ledger,
            wallet,
        }
    }

    /// Hand `transaction` to the wallet, tagging failures with `stage`.
    async fn submit(
        &self,
        stage: TransactionStage,
        mint: &[u8; 32],
        transaction: PartiallySignedTransaction,
    ) -> Result<String, LaunchError> {
        debug!(%stage, "submitting transaction through wallet");
        self.wallet
            .sign_and_send(transaction, self.ledger)
            .await
            .map_err(|source| LaunchError::Submission {
                stage,
                mint: format_address(mint),
                source,
            })
    }
}

/// Upload the metadata document for `request` and return its URI.
pub async fn upload_metadata(
    request: &TokenRequest,
    storage: &dyn MetadataStorage,
) -> Result<String, LaunchError> {
    let document = serde_json::to_vec(&request.metadata_document())?;

    match storage
        .upload(METADATA_FILE_NAME, METADATA_CONTENT_TYPE, document)
        .await
    {
        Ok(uri) => Ok(uri),
        Err(e) => {
            error!(error = %e, "metadata upload failed");
            Err(e.into())
        }
    }
}

/// Create a Token-2022 mint with self-hosted metadata and mint the initial
/// supply into the wallet's associated account.
///
/// Three transactions are submitted in order: mint creation, associated
/// account creation, then `MintTo`.
pub async fn create_token(
    request: &TokenRequest,
    ctx: &LaunchContext<'_>,
) -> Result<LaunchReceipt, LaunchError> {
    let wallet = ctx.wallet.public_key();

    // Owned by this call only; zeroized when it goes out of scope.
    let mint_keypair = Keypair::generate()?;
    let mint = mint_keypair.pubkey();
    info!(mint = %mint_keypair.address(), wallet = %format_address(&wallet), "generated mint keypair");

    let metadata_uri = upload_metadata(request, ctx.storage).await?;
    info!(uri = %metadata_uri, "uploaded token metadata");

    let metadata = transactions::metadata_record(request, &mint, &wallet, &metadata_uri);
    let rent = transactions::rent_requirement(&metadata)?;
    let lamports = ctx
        .ledger
        .minimum_balance_for_rent_exemption(rent.total())
        .await?;
    debug!(
        mint_len = rent.mint_len,
        metadata_len = rent.metadata_len,
        lamports,
        "computed rent-exempt balance"
    );

    let blockhash = ctx.ledger.latest_blockhash().await?;
    let create_mint = transactions::create_mint_transaction(
        &wallet,
        &mint_keypair,
        &metadata,
        &rent,
        lamports,
        &blockhash,
    )?;
    let create_mint_sig = ctx
        .submit(TransactionStage::CreateMint, &mint, create_mint)
        .await?;
    info!(signature = %create_mint_sig, "created mint");

    let blockhash = ctx.ledger.latest_blockhash().await?;
    let (create_account, associated) =
        transactions::create_associated_account_transaction(&wallet, &mint, &blockhash)?;
    let create_account_sig = ctx
        .submit(TransactionStage::CreateAssociatedAccount, &mint, create_account)
        .await?;
    info!(
        signature = %create_account_sig,
        account = %format_address(&associated),
        "created associated token account"
    );

    let blockhash = ctx.ledger.latest_blockhash().await?;
    let mint_supply = transactions::mint_supply_transaction(
        &wallet,
        &mint,
        &associated,
        request.initial_supply,
        &blockhash,
    )?;
    let mint_supply_sig = ctx
        .submit(TransactionStage::MintSupply, &mint, mint_supply)
        .await?;

    let receipt = LaunchReceipt {
        mint,
        associated_account: associated,
        amount: request.initial_supply,
        metadata_uri,
        signatures: [create_mint_sig, create_account_sig, mint_supply_sig],
    };
    info!(signature = %receipt.signature(TransactionStage::MintSupply), "{receipt}");

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingStorage {
        seen: Mutex<Vec<(String, String, Vec<u8>)>>,
        fail: bool,
    }

    #[async_trait]
    impl MetadataStorage for CapturingStorage {
        async fn upload(
            &self,
            file_name: &str,
            content_type: &str,
            bytes: Vec<u8>,
        ) -> Result<String, StorageError> {
            self.seen
                .lock()
                .unwrap()
                .push((file_name.into(), content_type.into(), bytes));
            if self.fail {
                Err(StorageError::Rejected("bucket full".into()))
            } else {
                Ok("https://cdn/x.json".into())
            }
        }
    }

    #[tokio::test]
    async fn upload_sends_json_document() {
        let storage = CapturingStorage::default();
        let req = TokenRequest::new("Demo", "DMO", "https://x/img.png", 1000);

        let uri = upload_metadata(&req, &storage).await.unwrap();
        assert_eq!(uri, "https://cdn/x.json");

        let seen = storage.seen.lock().unwrap();
        let (name, content_type, bytes) = &seen[0];
        assert_eq!(name, "metadata.json");
        assert_eq!(content_type, "application/json");
        let doc: serde_json::Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(doc["name"], "Demo");
        assert_eq!(doc["symbol"], "DMO");
        assert_eq!(doc["image"], "https://x/img.png");
    }

    #[tokio::test]
    async fn upload_failure_is_reraised() {
        let storage = CapturingStorage {
            fail: true,
            ..Default::default()
        };
        let req = TokenRequest::new("Demo", "DMO", "https://x/img.png", 1000);

        let err = upload_metadata(&req, &storage).await.unwrap_err();
        assert!(matches!(err, LaunchError::Upload(StorageError::Rejected(_))));
    }
}
