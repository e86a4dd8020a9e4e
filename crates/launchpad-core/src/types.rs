use std::fmt;
use std::num::IntErrorKind;

use serde::Serialize;

use chain_sol::format_address;

use crate::error::LaunchError;

/// Decimals of every launched mint.
pub const MINT_DECIMALS: u8 = 9;

/// File name of the uploaded metadata document.
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Content type of the uploaded metadata document.
pub const METADATA_CONTENT_TYPE: &str = "application/json";

/// User-supplied attributes of the token to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    pub name: String,
    pub symbol: String,
    pub image_reference: String,
    /// Initial supply in base units (not scaled by decimals).
    pub initial_supply: u64,
}

impl TokenRequest {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        image_reference: impl Into<String>,
        initial_supply: u64,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            image_reference: image_reference.into(),
            initial_supply,
        }
    }

    /// Build a request from raw form input, parsing the supply text.
    pub fn parse(
        name: impl Into<String>,
        symbol: impl Into<String>,
        image_reference: impl Into<String>,
        supply: &str,
    ) -> Result<Self, LaunchError> {
        Ok(Self::new(name, symbol, image_reference, parse_supply(supply)?))
    }

    /// The JSON document uploaded to storage for this request.
    pub fn metadata_document(&self) -> MetadataDocument {
        MetadataDocument {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            image: self.image_reference.clone(),
        }
    }
}

/// Parse a supply typed by the user into base units.
///
/// Accepts an optionally `+`-prefixed decimal integer in `0..=u64::MAX`.
pub fn parse_supply(input: &str) -> Result<u64, LaunchError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::InvalidSupply("supply is empty".into()));
    }

    trimmed.parse::<u64>().map_err(|e| {
        let reason = match e.kind() {
            IntErrorKind::PosOverflow => format!("{trimmed} exceeds {}", u64::MAX),
            _ if trimmed.starts_with('-') => format!("{trimmed} is negative"),
            _ => format!("{trimmed:?} is not a whole number"),
        };
        LaunchError::InvalidSupply(reason)
    })
}

/// Off-chain metadata document referenced by the on-chain `uri`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataDocument {
    pub name: String,
    pub symbol: String,
    pub image: String,
}

/// The three ordered submissions of a launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStage {
    /// Create the mint account and initialize pointer, mint and metadata.
    CreateMint,
    /// Create the wallet's associated token account.
    CreateAssociatedAccount,
    /// Mint the initial supply into the associated account.
    MintSupply,
}

impl TransactionStage {
    pub const ALL: [TransactionStage; 3] = [
        TransactionStage::CreateMint,
        TransactionStage::CreateAssociatedAccount,
        TransactionStage::MintSupply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStage::CreateMint => "create-mint",
            TransactionStage::CreateAssociatedAccount => "create-associated-account",
            TransactionStage::MintSupply => "mint-supply",
        }
    }
}

impl fmt::Display for TransactionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a successful launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchReceipt {
    pub mint: [u8; 32],
    pub associated_account: [u8; 32],
    pub amount: u64,
    pub metadata_uri: String,
    /// Submission signatures, indexed like [`TransactionStage::ALL`].
    pub signatures: [String; 3],
}

impl LaunchReceipt {
    pub fn mint_address(&self) -> String {
        format_address(&self.mint)
    }

    pub fn associated_account_address(&self) -> String {
        format_address(&self.associated_account)
    }

    pub fn signature(&self, stage: TransactionStage) -> &str {
        &self.signatures[stage as usize]
    }
}

impl fmt::Display for LaunchReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total of {} were minted by {} at {}",
            self.amount,
            self.mint_address(),
            self.associated_account_address()
        )
    }
}
