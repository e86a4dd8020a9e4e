//! Token-2022 and Associated Token Account instructions.
//!
//! Instruction data is encoded by hand in the token program's packed layout;
//! no `spl-token-2022` dependency. Only the instructions needed to launch a
//! mint with a metadata pointer are implemented.

use crate::address::find_program_address;
use crate::error::SolError;
use crate::system::SYSTEM_PROGRAM_ID;
use crate::transaction::{SolAccountMeta, SolInstruction};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// Token-2022 Program ID: `TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb`
pub const TOKEN_2022_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xee, 0x75, 0x8f, 0xde, 0x18, 0x42, 0x5d, 0xbc, 0xe4, 0x6c, 0xcd,
    0xda, 0xb6, 0x1a, 0xfc, 0x4d, 0x83, 0xb9, 0x0d, 0x27, 0xfe, 0xbd, 0xf9, 0x28, 0xd8, 0xa1,
    0x8b, 0xfc,
];

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: [u8; 32] = [
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d,
    0x83, 0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9,
    0xf8, 0x59,
];

/// Rent sysvar: `SysvarRent111111111111111111111111111111111`
pub const SYSVAR_RENT_ID: [u8; 32] = [
    0x06, 0xa7, 0xd5, 0x17, 0x19, 0x2c, 0x5c, 0x51, 0x21, 0x8c, 0xc9, 0x4c, 0x3d, 0x4a, 0xf1,
    0x7f, 0x58, 0xda, 0xee, 0x08, 0x9b, 0xa1, 0xfd, 0x44, 0xe3, 0xdb, 0xd9, 0x8a, 0x00, 0x00,
    0x00, 0x00,
];

// ---------------------------------------------------------------------------
// Account sizes
// ---------------------------------------------------------------------------

/// Size of a base mint without extensions.
pub const BASE_MINT_LEN: usize = 82;
/// Size of a base token account. Extended mints are padded up to this.
pub const BASE_ACCOUNT_LEN: usize = 165;
/// Size of a multisig account. An extended account may never be this long.
pub const MULTISIG_LEN: usize = 355;
/// The account-type byte written after the padded base state.
pub const ACCOUNT_TYPE_SIZE: usize = 1;
/// TLV header: extension type (u16).
pub const TYPE_SIZE: usize = 2;
/// TLV header: value length (u16).
pub const LENGTH_SIZE: usize = 2;

/// Mint extensions this crate knows how to size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ExtensionType {
    MetadataPointer = 18,
    TokenMetadata = 19,
}

impl ExtensionType {
    /// Value length for fixed-size extensions; `None` when variable-length.
    pub fn fixed_len(self) -> Option<usize> {
        match self {
            // authority (32) + metadata address (32)
            ExtensionType::MetadataPointer => Some(64),
            ExtensionType::TokenMetadata => None,
        }
    }
}

/// Space needed for a mint carrying the given fixed-size extensions.
///
/// Variable-length extensions (token metadata) are written later via
/// realloc and must be sized separately.
pub fn mint_len(extensions: &[ExtensionType]) -> Result<usize, SolError> {
    if extensions.is_empty() {
        return Ok(BASE_MINT_LEN);
    }

    let mut tlv = 0usize;
    for ext in extensions {
        let len = ext.fixed_len().ok_or_else(|| {
            SolError::TransactionBuildError(format!(
                "{ext:?} is variable-length and cannot be pre-sized"
            ))
        })?;
        tlv += TYPE_SIZE + LENGTH_SIZE + len;
    }

    let total = BASE_ACCOUNT_LEN + ACCOUNT_TYPE_SIZE + tlv;
    if total == MULTISIG_LEN {
        Ok(total + TYPE_SIZE)
    } else {
        Ok(total)
    }
}

// ---------------------------------------------------------------------------
// Token-2022 instructions
// ---------------------------------------------------------------------------

const INITIALIZE_MINT_IX: u8 = 0;
const MINT_TO_IX: u8 = 7;
const METADATA_POINTER_EXTENSION_IX: u8 = 39;
const METADATA_POINTER_INITIALIZE: u8 = 0;

/// `OptionalNonZeroPubkey`: `None` is encoded as 32 zero bytes.
fn optional_nonzero(key: Option<&[u8; 32]>) -> [u8; 32] {
    key.copied().unwrap_or([0u8; 32])
}

/// Build `MetadataPointerExtension::Initialize`.
///
/// Must run before `InitializeMint`. Data: `[39, 0] | authority | metadata_address`.
pub fn initialize_metadata_pointer(
    mint: &[u8; 32],
    authority: Option<&[u8; 32]>,
    metadata_address: Option<&[u8; 32]>,
) -> SolInstruction {
    let mut data = Vec::with_capacity(66);
    data.push(METADATA_POINTER_EXTENSION_IX);
    data.push(METADATA_POINTER_INITIALIZE);
    data.extend_from_slice(&optional_nonzero(authority));
    data.extend_from_slice(&optional_nonzero(metadata_address));

    SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![SolAccountMeta::writable(*mint, false)],
        data,
    }
}

/// Build `InitializeMint`.
///
/// Data: `[0, decimals] | mint_authority | COption<freeze_authority>`, where
/// the option is a single tag byte followed by the key only when present.
pub fn initialize_mint(
    mint: &[u8; 32],
    decimals: u8,
    mint_authority: &[u8; 32],
    freeze_authority: Option<&[u8; 32]>,
) -> SolInstruction {
    let mut data = Vec::with_capacity(67);
    data.push(INITIALIZE_MINT_IX);
    data.push(decimals);
    data.extend_from_slice(mint_authority);
    match freeze_authority {
        Some(key) => {
            data.push(1);
            data.extend_from_slice(key);
        }
        None => data.push(0),
    }

    SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*mint, false),
            SolAccountMeta::readonly(SYSVAR_RENT_ID, false),
        ],
        data,
    }
}

/// Build `MintTo`: mint `amount` base units into `destination`.
///
/// Data: `[7] | u64 LE amount` = 9 bytes.
pub fn mint_to(
    mint: &[u8; 32],
    destination: &[u8; 32],
    mint_authority: &[u8; 32],
    amount: u64,
) -> SolInstruction {
    let mut data = Vec::with_capacity(9);
    data.push(MINT_TO_IX);
    data.extend_from_slice(&amount.to_le_bytes());

    SolInstruction {
        program_id: TOKEN_2022_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*mint, false),
            SolAccountMeta::writable(*destination, false),
            SolAccountMeta::readonly(*mint_authority, true),
        ],
        data,
    }
}

// ---------------------------------------------------------------------------
// Associated Token Account
// ---------------------------------------------------------------------------

/// Associated token program `Create` discriminant.
const ATA_CREATE_IX: u8 = 0;

/// Derive the associated token account address for a wallet + mint pair.
///
/// Seeds: `[wallet, token_program_id, mint]` under the associated token
/// program. Pure and deterministic.
pub fn derive_associated_token_address(
    wallet: &[u8; 32],
    mint: &[u8; 32],
    token_program_id: &[u8; 32],
) -> Result<[u8; 32], SolError> {
    find_program_address(
        &[wallet.as_ref(), token_program_id.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Build the associated token program `Create` instruction for
/// `(wallet, mint)`, funded by `payer`.
pub fn create_associated_token_account(
    payer: &[u8; 32],
    wallet: &[u8; 32],
    mint: &[u8; 32],
    token_program_id: &[u8; 32],
) -> Result<SolInstruction, SolError> {
    let associated = derive_associated_token_address(wallet, mint, token_program_id)?;

    Ok(SolInstruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*payer, true),
            SolAccountMeta::writable(associated, false),
            SolAccountMeta::readonly(*wallet, false),
            SolAccountMeta::readonly(*mint, false),
            SolAccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            SolAccountMeta::readonly(*token_program_id, false),
        ],
        data: vec![ATA_CREATE_IX],
    })
}
