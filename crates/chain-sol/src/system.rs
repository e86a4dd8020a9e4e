//! System Program instructions.

use crate::transaction::{SolAccountMeta, SolInstruction};

/// The Solana System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// System Program `CreateAccount` instruction index (little-endian u32).
const SYSTEM_CREATE_ACCOUNT_IX_INDEX: u32 = 0;

/// Build a System Program `CreateAccount` instruction.
///
/// Funds `new_account` with `lamports`, allocates `space` bytes and assigns
/// it to `owner`. Both `payer` and `new_account` must sign.
///
/// # Wire format
///
/// u32 LE index (0) | u64 LE lamports | u64 LE space | 32-byte owner = 52 bytes.
pub fn create_account(
    payer: &[u8; 32],
    new_account: &[u8; 32],
    lamports: u64,
    space: u64,
    owner: &[u8; 32],
) -> SolInstruction {
    let mut data = Vec::with_capacity(52);
    data.extend_from_slice(&SYSTEM_CREATE_ACCOUNT_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());
    data.extend_from_slice(&space.to_le_bytes());
    data.extend_from_slice(owner);

    SolInstruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![
            SolAccountMeta::writable(*payer, true),
            SolAccountMeta::writable(*new_account, true),
        ],
        data,
    }
}
