//! Manual Solana transaction wire format and signing.
//!
//! We build legacy Solana transactions entirely by hand, without a `solana-sdk`
//! dependency. The wire format is a compact binary layout:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```
//!
//! A transaction may need several signatures (e.g. the fee payer plus a
//! freshly generated account). [`PartiallySignedTransaction`] holds one slot
//! per required signer so each party can fill its own slot independently.

use crate::error::SolError;
use crate::keypair::Keypair;

/// Maximum serialized transaction size accepted by the cluster.
pub const PACKET_DATA_SIZE: usize = 1232;

/// An all-zero signature marks a slot that has not been signed yet.
const EMPTY_SIGNATURE: [u8; 64] = [0u8; 64];

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value from a byte slice.
///
/// Returns `(value, bytes_consumed)`. Truncated input and non-canonical
/// encodings (a zero continuation byte, or a third byte above `0x03`) are
/// rejected.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;
    let mut consumed = 0usize;

    loop {
        let byte = *data.get(consumed).ok_or_else(|| {
            SolError::SerializationError(
                "unexpected end of data while decoding compact-u16".into(),
            )
        })?;
        if consumed > 0 && byte == 0 {
            return Err(SolError::SerializationError(
                "non-canonical compact-u16 encoding".into(),
            ));
        }
        if consumed == 2 && byte > 0x03 {
            return Err(SolError::SerializationError(
                "compact-u16 value overflow".into(),
            ));
        }
        value |= ((byte & 0x7f) as u32) << (7 * consumed);
        consumed += 1;

        if byte & 0x80 == 0 || consumed >= 3 {
            break;
        }
    }

    let value = u16::try_from(value)
        .map_err(|_| SolError::SerializationError("compact-u16 value overflow".into()))?;
    Ok((value, consumed))
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let len = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("too many {what}: {len}")))?;
    Ok(encode_compact_u16(len))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in a Solana instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolAccountMeta {
    pub pubkey: [u8; 32],
    pub is_signer: bool,
    pub is_writable: bool,
}

impl SolAccountMeta {
    pub fn writable(pubkey: [u8; 32], is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    pub fn readonly(pubkey: [u8; 32], is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// A Solana instruction (before it is compiled into a transaction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolInstruction {
    pub program_id: [u8; 32],
    pub accounts: Vec<SolAccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled legacy message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolTransaction {
    /// All account keys referenced by this transaction, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<[u8; 32]>,

    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned: u8,

    /// Recent blockhash (32 bytes).
    pub recent_blockhash: [u8; 32],

    /// Compiled instructions (account references replaced with indices).
    pub compiled_instructions: Vec<CompiledInstruction>,
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the transaction's `account_keys` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    /// Index into `account_keys` for the program to invoke.
    pub program_id_index: u8,
    /// Indices into `account_keys` for each account the instruction reads/writes.
    pub account_indices: Vec<u8>,
    /// Opaque instruction data.
    pub data: Vec<u8>,
}

impl SolTransaction {
    /// The required signer keys, in signature-slot order.
    pub fn signer_keys(&self) -> &[[u8; 32]] {
        &self.account_keys[..self.num_required_signatures as usize]
    }

    /// The fee payer (always the first account key).
    pub fn fee_payer(&self) -> Option<&[u8; 32]> {
        self.account_keys.first()
    }

    /// Program id invoked by the compiled instruction at `index`.
    pub fn program_id_of(&self, index: usize) -> Option<&[u8; 32]> {
        let ix = self.compiled_instructions.get(index)?;
        self.account_keys.get(ix.program_id_index as usize)
    }

    /// Resolve the account keys referenced by the instruction at `index`.
    pub fn accounts_of(&self, index: usize) -> Option<Vec<[u8; 32]>> {
        let ix = self.compiled_instructions.get(index)?;
        ix.account_indices
            .iter()
            .map(|&i| self.account_keys.get(i as usize).copied())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Transaction building
// ---------------------------------------------------------------------------

/// Compile a set of instructions into a legacy message with a single fee
/// payer.
///
/// The fee payer is always signer + writable and placed at index 0.
pub fn compile_transaction(
    instructions: &[SolInstruction],
    fee_payer: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<SolTransaction, SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError(
            "transaction needs at least one instruction".into(),
        ));
    }

    // Instruction account lists are tiny, a Vec keeps insertion order for free.
    struct AccountEntry {
        pubkey: [u8; 32],
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: [u8; 32], signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    // Fee payer goes in first so the stable sort keeps it at index 0.
    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program IDs are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    // `sort_by_key` is stable: insertion order holds within each category.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    // Header counts and account indices are single bytes.
    if entries.len() > u8::MAX as usize {
        return Err(SolError::TransactionBuildError(format!(
            "{} accounts exceed the {} account limit",
            entries.len(),
            u8::MAX
        )));
    }

    let count = |pred: fn(&AccountEntry) -> bool| {
        let n = entries.iter().filter(|e| pred(e)).count();
        u8::try_from(n)
            .map_err(|_| SolError::TransactionBuildError(format!("header count {n} overflows u8")))
    };
    let num_signers = count(|e| e.is_signer)?;
    let num_readonly_signed = count(|e| e.is_signer && !e.is_writable)?;
    let num_readonly_unsigned = count(|e| !e.is_signer && !e.is_writable)?;

    let account_keys: Vec<[u8; 32]> = entries.iter().map(|e| e.pubkey).collect();

    let index_of = |key: &[u8; 32], what: &str| {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError(format!("{what} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let program_id_index = index_of(&ix.program_id, "program_id")?;
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey, "account"))
            .collect::<Result<Vec<u8>, SolError>>()?;

        compiled.push(CompiledInstruction {
            program_id_index,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(SolTransaction {
        account_keys,
        num_required_signatures: num_signers,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        compiled_instructions: compiled,
    })
}

/// Serialize the transaction message (the bytes that get signed).
pub fn serialize_message(tx: &SolTransaction) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(512);

    buf.push(tx.num_required_signatures);
    buf.push(tx.num_readonly_signed);
    buf.push(tx.num_readonly_unsigned);

    buf.extend_from_slice(&compact_len(tx.account_keys.len(), "account keys")?);
    for key in &tx.account_keys {
        buf.extend_from_slice(key);
    }

    buf.extend_from_slice(&tx.recent_blockhash);

    buf.extend_from_slice(&compact_len(tx.compiled_instructions.len(), "instructions")?);
    for ix in &tx.compiled_instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&compact_len(ix.account_indices.len(), "instruction accounts")?);
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&compact_len(ix.data.len(), "instruction data bytes")?);
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

// ---------------------------------------------------------------------------
// Multi-signer transactions
// ---------------------------------------------------------------------------

/// A compiled message plus one signature slot per required signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartiallySignedTransaction {
    message: SolTransaction,
    signatures: Vec<[u8; 64]>,
}

impl PartiallySignedTransaction {
    /// Wrap a compiled message with empty signature slots.
    pub fn new(message: SolTransaction) -> Self {
        let slots = message.num_required_signatures as usize;
        Self {
            message,
            signatures: vec![EMPTY_SIGNATURE; slots],
        }
    }

    pub fn message(&self) -> &SolTransaction {
        &self.message
    }

    pub fn signatures(&self) -> &[[u8; 64]] {
        &self.signatures
    }

    /// Sign the message with `keypair` and store it in that signer's slot.
    ///
    /// Fails if the keypair is not one of the required signers.
    pub fn partial_sign(&mut self, keypair: &Keypair) -> Result<(), SolError> {
        let pubkey = keypair.pubkey();
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|k| *k == pubkey)
            .ok_or_else(|| {
                SolError::SigningError(format!(
                    "{} is not a required signer",
                    keypair.address()
                ))
            })?;

        let message_bytes = serialize_message(&self.message)?;
        self.signatures[slot] = keypair.sign(&message_bytes);
        Ok(())
    }

    /// Whether the slot belonging to `pubkey` holds a signature.
    pub fn is_signed_by(&self, pubkey: &[u8; 32]) -> bool {
        self.message
            .signer_keys()
            .iter()
            .position(|k| k == pubkey)
            .is_some_and(|slot| self.signatures[slot] != EMPTY_SIGNATURE)
    }

    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(|s| *s != EMPTY_SIGNATURE)
    }

    /// Serialize to wire format. Unsigned slots are emitted as zeros.
    pub fn to_wire(&self) -> Result<Vec<u8>, SolError> {
        let message_bytes = serialize_message(&self.message)?;

        let mut wire = Vec::with_capacity(3 + 64 * self.signatures.len() + message_bytes.len());
        wire.extend_from_slice(&compact_len(self.signatures.len(), "signatures")?);
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&message_bytes);

        if wire.len() > PACKET_DATA_SIZE {
            return Err(SolError::TransactionBuildError(format!(
                "transaction is {} bytes, limit is {PACKET_DATA_SIZE}",
                wire.len()
            )));
        }

        Ok(wire)
    }
}

// ---------------------------------------------------------------------------
// Raw transaction signing (wallet side)
// ---------------------------------------------------------------------------

/// Sign a pre-built Solana wire-format transaction with `keypair`.
///
/// 1. Parses the wire format to locate the signature slots and the message.
/// 2. Finds which signature slot corresponds to our public key.
/// 3. Signs the message bytes and writes the signature into that slot.
/// 4. Returns the updated transaction bytes; other slots are left untouched.
///
/// An error is returned if our pubkey is not in the signer list.
pub fn sign_sol_raw_transaction(keypair: &Keypair, raw_tx: &[u8]) -> Result<Vec<u8>, SolError> {
    let our_pubkey = keypair.pubkey();

    // Layout: compact-u16(num_signatures) | 64-byte signatures * N | message
    let (num_sigs, compact_len) = decode_compact_u16(raw_tx)?;

    if num_sigs == 0 {
        return Err(SolError::TransactionBuildError(
            "transaction has zero signatures".into(),
        ));
    }

    let sigs_start = compact_len;
    let sigs_end = sigs_start + (num_sigs as usize) * 64;

    if sigs_end > raw_tx.len() {
        return Err(SolError::SerializationError(
            "transaction too short: signature slots exceed length".into(),
        ));
    }

    let message_bytes = &raw_tx[sigs_end..];

    if message_bytes.len() < 4 {
        return Err(SolError::SerializationError(
            "transaction message too short".into(),
        ));
    }

    let num_required_sigs = message_bytes[0] as usize;
    let (num_accounts, accounts_compact_len) = decode_compact_u16(&message_bytes[3..])?;

    let accounts_start = 3 + accounts_compact_len;
    let accounts_end = accounts_start + (num_accounts as usize) * 32;

    if accounts_end > message_bytes.len() {
        return Err(SolError::SerializationError(
            "transaction message too short for account keys".into(),
        ));
    }

    let signer_idx = (0..num_required_sigs.min(num_accounts as usize))
        .find(|i| {
            let key_start = accounts_start + i * 32;
            message_bytes[key_start..key_start + 32] == our_pubkey
        })
        .filter(|i| *i < num_sigs as usize)
        .ok_or_else(|| {
            SolError::SigningError("wallet pubkey not found in transaction signers".into())
        })?;

    let signature = keypair.sign(message_bytes);

    let mut signed_tx = raw_tx.to_vec();
    let sig_offset = sigs_start + signer_idx * 64;
    signed_tx[sig_offset..sig_offset + 64].copy_from_slice(&signature);

    Ok(signed_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, VerifyingKey};

    fn instruction(program: u8, accounts: Vec<SolAccountMeta>) -> SolInstruction {
        SolInstruction {
            program_id: [program; 32],
            accounts,
            data: vec![1, 2, 3],
        }
    }

    fn two_signer_tx(payer: &Keypair, extra: &Keypair) -> PartiallySignedTransaction {
        let ix = instruction(
            0x09,
            vec![
                SolAccountMeta::writable(payer.pubkey(), true),
                SolAccountMeta::writable(extra.pubkey(), true),
            ],
        );
        let msg = compile_transaction(&[ix], &payer.pubkey(), &[0xAB; 32]).unwrap();
        PartiallySignedTransaction::new(msg)
    }

    fn verify_slot(wire: &[u8], slot: usize, key: &[u8; 32], num_sigs: usize) -> bool {
        let start = 1 + slot * 64;
        let sig: [u8; 64] = wire[start..start + 64].try_into().unwrap();
        let message = &wire[1 + num_sigs * 64..];
        VerifyingKey::from_bytes(key)
            .unwrap()
            .verify_strict(message, &Signature::from_bytes(&sig))
            .is_ok()
    }

    // -- compact-u16 --------------------------------------------------------

    #[test]
    fn compact_u16_boundaries() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
        assert_eq!(encode_compact_u16(128), vec![0x80, 0x01]);
        assert_eq!(encode_compact_u16(16383), vec![0xff, 0x7f]);
        assert_eq!(encode_compact_u16(16384), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode_compact_u16(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    #[test]
    fn decode_compact_u16_reports_consumed_bytes() {
        assert_eq!(decode_compact_u16(&[0x7f, 0xAA]).unwrap(), (127, 1));
        assert_eq!(decode_compact_u16(&[0x80, 0x01]).unwrap(), (128, 2));
        assert_eq!(decode_compact_u16(&[0x80, 0x80, 0x01]).unwrap(), (16384, 3));
    }

    #[test]
    fn decode_compact_u16_truncated_fails() {
        assert!(decode_compact_u16(&[]).is_err());
        assert!(decode_compact_u16(&[0x80]).is_err());
    }

    #[test]
    fn decode_compact_u16_overflow_fails() {
        assert!(decode_compact_u16(&[0xff, 0xff, 0x7f]).is_err());
        assert!(decode_compact_u16(&[0xff, 0xff, 0x04]).is_err());
        assert_eq!(decode_compact_u16(&[0xff, 0xff, 0x03]).unwrap(), (u16::MAX, 3));
    }

    #[test]
    fn decode_compact_u16_rejects_non_canonical() {
        // Zero-valued continuation bytes alias shorter encodings.
        assert!(decode_compact_u16(&[0x80, 0x00]).is_err());
        assert!(decode_compact_u16(&[0x81, 0x80, 0x00]).is_err());
        assert!(decode_compact_u16(&[0xff, 0x80, 0x00]).is_err());
        assert_eq!(decode_compact_u16(&[0x00, 0x00]).unwrap(), (0, 1));
    }

    // -- compilation --------------------------------------------------------

    #[test]
    fn compile_requires_instructions() {
        assert!(compile_transaction(&[], &[1u8; 32], &[0u8; 32]).is_err());
    }

    fn wide_instruction(extra_accounts: usize) -> SolInstruction {
        let accounts = (0..extra_accounts)
            .map(|i| {
                let mut key = [0xEEu8; 32];
                key[..8].copy_from_slice(&(i as u64).to_le_bytes());
                SolAccountMeta::readonly(key, false)
            })
            .collect();
        instruction(0x09, accounts)
    }

    #[test]
    fn account_limit_fits_single_byte_indices() {
        let payer = [0x01u8; 32];

        // payer + program + 253 = 255 accounts
        let tx = compile_transaction(&[wide_instruction(253)], &payer, &[0u8; 32]).unwrap();
        assert_eq!(tx.account_keys.len(), 255);
        assert_eq!(tx.num_readonly_unsigned, 254);

        // payer + program + 254 = 256 accounts
        let err = compile_transaction(&[wide_instruction(254)], &payer, &[0u8; 32]).unwrap_err();
        assert!(err.to_string().contains("account limit"));
    }

    #[test]
    fn fee_payer_first_then_other_signers() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let extra = Keypair::from_seed(&[0x02; 32]);
        // The extra signer is listed before the payer in the instruction.
        let ix = instruction(
            0x09,
            vec![
                SolAccountMeta::writable(extra.pubkey(), true),
                SolAccountMeta::readonly([0x33; 32], false),
                SolAccountMeta::writable([0x44; 32], false),
            ],
        );
        let tx = compile_transaction(&[ix], &payer.pubkey(), &[0u8; 32]).unwrap();

        assert_eq!(tx.account_keys[0], payer.pubkey());
        assert_eq!(tx.account_keys[1], extra.pubkey());
        assert_eq!(tx.account_keys[2], [0x44; 32]);
        assert_eq!(tx.num_required_signatures, 2);
        assert_eq!(tx.num_readonly_signed, 0);
        // 0x33.. and the program id.
        assert_eq!(tx.num_readonly_unsigned, 2);
        assert_eq!(tx.fee_payer(), Some(&payer.pubkey()));
    }

    #[test]
    fn duplicate_accounts_merge_permissions() {
        let payer = [0x01u8; 32];
        let shared = [0x05u8; 32];
        let a = instruction(0x09, vec![SolAccountMeta::readonly(shared, false)]);
        let b = instruction(0x09, vec![SolAccountMeta::writable(shared, false)]);
        let tx = compile_transaction(&[a, b], &payer, &[0u8; 32]).unwrap();

        // payer, shared (promoted to writable), program.
        assert_eq!(tx.account_keys.len(), 3);
        assert_eq!(tx.account_keys[1], shared);
        assert_eq!(tx.num_readonly_unsigned, 1);
    }

    #[test]
    fn compiled_instruction_resolves_back_to_keys() {
        let payer = [0x01u8; 32];
        let ix = instruction(
            0x09,
            vec![
                SolAccountMeta::writable([0x02; 32], false),
                SolAccountMeta::readonly(payer, true),
            ],
        );
        let tx = compile_transaction(&[ix], &payer, &[0u8; 32]).unwrap();
        assert_eq!(tx.program_id_of(0), Some(&[0x09; 32]));
        assert_eq!(tx.accounts_of(0).unwrap(), vec![[0x02; 32], payer]);
        assert!(tx.accounts_of(1).is_none());
    }

    #[test]
    fn serialize_message_layout() {
        let payer = [0x01u8; 32];
        let ix = instruction(0x09, vec![SolAccountMeta::writable([0x02; 32], false)]);
        let tx = compile_transaction(&[ix], &payer, &[0xCC; 32]).unwrap();
        let msg = serialize_message(&tx).unwrap();

        assert_eq!(msg[0], tx.num_required_signatures);
        assert_eq!(msg[1], tx.num_readonly_signed);
        assert_eq!(msg[2], tx.num_readonly_unsigned);
        assert_eq!(msg[3] as usize, tx.account_keys.len());
        let offset = 4 + 32 * tx.account_keys.len();
        assert_eq!(&msg[offset..offset + 32], &[0xCC; 32]);
    }

    // -- partial signing ----------------------------------------------------

    #[test]
    fn new_transaction_has_empty_slots() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let extra = Keypair::from_seed(&[0x02; 32]);
        let tx = two_signer_tx(&payer, &extra);
        assert_eq!(tx.signatures().len(), 2);
        assert!(!tx.is_fully_signed());
        assert!(!tx.is_signed_by(&payer.pubkey()));
    }

    #[test]
    fn partial_sign_fills_only_own_slot() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let extra = Keypair::from_seed(&[0x02; 32]);
        let mut tx = two_signer_tx(&payer, &extra);

        tx.partial_sign(&extra).unwrap();
        assert!(tx.is_signed_by(&extra.pubkey()));
        assert!(!tx.is_signed_by(&payer.pubkey()));
        assert_eq!(tx.signatures()[0], [0u8; 64]);

        tx.partial_sign(&payer).unwrap();
        assert!(tx.is_fully_signed());

        let wire = tx.to_wire().unwrap();
        assert_eq!(wire[0], 2);
        assert!(verify_slot(&wire, 0, &payer.pubkey(), 2));
        assert!(verify_slot(&wire, 1, &extra.pubkey(), 2));
    }

    #[test]
    fn partial_sign_rejects_outsiders() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let extra = Keypair::from_seed(&[0x02; 32]);
        let outsider = Keypair::from_seed(&[0x03; 32]);
        let mut tx = two_signer_tx(&payer, &extra);

        let err = tx.partial_sign(&outsider).unwrap_err();
        assert!(err.to_string().contains("not a required signer"));
    }

    #[test]
    fn oversized_transaction_is_rejected() {
        let payer = [0x01u8; 32];
        let ix = SolInstruction {
            program_id: [0x09; 32],
            accounts: vec![],
            data: vec![0u8; PACKET_DATA_SIZE],
        };
        let tx = PartiallySignedTransaction::new(
            compile_transaction(&[ix], &payer, &[0u8; 32]).unwrap(),
        );
        assert!(tx.to_wire().is_err());
    }

    // -- raw signing --------------------------------------------------------

    #[test]
    fn raw_signing_matches_partial_signing() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let extra = Keypair::from_seed(&[0x02; 32]);

        let mut both = two_signer_tx(&payer, &extra);
        both.partial_sign(&extra).unwrap();
        let half_signed_wire = both.to_wire().unwrap();
        both.partial_sign(&payer).unwrap();

        let raw_signed = sign_sol_raw_transaction(&payer, &half_signed_wire).unwrap();
        assert_eq!(raw_signed, both.to_wire().unwrap());
    }

    #[test]
    fn raw_signing_preserves_message() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let extra = Keypair::from_seed(&[0x02; 32]);
        let wire = two_signer_tx(&payer, &extra).to_wire().unwrap();
        let signed = sign_sol_raw_transaction(&extra, &wire).unwrap();

        assert_eq!(&signed[129..], &wire[129..]);
        assert!(verify_slot(&signed, 1, &extra.pubkey(), 2));
        assert_eq!(&signed[1..65], &[0u8; 64]);
    }

    #[test]
    fn raw_signing_wrong_key_fails() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let extra = Keypair::from_seed(&[0x02; 32]);
        let outsider = Keypair::from_seed(&[0x03; 32]);
        let wire = two_signer_tx(&payer, &extra).to_wire().unwrap();

        let err = sign_sol_raw_transaction(&outsider, &wire).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn raw_signing_malformed_input_fails() {
        let key = Keypair::from_seed(&[0x42; 32]);
        assert!(sign_sol_raw_transaction(&key, &[]).is_err());
        assert!(sign_sol_raw_transaction(&key, &[0x01]).is_err());

        let err = sign_sol_raw_transaction(&key, &[0x00, 0x01, 0x00, 0x00]).unwrap_err();
        assert!(err.to_string().contains("zero signatures"));
    }
}
