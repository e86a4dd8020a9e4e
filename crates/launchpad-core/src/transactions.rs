//! Pure builders for the three launch transactions.
//!
//! Nothing here touches the network: callers supply the blockhash, rent and
//! URI, which keeps every layout decision unit-testable.

use chain_sol::token_2022::{self, ExtensionType};
use chain_sol::{
    compile_transaction, derive_associated_token_address, system, token_metadata, Keypair,
    PartiallySignedTransaction, SolInstruction, TokenMetadata, TOKEN_2022_PROGRAM_ID,
};

use crate::error::LaunchError;
use crate::types::{TokenRequest, MINT_DECIMALS};

/// Extensions initialized on every launched mint before `InitializeMint`.
pub const MINT_EXTENSIONS: [ExtensionType; 1] = [ExtensionType::MetadataPointer];

/// Account sizes that determine the mint's rent-exempt balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentRequirement {
    /// Space allocated by `CreateAccount` (base mint + fixed extensions).
    pub mint_len: usize,
    /// TLV bytes the metadata record adds when the program reallocates.
    pub metadata_len: usize,
}

impl RentRequirement {
    /// Bytes the rent-exempt minimum must cover.
    pub fn total(&self) -> usize {
        self.mint_len + self.metadata_len
    }
}

/// The on-chain metadata record for `request`, self-hosted in the mint.
pub fn metadata_record(
    request: &TokenRequest,
    mint: &[u8; 32],
    wallet: &[u8; 32],
    uri: &str,
) -> TokenMetadata {
    TokenMetadata {
        update_authority: *wallet,
        mint: *mint,
        name: request.name.clone(),
        symbol: request.symbol.clone(),
        uri: uri.to_owned(),
        additional_metadata: Vec::new(),
    }
}

/// Size the mint account for `metadata`. Recomputed per request because the
/// packed record grows with the name, symbol and URI.
pub fn rent_requirement(metadata: &TokenMetadata) -> Result<RentRequirement, LaunchError> {
    Ok(RentRequirement {
        mint_len: token_2022::mint_len(&MINT_EXTENSIONS)?,
        metadata_len: metadata.tlv_len(),
    })
}

/// Instructions of transaction 1, in execution order.
pub fn create_mint_instructions(
    wallet: &[u8; 32],
    metadata: &TokenMetadata,
    rent: &RentRequirement,
    lamports: u64,
) -> Result<Vec<SolInstruction>, LaunchError> {
    let mint = &metadata.mint;

    Ok(vec![
        system::create_account(
            wallet,
            mint,
            lamports,
            rent.mint_len as u64,
            &TOKEN_2022_PROGRAM_ID,
        ),
        token_2022::initialize_metadata_pointer(mint, Some(wallet), Some(mint)),
        token_2022::initialize_mint(mint, MINT_DECIMALS, wallet, None),
        token_metadata::initialize(
            &TOKEN_2022_PROGRAM_ID,
            mint,
            &metadata.update_authority,
            mint,
            wallet,
            &metadata.name,
            &metadata.symbol,
            &metadata.uri,
        )?,
    ])
}

/// Transaction 1: create and initialize the mint, co-signed by `mint`.
///
/// The wallet's slot is left empty for the wallet collaborator.
pub fn create_mint_transaction(
    wallet: &[u8; 32],
    mint: &Keypair,
    metadata: &TokenMetadata,
    rent: &RentRequirement,
    lamports: u64,
    recent_blockhash: &[u8; 32],
) -> Result<PartiallySignedTransaction, LaunchError> {
    if metadata.mint != mint.pubkey() {
        return Err(LaunchError::TransactionBuild(
            "metadata record belongs to a different mint".into(),
        ));
    }

    let instructions = create_mint_instructions(wallet, metadata, rent, lamports)?;
    let message = compile_transaction(&instructions, wallet, recent_blockhash)?;

    let mut transaction = PartiallySignedTransaction::new(message);
    transaction.partial_sign(mint)?;
    Ok(transaction)
}

/// Transaction 2: create the wallet's associated account for `mint`.
///
/// Returns the transaction together with the derived account address.
pub fn create_associated_account_transaction(
    wallet: &[u8; 32],
    mint: &[u8; 32],
    recent_blockhash: &[u8; 32],
) -> Result<(PartiallySignedTransaction, [u8; 32]), LaunchError> {
    let associated = derive_associated_token_address(wallet, mint, &TOKEN_2022_PROGRAM_ID)?;
    let instruction =
        token_2022::create_associated_token_account(wallet, wallet, mint, &TOKEN_2022_PROGRAM_ID)?;
    let message = compile_transaction(&[instruction], wallet, recent_blockhash)?;

    Ok((PartiallySignedTransaction::new(message), associated))
}

/// Transaction 3: mint `amount` base units into `associated`.
pub fn mint_supply_transaction(
    wallet: &[u8; 32],
    mint: &[u8; 32],
    associated: &[u8; 32],
    amount: u64,
    recent_blockhash: &[u8; 32],
) -> Result<PartiallySignedTransaction, LaunchError> {
    let instruction = token_2022::mint_to(mint, associated, wallet, amount);
    let message = compile_transaction(&[instruction], wallet, recent_blockhash)?;
    Ok(PartiallySignedTransaction::new(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_sol::{ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID};

    const WALLET: [u8; 32] = [0x0A; 32];
    const BLOCKHASH: [u8; 32] = [0xBB; 32];

    fn request() -> TokenRequest {
        TokenRequest::new("Demo", "DMO", "https://x/img.png", 1000)
    }

    #[test]
    fn rent_covers_pointer_mint_and_metadata() {
        let mint = Keypair::from_seed(&[0x01; 32]);
        let meta = metadata_record(&request(), &mint.pubkey(), &WALLET, "https://cdn/x.json");
        let rent = rent_requirement(&meta).unwrap();

        assert_eq!(rent.mint_len, 234);
        assert_eq!(rent.metadata_len, 2 + 2 + meta.pack().unwrap().len());
        assert_eq!(rent.total(), 234 + 109);
    }

    #[test]
    fn rent_grows_with_uri_length() {
        let mint = [0x01u8; 32];
        let short = metadata_record(&request(), &mint, &WALLET, "u");
        let long = metadata_record(&request(), &mint, &WALLET, "https://cdn.example/long/uri");
        let diff = rent_requirement(&long).unwrap().total() - rent_requirement(&short).unwrap().total();
        assert_eq!(diff, "https://cdn.example/long/uri".len() - 1);
    }

    #[test]
    fn create_mint_transaction_layout() {
        let mint = Keypair::from_seed(&[0x01; 32]);
        let meta = metadata_record(&request(), &mint.pubkey(), &WALLET, "https://cdn/x.json");
        let rent = rent_requirement(&meta).unwrap();
        let tx = create_mint_transaction(&WALLET, &mint, &meta, &rent, 5_000_000, &BLOCKHASH)
            .unwrap();
        let msg = tx.message();

        assert_eq!(msg.compiled_instructions.len(), 4);
        assert_eq!(msg.fee_payer(), Some(&WALLET));
        assert_eq!(msg.signer_keys(), &[WALLET, mint.pubkey()]);
        assert_eq!(msg.recent_blockhash, BLOCKHASH);

        assert_eq!(msg.program_id_of(0), Some(&SYSTEM_PROGRAM_ID));
        for i in 1..4 {
            assert_eq!(msg.program_id_of(i), Some(&TOKEN_2022_PROGRAM_ID));
        }

        // CreateAccount: space is the mint length, lamports cover mint + metadata.
        let create = &msg.compiled_instructions[0].data;
        assert_eq!(u64::from_le_bytes(create[4..12].try_into().unwrap()), 5_000_000);
        assert_eq!(u64::from_le_bytes(create[12..20].try_into().unwrap()), 234);
        assert_eq!(&create[20..52], &TOKEN_2022_PROGRAM_ID);

        // InitializeMint with 9 decimals and no freeze authority.
        let init_mint = &msg.compiled_instructions[2].data;
        assert_eq!(init_mint[1], MINT_DECIMALS);
        assert_eq!(init_mint[34], 0);
    }

    #[test]
    fn create_mint_is_cosigned_by_mint_only() {
        let mint = Keypair::from_seed(&[0x01; 32]);
        let meta = metadata_record(&request(), &mint.pubkey(), &WALLET, "https://cdn/x.json");
        let rent = rent_requirement(&meta).unwrap();
        let tx = create_mint_transaction(&WALLET, &mint, &meta, &rent, 1, &BLOCKHASH).unwrap();

        assert!(tx.is_signed_by(&mint.pubkey()));
        assert!(!tx.is_signed_by(&WALLET));
        assert!(!tx.is_fully_signed());
    }

    #[test]
    fn metadata_instruction_matches_rent_record() {
        let mint = Keypair::from_seed(&[0x01; 32]);
        let meta = metadata_record(&request(), &mint.pubkey(), &WALLET, "https://cdn/x.json");
        let rent = rent_requirement(&meta).unwrap();
        let ixs = create_mint_instructions(&WALLET, &meta, &rent, 1).unwrap();

        // The strings written on chain are exactly those the size was computed from:
        // packed record = keys (64) + the three strings + empty vec prefix (4).
        let strings = &ixs[3].data[8..];
        assert_eq!(64 + strings.len() + 4, meta.packed_len());
    }

    #[test]
    fn create_mint_rejects_foreign_metadata() {
        let mint = Keypair::from_seed(&[0x01; 32]);
        let meta = metadata_record(&request(), &[0x77; 32], &WALLET, "u");
        let rent = rent_requirement(&meta).unwrap();
        assert!(create_mint_transaction(&WALLET, &mint, &meta, &rent, 1, &BLOCKHASH).is_err());
    }

    #[test]
    fn associated_account_transaction_targets_derived_address() {
        let mint = [0x01u8; 32];
        let (tx, associated) =
            create_associated_account_transaction(&WALLET, &mint, &BLOCKHASH).unwrap();
        let expected = derive_associated_token_address(&WALLET, &mint, &TOKEN_2022_PROGRAM_ID).unwrap();

        assert_eq!(associated, expected);
        assert_eq!(tx.message().program_id_of(0), Some(&ASSOCIATED_TOKEN_PROGRAM_ID));
        assert_eq!(tx.message().accounts_of(0).unwrap()[1], expected);
        assert_eq!(tx.message().signer_keys(), &[WALLET]);
    }

    #[test]
    fn mint_supply_transaction_amount_and_destination() {
        let mint = [0x01u8; 32];
        let associated = [0x02u8; 32];
        let tx = mint_supply_transaction(&WALLET, &mint, &associated, 1000, &BLOCKHASH).unwrap();
        let msg = tx.message();

        let data = &msg.compiled_instructions[0].data;
        assert_eq!(data[0], 7);
        assert_eq!(u64::from_le_bytes(data[1..9].try_into().unwrap()), 1000);
        assert_eq!(msg.accounts_of(0).unwrap(), vec![mint, associated, WALLET]);
    }
}
