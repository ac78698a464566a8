//! Program-derived address helpers.
//!
//! Every account the program controls is recomputed on demand from the seed
//! registry in [`crate::constants::seeds`]; nothing here is cached.

use crate::{
	constants::{seeds, METAPLEX_PROGRAM_ID},
	error::{AppError, AppResult},
};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account as spl_ata;
use tracing::debug;

/// Finds the canonical (address, bump) for `seeds` under `program_id`.
///
/// Walks the bump byte down from 255 and returns the first off-curve hit.
/// Running out of bumps (or passing an over-long seed) is a [`AppError::Derivation`].
pub fn derive(program_id: &Pubkey, seeds: &[&[u8]]) -> AppResult<(Pubkey, u8)> {
	let found = Pubkey::try_find_program_address(seeds, program_id).ok_or_else(|| {
		AppError::Derivation(format!(
			"no valid bump for seeds {:?} under {program_id}",
			seeds.iter().map(|s| String::from_utf8_lossy(s).into_owned()).collect::<Vec<_>>()
		))
	})?;
	debug!(address = %found.0, bump = found.1, "derived program address");
	Ok(found)
}

/// Proposal and vote accounts are keyed by the numeration in big-endian order.
pub fn numeration_seed(numeration: u32) -> [u8; 4] {
	numeration.to_be_bytes()
}

pub fn derive_collection_mint_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::COLLECTION_MINT])
}

pub fn derive_mint_authority_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::MINT_AUTHORITY])
}

pub fn derive_minting_pool_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::MINTING_POOL])
}

pub fn derive_collection_holder_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::COLLECTION_HOLDER])
}

pub fn derive_global_gem_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::GLOBAL_GEM])
}

// Derive gem PDA using seeds: [b"gem_account", mint]
pub fn derive_gem_account_pda(program_id: &Pubkey, mint: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::GEM_ACCOUNT, mint.as_ref()])
}

pub fn derive_pd_pool_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::PD_POOL])
}

pub fn derive_proposal_pda(program_id: &Pubkey, numeration: u32) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::PROPOSAL, &numeration_seed(numeration)])
}

pub fn derive_vote_account_pda(program_id: &Pubkey, numeration: u32) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::VOTE_ACCOUNT, &numeration_seed(numeration)])
}

pub fn derive_vote_data_pda(program_id: &Pubkey, vote_account: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::VOTE_DATA_ACCOUNT, vote_account.as_ref()])
}

pub fn derive_stake_account_pda(program_id: &Pubkey, vote_account: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::STAKE_ACCOUNT, vote_account.as_ref()])
}

pub fn derive_authorized_withdrawer_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::AUTHORIZED_WITHDRAWER])
}

pub fn derive_treasury_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::TREASURY])
}

pub fn derive_council_mint_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::COUNCIL_MINT])
}

pub fn derive_council_mint_authority_pda(program_id: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(program_id, &[seeds::COUNCIL_MINT_AUTHORITY])
}

pub fn derive_metadata_pda(mint: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(
		&METAPLEX_PROGRAM_ID,
		&[seeds::METADATA, METAPLEX_PROGRAM_ID.as_ref(), mint.as_ref()],
	)
}

pub fn derive_master_edition_pda(mint: &Pubkey) -> AppResult<(Pubkey, u8)> {
	derive(
		&METAPLEX_PROGRAM_ID,
		&[seeds::METADATA, METAPLEX_PROGRAM_ID.as_ref(), mint.as_ref(), seeds::EDITION],
	)
}

// SPL Token helpers
pub fn derive_associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
	spl_ata::get_associated_token_address(owner, mint)
}
