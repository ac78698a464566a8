//! Instruction builders, one per program entry point.
//!
//! The program reads accounts positionally, so each `accounts` vector below is
//! an exact layout. Builders are pure: they derive addresses and encode the
//! payload but never touch the network.

use crate::{
	codec::{GemClass, Operation},
	constants::{self, MAX_VOTE_MINTS, METAPLEX_PROGRAM_ID, STAKE_CONFIG_ID},
	error::{AppError, AppResult},
	pda::*,
};
use serde::{Deserialize, Serialize};
use solana_sdk::{
	instruction::{AccountMeta, Instruction},
	pubkey::Pubkey,
	stake, system_program, sysvar, vote,
};
use spl_associated_token_account as spl_ata;

fn build_instruction(program_id: &Pubkey, operation: Operation, accounts: Vec<AccountMeta>) -> AppResult<Instruction> {
	let data = operation.encode()?;
	Ok(Instruction { program_id: *program_id, accounts, data })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintNftParams {
	pub program_id: Pubkey,
	pub payer: Pubkey,
	/// Fresh mint; must co-sign the transaction.
	pub mint: Pubkey,
	pub class: GemClass,
}

/// Accounts and payload shared by the single-gem operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GemParams {
	pub program_id: Pubkey,
	pub payer: Pubkey,
	pub mint: Pubkey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelegateParams {
	pub program_id: Pubkey,
	pub payer: Pubkey,
	pub mint: Pubkey,
	pub vote_account: Pubkey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteAccountParams {
	pub program_id: Pubkey,
	pub validator: Pubkey,
	/// Numeration of the finalized proposal the validator won.
	pub proposal_numeration: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteProposalParams {
	pub program_id: Pubkey,
	pub payer: Pubkey,
	pub proposal_numeration: u32,
	pub mints: Vec<Pubkey>,
	pub num_nfts: u8,
	pub validator_index: u32,
}

pub fn build_instruction_mint_nft(params: &MintNftParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (mint_authority, _) = derive_mint_authority_pda(pid)?;
	let (minting_pool, _) = derive_minting_pool_pda(pid)?;
	let (global_gem, _) = derive_global_gem_pda(pid)?;
	let (gem_account, _) = derive_gem_account_pda(pid, &params.mint)?;
	let (collection_mint, _) = derive_collection_mint_pda(pid)?;
	let (metadata, _) = derive_metadata_pda(&params.mint)?;
	let (nft_edition, _) = derive_master_edition_pda(&params.mint)?;
	let (collection_edition, _) = derive_master_edition_pda(&collection_mint)?;
	let (collection_metadata, _) = derive_metadata_pda(&collection_mint)?;
	let ata = derive_associated_token_address(&params.payer, &params.mint);

	let accounts = vec![
		AccountMeta::new(params.payer, true),
		AccountMeta::new(params.mint, true),
		AccountMeta::new(mint_authority, false),
		AccountMeta::new(ata, false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new_readonly(sysvar::rent::id(), false),
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new(metadata, false),
		AccountMeta::new(minting_pool, false),
		AccountMeta::new(global_gem, false),
		AccountMeta::new(gem_account, false),
		AccountMeta::new(collection_edition, false),
		AccountMeta::new(nft_edition, false),
		AccountMeta::new_readonly(collection_mint, false),
		AccountMeta::new_readonly(collection_metadata, false),
		// programs invoked through CPI
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new_readonly(spl_ata::id(), false),
		AccountMeta::new_readonly(METAPLEX_PROGRAM_ID, false),
	];
	build_instruction(pid, Operation::MintNft(params.class), accounts)
}

pub fn build_instruction_mint_collection(program_id: &Pubkey, payer: &Pubkey) -> AppResult<Instruction> {
	let (collection_holder, _) = derive_collection_holder_pda(program_id)?;
	let (collection_mint, _) = derive_collection_mint_pda(program_id)?;
	let (mint_authority, _) = derive_mint_authority_pda(program_id)?;
	let (global_gem, _) = derive_global_gem_pda(program_id)?;
	let (council_mint, _) = derive_council_mint_pda(program_id)?;
	let (council_mint_authority, _) = derive_council_mint_authority_pda(program_id)?;
	let (metadata, _) = derive_metadata_pda(&collection_mint)?;
	let (edition, _) = derive_master_edition_pda(&collection_mint)?;
	let holder_ata = derive_associated_token_address(&collection_holder, &collection_mint);

	let accounts = vec![
		AccountMeta::new(*payer, true),
		AccountMeta::new(collection_holder, false),
		AccountMeta::new(collection_mint, false),
		AccountMeta::new_readonly(mint_authority, false),
		AccountMeta::new(holder_ata, false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new_readonly(sysvar::rent::id(), false),
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new(metadata, false),
		AccountMeta::new(global_gem, false),
		AccountMeta::new(edition, false),
		AccountMeta::new(council_mint, false),
		AccountMeta::new_readonly(council_mint_authority, false),
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new_readonly(spl_ata::id(), false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new_readonly(METAPLEX_PROGRAM_ID, false),
		AccountMeta::new_readonly(METAPLEX_PROGRAM_ID, false),
	];
	build_instruction(program_id, Operation::MintNewCollection, accounts)
}

pub fn build_instruction_redeem(params: &GemParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (minting_pool, _) = derive_minting_pool_pda(pid)?;
	let (mint_authority, _) = derive_mint_authority_pda(pid)?;
	let (gem_account, _) = derive_gem_account_pda(pid, &params.mint)?;
	let (metadata, _) = derive_metadata_pda(&params.mint)?;
	let (edition, _) = derive_master_edition_pda(&params.mint)?;
	let (collection_mint, _) = derive_collection_mint_pda(pid)?;
	let (collection_metadata, _) = derive_metadata_pda(&collection_mint)?;
	let (treasury, _) = derive_treasury_pda(pid)?;
	let ata = derive_associated_token_address(&params.payer, &params.mint);

	let accounts = vec![
		AccountMeta::new(params.payer, true),
		AccountMeta::new(params.mint, false),
		AccountMeta::new(minting_pool, false),
		AccountMeta::new(ata, false),
		AccountMeta::new(mint_authority, false),
		AccountMeta::new(gem_account, false),
		AccountMeta::new(metadata, false),
		AccountMeta::new(edition, false),
		AccountMeta::new(collection_metadata, false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new(treasury, false),
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new_readonly(METAPLEX_PROGRAM_ID, false),
	];
	build_instruction(pid, Operation::Redeem, accounts)
}

pub fn build_instruction_init_rarity_imprint(params: &GemParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (gem_account, _) = derive_gem_account_pda(pid, &params.mint)?;
	let (mint_authority, _) = derive_mint_authority_pda(pid)?;
	let (edition, _) = derive_master_edition_pda(&params.mint)?;
	let ata = derive_associated_token_address(&params.payer, &params.mint);

	let accounts = vec![
		AccountMeta::new(params.payer, true),
		AccountMeta::new(gem_account, false),
		AccountMeta::new_readonly(params.mint, false),
		AccountMeta::new(ata, false),
		AccountMeta::new(mint_authority, false),
		AccountMeta::new_readonly(edition, false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new_readonly(METAPLEX_PROGRAM_ID, false),
	];
	build_instruction(pid, Operation::InitRarityImprint, accounts)
}

pub fn build_instruction_imprint_rarity(params: &GemParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (gem_account, _) = derive_gem_account_pda(pid, &params.mint)?;
	let (mint_authority, _) = derive_mint_authority_pda(pid)?;
	let (metadata, _) = derive_metadata_pda(&params.mint)?;
	let (edition, _) = derive_master_edition_pda(&params.mint)?;
	let ata = derive_associated_token_address(&params.payer, &params.mint);

	let accounts = vec![
		AccountMeta::new(params.payer, true),
		AccountMeta::new(gem_account, false),
		AccountMeta::new_readonly(params.mint, false),
		AccountMeta::new(ata, false),
		AccountMeta::new(mint_authority, false),
		AccountMeta::new(metadata, false),
		AccountMeta::new_readonly(edition, false),
		AccountMeta::new_readonly(constants::BTC_FEED, false),
		AccountMeta::new_readonly(constants::SOL_FEED, false),
		AccountMeta::new_readonly(constants::ETH_FEED, false),
		AccountMeta::new_readonly(constants::BNB_FEED, false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new_readonly(METAPLEX_PROGRAM_ID, false),
	];
	build_instruction(pid, Operation::ImprintRarity, accounts)
}

fn allocation_accounts(params: &GemParams) -> AppResult<Vec<AccountMeta>> {
	let pid = &params.program_id;
	let (gem_account, _) = derive_gem_account_pda(pid, &params.mint)?;
	let (global_gem, _) = derive_global_gem_pda(pid)?;
	let (pd_pool, _) = derive_pd_pool_pda(pid)?;
	let (minting_pool, _) = derive_minting_pool_pda(pid)?;
	let ata = derive_associated_token_address(&params.payer, &params.mint);

	Ok(vec![
		AccountMeta::new(params.payer, true),
		AccountMeta::new_readonly(params.mint, false),
		AccountMeta::new(gem_account, false),
		AccountMeta::new(ata, false),
		AccountMeta::new(global_gem, false),
		AccountMeta::new(pd_pool, false),
		AccountMeta::new(minting_pool, false),
		AccountMeta::new_readonly(system_program::id(), false),
	])
}

pub fn build_instruction_allocate_sol(params: &GemParams) -> AppResult<Instruction> {
	build_instruction(&params.program_id, Operation::AllocateSol, allocation_accounts(params)?)
}

pub fn build_instruction_deallocate_sol(params: &GemParams) -> AppResult<Instruction> {
	build_instruction(&params.program_id, Operation::DeAllocateSol, allocation_accounts(params)?)
}

pub fn build_instruction_create_vote_account(params: &VoteAccountParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (vote_account, _) = derive_vote_account_pda(pid, params.proposal_numeration)?;
	let (proposal, _) = derive_proposal_pda(pid, params.proposal_numeration)?;
	let (global_gem, _) = derive_global_gem_pda(pid)?;
	let (council_mint, _) = derive_council_mint_pda(pid)?;
	let (council_mint_authority, _) = derive_council_mint_authority_pda(pid)?;
	let (vote_data, _) = derive_vote_data_pda(pid, &vote_account)?;
	let (stake_account, _) = derive_stake_account_pda(pid, &vote_account)?;
	let (pd_pool, _) = derive_pd_pool_pda(pid)?;
	let council_ata = derive_associated_token_address(&vote_account, &council_mint);

	let accounts = vec![
		AccountMeta::new(params.validator, true),
		AccountMeta::new(vote_account, false),
		AccountMeta::new_readonly(sysvar::rent::id(), false),
		AccountMeta::new_readonly(sysvar::clock::id(), false),
		AccountMeta::new(global_gem, false),
		AccountMeta::new(proposal, false),
		AccountMeta::new(council_ata, false),
		AccountMeta::new(council_mint, false),
		AccountMeta::new_readonly(council_mint_authority, false),
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new_readonly(spl_token::id(), false),
		AccountMeta::new(vote_data, false),
		AccountMeta::new(stake_account, false),
		AccountMeta::new(pd_pool, false),
		AccountMeta::new_readonly(sysvar::stake_history::id(), false),
		AccountMeta::new_readonly(STAKE_CONFIG_ID, false),
		AccountMeta::new_readonly(spl_ata::id(), false),
		AccountMeta::new_readonly(vote::program::id(), false),
		AccountMeta::new_readonly(stake::program::id(), false),
	];
	build_instruction(pid, Operation::CreateVoteAccount, accounts)
}

/// Points the vote account of proposal `proposal_numeration` at a new validator identity.
///
/// Provisional: the deployed program has no handler for this operation yet, so
/// the layout mirrors the accounts CreateVoteAccount uses for the same vote
/// account (new identity as signer, vote account, its vote data) followed by
/// the withdraw authority and the vote program that would be invoked.
pub fn build_instruction_change_validator_identity(params: &VoteAccountParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (vote_account, _) = derive_vote_account_pda(pid, params.proposal_numeration)?;
	let (vote_data, _) = derive_vote_data_pda(pid, &vote_account)?;
	let (authorized_withdrawer, _) = derive_authorized_withdrawer_pda(pid)?;

	let accounts = vec![
		AccountMeta::new(params.validator, true),
		AccountMeta::new(vote_account, false),
		AccountMeta::new(vote_data, false),
		AccountMeta::new_readonly(authorized_withdrawer, false),
		AccountMeta::new_readonly(vote::program::id(), false),
	];
	build_instruction(pid, Operation::ChangeVoteAccountsValidatorIdentity, accounts)
}

pub fn build_instruction_delegate_sol(params: &DelegateParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (vote_data, _) = derive_vote_data_pda(pid, &params.vote_account)?;
	let (gem_account, _) = derive_gem_account_pda(pid, &params.mint)?;
	let (global_gem, _) = derive_global_gem_pda(pid)?;
	let ata = derive_associated_token_address(&params.payer, &params.mint);

	let accounts = vec![
		AccountMeta::new(params.payer, true),
		AccountMeta::new_readonly(params.vote_account, false),
		AccountMeta::new(vote_data, false),
		AccountMeta::new_readonly(params.mint, false),
		AccountMeta::new(gem_account, false),
		AccountMeta::new(ata, false),
		AccountMeta::new(global_gem, false),
		AccountMeta::new_readonly(sysvar::clock::id(), false),
		AccountMeta::new_readonly(STAKE_CONFIG_ID, false),
		AccountMeta::new_readonly(system_program::id(), false),
		AccountMeta::new_readonly(stake::program::id(), false),
	];
	build_instruction(pid, Operation::DelegateSol, accounts)
}

pub fn build_instruction_undelegate_sol(params: &DelegateParams) -> AppResult<Instruction> {
	let pid = &params.program_id;
	let (pd_pool, _) = derive_pd_pool_pda(pid)?;
	let (vote_data, _) = derive_vote_data_pda(pid, &params.vote_account)?;
	let (gem_account, _) = derive_gem_account_pda(pid, &params.mint)?;
	let (global_gem, _) = derive_global_gem_pda(pid)?;
	let ata = derive_associated_token_address(&params.payer, &params.mint);

	let accounts = vec![
		AccountMeta::new(params.payer, true),
		AccountMeta::new(pd_pool, false),
		AccountMeta::new_readonly(params.vote_account, false),
		AccountMeta::new(vote_data, false),
		AccountMeta::new_readonly(params.mint, false),
		AccountMeta::new(gem_account, false),
		AccountMeta::new(ata, false),
		AccountMeta::new(global_gem, false),
	];
	build_instruction(pid, Operation::UnDelegateSol, accounts)
}

pub fn build_instruction_register_validator_id(program_id: &Pubkey, payer: &Pubkey) -> AppResult<Instruction> {
	let (global_gem, _) = derive_global_gem_pda(program_id)?;
	let accounts = vec![
		AccountMeta::new(*payer, true),
		AccountMeta::new(global_gem, false),
	];
	build_instruction(program_id, Operation::RegisterValidatorId, accounts)
}

/// `proposal_numeration` is the global counter as read, i.e. the slot the new proposal takes.
pub fn build_instruction_create_validator_proposal(
	program_id: &Pubkey,
	payer: &Pubkey,
	proposal_numeration: u32,
) -> AppResult<Instruction> {
	let (global_gem, _) = derive_global_gem_pda(program_id)?;
	let (proposal, _) = derive_proposal_pda(program_id, proposal_numeration)?;
	let accounts = vec![
		AccountMeta::new(*payer, true),
		AccountMeta::new(global_gem, false),
		AccountMeta::new(proposal, false),
		AccountMeta::new_readonly(system_program::id(), false),
	];
	build_instruction(program_id, Operation::CreateValidatorSelectionProposal, accounts)
}

/// Builds a vote with `2 + 3 * mints.len()` accounts.
///
/// `num_nfts` travels in the payload and must agree with the mint list, and the
/// list must fit in one transaction; both are checked before anything is built.
pub fn build_instruction_vote_validator_proposal(params: &VoteProposalParams) -> AppResult<Instruction> {
	let n = params.mints.len();
	if n != params.num_nfts as usize {
		return Err(AppError::EncodingPrecondition(format!(
			"num_nfts is {} but {} mints were supplied",
			params.num_nfts, n
		)));
	}
	if n == 0 || n > MAX_VOTE_MINTS {
		return Err(AppError::EncodingPrecondition(format!(
			"a vote needs between 1 and {MAX_VOTE_MINTS} mints, got {n}"
		)));
	}

	let pid = &params.program_id;
	let (proposal, _) = derive_proposal_pda(pid, params.proposal_numeration)?;
	let mut accounts = Vec::with_capacity(2 + 3 * n);
	accounts.push(AccountMeta::new(params.payer, true));
	accounts.push(AccountMeta::new(proposal, false));
	for mint in params.mints.iter() {
		let (gem_account, _) = derive_gem_account_pda(pid, mint)?;
		accounts.push(AccountMeta::new_readonly(*mint, false));
		accounts.push(AccountMeta::new_readonly(derive_associated_token_address(&params.payer, mint), false));
		accounts.push(AccountMeta::new(gem_account, false));
	}
	let operation = Operation::VoteValidatorProposal {
		num_nfts: params.num_nfts,
		validator_index: params.validator_index,
	};
	build_instruction(pid, operation, accounts)
}

/// `proposal_numeration` is the proposal being closed, normally `counter - 1`.
pub fn build_instruction_finalize_proposal(
	program_id: &Pubkey,
	payer: &Pubkey,
	proposal_numeration: u32,
) -> AppResult<Instruction> {
	let (global_gem, _) = derive_global_gem_pda(program_id)?;
	let (proposal, _) = derive_proposal_pda(program_id, proposal_numeration)?;
	let accounts = vec![
		AccountMeta::new(*payer, true),
		AccountMeta::new(proposal, false),
		AccountMeta::new(global_gem, false),
	];
	build_instruction(program_id, Operation::FinalizeProposal, accounts)
}
