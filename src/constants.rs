//! Seed strings and well-known addresses shared by every instruction builder.
//!
//! The deployed program re-derives each of these accounts from the same byte
//! strings, so every constant here is part of the wire contract.

use solana_sdk::{pubkey, pubkey::Pubkey};

pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("4ATadzrRQHetgSeByytfJRuVwWtXFPwKUySdb3279AGe");

pub mod seeds {
	pub const COLLECTION_MINT: &[u8] = b"ingl_nft_collection_newer";
	pub const MINT_AUTHORITY: &[u8] = b"mint_authority";
	pub const MINTING_POOL: &[u8] = b"minting_pool";
	pub const COLLECTION_HOLDER: &[u8] = b"collection_holder";
	pub const GLOBAL_GEM: &[u8] = b"global_gem_account";
	pub const GEM_ACCOUNT: &[u8] = b"gem_account";
	pub const PD_POOL: &[u8] = b"pd_pool";
	pub const PROPOSAL: &[u8] = b"ingl_proposals";
	pub const VOTE_ACCOUNT: &[u8] = b"InglVote";
	pub const VOTE_DATA_ACCOUNT: &[u8] = b"InglVoteData";
	pub const STAKE_ACCOUNT: &[u8] = b"staking_account_key";
	pub const AUTHORIZED_WITHDRAWER: &[u8] = b"InglAuthorizedWithdrawer";
	pub const TREASURY: &[u8] = b"ingl_treasury_account_key";
	pub const COUNCIL_MINT: &[u8] = b"council_mint";
	pub const COUNCIL_MINT_AUTHORITY: &[u8] = b"council_mint_authority";

	// Metaplex token-metadata seeds
	pub const METADATA: &[u8] = b"metadata";
	pub const EDITION: &[u8] = b"edition";
}

pub mod validation_phrase {
	pub const GLOBAL_GEMS: u32 = 546_875_215;
	pub const VALIDATOR_PROPOSAL: u32 = 842_542_964;
	pub const GEM_ACCOUNT: u32 = 516_248_961;
	pub const VALIDATOR_VOTE: u32 = 214_648_321;
}

pub const METAPLEX_PROGRAM_ID: Pubkey = pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
pub const STAKE_CONFIG_ID: Pubkey = pubkey!("StakeConfig11111111111111111111111111111111");

/// Price-history buffers read while imprinting rarity.
pub const BTC_FEED: Pubkey = pubkey!("9ATrvi6epR5hVYtwNs7BB7VCiYnd4WM7e8MfafWpfiXC");
pub const SOL_FEED: Pubkey = pubkey!("7LLvRhMs73FqcLkA8jvEE1AM2mYZXTmqfUv8GAEurymx");
pub const ETH_FEED: Pubkey = pubkey!("6fhxFvPocWapZ5Wa2miDnrX2jYRFKvFqYnX11GGkBo2f");
pub const BNB_FEED: Pubkey = pubkey!("DR6PqK15tD21MEGSLmDpXwLA7Fw47kwtdZeUMdT7vd7L");

/// Upper bound on mints per vote; more would not fit in one transaction.
pub const MAX_VOTE_MINTS: usize = 10;

pub const DEFAULT_MINT_COMPUTE_UNITS: u32 = 240_000;
