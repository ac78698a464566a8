//! Decoded snapshots of program-owned accounts.
//!
//! The program is the only writer of these accounts; this client reads them
//! right before building an instruction and never caches them.

use crate::{
	codec::{self, GemClass},
	constants::validation_phrase,
	error::{AppError, AppResult},
};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;

/// JSON renders raw 32-byte keys as base58 addresses.
mod address {
	use serde::Serializer;
	use solana_sdk::pubkey::Pubkey;

	pub fn one<S: Serializer>(key: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(&Pubkey::new_from_array(*key))
	}

	pub fn option<S: Serializer>(key: &Option<[u8; 32]>, serializer: S) -> Result<S::Ok, S::Error> {
		match key {
			Some(k) => serializer.serialize_some(&Pubkey::new_from_array(*k).to_string()),
			None => serializer.serialize_none(),
		}
	}

	pub fn list<S: Serializer>(keys: &[[u8; 32]], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_seq(keys.iter().map(|k| Pubkey::new_from_array(*k).to_string()))
	}
}

/// A fixed-layout record stored in a program-owned account.
pub trait AccountState: BorshDeserialize + Sized {
	const NAME: &'static str;
	const VALIDATION_PHRASE: u32;
	/// Width of the record with every list empty and every option absent.
	const MIN_LEN: usize;

	fn validation_phrase(&self) -> u32;

	fn decode(data: &[u8]) -> AppResult<Self> {
		if data.len() < Self::MIN_LEN {
			return Err(AppError::Decode(format!(
				"{} needs at least {} bytes, got {}",
				Self::NAME,
				Self::MIN_LEN,
				data.len()
			)));
		}
		let record: Self = codec::decode(data)
			.map_err(|e| AppError::Decode(format!("{}: {e}", Self::NAME)))?;
		if record.validation_phrase() != Self::VALIDATION_PHRASE {
			return Err(AppError::Decode(format!(
				"{}: validation phrase {} does not match {}",
				Self::NAME,
				record.validation_phrase(),
				Self::VALIDATION_PHRASE
			)));
		}
		Ok(record)
	}
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GlobalGems {
	pub validation_phrase: u32,
	pub counter: u32,
	pub total_raised: u64,
	pub pd_pool_total: u64,
	pub delegated_total: u64,
	pub dealloced_total: u64,
	pub is_proposal_ongoing: bool,
	pub proposal_numeration: u32,
	pub pending_delegation_total: u64,
	#[serde(serialize_with = "address::list")]
	pub validator_list: Vec<[u8; 32]>,
}

impl AccountState for GlobalGems {
	const NAME: &'static str = "GlobalGems";
	const VALIDATION_PHRASE: u32 = validation_phrase::GLOBAL_GEMS;
	const MIN_LEN: usize = 4 + 4 + 8 * 4 + 1 + 4 + 8 + 4;

	fn validation_phrase(&self) -> u32 {
		self.validation_phrase
	}
}

impl GlobalGems {
	/// Numeration of the most recently created proposal (`proposal_numeration - 1`).
	pub fn latest_proposal_numeration(&self) -> AppResult<u32> {
		self.proposal_numeration.checked_sub(1).ok_or_else(|| {
			AppError::EncodingPrecondition("no validator proposal has been created yet".to_string())
		})
	}
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidatorProposal {
	pub validation_phrase: u32,
	#[serde(serialize_with = "address::list")]
	pub validator_ids: Vec<[u8; 32]>,
	pub date_created: u32,
	pub date_finalized: Option<u32>,
	pub votes: Vec<u32>,
	#[serde(serialize_with = "address::option")]
	pub winner: Option<[u8; 32]>,
}

impl AccountState for ValidatorProposal {
	const NAME: &'static str = "ValidatorProposal";
	const VALIDATION_PHRASE: u32 = validation_phrase::VALIDATOR_PROPOSAL;
	const MIN_LEN: usize = 4 + 4 + 4 + 1 + 4 + 1;

	fn validation_phrase(&self) -> u32 {
		self.validation_phrase
	}
}

impl ValidatorProposal {
	pub fn candidates(&self) -> Vec<Pubkey> {
		self.validator_ids.iter().map(|k| Pubkey::new_from_array(*k)).collect()
	}

	pub fn winner(&self) -> Option<Pubkey> {
		self.winner.map(Pubkey::new_from_array)
	}

	pub fn is_finalized(&self) -> bool {
		self.date_finalized.is_some()
	}
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemAccountVersion {
	V0_0_1,
	BlankCase,
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rarity {
	Common,
	Uncommon,
	Rare,
	Exalted,
	Mythic,
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum FundsLocation {
	MintingPool,
	PDPool,
	VoteAccount {
		#[serde(serialize_with = "address::one")]
		vote_account_id: [u8; 32],
	},
}

#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidatorVote {
	pub validation_phrase: u32,
	#[serde(serialize_with = "address::one")]
	pub proposal_id: [u8; 32],
	pub validator_index: u32,
}

/// Per-gem record, keyed by the gem's mint.
#[derive(BorshSerialize, BorshDeserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GemAccount {
	pub struct_id: GemAccountVersion,
	pub validation_phrase: u32,
	pub date_created: u32,
	pub class: GemClass,
	pub redeemable_date: u32,
	pub numeration: u32,
	pub rarity: Option<Rarity>,
	pub funds_location: FundsLocation,
	pub rarity_seed_time: Option<u32>,
	pub date_allocated: Option<u32>,
	#[serde(serialize_with = "address::option")]
	pub last_voted_proposal: Option<[u8; 32]>,
	pub last_withdrawal_epoch: Option<u64>,
	pub last_delegation_epoch: Option<u64>,
	pub all_withdraws: Vec<u64>,
	pub all_votes: Vec<ValidatorVote>,
}

impl AccountState for GemAccount {
	const NAME: &'static str = "GemAccount";
	const VALIDATION_PHRASE: u32 = validation_phrase::GEM_ACCOUNT;
	const MIN_LEN: usize = 1 + 4 + 4 + 1 + 4 + 4 + 1 + 1 + 1 + 1 + 1 + 1 + 1 + 4 + 4;

	fn validation_phrase(&self) -> u32 {
		self.validation_phrase
	}

	fn decode(data: &[u8]) -> AppResult<Self> {
		match data.first() {
			Some(0) => {}
			Some(other) => {
				return Err(AppError::Decode(format!("GemAccount: unsupported struct version {other}")))
			}
			None => return Err(AppError::Decode("GemAccount: empty account data".to_string())),
		}
		if data.len() < Self::MIN_LEN {
			return Err(AppError::Decode(format!(
				"GemAccount needs at least {} bytes, got {}",
				Self::MIN_LEN,
				data.len()
			)));
		}
		let record: Self = codec::decode(data)?;
		if record.validation_phrase != Self::VALIDATION_PHRASE {
			return Err(AppError::Decode("GemAccount: validation phrase mismatch".to_string()));
		}
		Ok(record)
	}
}

impl GemAccount {
	pub fn delegated_vote_account(&self) -> Option<Pubkey> {
		match &self.funds_location {
			FundsLocation::VoteAccount { vote_account_id } => Some(Pubkey::new_from_array(*vote_account_id)),
			_ => None,
		}
	}
}
