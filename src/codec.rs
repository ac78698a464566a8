//! Binary layout of instruction payloads and program-owned records.
//!
//! Everything is borsh: enums as a single ordinal byte, integers little-endian,
//! `Option` as a presence byte, `Vec` as a `u32` length prefix.

use crate::error::{AppError, AppResult};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Gem tiers, lowest ordinal first. Declaration order is the wire order.
#[derive(BorshSerialize, BorshDeserialize, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GemClass {
	Ruby,
	Diamond,
	Sapphire,
	Emerald,
	Serendibite,
	Benitoite,
}

impl GemClass {
	pub const ALL: [GemClass; 6] = [
		GemClass::Ruby,
		GemClass::Diamond,
		GemClass::Sapphire,
		GemClass::Emerald,
		GemClass::Serendibite,
		GemClass::Benitoite,
	];

	pub fn name(self) -> &'static str {
		match self {
			GemClass::Ruby => "Ruby",
			GemClass::Diamond => "Diamond",
			GemClass::Sapphire => "Sapphire",
			GemClass::Emerald => "Emerald",
			GemClass::Serendibite => "Serendibite",
			GemClass::Benitoite => "Benitoite",
		}
	}

	/// Nominal price in whole SOL.
	pub fn price_sol(self) -> u64 {
		match self {
			GemClass::Ruby => 500,
			GemClass::Diamond => 100,
			GemClass::Sapphire => 50,
			GemClass::Emerald => 10,
			GemClass::Serendibite => 5,
			GemClass::Benitoite => 1,
		}
	}

	pub fn usage_hint() -> String {
		let options: Vec<&str> = Self::ALL.iter().map(|c| c.name()).collect();
		format!("unrecognized gem class; options are: {}", options.join(", "))
	}
}

impl fmt::Display for GemClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

// Case-sensitive on purpose: the names are the ones printed on the gems.
impl FromStr for GemClass {
	type Err = AppError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|c| c.name() == s)
			.ok_or_else(|| AppError::BadRequest(Self::usage_hint()))
	}
}

/// Entry points of the on-chain program, in discriminant order.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	MintNft(GemClass),
	MintNewCollection,
	Redeem,
	ImprintRarity,
	AllocateSol,
	DeAllocateSol,
	CreateVoteAccount,
	ChangeVoteAccountsValidatorIdentity,
	DelegateSol,
	UnDelegateSol,
	InitRarityImprint,
	RegisterValidatorId,
	CreateValidatorSelectionProposal,
	VoteValidatorProposal { num_nfts: u8, validator_index: u32 },
	FinalizeProposal,
}

impl Operation {
	/// Leading byte of the encoded payload.
	pub fn discriminant(&self) -> u8 {
		match self {
			Operation::MintNft(_) => 0,
			Operation::MintNewCollection => 1,
			Operation::Redeem => 2,
			Operation::ImprintRarity => 3,
			Operation::AllocateSol => 4,
			Operation::DeAllocateSol => 5,
			Operation::CreateVoteAccount => 6,
			Operation::ChangeVoteAccountsValidatorIdentity => 7,
			Operation::DelegateSol => 8,
			Operation::UnDelegateSol => 9,
			Operation::InitRarityImprint => 10,
			Operation::RegisterValidatorId => 11,
			Operation::CreateValidatorSelectionProposal => 12,
			Operation::VoteValidatorProposal { .. } => 13,
			Operation::FinalizeProposal => 14,
		}
	}

	pub fn encode(&self) -> AppResult<Vec<u8>> {
		encode(self)
	}
}

pub fn encode<T: BorshSerialize>(value: &T) -> AppResult<Vec<u8>> {
	borsh::to_vec(value).map_err(|e| AppError::Internal(format!("borsh encode: {e}")))
}

/// Decodes a value from the front of `data`, ignoring any trailing bytes.
///
/// Program accounts are allocated larger than their payload, so trailing
/// zeroes are expected. Truncated input or an unknown enum tag is an error.
pub fn decode<T: BorshDeserialize>(data: &[u8]) -> AppResult<T> {
	let mut cursor = data;
	T::deserialize(&mut cursor).map_err(|e| AppError::Decode(e.to_string()))
}
