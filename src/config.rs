use crate::{
	constants::{DEFAULT_MINT_COMPUTE_UNITS, DEFAULT_PROGRAM_ID},
	error::{AppError, AppResult},
};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use std::str::FromStr;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_KEYPAIR_PATH: &str = "keypair.json";

#[derive(Clone, Debug)]
pub struct AppConfig {
	pub rpc_url: String,
	pub program_id: Pubkey,
	pub keypair_path: String,
	pub commitment: CommitmentConfig,
	pub mint_compute_units: u32,
	/// Priority fee in micro-lamports per compute unit; 0 leaves it unset.
	pub compute_unit_price: u64,
}

impl AppConfig {
	pub fn from_env() -> AppResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds the config from any key/value source. Unset keys take defaults;
	/// set but unparsable keys are a [`AppError::Config`].
	pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let program_id = match lookup("INGL_PROGRAM_ID") {
			Some(v) => Pubkey::from_str(v.trim())
				.map_err(|e| AppError::Config(format!("INGL_PROGRAM_ID {v:?}: {e}")))?,
			None => DEFAULT_PROGRAM_ID,
		};
		let commitment = match lookup("INGL_COMMITMENT") {
			Some(v) => CommitmentConfig::from_str(v.trim())
				.map_err(|e| AppError::Config(format!("INGL_COMMITMENT {v:?}: {e}")))?,
			None => CommitmentConfig::confirmed(),
		};
		Ok(Self {
			rpc_url: lookup("SOLANA_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
			program_id,
			keypair_path: lookup("INGL_KEYPAIR_PATH").unwrap_or_else(|| DEFAULT_KEYPAIR_PATH.to_string()),
			commitment,
			mint_compute_units: parse_number(&lookup, "INGL_MINT_COMPUTE_UNITS", DEFAULT_MINT_COMPUTE_UNITS)?,
			compute_unit_price: parse_number(&lookup, "INGL_COMPUTE_UNIT_PRICE", 0)?,
		})
	}

	/// Applies command-line flags on top of the environment.
	pub fn with_overrides(mut self, rpc_url: Option<String>, keypair_path: Option<String>) -> Self {
		if let Some(url) = rpc_url {
			self.rpc_url = url;
		}
		if let Some(path) = keypair_path {
			self.keypair_path = path;
		}
		self
	}
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
	F: Fn(&str) -> Option<String>,
	T: FromStr,
	T::Err: std::fmt::Display,
{
	match lookup(key) {
		Some(v) => v.trim().parse().map_err(|e| AppError::Config(format!("{key} {v:?}: {e}"))),
		None => Ok(default),
	}
}
