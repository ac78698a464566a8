use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
	#[error("Address derivation failed: {0}")]
	Derivation(String),
	#[error("Decode error: {0}")]
	Decode(String),
	#[error("Encoding precondition failed: {0}")]
	EncodingPrecondition(String),
	#[error("Remote rejection: {0}")]
	RemoteRejection(String),
	#[error("Connectivity error: {0}")]
	Connectivity(String),
	#[error("Account not found: {0}")]
	AccountNotFound(Pubkey),
	#[error("Keypair error: {0}")]
	Keypair(String),
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Bad request: {0}")]
	BadRequest(String),
	#[error("Internal error: {0}")]
	Internal(String),
}

impl AppError {
	/// Splits RPC failures into "could not reach the node" and "the node said no".
	pub fn from_client_error(context: &str, err: ClientError) -> Self {
		match err.kind() {
			ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
				AppError::Connectivity(format!("{context}: {err}"))
			}
			_ => AppError::RemoteRejection(format!("{context}: {err}")),
		}
	}

	pub fn is_remote(&self) -> bool {
		matches!(self, AppError::RemoteRejection(_) | AppError::AccountNotFound(_))
	}
}

pub type AppResult<T> = Result<T, AppError>;
