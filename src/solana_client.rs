use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
	commitment_config::CommitmentConfig,
	compute_budget::ComputeBudgetInstruction,
	hash::Hash,
	instruction::Instruction,
	pubkey::Pubkey,
	signature::{read_keypair_file, Keypair, Signature},
	transaction::Transaction,
};
use std::sync::Arc;
use tracing::debug;

/// Env var holding a base64 keypair; wins over the key file when set.
pub const KEYPAIR_BASE64_ENV: &str = "INGL_KEYPAIR_BASE64";

/// Read side of the RPC node.
#[async_trait]
pub trait AccountReader: Send + Sync {
	/// Raw data of `address`. A missing account is [`AppError::AccountNotFound`].
	async fn get_account_data(&self, address: &Pubkey) -> AppResult<Vec<u8>>;
}

/// Write side of the RPC node.
#[async_trait]
pub trait TransactionSender: Send + Sync {
	async fn get_latest_blockhash(&self) -> AppResult<Hash>;

	/// Submits once and waits for confirmation. No retries.
	async fn send_transaction(&self, tx: &Transaction) -> AppResult<Signature>;
}

#[derive(Clone)]
pub struct SolanaClient {
	pub rpc: Arc<RpcClient>,
}

impl SolanaClient {
	pub fn new(rpc_url: &str, commitment: CommitmentConfig) -> Self {
		Self { rpc: Arc::new(RpcClient::new_with_commitment(rpc_url.to_string(), commitment)) }
	}

	pub fn url(&self) -> String {
		self.rpc.url()
	}
}

#[async_trait]
impl AccountReader for SolanaClient {
	async fn get_account_data(&self, address: &Pubkey) -> AppResult<Vec<u8>> {
		let response = self
			.rpc
			.get_account_with_commitment(address, self.rpc.commitment())
			.await
			.map_err(|e| AppError::from_client_error("get_account", e))?;
		let account = response.value.ok_or(AppError::AccountNotFound(*address))?;
		debug!(%address, len = account.data.len(), "fetched account");
		Ok(account.data)
	}
}

#[async_trait]
impl TransactionSender for SolanaClient {
	async fn get_latest_blockhash(&self) -> AppResult<Hash> {
		self.rpc
			.get_latest_blockhash()
			.await
			.map_err(|e| AppError::from_client_error("get_latest_blockhash", e))
	}

	async fn send_transaction(&self, tx: &Transaction) -> AppResult<Signature> {
		self.rpc
			.send_and_confirm_transaction(tx)
			.await
			.map_err(|e| AppError::from_client_error("send_and_confirm_transaction", e))
	}
}

/// Compute-unit limit, plus a priority price when `micro_lamports` is non-zero.
pub fn build_compute_budget_instructions(units: u32, micro_lamports: u64) -> Vec<Instruction> {
	let mut ixs = vec![ComputeBudgetInstruction::set_compute_unit_limit(units)];
	if micro_lamports > 0 {
		ixs.push(ComputeBudgetInstruction::set_compute_unit_price(micro_lamports));
	}
	ixs
}

pub fn load_keypair(path: &str) -> AppResult<Keypair> {
	// Prefer env-based secret if provided
	if let Ok(b64) = std::env::var(KEYPAIR_BASE64_ENV) {
		return keypair_from_base64(&b64);
	}
	read_keypair_file(path).map_err(|e| AppError::Keypair(format!("failed to read keypair {path}: {e}")))
}

pub fn keypair_from_base64(encoded: &str) -> AppResult<Keypair> {
	let bytes = STANDARD
		.decode(encoded.trim())
		.map_err(|e| AppError::Keypair(format!("invalid base64 keypair: {e}")))?;
	Keypair::from_bytes(&bytes).map_err(|e| AppError::Keypair(format!("invalid keypair bytes: {e}")))
}
