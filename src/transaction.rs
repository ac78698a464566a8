//! Turns instruction lists into signed transactions.

use crate::{
	error::{AppError, AppResult},
	solana_client::TransactionSender,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_sdk::{
	hash::Hash,
	instruction::Instruction,
	message::Message,
	signature::{Signature, Signer},
	transaction::Transaction,
};
use tracing::info;

/// Signs `instructions` with the payer first and any extra signers after it.
///
/// The payer is the fee payer. Co-signers that repeat the payer or each other
/// are dropped so every key signs once.
pub fn assemble_transaction(
	instructions: &[Instruction],
	payer: &dyn Signer,
	co_signers: &[&dyn Signer],
	blockhash: Hash,
) -> AppResult<Transaction> {
	if instructions.is_empty() {
		return Err(AppError::EncodingPrecondition("transaction has no instructions".to_string()));
	}
	let payer_key = payer.pubkey();
	let mut signers: Vec<&dyn Signer> = vec![payer];
	for signer in co_signers {
		if !signers.iter().any(|s| s.pubkey() == signer.pubkey()) {
			signers.push(*signer);
		}
	}

	let message = Message::new(instructions, Some(&payer_key));
	let mut tx = Transaction::new_unsigned(message);
	tx.try_sign(&signers[..], blockhash)
		.map_err(|e| AppError::Keypair(format!("signing failed: {e}")))?;
	Ok(tx)
}

/// Wire form of a signed transaction, for `--dry-run` output.
pub fn encode_transaction_base64(tx: &Transaction) -> AppResult<String> {
	let bytes = bincode::serialize(tx).map_err(|e| AppError::Internal(format!("serialize tx: {e}")))?;
	Ok(STANDARD.encode(bytes))
}

/// Fetches a blockhash, signs, and submits once.
pub async fn sign_and_send<S: TransactionSender + ?Sized>(
	sender: &S,
	instructions: &[Instruction],
	payer: &dyn Signer,
	co_signers: &[&dyn Signer],
) -> AppResult<Signature> {
	let blockhash = sender.get_latest_blockhash().await?;
	let tx = assemble_transaction(instructions, payer, co_signers, blockhash)?;
	let signature = sender.send_transaction(&tx).await?;
	info!(%signature, payer = %payer.pubkey(), "transaction confirmed");
	Ok(signature)
}
