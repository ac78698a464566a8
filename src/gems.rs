use crate::{
	codec::GemClass,
	config::AppConfig,
	error::{AppError, AppResult},
	instruction::*,
	pda::{derive_gem_account_pda, derive_global_gem_pda, derive_proposal_pda},
	solana_client::{build_compute_budget_instructions, AccountReader, TransactionSender},
	state::{AccountState, GemAccount, GlobalGems, ValidatorProposal},
	transaction::{assemble_transaction, encode_transaction_base64, sign_and_send},
};
use solana_sdk::{
	instruction::Instruction,
	pubkey::Pubkey,
	signature::{Keypair, Signature, Signer},
};
use std::fmt;
use tracing::{info, warn};

/// What happened to a built transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
	Sent(Signature),
	/// Signed but not submitted; base64 of the wire bytes.
	DryRun(String),
}

impl fmt::Display for Submission {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Submission::Sent(sig) => write!(f, "{sig}"),
			Submission::DryRun(encoded) => f.write_str(encoded),
		}
	}
}

/// Runs one fetch, build, submit sequence per call against the program.
pub struct GemManager<C> {
	client: C,
	payer: Keypair,
	program_id: Pubkey,
	mint_compute_units: u32,
	compute_unit_price: u64,
	dry_run: bool,
}

impl<C: AccountReader + TransactionSender> GemManager<C> {
	pub fn new(cfg: &AppConfig, client: C, payer: Keypair) -> Self {
		Self {
			client,
			payer,
			program_id: cfg.program_id,
			mint_compute_units: cfg.mint_compute_units,
			compute_unit_price: cfg.compute_unit_price,
			dry_run: false,
		}
	}

	pub fn with_dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	async fn fetch<T: AccountState>(&self, address: &Pubkey) -> AppResult<T> {
		let data = self.client.get_account_data(address).await?;
		T::decode(&data)
	}

	pub async fn global_state(&self) -> AppResult<GlobalGems> {
		let (address, _) = derive_global_gem_pda(&self.program_id)?;
		self.fetch(&address).await
	}

	/// Reads proposal `numeration`, or the latest one when `None`.
	pub async fn proposal(&self, numeration: Option<u32>) -> AppResult<ValidatorProposal> {
		let numeration = match numeration {
			Some(n) => n,
			None => self.global_state().await?.latest_proposal_numeration()?,
		};
		let (address, _) = derive_proposal_pda(&self.program_id, numeration)?;
		self.fetch(&address).await
	}

	pub async fn gem_account(&self, mint: &Pubkey) -> AppResult<GemAccount> {
		let (address, _) = derive_gem_account_pda(&self.program_id, mint)?;
		self.fetch(&address).await
	}

	async fn execute(&self, instructions: Vec<Instruction>, co_signers: &[&dyn Signer]) -> AppResult<Submission> {
		if self.dry_run {
			let blockhash = self.client.get_latest_blockhash().await?;
			let tx = assemble_transaction(&instructions, &self.payer, co_signers, blockhash)?;
			return Ok(Submission::DryRun(encode_transaction_base64(&tx)?));
		}
		let signature = sign_and_send(&self.client, &instructions, &self.payer, co_signers).await?;
		Ok(Submission::Sent(signature))
	}

	fn gem_params(&self, mint: &Pubkey) -> GemParams {
		GemParams { program_id: self.program_id, payer: self.payer.pubkey(), mint: *mint }
	}

	/// Mints a gem of `class` into a freshly generated mint and returns that mint.
	pub async fn mint_nft(&self, class: GemClass) -> AppResult<(Pubkey, Submission)> {
		let mint = Keypair::new();
		let params = MintNftParams {
			program_id: self.program_id,
			payer: self.payer.pubkey(),
			mint: mint.pubkey(),
			class,
		};
		let mut ixs = build_compute_budget_instructions(self.mint_compute_units, self.compute_unit_price);
		ixs.push(build_instruction_mint_nft(&params)?);
		info!(%class, price_sol = class.price_sol(), mint = %mint.pubkey(), "minting gem");
		let submission = self.execute(ixs, &[&mint]).await?;
		Ok((mint.pubkey(), submission))
	}

	pub async fn mint_collection(&self) -> AppResult<Submission> {
		let ix = build_instruction_mint_collection(&self.program_id, &self.payer.pubkey())?;
		self.execute(vec![ix], &[]).await
	}

	pub async fn redeem(&self, mint: &Pubkey) -> AppResult<Submission> {
		let ix = build_instruction_redeem(&self.gem_params(mint))?;
		self.execute(vec![ix], &[]).await
	}

	/// Seeds the rarity draw on first call and imprints it on the second.
	pub async fn imprint_rarity(&self, mint: &Pubkey) -> AppResult<Submission> {
		let gem = self.gem_account(mint).await?;
		if let Some(rarity) = gem.rarity {
			return Err(AppError::EncodingPrecondition(format!("gem {mint} is already imprinted as {rarity:?}")));
		}
		let params = self.gem_params(mint);
		let ix = match gem.rarity_seed_time {
			None => build_instruction_init_rarity_imprint(&params)?,
			Some(_) => build_instruction_imprint_rarity(&params)?,
		};
		self.execute(vec![ix], &[]).await
	}

	pub async fn allocate(&self, mint: &Pubkey) -> AppResult<Submission> {
		let ix = build_instruction_allocate_sol(&self.gem_params(mint))?;
		self.execute(vec![ix], &[]).await
	}

	pub async fn deallocate(&self, mint: &Pubkey) -> AppResult<Submission> {
		let ix = build_instruction_deallocate_sol(&self.gem_params(mint))?;
		self.execute(vec![ix], &[]).await
	}

	pub async fn register_validator_id(&self) -> AppResult<Submission> {
		let ix = build_instruction_register_validator_id(&self.program_id, &self.payer.pubkey())?;
		self.execute(vec![ix], &[]).await
	}

	/// Opens a proposal in the slot named by the current global counter.
	pub async fn create_validator_proposal(&self) -> AppResult<Submission> {
		let global = self.global_state().await?;
		if global.is_proposal_ongoing {
			warn!(numeration = global.proposal_numeration, "a validator proposal is already ongoing");
		}
		let ix = build_instruction_create_validator_proposal(
			&self.program_id,
			&self.payer.pubkey(),
			global.proposal_numeration,
		)?;
		self.execute(vec![ix], &[]).await
	}

	pub async fn vote_validator_proposal(&self, validator_index: u32, mints: Vec<Pubkey>) -> AppResult<Submission> {
		let num_nfts = u8::try_from(mints.len())
			.map_err(|_| AppError::EncodingPrecondition(format!("too many mints in one vote: {}", mints.len())))?;
		let numeration = self.global_state().await?.latest_proposal_numeration()?;
		let proposal = self.proposal(Some(numeration)).await?;
		let candidates = proposal.candidates();
		let Some(candidate) = candidates.get(validator_index as usize) else {
			return Err(AppError::EncodingPrecondition(format!(
				"validator index {validator_index} out of range, proposal {numeration} has {} candidates",
				candidates.len()
			)));
		};
		info!(numeration, validator = %candidate, "voting for candidate");
		if proposal.is_finalized() {
			warn!(numeration, "voting on a finalized proposal");
		}
		let params = VoteProposalParams {
			program_id: self.program_id,
			payer: self.payer.pubkey(),
			proposal_numeration: numeration,
			mints,
			num_nfts,
			validator_index,
		};
		let ix = build_instruction_vote_validator_proposal(&params)?;
		self.execute(vec![ix], &[]).await
	}

	/// Closes the most recently created proposal.
	pub async fn finalize_proposal(&self) -> AppResult<Submission> {
		let numeration = self.global_state().await?.latest_proposal_numeration()?;
		let ix = build_instruction_finalize_proposal(&self.program_id, &self.payer.pubkey(), numeration)?;
		self.execute(vec![ix], &[]).await
	}

	/// Creates the vote account for the winner of the latest proposal; the payer is the validator.
	pub async fn create_vote_account(&self) -> AppResult<Submission> {
		let numeration = self.global_state().await?.latest_proposal_numeration()?;
		let params = VoteAccountParams {
			program_id: self.program_id,
			validator: self.payer.pubkey(),
			proposal_numeration: numeration,
		};
		let ix = build_instruction_create_vote_account(&params)?;
		self.execute(vec![ix], &[]).await
	}

	pub async fn change_validator_identity(&self, numeration: Option<u32>) -> AppResult<Submission> {
		let numeration = match numeration {
			Some(n) => n,
			None => self.global_state().await?.latest_proposal_numeration()?,
		};
		let params = VoteAccountParams {
			program_id: self.program_id,
			validator: self.payer.pubkey(),
			proposal_numeration: numeration,
		};
		let ix = build_instruction_change_validator_identity(&params)?;
		self.execute(vec![ix], &[]).await
	}

	pub async fn delegate(&self, mint: &Pubkey, vote_account: &Pubkey) -> AppResult<Submission> {
		let params = DelegateParams {
			program_id: self.program_id,
			payer: self.payer.pubkey(),
			mint: *mint,
			vote_account: *vote_account,
		};
		let ix = build_instruction_delegate_sol(&params)?;
		self.execute(vec![ix], &[]).await
	}

	/// Undelegates from whichever vote account the gem's funds currently sit in.
	pub async fn undelegate(&self, mint: &Pubkey) -> AppResult<Submission> {
		let gem = self.gem_account(mint).await?;
		let vote_account = gem.delegated_vote_account().ok_or_else(|| {
			AppError::EncodingPrecondition(format!("gem {mint} is not delegated to a vote account"))
		})?;
		let params = DelegateParams {
			program_id: self.program_id,
			payer: self.payer.pubkey(),
			mint: *mint,
			vote_account,
		};
		let ix = build_instruction_undelegate_sol(&params)?;
		self.execute(vec![ix], &[]).await
	}
}
