use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use ingl_cli::{
	codec::GemClass,
	config::AppConfig,
	gems::GemManager,
	solana_client::{load_keypair, SolanaClient},
	telemetry::init_tracing,
};
use solana_sdk::{
	pubkey::Pubkey,
	signature::{Keypair, Signer},
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the ingl gem and validator-selection program", long_about = None)]
struct Cli {
	/// Path to the payer's JSON keypair file
	#[arg(long, global = true)]
	keypair: Option<String>,
	/// RPC endpoint
	#[arg(long, global = true)]
	url: Option<String>,
	/// Sign and print the transaction as base64 instead of sending it
	#[arg(long, global = true)]
	dry_run: bool,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
enum Command {
	/// Mint a gem of the given class
	Mint {
		#[arg(value_parser = parse_gem_class)]
		class: GemClass,
	},
	MintCollection,
	Redeem { mint: Pubkey },
	ImprintRarity { mint: Pubkey },
	Allocate { mint: Pubkey },
	Deallocate { mint: Pubkey },
	RegisterValidator,
	CreateValidatorProposal,
	VoteProposal {
		#[arg(long)]
		validator_index: u32,
		#[arg(required = true, num_args = 1..)]
		mints: Vec<Pubkey>,
	},
	FinalizeProposal,
	CreateVoteAccount,
	ChangeValidatorIdentity {
		#[arg(long)]
		numeration: Option<u32>,
	},
	Delegate {
		mint: Pubkey,
		#[arg(long)]
		vote_account: Pubkey,
	},
	Undelegate { mint: Pubkey },
	ShowGlobalState,
	ShowProposal {
		#[arg(long)]
		numeration: Option<u32>,
	},
}

impl Command {
	fn is_read_only(&self) -> bool {
		matches!(self, Command::ShowGlobalState | Command::ShowProposal { .. })
	}
}

fn parse_gem_class(s: &str) -> Result<GemClass, String> {
	s.parse::<GemClass>().map_err(|_| GemClass::usage_hint())
}

#[tokio::main]
async fn main() -> Result<()> {
	// Load environment variables from .env if present
	dotenv().ok();
	init_tracing();

	let cli = Cli::parse();
	let cfg = AppConfig::from_env()?.with_overrides(cli.url, cli.keypair);
	// reads never sign, so they do not need the key file
	let payer = if cli.command.is_read_only() { Keypair::new() } else { load_keypair(&cfg.keypair_path)? };
	let client = SolanaClient::new(&cfg.rpc_url, cfg.commitment);
	info!(url = %client.url(), program = %cfg.program_id, payer = %payer.pubkey(), "using cluster");

	let manager = GemManager::new(&cfg, client, payer).with_dry_run(cli.dry_run);

	let submission = match cli.command {
		Command::Mint { class } => {
			let (mint, submission) = manager.mint_nft(class).await?;
			println!("mint: {mint} ({class}, {} SOL)", class.price_sol());
			submission
		}
		Command::MintCollection => manager.mint_collection().await?,
		Command::Redeem { mint } => manager.redeem(&mint).await?,
		Command::ImprintRarity { mint } => manager.imprint_rarity(&mint).await?,
		Command::Allocate { mint } => manager.allocate(&mint).await?,
		Command::Deallocate { mint } => manager.deallocate(&mint).await?,
		Command::RegisterValidator => manager.register_validator_id().await?,
		Command::CreateValidatorProposal => manager.create_validator_proposal().await?,
		Command::VoteProposal { validator_index, mints } => {
			manager.vote_validator_proposal(validator_index, mints).await?
		}
		Command::FinalizeProposal => manager.finalize_proposal().await?,
		Command::CreateVoteAccount => manager.create_vote_account().await?,
		Command::ChangeValidatorIdentity { numeration } => manager.change_validator_identity(numeration).await?,
		Command::Delegate { mint, vote_account } => manager.delegate(&mint, &vote_account).await?,
		Command::Undelegate { mint } => manager.undelegate(&mint).await?,
		Command::ShowGlobalState => {
			let global = manager.global_state().await?;
			println!("{}", serde_json::to_string_pretty(&global)?);
			return Ok(());
		}
		Command::ShowProposal { numeration } => {
			let proposal = manager.proposal(numeration).await?;
			println!("{}", serde_json::to_string_pretty(&proposal)?);
			return Ok(());
		}
	};

	println!("{submission}");
	Ok(())
}
