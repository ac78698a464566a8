pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod gems;
pub mod instruction;
pub mod pda;
pub mod solana_client;
pub mod state;
pub mod telemetry;
pub mod transaction;
