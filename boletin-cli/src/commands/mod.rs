//! CLI commands

pub mod analyze;
pub mod config;
pub mod health;

use anyhow::Result;
use boletin_sdk::ClassifiedError;

use crate::cli::Commands;
use crate::context::Context;

/// Execute a command
pub async fn execute(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Analyze(args) => analyze::execute(ctx, args).await,
        Commands::Health => health::execute(ctx).await,
        Commands::Config(cmd) => config::execute(ctx, cmd),
    }
}

/// Wrap a failed call so the user sees the message for its kind first
pub fn call_failed(error: ClassifiedError) -> anyhow::Error {
    let headline = error.kind().user_message();
    anyhow::Error::new(error).context(headline)
}
