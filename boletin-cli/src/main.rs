use clap::Parser;

mod cli;
mod commands;
mod config;
mod context;
mod logging;
mod output;

use cli::Cli;
use context::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let ctx = match Context::new(&cli) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    };

    logging::init(ctx.log_level(), ctx.log_format());
    tracing::debug!(
        environment = ctx.environment().as_str(),
        "Starting boletin {}",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(err) = commands::execute(&ctx, cli.command).await {
        ctx.output.error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
