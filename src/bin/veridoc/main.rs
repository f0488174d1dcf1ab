//! veridoc CLI entry point.

mod cli;

use clap::Parser;
use cli::Cli;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use veridoc::{VerificationState, VerifierBuilder};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("veridoc v{}", env!("CARGO_PKG_VERSION"));

    // Build configuration and the verification request
    let (config, request) = cli.into_parts()?;

    // Build the verifier and run the startup sweep
    let verifier = VerifierBuilder::new(config).build()?;
    verifier.start()?;

    let state = verifier.verify(&request).await;
    verifier.shutdown();

    match state {
        VerificationState::Verified(record) => {
            println!("VERIFIED");
            println!("  hash:        {}", record.hash);
            if let Some(tx) = &record.transaction_id {
                println!("  transaction: {tx}");
            }
            println!("  issuer:      {}", record.issuer);
            println!("  issued:      {}", record.timestamp.to_rfc3339());
            println!("  expires:     {}", record.expires_at.to_rfc3339());
            Ok(())
        }
        VerificationState::Tampered => {
            println!("INVALID: document invalid");
            std::process::exit(1);
        }
        VerificationState::NotAvailable(message) => {
            println!("NOT AVAILABLE: {message}");
            std::process::exit(2);
        }
        state @ (VerificationState::Idle | VerificationState::Loading) => Err(
            color_eyre::eyre::eyre!("verification ended in non-terminal state {state:?}"),
        ),
    }
}
