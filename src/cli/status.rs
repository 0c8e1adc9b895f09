//! Status command handler
//!
//! Shows which providers are configured and which one is active.

use crate::cli::{build_service, print_json};
use crate::error::Result;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Print the raw status as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Run the status command
pub fn run(args: StatusArgs) -> Result<()> {
    let service = build_service()?;
    let status = service.status();

    if args.json {
        return print_json(&status);
    }

    println!("geolocus v{}", env!("CARGO_PKG_VERSION"));
    println!();

    match &status.provider {
        Some(provider) => println!("Active provider: {}", provider),
        None => println!("Active provider: none (service unavailable)"),
    }
    println!();

    println!("Providers:");
    for descriptor in &status.providers {
        let state = if descriptor.configured {
            "configured"
        } else {
            "not configured"
        };
        println!("  {:<10} {}", descriptor.name, state);
    }

    Ok(())
}
