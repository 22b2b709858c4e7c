//! Sanitize command - normalize a stored extraction payload.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;

/// Arguments for the sanitize command.
#[derive(Args)]
pub struct SanitizeArgs {
    /// JSON payload file, or '-' for stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: SanitizeArgs) -> anyhow::Result<()> {
    let raw = if args.input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.input)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input, e))?
    };

    let payload: serde_json::Value = serde_json::from_str(&raw)?;
    let output = serde_json::to_string_pretty(&boleto_core::sanitize(&payload))?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
