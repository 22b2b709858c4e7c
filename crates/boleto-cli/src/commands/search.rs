//! Search command - full-text search over PDF text.

use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use tracing::warn;

use boleto_core::DocumentProcessor;
use boleto_core::search::{
    MatchMode, SNIPPET_LEN, build_snippet, excludes_terms, matches_terms, split_terms,
};

use super::load_config;

/// Arguments for the search command.
#[derive(Args)]
pub struct SearchArgs {
    /// Glob pattern matching the PDFs to search
    #[arg(required = true)]
    input: String,

    /// Search terms; separate with ';' to keep spaces inside a term
    #[arg(required = true)]
    terms: String,

    /// Require all terms or any of them
    #[arg(short, long, default_value = "all")]
    mode: MatchMode,

    /// Terms that exclude a document
    #[arg(short, long)]
    exclude: Option<String>,

    /// Skip the PDF text layer and always run OCR
    #[arg(long)]
    force_ocr: bool,

    /// Maximum snippet length in characters
    #[arg(long, default_value_t = SNIPPET_LEN)]
    snippet_len: usize,
}

pub async fn run(args: SearchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let processor = DocumentProcessor::new(config);

    let terms = split_terms(&args.terms);
    let excluded = args.exclude.as_deref().map(split_terms).unwrap_or_default();

    let mut files: Vec<PathBuf> = glob(&args.input)?.filter_map(|r| r.ok()).collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let mut hits = 0;
    for path in &files {
        let acquired = match processor.acquire_text(path, args.force_ocr) {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e.user_message());
                continue;
            }
        };

        if !matches_terms(&acquired.text, &terms, args.mode) || excludes_terms(&acquired.text, &excluded) {
            continue;
        }

        hits += 1;
        println!("{}", style(path.display()).bold());
        println!("  {}", build_snippet(&acquired.text, &terms, args.snippet_len));
    }

    eprintln!(
        "{} {} of {} files matched",
        style("ℹ").blue(),
        hits,
        files.len()
    );

    Ok(())
}
