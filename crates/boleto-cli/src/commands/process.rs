//! Process command - extract fields from a single PDF.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use boleto_core::DocumentProcessor;
use boleto_core::models::{FieldKey, ProcessOutcome};

use super::{load_config, load_keywords, selected_fields};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Fields to extract, comma separated (builtin keys or kw:<id>); all when omitted
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// JSON file with custom keyword definitions
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Skip the PDF text layer and always run OCR
    #[arg(long)]
    force_ocr: bool,

    /// OCR language (overrides config and OCR_LANG)
    #[arg(long)]
    lang: Option<String>,

    /// Include extracted text, attributes and diagnostics in JSON output
    #[arg(long)]
    full: bool,

    /// Show missing fields and phase timings
    #[arg(long)]
    show_diagnostics: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?.with_ocr_lang(args.lang.clone());
    let keywords = load_keywords(args.keywords.as_deref())?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb.set_message("Extracting fields...");

    let fields = selected_fields(&args.fields, &keywords);
    let processor = DocumentProcessor::new(config);
    let outcome = processor
        .process_document(&args.input, &fields, &keywords, args.force_ocr)
        .map_err(|e| anyhow::anyhow!(e.user_message()));

    pb.finish_and_clear();
    let outcome = outcome?;

    let output = format_outcome(&outcome, args.format, args.full)?;

    // Write output
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

    if args.show_diagnostics {
        print_diagnostics(&outcome);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render an outcome in `format`.
pub fn format_outcome(outcome: &ProcessOutcome, format: OutputFormat, full: bool) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if full => Ok(serde_json::to_string_pretty(outcome)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&outcome.result)?),
        OutputFormat::Csv => format_csv(outcome),
        OutputFormat::Text => Ok(format_text(outcome)),
    }
}

fn format_csv(outcome: &ProcessOutcome) -> anyhow::Result<String> {
    let result = &outcome.result;
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["document_type".to_string(), "ocr_used".to_string()];
    header.extend(result.fields.keys().cloned());
    header.extend(result.custom_fields.keys().cloned());
    wtr.write_record(&header)?;

    let mut row = vec![
        result.document_type.clone().unwrap_or_default(),
        outcome.ocr_used.to_string(),
    ];
    row.extend(result.fields.values().map(|v| v.clone().unwrap_or_default()));
    row.extend(
        result
            .custom_fields
            .values()
            .map(|v| v.value.clone().unwrap_or_default()),
    );
    wtr.write_record(&row)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(outcome: &ProcessOutcome) -> String {
    let result = &outcome.result;
    let mut output = String::new();

    output.push_str(&format!(
        "Document type: {}\n",
        result.document_type.as_deref().unwrap_or("unknown")
    ));
    output.push_str(&format!(
        "Text source: {} ({} words)\n",
        if outcome.ocr_used { "OCR" } else { "text layer" },
        outcome.quality
    ));

    if !result.fields.is_empty() {
        output.push_str("\nFields:\n");
        for (key, value) in &result.fields {
            let label = FieldKey::resolve(key).map_or(key.as_str(), |field| field.label());
            output.push_str(&format!("  {}: {}\n", label, value.as_deref().unwrap_or("-")));
        }
    }

    if !result.custom_fields.is_empty() {
        output.push_str("\nCustom fields:\n");
        for (token, custom) in &result.custom_fields {
            output.push_str(&format!(
                "  {} ({}): {}\n",
                custom.label,
                token,
                custom.value.as_deref().unwrap_or("-")
            ));
        }
    }

    output
}

fn print_diagnostics(outcome: &ProcessOutcome) {
    let diagnostics = &outcome.diagnostics;
    eprintln!();
    if diagnostics.missing_fields.is_empty() {
        eprintln!("{} All selected fields found", style("✓").green());
    } else {
        eprintln!(
            "{} Missing fields: {}",
            style("ℹ").blue(),
            diagnostics.missing_fields.join(", ")
        );
    }
    if !diagnostics.missing_keywords.is_empty() {
        eprintln!(
            "{} Unknown keywords: {}",
            style("⚠").yellow(),
            diagnostics.missing_keywords.join(", ")
        );
    }
    if diagnostics.payer_retry_used {
        eprintln!("{} Payer fields retried over OCR text", style("ℹ").blue());
    }
    let timings = &diagnostics.timings;
    eprintln!(
        "{} Timings: acquisition {:?}, builtin {:?}, payer retry {:?}, keywords {:?}, total {:?}",
        style("ℹ").blue(),
        timings.acquisition,
        timings.builtin,
        timings.payer_retry,
        timings.keywords,
        timings.total
    );
}
