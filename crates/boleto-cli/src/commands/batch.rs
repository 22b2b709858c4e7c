//! Batch processing command for multiple PDF files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use boleto_core::DocumentProcessor;
use boleto_core::models::{KeywordMap, ProcessOutcome};

use super::process::{OutputFormat, format_outcome};
use super::{load_config, load_keywords, selected_fields};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input PDFs
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Fields to extract, comma separated (builtin keys or kw:<id>); all when omitted
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// JSON file with custom keyword definitions
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Skip the PDF text layer and always run OCR
    #[arg(long)]
    force_ocr: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Option<ProcessOutcome>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let keywords = Arc::new(load_keywords(args.keywords.as_deref())?);
    let fields = Arc::new(selected_fields(&args.fields, &keywords));

    // Expand glob pattern
    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    // Create output directory if specified
    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Each document is independent; workers only share read-only state.
    let processor = Arc::new(DocumentProcessor::new(config));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();
    let mut results = Vec::new();

    for (index, path) in files.into_iter().enumerate() {
        let processor = Arc::clone(&processor);
        let keywords = Arc::clone(&keywords);
        let fields = Arc::clone(&fields);
        let permit = Arc::clone(&permits).acquire_owned().await?;
        let force_ocr = args.force_ocr;

        tasks.spawn_blocking(move || {
            let result = process_single_file(&processor, path, &fields, &keywords, force_ocr);
            drop(permit);
            (index, result)
        });

        while let Some(joined) = tasks.try_join_next() {
            let (index, result) = joined?;
            overall_pb.inc(1);
            check_failure(&result, &args)?;
            results.push((index, result));
        }
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        overall_pb.inc(1);
        check_failure(&result, &args)?;
        results.push((index, result));
    }
    overall_pb.finish_with_message("Complete");

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, result)| result).collect();

    // Write outputs
    let successful: Vec<_> = results.iter().filter(|r| r.outcome.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(outcome) = &result.outcome {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");
                let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_outcome(outcome, args.format, false)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    // Generate summary if requested
    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    processor: &DocumentProcessor,
    path: PathBuf,
    fields: &[String],
    keywords: &KeywordMap,
    force_ocr: bool,
) -> ProcessResult {
    let file_start = Instant::now();
    let result = processor.process_document(&path, fields, keywords, force_ocr);
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match result {
        Ok(outcome) => ProcessResult {
            path,
            outcome: Some(outcome),
            error: None,
            processing_time_ms,
        },
        Err(e) => ProcessResult {
            path,
            outcome: None,
            error: Some(e.user_message()),
            processing_time_ms,
        },
    }
}

fn check_failure(result: &ProcessResult, args: &BatchArgs) -> anyhow::Result<()> {
    let Some(error_msg) = &result.error else {
        return Ok(());
    };
    if args.continue_on_error {
        warn!("Failed to process {}: {}", result.path.display(), error_msg);
        Ok(())
    } else {
        error!("Failed to process {}: {}", result.path.display(), error_msg);
        anyhow::bail!("Processing failed: {}", error_msg)
    }
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let processed_at = chrono::Local::now().to_rfc3339();

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "due_date",
        "document_value",
        "barcode",
        "ocr_used",
        "missing_fields",
        "processing_time_ms",
        "processed_at",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(outcome) = &result.outcome {
            let field = |key: &str| outcome.result.field(key).unwrap_or_default().to_string();
            wtr.write_record([
                filename,
                "success",
                outcome.result.document_type.as_deref().unwrap_or(""),
                &field("due_date"),
                &field("document_value"),
                &field("barcode"),
                &outcome.ocr_used.to_string(),
                &outcome.diagnostics.missing_fields.join(";"),
                &result.processing_time_ms.to_string(),
                &processed_at,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                &processed_at,
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
