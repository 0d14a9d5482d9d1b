//! # convopack CLI
//!
//! Command-line interface for the convopack library.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use convopack::cli::{Args, Command, DEFAULT_OUTPUT_PATH, ExtractArgs, RunArgs, SegmentArgs};
use convopack::config::SegmenterConfig;
use convopack::core::{ProcessingStats, RawRecord, convert, read_records, write_records};
use convopack::extractor::{ExtractionStats, Extractor};
use convopack::format::{OutputFormat, write_to_format};
use convopack::ConvopackError;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        error!(error = %e, "conversion failed");
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), ConvopackError> {
    let args = <Args as ClapParser>::parse();

    println!("📦 convopack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match args.command {
        Command::Extract(args) => run_extract(&args),
        Command::Segment(args) => run_segment(&args),
        Command::Run(args) => run_all(&args),
    }
}

/// Stage 1: export directory → record table.
fn run_extract(args: &ExtractArgs) -> Result<(), ConvopackError> {
    let total_start = Instant::now();
    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", args.output.display());
    println!();

    let (records, stats) = extract(&args.input, &Extractor::with_config(args.extractor.to_config()))?;

    println!("💾 Writing record table...");
    write_records(&records, &args.output)?;

    println!();
    println!("✅ Done! Extracted {} records to {}", records.len(), args.output.display());
    print_extraction_summary(&stats);
    print_performance(total_start, stats.messages_seen);
    Ok(())
}

/// Stage 2: record table → conversations.
fn run_segment(args: &SegmentArgs) -> Result<(), ConvopackError> {
    let total_start = Instant::now();
    let config = args.segmenter.to_config()?;
    let format: OutputFormat = args.segmenter.format.into();
    let output_path = adjust_output_extension(&args.output, format);

    println!("📖 Table:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    print_segmenter_config(&config);
    println!();

    println!("⏳ Reading record table...");
    let read_start = Instant::now();
    let records = read_records(&args.input)?;
    println!(
        "   Found {} messages ({:.2}s)",
        records.len(),
        read_start.elapsed().as_secs_f64()
    );

    let stats = segment_and_write(&records, &config, &output_path, format)?;
    print_performance(total_start, stats.original_count);
    Ok(())
}

/// Both stages in memory, optionally keeping the record table.
fn run_all(args: &RunArgs) -> Result<(), ConvopackError> {
    let total_start = Instant::now();
    let config = args.segmenter.to_config()?;
    let format: OutputFormat = args.segmenter.format.into();
    let output_path = adjust_output_extension(&args.output, format);

    println!("📂 Input:   {}", args.input.display());
    println!("💾 Output:  {}", output_path.display());
    println!("📄 Format:  {}", format);
    print_segmenter_config(&config);
    println!();

    let (records, extraction) =
        extract(&args.input, &Extractor::with_config(args.extractor.to_config()))?;

    if let Some(table) = &args.table {
        println!("💾 Writing record table to {}...", table.display());
        write_records(&records, table)?;
    }

    segment_and_write(&records, &config, &output_path, format)?;
    print_extraction_summary(&extraction);
    print_performance(total_start, extraction.messages_seen);
    Ok(())
}

fn extract(
    input: &Path,
    extractor: &Extractor,
) -> Result<(Vec<RawRecord>, ExtractionStats), ConvopackError> {
    println!("⏳ Extracting exports...");
    let start = Instant::now();
    let (records, stats) = extractor.extract_dir_with_stats(input)?;
    println!(
        "   Kept {} of {} messages from {} threads ({:.2}s)",
        records.len(),
        stats.messages_seen,
        stats.files_seen - stats.files_skipped,
        start.elapsed().as_secs_f64()
    );
    Ok((records, stats))
}

fn segment_and_write(
    records: &[RawRecord],
    config: &SegmenterConfig,
    output_path: &Path,
    format: OutputFormat,
) -> Result<ProcessingStats, ConvopackError> {
    println!("🔀 Segmenting conversations...");
    let start = Instant::now();
    let (conversations, stats) = convert(records, config)?;
    println!(
        "   {} conversations, {} turns ({:.1}% reduction, {:.2}s)",
        stats.conversation_count,
        stats.turn_count,
        stats.compression_ratio(),
        start.elapsed().as_secs_f64()
    );

    println!("💾 Writing {}...", format);
    write_to_format(&conversations, output_path, format)?;

    println!();
    println!("✅ Done! {}", stats.summary());
    println!();
    println!("📊 Summary:");
    println!("   Messages:       {}", stats.original_count);
    println!("   Conversations:  {}", stats.conversation_count);
    println!("   Discarded:      {}", stats.discarded_count);
    Ok(stats)
}

fn print_segmenter_config(config: &SegmenterConfig) {
    println!("🤖 Assistant: {}", config.assistant_name);
    println!(
        "⏱️  Gaps:      split > {} min, merge ≤ {} min",
        config.conversation_gap_ms / 60_000,
        config.merge_gap_ms / 60_000
    );
}

fn print_extraction_summary(stats: &ExtractionStats) {
    println!();
    println!("📁 Extraction:");
    println!("   Files:          {}", stats.files_seen);
    println!("   Group threads:  {}", stats.files_skipped);
    println!("   Dropped:        {} messages", stats.messages_dropped);
}

fn print_performance(start: Instant, messages: usize) {
    let total_time = start.elapsed();
    println!();
    println!("⚡ Performance:");
    println!("   Total time:  {:.2}s", total_time.as_secs_f64());
    let msgs_per_sec = messages as f64 / total_time.as_secs_f64().max(f64::EPSILON);
    println!("   Throughput:  {:.0} messages/sec", msgs_per_sec);
}

/// Adjusts output file extension based on format if using default output.
fn adjust_output_extension(output: &Path, format: OutputFormat) -> PathBuf {
    if output != Path::new(DEFAULT_OUTPUT_PATH) {
        return output.to_path_buf();
    }
    PathBuf::from(format!("convo.{}", format.extension()))
}
