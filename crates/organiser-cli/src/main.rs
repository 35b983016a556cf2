use std::path::PathBuf;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(
    name = "photo-organiser",
    version,
    about = "Organize Google Photos Takeout exports by year and media type"
)]
struct Cli {
    /// Google Takeout zip files
    #[arg(required = true)]
    zip_files: Vec<PathBuf>,

    /// Output directory for organized media
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Use file modification time when no capture date can be resolved
    /// (default: undated media goes to the "unknown" folder)
    #[arg(long)]
    mtime_fallback: bool,

    /// Print individual error details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let options = organiser_core::ProcessOptions {
        zip_files: cli.zip_files,
        output: cli.output.clone(),
        mtime_fallback: cli.mtime_fallback,
    };

    let progress = {
        let bar = bar.clone();
        move |stage: &str, current: u64, total: u64, message: &str| {
            if bar.length() != Some(total) {
                bar.set_length(total);
            }
            bar.set_position(current);
            bar.set_message(format!("[{}] {}", stage, message));
        }
    };

    let summary = organiser_core::process(&options, &progress)?;
    bar.finish_and_clear();

    println!("{}", "=".repeat(60));
    println!("Processing Complete");
    println!("{}", "=".repeat(60));
    println!("Total files found:      {}", summary.files_processed);
    println!("  Photos/videos:        {}", summary.files_organized);
    println!("  Metadata files:       {} (skipped)", summary.sidecar_skipped);
    println!(
        "  Unrecognized:         {} (skipped)",
        summary.unrecognized_skipped
    );

    if !summary.by_year.is_empty() {
        println!();
        println!("Files by year:");
        for (year, counts) in &summary.by_year {
            println!(
                "  {}: {} files ({} photos, {} videos)",
                year,
                counts.total(),
                counts.photos,
                counts.videos
            );
        }
    }

    if !summary.errors.is_empty() {
        println!();
        println!("Errors encountered: {}", summary.errors.len());
        if cli.verbose {
            for error in &summary.errors {
                println!("  - {}", error);
            }
        } else {
            println!("Run with --verbose to see error details");
        }
    }

    println!();
    println!(
        "Detailed report saved to: {}",
        cli.output.join(organiser_core::report::REPORT_FILENAME).display()
    );

    if !summary.errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
