//! Long-read QC Summary Tool
//!
//! Multi-run QC reporting: aggregates the run reports written by
//! longread-assess into one cohort summary.

use anyhow::Result;
use clap::{Arg, Command};
use longread_qc_tools::reporting::{load_run_reports, MultiRunReport};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("longread-qc-summary")
        .version("0.1.0")
        .about("Multi-run QC summary and reporting")
        .arg(
            Arg::new("input_dir")
                .short('i')
                .long("input-dir")
                .value_name("DIRECTORY")
                .help("Directory containing run report JSON files")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("JSON")
                .help("Output JSON file for the cohort report")
                .default_value("qc_summary.json"),
        )
        .get_matches();

    // Parse arguments
    let input_dir = PathBuf::from(matches.get_one::<String>("input_dir").unwrap());
    let output_file = PathBuf::from(matches.get_one::<String>("output").unwrap());

    println!("📊 Long-read QC Summary Tool");
    println!("Input directory: {}", input_dir.display());
    println!("Output: {}", output_file.display());

    // Validate input directory exists
    if !input_dir.exists() || !input_dir.is_dir() {
        anyhow::bail!("Input directory does not exist: {}", input_dir.display());
    }

    // Load run reports and aggregate
    let runs = load_run_reports(&input_dir)?;
    log::info!("loaded {} run reports from {}", runs.len(), input_dir.display());

    println!("📈 Generating multi-run QC summary...");
    let report = MultiRunReport::from_runs(runs);

    // Export to JSON
    report.export_json(&output_file)?;

    println!("✅ QC summary complete!");
    println!("📊 Summary Statistics:");
    println!("  Total runs: {}", report.summary.total_runs);
    println!("  Good: {}", report.summary.good_runs);
    println!("  Fair: {}", report.summary.fair_runs);
    println!("  Poor: {}", report.summary.poor_runs);
    println!("  Good rate: {:.1}%", report.summary.good_rate);
    println!("  Average quality: Q{:.1}", report.summary.average_quality);
    println!("  Average coverage: {:.1}x", report.summary.average_coverage);
    println!("💾 Summary saved to: {}", output_file.display());

    Ok(())
}
