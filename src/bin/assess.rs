//! Long-read QC Assessment Tool
//!
//! Classifies one sequencing run from the trim summary JSON produced by the
//! external read trimmer and writes the full run report for rendering.

use anyhow::Result;
use clap::{Arg, Command};
use longread_qc_tools::assessment::assess;
use longread_qc_tools::reporting::RunQcReport;
use longread_qc_tools::stats::RawQcStatistics;
use longread_qc_tools::thresholds::{DatasetType, ThresholdCatalog};
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let matches = Command::new("longread-assess")
        .version("0.1.0")
        .about("Quality assessment for long-read sequencing runs from trim summary statistics")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("JSON")
                .help("Trim summary JSON file produced by the trimming tool")
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("JSON")
                .help("Output JSON file for the run report")
                .default_value("qc_assessment.json"),
        )
        .arg(
            Arg::new("dataset_type")
                .short('t')
                .long("dataset-type")
                .value_name("TYPE")
                .help("Dataset type: bacterial, viral, or metagenomic")
                .default_value("bacterial"),
        )
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Run name (defaults to the input file stem)"),
        )
        .get_matches();

    // Parse arguments
    let input_file = PathBuf::from(matches.get_one::<String>("input").unwrap());
    let output_file = PathBuf::from(matches.get_one::<String>("output").unwrap());
    let dataset_type: DatasetType = matches.get_one::<String>("dataset_type").unwrap().parse()?;
    let run_name = matches
        .get_one::<String>("name")
        .cloned()
        .unwrap_or_else(|| {
            input_file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string()
        });

    println!("🧬 Long-read QC Assessment Tool");
    println!("Input: {}", input_file.display());
    println!("Output: {}", output_file.display());
    println!("Dataset type: {dataset_type}");

    // Validate input file exists
    if !input_file.exists() {
        anyhow::bail!("Input file does not exist: {}", input_file.display());
    }

    // Load the trim summary and assess the run
    log::info!("loading trim summary from {}", input_file.display());
    let raw = RawQcStatistics::from_path(&input_file)?;

    println!("📊 Assessing run quality...");
    let (metrics, assessment) = assess(&raw, dataset_type, &ThresholdCatalog::default())?;

    let report = RunQcReport {
        name: run_name,
        metrics,
        assessment,
    };

    // Output results
    let json_output = serde_json::to_string_pretty(&report)?;
    std::fs::write(&output_file, &json_output)?;

    println!("✅ Assessment complete!");
    println!("📈 Run: {}", report.name);
    println!("⭐ Mean quality: Q{:.1}", report.metrics.mean_quality);
    if let Some(coverage) = report.metrics.estimated_coverage() {
        println!("🧮 Estimated coverage: {coverage:.1}x");
    }
    if let Some(bp_count) = report.metrics.bp_count() {
        println!("🧮 Data volume: {bp_count} bp");
    }
    println!("🏷️ Status: {}", report.assessment.status);
    println!("💬 {}", report.assessment.message);
    for point in &report.assessment.points_to_check {
        println!("  • {point}");
    }
    println!("💾 Report saved to: {}", output_file.display());

    Ok(())
}
