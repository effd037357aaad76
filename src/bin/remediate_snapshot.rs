//! Snapshot Remediator
//!
//! Runs the remediation pipeline over a JSON document snapshot and prints the
//! statistics.
//!
//! Usage:
//!   cargo run --bin remediate_snapshot -- snapshot.json
//!   cargo run --bin remediate_snapshot -- snapshot.json --output fixed.json --report report.json
//!   cargo run --bin remediate_snapshot -- snapshot.json --config remediate.json --verbose

use pdf_remediate::remediation::{RemediationReport, Remediator};
use pdf_remediate::{RemediationConfig, TaggedDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

struct RunnerConfig {
    input: Option<PathBuf>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    report_file: Option<PathBuf>,
    verbose: bool,
}

impl RunnerConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut output_file = None;
        let mut config_file = None;
        let mut report_file = None;
        let mut verbose = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--output" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        output_file = Some(PathBuf::from(&args[i]));
                    }
                },
                "--config" => {
                    i += 1;
                    if i < args.len() {
                        config_file = Some(PathBuf::from(&args[i]));
                    }
                },
                "--report" => {
                    i += 1;
                    if i < args.len() {
                        report_file = Some(PathBuf::from(&args[i]));
                    }
                },
                "--verbose" | "-v" => {
                    verbose = true;
                },
                other if input.is_none() && !other.starts_with('-') => {
                    input = Some(PathBuf::from(other));
                },
                other => {
                    eprintln!("Ignoring unknown argument: {}", other);
                },
            }
            i += 1;
        }

        Self {
            input,
            output_file,
            config_file,
            report_file,
            verbose,
        }
    }
}

fn print_report(report: &RemediationReport, verbose: bool) {
    let s = &report.statistics;
    println!("\nRemediation Summary");
    println!("===================");
    println!("Images tagged:            {}", s.images_tagged);
    println!("Decorative images:        {}", s.decorative_images);
    println!("Already tagged (skipped): {}", s.skipped_already_tagged);
    println!("Alt texts improved:       {}", s.alt_texts_improved);
    println!(
        "  heuristic / provider:   {} / {}",
        s.heuristic_alt_texts, s.provider_alt_texts
    );
    println!("Tags retyped:             {}", s.tags_retyped);
    println!("  children moved/removed: {} / {}", s.nodes_rehomed, s.nodes_removed);
    println!("Headings repaired:        {}", s.headings_repaired);
    println!("Artifacts marked:         {}", s.artifacts_marked);
    println!("Reading order fixed:      {}", s.reading_order_fixed);
    println!("Tables summarized:        {}", s.tables_summarized);
    println!("Links described:          {}", s.links_described);
    println!("Unlabeled form fields:    {}", s.form_fields_unlabeled);
    println!("OCR-flagged pages:        {}", s.ocr_flagged_pages);
    println!("Unresolved:               {}", s.unresolved);
    println!("Total changes:            {}", s.structural_changes());

    if report.ocr.requires_ocr {
        println!("\n⚠ Requires OCR: {}", report.ocr.rationale);
    }

    if verbose && !report.review_items.is_empty() {
        println!("\nReview items:");
        for item in &report.review_items {
            println!("  {}", item);
        }
    }
}

fn run(config: &RunnerConfig, input: &Path) -> pdf_remediate::Result<()> {
    let settings = match &config.config_file {
        Some(path) => RemediationConfig::from_json_file(path)?,
        None => RemediationConfig::default(),
    };

    let mut doc = TaggedDocument::from_json_file(input)?;
    let report = Remediator::new().with_config(settings).run(&mut doc)?;
    print_report(&report, config.verbose);

    if let Some(ref path) = config.output_file {
        doc.to_json_file(path)?;
        println!("\nRemediated snapshot written to {}", path.display());
    }

    if let Some(ref path) = config.report_file {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &report)?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let config = RunnerConfig::from_args();
    let Some(input) = config.input.clone() else {
        eprintln!(
            "Usage: remediate_snapshot <snapshot.json> [--output out.json] [--config cfg.json] [--report report.json] [--verbose]"
        );
        std::process::exit(2);
    };

    println!("Snapshot Remediator");
    println!("Input: {}", input.display());

    if let Err(e) = run(&config, &input) {
        eprintln!("\nError: {}", e);
        std::process::exit(1);
    }
}
