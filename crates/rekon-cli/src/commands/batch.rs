//! Batch command - build a reconciliation spreadsheet from many letters.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use rekon_core::batch::{BatchOutput, BatchProcessor};
use rekon_core::letter::JfParser;
use rekon_core::models::config::RekonConfig;
use rekon_core::report::writer_for;
use rekon_core::workspace::BatchWorkspace;

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output spreadsheet (default: timestamped name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a per-file summary CSV next to the spreadsheet
    #[arg(long)]
    summary: bool,

    /// Write an unstyled spreadsheet
    #[arg(long)]
    plain: bool,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if args.plain {
        config.report.styled = false;
    }

    let input = Path::new(&args.input);
    let output = if input.is_dir() {
        process_dir(input, &config)?
    } else {
        let workspace = stage_glob(&args.input, &config)?;
        let result = process_dir(workspace.path(), &config);
        workspace.close();
        result?
    };

    let output_path = args.output.clone().unwrap_or_else(|| {
        PathBuf::from(
            config
                .report
                .output_file_name(chrono::Local::now().naive_local()),
        )
    });

    writer_for(&config.report).write(&output.rows, &output_path)?;
    println!(
        "{} Report written to {}",
        style("✓").green(),
        output_path.display()
    );

    if args.summary {
        let summary_path = summary_path_for(&output_path);
        write_summary(&output, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!("{} {}", style("ℹ").blue(), output.summary);
    for name in &output.summary.failed {
        println!("  {} {}", style("✗").red(), name);
    }

    debug!("Total batch time: {:?}", start.elapsed());

    Ok(())
}

/// Copy glob matches into a fresh workspace, applying upload limits.
fn stage_glob(pattern: &str, config: &RekonConfig) -> anyhow::Result<BatchWorkspace> {
    let paths: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if paths.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    let workspace = BatchWorkspace::create(config.intake.clone())?;
    match workspace.stage_paths(&paths) {
        Ok(report) => {
            println!("{} {}", style("ℹ").blue(), report);
            for issue in &report.issues {
                println!("  {} {}", style("!").yellow(), issue);
            }
            Ok(workspace)
        }
        Err(e) => {
            workspace.close();
            Err(e.into())
        }
    }
}

fn process_dir(dir: &Path, config: &RekonConfig) -> anyhow::Result<BatchOutput> {
    let parser = JfParser::from_config(&config.decode, &config.intake);
    let processor = BatchProcessor::new(parser, config.intake.clone());

    let total = processor.list_inputs(dir)?.len();
    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        total
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("=>-"),
    );

    let result = processor.process_directory_with(dir, |record| {
        if let Some(e) = &record.error {
            warn!("Failed to process {}: {}", record.filename, e);
        }
        pb.set_message(record.filename.clone());
        pb.inc(1);
    });

    pb.finish_and_clear();
    Ok(result?)
}

fn summary_path_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "rekon".to_string());
    output.with_file_name(format!("{}_summary.csv", stem))
}

fn write_summary(output: &BatchOutput, path: &Path) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["no", "file", "sofcode", "funding_amount", "status", "error"])?;

    for (row, record) in output.rows.iter().zip(&output.records) {
        wtr.write_record([
            row.number().to_string(),
            record.filename.clone(),
            record.sofcode.clone(),
            record.funding_amount.to_string(),
            if record.is_degraded() { "error" } else { "ok" }.to_string(),
            record.error.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_path_sits_next_to_report() {
        assert_eq!(
            summary_path_for(Path::new("out/rekon_jf_20250107_134501.xlsx")),
            PathBuf::from("out/rekon_jf_20250107_134501_summary.csv")
        );
    }
}
