//! Process command - extract the fields of a single letter.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use rekon_core::letter::JfParser;
use rekon_core::models::record::{Category, ParsedRecord, ReportRow, COLUMNS};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input letter (.txt)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
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

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let filename = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !config.intake.accepts(&filename) {
        anyhow::bail!(
            "Unsupported file type: {} (expected .{})",
            filename,
            config.intake.extension
        );
    }

    info!("Processing file: {}", args.input.display());

    let bytes = fs::read(&args.input)?;
    let parser = JfParser::from_config(&config.decode, &config.intake);
    let record = parser.try_parse(&bytes, &filename)?;

    let output = format_record(&record, args.format)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &ParsedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ParsedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["FILE"];
    header.extend(COLUMNS.iter().skip(1));
    wtr.write_record(&header)?;

    let row = ReportRow::from_record(1, record);
    let mut values = vec![record.filename.clone()];
    values.extend(row.cells().iter().skip(1).map(|c| c.to_string()));
    wtr.write_record(&values)?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(record: &ParsedRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("File: {}\n", record.filename));
    output.push_str(&format!("BANK JF/SOFCODE: {}\n", record.sofcode));
    output.push_str(&format!("Dana Pembayaran: {}\n", record.funding_amount));
    output.push('\n');

    for category in Category::ALL {
        let total = record.total(category);
        output.push_str(&format!(
            "  {:<50} {:>15} {:>6} Acc\n",
            category.title(),
            total.amount(),
            total.count()
        ));
    }

    output
}
