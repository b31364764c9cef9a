//! Process command - extract fields from a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use estrai_core::extract::rules::format_italian_amount;
use estrai_core::{Assistant, ExtractionResult, Extractor};

use super::{build_assistant, extract_file, load_config, parse_kind};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or .txt with already-extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Document kind: registry-extract, financial-statement, tax-return,
    /// vat-return, generic (or visura, bilancio, redditi, iva, generico)
    #[arg(short, long)]
    kind: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use local rules only
    #[arg(long)]
    no_assistant: bool,
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

    let kind = parse_kind(&args.kind)?;
    let config = load_config(config_path)?;
    let extractor = Extractor::from_config(&config);
    let assistant = build_assistant(&config, args.no_assistant);

    info!("Processing file: {} as {}", args.input.display(), kind);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.set_message(format!("Extracting {}...", kind));

    let result = extract_file(
        &args.input,
        kind,
        &extractor,
        assistant.as_ref().map(|a| a as &dyn Assistant),
    )
    .await;
    pb.finish_and_clear();
    let result = result?;

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
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

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// CSV columns, shared with the batch summary.
pub const CSV_HEADER: [&str; 8] = [
    "company_name",
    "tax_id",
    "legal_form_kind",
    "activity_codes",
    "shareholders",
    "total_assets",
    "revenue",
    "employee_units",
];

/// One CSV row for a result, in [`CSV_HEADER`] order.
pub fn csv_row(result: &ExtractionResult) -> [String; 8] {
    [
        result.company_name.clone(),
        result.tax_id.clone(),
        result.legal_form_kind.as_str().to_string(),
        result.activity_codes.join(";"),
        result.shareholders.len().to_string(),
        result.total_assets.normalize().to_string(),
        result.revenue.normalize().to_string(),
        result.employee_units.normalize().to_string(),
    ]
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(result))?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Company: {}\n", result.company_name));
    output.push_str(&format!("Tax ID: {}\n", result.tax_id));
    if !result.legal_form_kind.is_unknown() {
        output.push_str(&format!("Legal form: {}\n", result.legal_form_kind.as_str()));
    }
    if !result.activity_codes.is_empty() {
        output.push_str(&format!("ATECO: {}\n", result.activity_codes.join(", ")));
    }
    output.push('\n');

    output.push_str(&format!("Revenue:      {} EUR\n", format_italian_amount(result.revenue)));
    output.push_str(&format!(
        "Total assets: {} EUR\n",
        format_italian_amount(result.total_assets)
    ));
    if !result.employee_units.is_zero() {
        output.push_str(&format!(
            "Employees:    {}\n",
            format_italian_amount(result.employee_units)
        ));
    }

    if !result.shareholders.is_empty() {
        output.push_str("\nShareholders:\n");
        for holder in &result.shareholders {
            output.push_str(&format!(
                "  {} ({}) {}%\n",
                holder.name,
                holder.tax_id,
                format_italian_amount(holder.ownership_percent)
            ));
        }
    }

    output
}
