//! NAP audit CLI.
//!
//! Usage:
//!     napaudit run --input export.csv --output audit.csv --api-key KEY
//!     napaudit check --name "Acme Inc" --phone "555-123-4567" --address "1 A St, Town"

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use napaudit_backend_places::{PlaceLookup, PlacesBackend, PlacesConfig};
use napaudit_matcher::{evaluate, MatchConfig};
use napaudit_model::{InputRecord, LookupOutcome};
use napaudit_report::{AuditRow, BatchSummary};
use serde::Deserialize;

#[derive(Parser)]
#[command(name = "napaudit")]
#[command(about = "Audit NAP consistency against a place lookup service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Places API key
    #[arg(long)]
    api_key: String,

    /// Places web service base URL
    #[arg(long, default_value = "https://maps.googleapis.com/maps/api/place")]
    base_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a CSV export of business records
    Run {
        /// Input CSV path
        #[arg(short, long)]
        input: String,

        /// Output CSV path
        #[arg(short, long)]
        output: String,

        /// Delay between lookups in milliseconds
        #[arg(long, default_value = "1000")]
        delay_ms: u64,
    },

    /// Check a single business record
    Check {
        /// Business name
        #[arg(long)]
        name: String,

        /// Phone number, any format
        #[arg(long, default_value = "")]
        phone: String,

        /// Full address
        #[arg(long, default_value = "")]
        address: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

/// One row of the input export.
///
/// Missing columns deserialize as empty strings; headers are trimmed by
/// the reader before they are matched against these names.
#[derive(Debug, Deserialize)]
struct SourceRow {
    #[serde(rename = "CompanyName", default)]
    company_name: String,

    #[serde(rename = "WorkNumber", default)]
    work_number: String,

    #[serde(rename = "Address", default)]
    address: String,

    #[serde(rename = "City", default)]
    city: String,

    #[serde(rename = "ZipCode", default)]
    zip_code: String,

    #[serde(rename = "Country", default)]
    country: String,
}

impl SourceRow {
    /// Compose the full address from its components, skipping blanks and
    /// the "nan" artifacts CSV exports carry for nulls. Country falls
    /// back to USA when absent.
    fn full_address(&self) -> String {
        let mut components: Vec<&str> = Vec::new();

        for part in [&self.address, &self.city, &self.zip_code] {
            let part = part.trim();
            if !part.is_empty() && !part.eq_ignore_ascii_case("nan") {
                components.push(part);
            }
        }

        let country = self.country.trim();
        if country.is_empty() || country.eq_ignore_ascii_case("nan") {
            components.push("USA");
        } else {
            components.push(country);
        }

        components.join(", ")
    }

    fn into_record(self) -> InputRecord {
        let address = self.full_address();
        InputRecord::new(
            self.company_name.trim(),
            self.work_number.trim(),
            address,
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("napaudit=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = PlacesConfig {
        base_url: cli.base_url,
        api_key: cli.api_key,
        ..Default::default()
    };
    let backend = PlacesBackend::new(config);

    match cli.command {
        Commands::Run {
            input,
            output,
            delay_ms,
        } => {
            run_audit(&backend, &input, &output, delay_ms).await?;
        }
        Commands::Check {
            name,
            phone,
            address,
            format,
        } => {
            run_check(&backend, name, phone, address, &format).await?;
        }
    }

    Ok(())
}

async fn run_audit(
    backend: &PlacesBackend,
    input: &str,
    output: &str,
    delay_ms: u64,
) -> Result<()> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(input)
        .with_context(|| format!("Failed to open input CSV: {}", input))?;

    let rows: Vec<SourceRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .context("Failed to parse input CSV")?;

    let total = rows.len();
    println!("Processing {} records...", total);

    let config = MatchConfig::default();
    let delay = std::time::Duration::from_millis(delay_ms);
    let mut audit_rows = Vec::with_capacity(total);
    let mut summary = BatchSummary::new();

    for (index, row) in rows.into_iter().enumerate() {
        let record = row.into_record();
        println!("[{}/{}] Looking up: {}", index + 1, total, record.name);

        let lookup = LookupOutcome::from_result(backend.lookup(&record.lookup_query()).await);
        if let LookupOutcome::Failed(detail) = &lookup {
            tracing::warn!(name = %record.name, error = %detail, "Lookup failed");
        }

        // Rate limit buffer between requests
        tokio::time::sleep(delay).await;

        let assessment = evaluate(&record, &lookup, &config);
        println!("   {}", assessment.verdict.label());

        summary.record(&assessment.verdict);
        audit_rows.push(AuditRow::new(&record, &lookup, &assessment));
    }

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create output CSV: {}", output))?;
    for row in &audit_rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!();
    println!("{}", summary.render());
    println!("Results written to: {}", output);

    Ok(())
}

async fn run_check(
    backend: &PlacesBackend,
    name: String,
    phone: String,
    address: String,
    format: &str,
) -> Result<()> {
    let record = InputRecord::new(name, phone, address);
    println!("Looking up: {}", record.name);
    println!("---");

    let lookup = LookupOutcome::from_result(backend.lookup(&record.lookup_query()).await);
    let assessment = evaluate(&record, &lookup, &MatchConfig::default());
    let row = AuditRow::new(&record, &lookup, &assessment);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&row)?);
    } else {
        if let LookupOutcome::Found(result) = &lookup {
            println!("Found: {}", result.name);
            if !result.phone.is_empty() {
                println!("   Phone: {}", result.phone);
            }
            if !result.address.is_empty() {
                println!("   Address: {}", result.address);
            }
        }
        println!(
            "Name: {} ({:.3}) | Address: {} ({:.3}) | Phone: {} ({:.3})",
            row.name_match,
            row.name_similarity,
            row.address_match,
            row.address_similarity,
            row.phone_match,
            row.phone_similarity
        );
        println!("{}", assessment.verdict.label());
    }

    Ok(())
}
