use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use facturi::anaf::{AnafClient, AnafConfigBuilder};
use facturi::core::{
    ConversionConfigBuilder, ConvertError, EscapeMode, ImportDirection, LayoutVariant,
    UnmatchedPolicy, resolve_company,
};
use facturi::saga::{convert, output_file_name};
use facturi::xlsx::read_sheet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Direction {
    Intrari,
    Iesiri,
}

impl From<Direction> for ImportDirection {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Intrari => ImportDirection::Intrari,
            Direction::Iesiri => ImportDirection::Iesiri,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Layout {
    Simple,
    PurchaseJournal,
    SalesJournal,
}

impl From<Layout> for LayoutVariant {
    fn from(l: Layout) -> Self {
        match l {
            Layout::Simple => LayoutVariant::Simple,
            Layout::PurchaseJournal => LayoutVariant::PurchaseJournal,
            Layout::SalesJournal => LayoutVariant::SalesJournal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "facturi", version, about = "Excel to SAGA XML converter")]
struct Cli {
    /// Fiscal code of the company the SAGA import belongs to
    #[arg(short = 'c', long, env = "FACTURI_COMPANY")]
    company: String,

    /// Import direction
    #[arg(short = 'd', long, value_enum)]
    direction: Direction,

    /// Spreadsheet layout
    #[arg(short = 'l', long, value_enum, default_value = "simple")]
    layout: Layout,

    /// Input .xlsx file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Directory the XML file is written to
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Escape <, >, quotes as well as &
    #[arg(long)]
    strict_escaping: bool,

    /// Abort when sheet rows reference an unresolved company
    #[arg(long)]
    fail_on_unmatched: bool,

    /// Send codes to ANAF without checking the control digit
    #[arg(long)]
    skip_checksum: bool,

    /// Issue and due date of the invoices (YYYY-MM-DD), default 2023-12-31
    #[arg(long)]
    invoice_date: Option<NaiveDate>,

    /// ANAF endpoint override
    #[arg(long, env = "FACTURI_ANAF_URL")]
    anaf_url: Option<String>,

    /// Attempts per ANAF request
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Seconds between ANAF attempts
    #[arg(long, default_value_t = 2)]
    retry_delay: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_retryable() => {
            eprintln!("ANAF is unavailable, try again later: {e}");
            ExitCode::from(75)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ConvertError> {
    let today = Local::now().date_naive();
    let direction = ImportDirection::from(cli.direction);
    let layout = LayoutVariant::from(cli.layout);

    let mut anaf = AnafConfigBuilder::new()
        .max_attempts(cli.retries)
        .retry_delay(Duration::from_secs(cli.retry_delay));
    if let Some(url) = cli.anaf_url {
        anaf = anaf.endpoint(url);
    }
    let client = AnafClient::new(anaf.build())?;

    let mut config = ConversionConfigBuilder::new()
        .request_date(today)
        .verify_checksum(!cli.skip_checksum);
    if cli.strict_escaping {
        config = config.escape_mode(EscapeMode::Strict);
    }
    if cli.fail_on_unmatched {
        config = config.unmatched_policy(UnmatchedPolicy::Fail);
    }
    if let Some(date) = cli.invoice_date {
        config = config.invoice_date(date);
    }
    let config = config.build();

    let own = resolve_company(&client, &cli.company, today).await?;
    tracing::info!(company = %own.legal_name, cui = %own.tax_id, "selected company");

    let sheet = read_sheet(&cli.input)?;
    let conversion = convert(&sheet, &own, direction, layout, &client, &config).await?;

    let path = cli.output_dir.join(output_file_name(&own, direction, today));
    std::fs::write(&path, &conversion.document)?;

    println!(
        "{} invoices written to {}",
        conversion.invoice_count,
        path.display()
    );
    if !conversion.diagnostics.is_empty() {
        println!("invalid fiscal codes: {}", conversion.diagnostics);
    }
    Ok(())
}
