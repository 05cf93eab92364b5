use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use clap::Parser;
use data_pipeline::{Composition, Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "build-portfolio",
    about = "Fuse MF Central exports into a single portfolio snapshot."
)]
struct Args {
    /// Consolidated portfolio statement (e.g. CurrentValuation*.json)
    #[arg(long)]
    holdings: PathBuf,

    /// Transaction details statement (e.g. AS*.json)
    #[arg(long)]
    transactions: PathBuf,

    /// Detailed report carrying per-fund XIRR
    #[arg(long)]
    xirr: PathBuf,

    /// Where to write the portfolio snapshot
    #[arg(short, long)]
    output: PathBuf,

    /// Optional path for the import report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Optional settings JSON; defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Reference date for SIP activity (YYYY-MM-DD); defaults to today
    #[arg(long)]
    today: Option<NaiveDate>,

    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn print_summary(out: &Composition) {
    let snap = &out.snapshot;
    println!("Investor:        {} ({})", snap.investor_name, snap.pan);
    println!("Current value:   {:.2}", snap.total_value);
    println!("Invested:        {:.2}", snap.total_invested);
    println!(
        "Gain:            {:.2} ({:.2}%)",
        snap.total_gain, snap.total_gain_percent
    );
    println!("XIRR:            {:.2}%", snap.portfolio_xirr);
    println!(
        "Funds:           {} ({} after aggregation)",
        snap.counts.num_funds, snap.counts.num_aggregated_funds
    );
    println!(
        "Active SIPs:     {} of {} detected",
        snap.counts.num_active_sips, out.report.all_sips_detected
    );
    println!("Brokers:         {}", snap.counts.num_brokers);
    println!("Skipped records: {}", out.report.skipped_total());
    for warning in &out.report.warnings {
        println!("[WARN] {}", warning);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = settings_loader::load_optional_settings(args.settings.as_ref())?;
    logger::init(&settings.logging);

    let cfg = Config {
        holdings_file: args.holdings,
        transactions_file: args.transactions,
        xirr_file: args.xirr,
        output_file: args.output,
        report_file: args.report,
        settings,
        today: args.today.unwrap_or_else(|| Local::now().date_naive()),
        generated_at: Utc::now(),
        pretty: args.pretty,
    };
    tracing::debug!(today = %cfg.today, "Starting build");

    let composition = data_pipeline::run(&cfg)?;
    print_summary(&composition);
    println!("Wrote portfolio snapshot: {}", cfg.output_file.display());
    Ok(())
}
