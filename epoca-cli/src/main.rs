//! `epoca`: export prediction-market rounds enriched with pre-round candles.
//!
//! Every day in `--start..=--end` is split into three UTC windows; each window is
//! written to `--out` as `Data<label><DDMMYYYY>-<SH>-<EH>.json`. Logs go to stderr
//! (`RUST_LOG`, default `info`); a per-window summary goes to stdout.
//!
//! Exit codes: `0` every window succeeded, `1` at least one window failed,
//! `2` invalid arguments or configuration.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use epoca::{
    DirectorySink, EmptyWindowPolicy, Epoca, EpocaConnector, RunReport, WindowPlan, WindowStatus,
};
use epoca_binance::BinanceConnector;
use epoca_mock::MockConnector;
use epoca_subgraph::SubgraphConnector;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "epoca",
    version,
    about = "Export prediction-market rounds enriched with lookback candles"
)]
struct Cli {
    /// First day to export (DD-MM-YYYY, UTC).
    #[arg(long)]
    start: String,

    /// Last day to export, inclusive (DD-MM-YYYY, UTC).
    #[arg(long)]
    end: String,

    /// Directory receiving the artifacts. Created if missing.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Market-data symbol queried for every round.
    #[arg(long, default_value = "BNBUSDT")]
    symbol: String,

    /// Label embedded in artifact names.
    #[arg(long, default_value = "Bnb")]
    label: String,

    /// Write nothing for windows without rounds instead of an empty array.
    #[arg(long, default_value_t = false)]
    skip_empty: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Full round-registry endpoint. Takes precedence over --graph-api-key.
    #[arg(long, env = "EPOCA_SUBGRAPH_URL")]
    subgraph_url: Option<String>,

    /// API key for the hosted registry gateway.
    #[arg(long, env = "GRAPH_API_KEY", hide_env_values = true)]
    graph_api_key: Option<String>,

    /// Base URL of the market-data API.
    #[arg(long, default_value = BinanceConnector::DEFAULT_BASE_URL)]
    binance_url: String,

    /// Serve rounds and candles from the offline deterministic connector.
    #[arg(long, default_value_t = false)]
    mock: bool,

    /// Print the run report as JSON instead of the text summary.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn connectors(cli: &Cli) -> Result<Vec<Arc<dyn EpocaConnector>>> {
    if cli.mock {
        let mock: Arc<dyn EpocaConnector> = Arc::new(MockConnector::new());
        return Ok(vec![mock]);
    }

    let registry = match (&cli.subgraph_url, &cli.graph_api_key) {
        (Some(url), _) => SubgraphConnector::with_endpoint(url)
            .with_context(|| format!("bad --subgraph-url {url:?}"))?,
        (None, Some(key)) => SubgraphConnector::gateway(key).context("bad --graph-api-key")?,
        (None, None) => bail!(
            "no round registry configured: pass --graph-api-key, --subgraph-url or --mock"
        ),
    };
    let market = BinanceConnector::with_base_url(&cli.binance_url)
        .with_context(|| format!("bad --binance-url {:?}", cli.binance_url))?;

    // One connection pool for both remote APIs.
    let http = reqwest::Client::builder()
        .user_agent(concat!("epoca/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("cannot build HTTP client")?;
    let registry = registry.with_client(http.clone());
    let market = market.with_client(http);

    let registry: Arc<dyn EpocaConnector> = Arc::new(registry);
    let market: Arc<dyn EpocaConnector> = Arc::new(market);
    Ok(vec![registry, market])
}

fn build(cli: &Cli) -> Result<Epoca> {
    let policy = if cli.skip_empty {
        EmptyWindowPolicy::Skip
    } else {
        EmptyWindowPolicy::Emit
    };
    let builder = connectors(cli)?
        .into_iter()
        .fold(Epoca::builder(), |b, c| b.with_connector(c))
        .sink(Arc::new(DirectorySink::new(&cli.out)))
        .symbol(cli.symbol.as_str())
        .artifact_label(cli.label.as_str())
        .empty_windows(policy)
        .provider_timeout(Duration::from_secs(cli.timeout_secs));
    Ok(builder.build()?)
}

fn print_summary(report: &RunReport) {
    for outcome in &report.outcomes {
        match &outcome.status {
            WindowStatus::Exported { artifact, rounds } => {
                println!("{}  exported  {artifact} ({rounds} rounds)", outcome.window);
            }
            WindowStatus::Skipped => println!("{}  skipped   no rounds", outcome.window),
            WindowStatus::Failed(e) => println!("{}  failed    {e}", outcome.window),
        }
    }
    let failed = report.failures().len();
    println!(
        "{} windows, {} artifacts, {failed} failed",
        report.outcomes.len(),
        report.artifacts().len()
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let setup = WindowPlan::parse(&cli.start, &cli.end)
        .map_err(anyhow::Error::from)
        .and_then(|plan| Ok((plan, build(&cli)?)));
    let (plan, epoca) = match setup {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    tracing::info!(
        first = %plan.first_day(),
        last = %plan.last_day(),
        windows = plan.len(),
        out = %cli.out.display(),
        "starting export"
    );
    let report = epoca.run(&plan).await;

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("error: cannot encode report: {e}"),
        }
    } else {
        print_summary(&report);
    }

    if report.is_complete_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
