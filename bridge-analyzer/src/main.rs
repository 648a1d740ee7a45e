use bridge_analyzer::{
    parse_constraints, parse_seat, AnalysisError, Config, LeadRequest, ProcessAnalyzer,
    SimulateRequest, DEFAULT_SAMPLES,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bridge-analyzer")]
#[command(version, about = "Double-dummy and single-dummy bridge deal analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Deal generator program
    #[arg(long, env = "BRIDGE_ANALYZER_DEALER", default_value = "dealer", global = true)]
    dealer: PathBuf,

    /// Opening-lead solver program
    #[arg(
        long,
        env = "BRIDGE_ANALYZER_LEADSOLVER",
        default_value = "leadsolver",
        global = true
    )]
    leadsolver: PathBuf,

    /// Directory for generator scripts and deal files (defaults to the system temp dir)
    #[arg(long, env = "BRIDGE_ANALYZER_SCRATCH", global = true)]
    scratch_dir: Option<PathBuf>,

    /// Seconds the deal generator may run
    #[arg(long, default_value_t = 180, global = true)]
    generation_timeout_secs: u64,

    /// Seconds the lead solver may run per chunk
    #[arg(long, default_value_t = 300, global = true)]
    lead_timeout_secs: u64,

    /// Largest sample a request may ask for
    #[arg(long, default_value_t = 5000, global = true)]
    max_samples: usize,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Double-dummy tricks for every declarer and strain of a complete deal
    Analyse {
        /// Deal such as `N:AKQ.JT9.876.5432 ...`
        #[arg(long)]
        deal: String,
    },

    /// Trick distribution for North and South over sampled deals
    Simulate {
        /// Known hands; unknown seats written as `-`
        #[arg(long)]
        deal: String,

        #[arg(long, default_value_t = DEFAULT_SAMPLES)]
        samples: usize,

        /// Seat constraints as JSON, or `@file`
        #[arg(long)]
        constraints: Option<String>,
    },

    /// Rank opening leads from one hand against a contract
    Leads {
        /// Leader's hand, `spades.hearts.diamonds.clubs`
        #[arg(long)]
        hand: String,

        /// Opening leader (N, E, S, W)
        #[arg(long, default_value = "W")]
        leader: String,

        /// Contract such as `4S` or `3N`
        #[arg(long)]
        contract: String,

        #[arg(long, default_value_t = DEFAULT_SAMPLES)]
        samples: usize,

        /// Seat constraints as JSON, or `@file`
        #[arg(long)]
        constraints: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            dealer: self.dealer.clone(),
            leadsolver: self.leadsolver.clone(),
            scratch_dir: self.scratch_dir.clone().unwrap_or(defaults.scratch_dir),
            generation_timeout: Duration::from_secs(self.generation_timeout_secs),
            lead_timeout: Duration::from_secs(self.lead_timeout_secs),
            max_samples: self.max_samples,
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.as_str())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.as_str()))
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn constraints(arg: Option<&str>) -> Result<bridge_analyzer::Constraints, AnalysisError> {
    arg.map(parse_constraints)
        .transpose()
        .map(Option::unwrap_or_default)
}

fn run(cli: &Cli) -> Result<String, AnalysisError> {
    let analyzer = ProcessAnalyzer::from_config(&cli.config());

    let payload = match &cli.command {
        Command::Analyse { deal } => serde_json::to_string_pretty(&analyzer.analyse(deal)?),
        Command::Simulate {
            deal,
            samples,
            constraints: constraint_arg,
        } => {
            let request = SimulateRequest {
                deal: deal.clone(),
                samples: *samples,
                constraints: constraints(constraint_arg.as_deref())?,
            };
            serde_json::to_string_pretty(&analyzer.simulate(&request)?)
        }
        Command::Leads {
            hand,
            leader,
            contract,
            samples,
            constraints: constraint_arg,
        } => {
            let request = LeadRequest {
                hand: hand.clone(),
                leader: parse_seat(leader)?,
                contract: contract.clone(),
                samples: *samples,
                constraints: constraints(constraint_arg.as_deref())?,
            };
            serde_json::to_string_pretty(&analyzer.rank_leads(&request)?)
        }
    };
    payload.map_err(AnalysisError::Output)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(payload) => {
            println!("{}", payload);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), "{}", e);
            let body = json!({ "error": { "kind": e.kind(), "message": e.to_string() } });
            println!("{}", body);
            ExitCode::FAILURE
        }
    }
}
