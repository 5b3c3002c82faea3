use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use yard_velocity::config::Config;
use yard_velocity::facility::Facility;
use yard_velocity::output;
use yard_velocity::providers::Providers;
use yard_velocity::scoring::{analyze, Measurement, ScoringConfig};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_ANALYSIS: i32 = 5;
const EXIT_REPORT: i32 = 6;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every target and write ranked reports (default if no subcommand)
    Batch {
        /// YAML file with a list of facilities (overrides config targets)
        #[arg(long)]
        targets: Option<PathBuf>,

        /// Directory for report files (overrides reports.dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Skip the JSON report
        #[arg(long)]
        no_json: bool,

        /// Skip the CSV report
        #[arg(long)]
        no_csv: bool,

        /// Number of demo links to print
        #[arg(long, default_value_t = 3)]
        top: usize,

        /// Print tab-separated rows instead of the table
        #[arg(long)]
        tsv: bool,
    },
    /// Score a single facility
    Analyze {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, default_value = "Unknown Facility")]
        name: String,
    },
    /// Show how a score is built from raw measurements
    Explain {
        /// Paved area percentage (0-100)
        #[arg(long, default_value_t = 85.0)]
        paved: f64,

        #[arg(long, default_value_t = 180)]
        trailers: u32,

        #[arg(long, default_value_t = 3)]
        gates: u32,
    },
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides server.addr)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Check that a deployed API answers score requests
    Verify {
        /// Base URL of the deployment
        url: String,
    },
    /// Open the Digital Twin demo for a facility in the browser
    Open {
        /// Facility name, as shown in the ranked table
        name: String,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "yard-velocity")]
#[command(about = "Rank logistics facilities by Yard Velocity Score", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/yard-velocity/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Seed for the mock providers (overrides providers.seed)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "yard_velocity=debug,tower_http=debug"
    } else {
        "yard_velocity=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(EXIT_NETWORK);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Batch {
        targets: None,
        out_dir: None,
        no_json: false,
        no_csv: false,
        top: 3,
        tsv: false,
    });
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading so a broken config can be replaced
    if let Commands::Init = command {
        if let Err(e) = yard_velocity::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match yard_velocity::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    if let Err(errors) = yard_velocity::scoring::validate_scoring(&config.scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let seed = cli.seed.or(config.providers.seed);
    let providers = Providers::mock(seed);

    let code = match command {
        Commands::Batch {
            targets,
            out_dir,
            no_json,
            no_csv,
            top,
            tsv,
        } => {
            let opts = BatchOptions {
                targets,
                out_dir,
                json: config.reports.json && !no_json,
                csv: config.reports.csv && !no_csv,
                top,
                tsv,
                verbose: cli.verbose,
            };
            run_batch_command(&config, &providers, opts).await
        }
        Commands::Analyze { lat, lon, name } => {
            let facility = Facility::new(name, lat, lon);
            match yard_velocity::pipeline::analyze_facility(&facility, &providers, &config.scoring)
                .await
            {
                Ok(report) => {
                    let use_colors = output::should_use_colors();
                    println!("{}", output::format_facility_detail(&report, use_colors));
                    EXIT_SUCCESS
                }
                Err(e) => {
                    eprintln!("Analysis failed: {}", e);
                    EXIT_ANALYSIS
                }
            }
        }
        Commands::Explain {
            paved,
            trailers,
            gates,
        } => run_explain(&config.scoring, Measurement::new(paved, trailers, gates)),
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            let addr: SocketAddr = match addr.parse() {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("Invalid listen address '{}': {}", addr, e);
                    std::process::exit(EXIT_CONFIG);
                }
            };
            let state = yard_velocity::server::AppState::new(config.scoring.clone(), providers);
            match yard_velocity::server::serve(addr, state).await {
                Ok(()) => EXIT_SUCCESS,
                Err(e) => {
                    eprintln!("Server error: {:#}", e);
                    EXIT_NETWORK
                }
            }
        }
        Commands::Verify { url } => {
            println!("Testing connection to: {}", url);
            match yard_velocity::verify::verify_deployment(&url, &config.verify).await {
                Ok(report) => {
                    println!();
                    println!("SUCCESS: Backend is reachable and responding!");
                    println!("{}", "-".repeat(40));
                    println!("Score: {}", report.score);
                    println!("Classification: {}", report.classification);
                    println!("Details: {}", report.details);
                    println!("{}", "-".repeat(40));
                    println!();
                    println!("Next Step: Ensure this URL is set as NEXT_PUBLIC_API_URL in Vercel.");
                    EXIT_SUCCESS
                }
                Err(e) => {
                    eprintln!();
                    eprintln!("ERROR: {:#}", e);
                    EXIT_NETWORK
                }
            }
        }
        Commands::Open { name } => {
            match yard_velocity::browser::open_demo(&config.reports.demo_base_url, &name) {
                Ok(url) => {
                    println!("Opening demo for {} in browser: {}", name, url);
                    EXIT_SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to open browser: {}", e);
                    EXIT_NETWORK
                }
            }
        }
        Commands::Init => EXIT_SUCCESS,
    };

    std::process::exit(code);
}

struct BatchOptions {
    targets: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    json: bool,
    csv: bool,
    top: usize,
    tsv: bool,
    verbose: bool,
}

async fn run_batch_command(config: &Config, providers: &Providers, opts: BatchOptions) -> i32 {
    let start_time = Instant::now();

    let targets = match opts.targets {
        Some(path) => match yard_velocity::config::load_targets(&path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Targets error: {:#}", e);
                return EXIT_CONFIG;
            }
        },
        None => config.targets(),
    };

    let now = chrono::Local::now();
    let use_colors = output::should_use_colors();

    if !opts.tsv {
        println!(
            "{}",
            output::format_batch_header(
                targets.len(),
                &config.scoring.weights,
                &now.format("%Y-%m-%d %H:%M:%S").to_string()
            )
        );
        println!();
    }

    let outcome =
        yard_velocity::pipeline::run_batch(&targets, providers, &config.scoring).await;

    if opts.tsv {
        println!("{}", output::format_tsv(&outcome.ranked));
    } else {
        if opts.verbose {
            for report in &outcome.ranked {
                println!("{}", output::format_facility_detail(report, use_colors));
                println!();
            }
        }
        println!("{}", output::format_ranked_table(&outcome.ranked, use_colors));
        println!();
        println!("{}", output::format_summary(&outcome, use_colors));
        if opts.top > 0 && !outcome.ranked.is_empty() {
            println!();
            println!(
                "{}",
                output::format_demo_links(
                    &outcome.ranked,
                    &config.reports.demo_base_url,
                    opts.top
                )
            );
        }
    }

    let dir = opts
        .out_dir
        .unwrap_or_else(|| PathBuf::from(&config.reports.dir));
    let stamp = now.format(output::TIMESTAMP_FORMAT).to_string();

    let reports_written = match output::write_reports(&dir, &outcome, &stamp, opts.json, opts.csv) {
        Ok(paths) => {
            for path in paths {
                eprintln!("Report saved to {}", path.display());
            }
            true
        }
        Err(e) => {
            eprintln!("{:#}", e);
            false
        }
    };

    tracing::info!(
        scored = outcome.ranked.len(),
        failed = outcome.failures.len(),
        elapsed = ?start_time.elapsed(),
        "batch complete"
    );

    if outcome.ranked.is_empty() && !outcome.failures.is_empty() {
        eprintln!("All facilities failed to analyze.");
        return EXIT_ANALYSIS;
    }
    if !reports_written {
        return EXIT_REPORT;
    }
    EXIT_SUCCESS
}

fn run_explain(scoring: &ScoringConfig, measurement: Measurement) -> i32 {
    match analyze(&measurement, scoring) {
        Ok(result) => {
            println!("Formula: {}", output::format_formula(&scoring.weights));
            println!();
            println!(
                "{}",
                output::format_score_explanation(&result, output::should_use_colors())
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Cannot explain score: {}", e);
            EXIT_ANALYSIS
        }
    }
}
