use clap::{Parser, Subcommand};
use cloudlb_core::{ExecutionModel, PolicyKind};

mod commands;

use commands::run::OutputFormat;

#[derive(Parser)]
#[command(
    name = "cloudlb",
    about = "cloudlb — least-loaded dispatch of cloudlets onto simulated VMs",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured batch and print its report
    Run {
        /// Path to cloudlb.toml (default: built-in scenario)
        #[arg(short, long)]
        config: Option<String>,
        /// Override the RNG seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Dispatch policy: least-loaded or round-robin
        #[arg(short, long)]
        policy: Option<PolicyKind>,
        /// Execution model: time-shared or space-shared
        #[arg(short, long)]
        model: Option<ExecutionModel>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run the same workload under every policy and compare makespans
    Compare {
        #[arg(short, long)]
        config: Option<String>,
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Write a cloudlb.toml with the default scenario
    Init {
        #[arg(short, long, default_value = ".")]
        path: String,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cloudlb=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            seed,
            policy,
            model,
            format,
        } => {
            let overrides = commands::Overrides { seed, policy, model };
            commands::run::run(config.as_deref(), &overrides, format)
        }
        Commands::Compare { config, seed } => {
            let overrides = commands::Overrides {
                seed,
                ..commands::Overrides::default()
            };
            commands::compare::compare(config.as_deref(), &overrides)
        }
        Commands::Init { path, force } => commands::init::init(&path, force),
    }
}
