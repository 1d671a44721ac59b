//! Permscope CLI - what may I deploy, and what is deployed

use clap::{Parser, Subcommand};
use permscope_core::ReleaseAction;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod display;
mod error;
mod exit_codes;

#[derive(Parser)]
#[command(name = "permscope")]
#[command(version)]
#[command(about = "Check Kubernetes permissions for a manifest and list release states", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level or filter directives (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PERMSCOPE_LOG")]
    log_level: Option<String>,

    /// Configuration file (default: ~/.config/permscope/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the permissions a manifest needs that you do not have
    #[command(name = "can-i")]
    CanI {
        /// Manifest file ("-" reads stdin)
        manifest: PathBuf,

        /// Namespace for objects that declare none
        #[arg(short, long)]
        namespace: Option<String>,

        /// Release operation to check (create, upgrade, delete or a raw verb)
        #[arg(long, default_value = "create")]
        action: String,

        /// Check on behalf of another user
        #[arg(long = "as")]
        as_user: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that you can read releases in a namespace
    Validate {
        /// Namespace to check
        namespace: String,
    },

    /// List releases with their current status
    List {
        /// Namespace to list
        #[arg(short, long, conflicts_with = "all_namespaces")]
        namespace: Option<String>,

        /// List releases in all namespaces
        #[arg(short = 'A', long)]
        all_namespaces: bool,

        /// Maximum number of releases (0 = unlimited)
        #[arg(long)]
        limit: Option<usize>,

        /// Comma-separated statuses to keep (e.g. deployed,failed)
        #[arg(long)]
        status: Option<String>,

        /// Read revisions from a YAML/JSON file instead of the cluster
        #[arg(long)]
        from_file: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn")),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn run(cli: Cli) -> error::Result<i32> {
    let settings = commands::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::CanI {
            manifest,
            namespace,
            action,
            as_user,
            json,
        } => {
            let action = ReleaseAction::parse(&action)?;
            commands::can_i::run(
                &settings,
                &manifest,
                namespace.as_deref(),
                &action,
                as_user.as_deref(),
                json,
            )
            .await
        }

        Commands::Validate { namespace } => commands::validate::run(&settings, &namespace).await,

        Commands::List {
            namespace,
            all_namespaces,
            limit,
            status,
            from_file,
            json,
        } => {
            commands::list::run(
                &settings,
                &commands::list::ListArgs {
                    namespace,
                    all_namespaces,
                    limit,
                    status,
                    from_file,
                    json,
                },
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };
    std::process::exit(code);
}
