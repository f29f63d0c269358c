mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "content-hub")]
#[command(version, about = "SEO content hub backed by a headless CMS", long_about = None)]
struct Cli {
    /// Path to hub.toml (environment variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at info level instead of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Serve pages, sitemaps and robots.txt
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Build the sitemap from the content backend
    Sitemap {
        /// File to write instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Emit the sitemap index instead of the full urlset
        #[arg(long)]
        index: bool,

        /// Write every sitemap document and robots.txt into this directory
        #[arg(long, conflicts_with_all = ["output", "index"])]
        out_dir: Option<PathBuf>,
    },

    /// Print robots.txt for the configured site
    Robots,

    /// Show effective configuration and query the backend once
    Check,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise RUST_LOG decides
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = cli.config;
    match cli.command {
        Command::Serve { host, port } => commands::serve::run(config, host, port).await,
        Command::Sitemap {
            output,
            index,
            out_dir,
        } => commands::sitemap::run(config, output, index, out_dir).await,
        Command::Robots => commands::robots::run(config),
        Command::Check => commands::check::run(config).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "content-hub", &mut io::stdout());
            Ok(())
        }
    }
}
