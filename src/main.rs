use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use blog_api_tester::{runner, Config};

#[derive(Parser)]
#[command(name = "blog-api-tester")]
#[command(version)]
#[command(about = "End-to-end smoke tests for the blog REST API", long_about = None)]
struct Cli {
    /// Base URL of the API server (default http://localhost:4000)
    #[arg(long)]
    base_url: Option<String>,

    /// YAML file with baseUrl, apiPrefix, timeoutMs, passThreshold or outputDir
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Write test-results.json and junit.xml into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    no_color: bool,
}

impl Cli {
    /// defaults < config file < environment < flags
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        let mut config = config.with_env_overrides()?;

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        if let Some(output) = &self.output {
            config.output_dir = Some(output.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.resolve_config()?;

    println!("{} Blog API Backend Test Suite", "🔍".to_string().blue());
    println!(
        "  Started at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    let outcome = runner::run_suite(&config)?;

    Ok(ExitCode::from(outcome.summary.exit_code(config.pass_threshold)))
}
