use anyhow::{Context, Result};
use clap::Parser;

use recmon::{
    cli::Cli,
    config::Config,
    dispatch::{dispatch, DispatchOptions},
    metrics::SysinfoMetrics,
    speech::{self, WaitOptions},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())
        .with_context(|| match &cli.config {
            Some(path) => format!("Could not load config: {}", path.display()),
            None => "Could not load config".to_string(),
        })?;
    if let Some(backend) = cli.backend {
        config.speech.backend = backend;
    }
    if cli.quiet {
        config.print = false;
    }

    let options = DispatchOptions {
        print: config.print,
        wait: WaitOptions::from(&config.speech),
    };

    let mut metrics = SysinfoMetrics::new();
    dispatch(cli.selector, &mut metrics, || speech::open(&config.speech), options).await?;
    return Ok(());
}
