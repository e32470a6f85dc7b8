use piwatch::{AppResult, cli, cli::Cli, config::Config, init_logging};

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(&cli.effective_log_level())?;

    tracing::debug!("CLI arguments: {:?}", cli);

    // Load configuration; missing base URL or secret is fatal here
    let config = Config::load_or_default(&cli.config_file);
    config.validate()?;

    cli::run(cli, config).await?;

    Ok(())
}
