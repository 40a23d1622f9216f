use tokenstore::logger::*;
use tokenstore::settings::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    let cli = Cli::parse();
    let project_settings = parse_settings(cli.settings.as_deref())?;
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;
    info!(filter = %project_settings.log.filter, "filter reloaded from settings");
    trace!("application trace log");
    debug!(target: "tokenstore", "application debug log");
    info!("application info log");

    let is_err = logger
        .reload_from_config(&LogConfig {
            filter: "tokenstore=[".to_string(),
        })
        .is_err();
    info!("invalid filter rejected: {}", is_err);

    Ok(())
}
