use clap::Subcommand;
use gymflow_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Update configuration values
    Set {
        /// Seconds between engine ticks (demo default 30; use 300-900 in
        /// production)
        #[arg(long)]
        tick_interval: Option<u64>,
        /// Webhook relay base URL; pass an empty string to disable
        #[arg(long)]
        relay_url: Option<String>,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set {
            tick_interval,
            relay_url,
        } => {
            let mut config = Config::load()?;
            if let Some(secs) = tick_interval {
                config.engine.tick_interval_secs = secs;
            }
            if let Some(url) = relay_url {
                config.relay.base_url = if url.is_empty() { None } else { Some(url) };
            }
            config.save()?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
