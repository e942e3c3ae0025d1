use clap::Args;
use gymflow_core::{
    default_catalog, AutomationEngine, Config, Database, StateStore, WebhookRelay,
};

#[derive(Args)]
pub struct RunArgs {
    /// Perform a single tick and exit, printing the tick summary as JSON
    #[arg(long)]
    pub once: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let mut catalog = default_catalog();
    let source = Database::open()?;
    source.apply_plan_overrides(&mut catalog)?;
    let sink = Database::open()?;

    let mut engine = AutomationEngine::new(
        source,
        StateStore::new(catalog),
        config.engine_config(),
    )
    .with_sink(Box::new(sink));

    if let Some(base_url) = &config.relay.base_url {
        engine = engine.with_relay(WebhookRelay::new(base_url.clone())?);
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        if args.once {
            let summary = engine.tick(chrono::Utc::now());
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok::<(), Box<dyn std::error::Error>>(());
        }

        println!(
            "engine running (tick every {}s, Ctrl-C to stop)",
            config.engine.tick_interval_secs
        );
        tokio::select! {
            _ = engine.run() => {}
            _ = tokio::signal::ctrl_c() => {
                engine.stop();
                println!("engine stopped");
            }
        }
        Ok(())
    })?;

    Ok(())
}
