mod app;
mod config_commands;
mod jobs_commands;

use std::path::PathBuf;

use {
    anyhow::bail,
    clap::{Parser, Subcommand},
    herald_briefings::{
        Aggregator, BriefingKind, BriefingRuntime, BriefingScheduleConfig, Composer,
        ReconcileStrategy, trigger_handler,
    },
    herald_common::ChannelType,
    herald_config::HeraldConfig,
    herald_cron::CronService,
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "herald", about = "Herald, scheduled briefings for chat platforms")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "HERALD_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule the briefings and deliver them until interrupted (default).
    Run {
        /// Add the new jobs before removing the old ones.
        #[arg(long, default_value_t = false)]
        generational: bool,
    },
    /// Compose and deliver one briefing now.
    Dispatch {
        /// morning, pre-meeting or weekly.
        kind: BriefingKind,
    },
    /// Print the briefing as one channel would receive it, without sending.
    Render {
        channel: ChannelType,
        #[arg(long, default_value = "morning")]
        kind: BriefingKind,
    },
    /// Scheduled job management.
    Jobs {
        #[command(subcommand)]
        action: jobs_commands::JobsAction,
    },
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "herald starting");

    // Config commands load the file themselves so `check` can report on a
    // config that fails to parse.
    let config_path = cli.config.as_deref();
    let load = || app::load_config(config_path);

    match cli.command {
        None => run(&load()?, ReconcileStrategy::default()).await,
        Some(Commands::Run { generational }) => {
            let strategy = if generational {
                ReconcileStrategy::Generational
            } else {
                ReconcileStrategy::ReplaceAll
            };
            run(&load()?, strategy).await
        },
        Some(Commands::Dispatch { kind }) => dispatch(&load()?, kind).await,
        Some(Commands::Render { channel, kind }) => render(&load()?, channel, kind).await,
        Some(Commands::Jobs { action }) => jobs_commands::handle_jobs(action, &load()?).await,
        Some(Commands::Config { action }) => config_commands::handle_config(action, config_path),
    }
}

/// Start the scheduler, reconcile the briefing jobs, and wait for Ctrl-C.
async fn run(config: &HeraldConfig, strategy: ReconcileStrategy) -> anyhow::Result<()> {
    let dispatcher = app::dispatcher(config)?;
    let cron = CronService::new(app::cron_store()?, trigger_handler(dispatcher));
    cron.start().await?;

    let schedule = BriefingScheduleConfig::from(&config.briefings);
    let runtime = BriefingRuntime::start(cron.clone(), &schedule, strategy).await?;
    info!(
        channels = ?config.delivery_channels(),
        "herald running, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    info!("shutting down");

    if let Err(e) = runtime.stop().await {
        warn!(error = %e, "failed to remove briefing jobs");
    }
    cron.stop().await;
    Ok(())
}

async fn dispatch(config: &HeraldConfig, kind: BriefingKind) -> anyhow::Result<()> {
    let report = app::dispatcher(config)?.dispatch(kind).await;

    if let Some(e) = &report.aggregation_error {
        bail!("{kind} briefing was not sent: {e}");
    }
    for (channel, e) in &report.failed {
        eprintln!("  {channel}: {e}");
    }
    eprintln!(
        "{kind} briefing delivered to {}/{} channel(s)",
        report.delivered.len(),
        report.attempted()
    );
    if !report.failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

async fn render(
    config: &HeraldConfig,
    channel: ChannelType,
    kind: BriefingKind,
) -> anyhow::Result<()> {
    let aggregator = Aggregator::new(app::context_source(&config.memory)?);
    let canvas = aggregator.compose(kind).await?;
    let payload = herald_canvas::render(channel, &canvas);
    let body = herald_channels::envelope(channel, &payload)?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
