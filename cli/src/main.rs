use capsule_cli::commands::{capsules, chain, cli, create, mine, status};
use capsule_cli::error::{self, exit_code_for_error};
use capsule_core::context::AppContext;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, error::CliError> {
    let args = cli::Args::parse();
    let mut cfg =
        capsule_core::config::load_default().map_err(|e| error::CliError::Config(e.to_string()))?;
    if let Some(base_url) = args.base_url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cfg.api.base_url = base_url.to_string();
    }
    init_tracing(&cfg.logging).map_err(error::CliError::Internal)?;

    tracing::debug!(base_url = %cfg.api.normalized_base_url(), "config loaded");
    let ctx = capsule_plugins::factory::build_context(cfg)
        .map_err(|e| error::CliError::Config(e.to_string()))?;

    dispatch(args, &ctx).await
}

async fn dispatch(args: cli::Args, ctx: &AppContext) -> Result<i32, error::CliError> {
    let format = args.format;
    match args.command {
        cli::Commands::Capsules(a) => capsules::handle_capsules(a, format, ctx).await.map(|_| 0),
        cli::Commands::Chain(a) => chain::handle_chain(a, format, ctx).await.map(|_| 0),
        cli::Commands::Create(a) => create::handle_create(a, format, ctx).await.map(|_| 0),
        cli::Commands::Mine => mine::handle_mine(format, ctx).await,
        cli::Commands::Status => status::handle_status(format, ctx).await.map(|_| 0),
    }
}

/// A bare level applies to the `capsule*` targets only; dependencies stay at
/// `warn`. Anything that already looks like a directive list is used as-is.
fn default_directives(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return "warn".to_string();
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("warn,capsule={level}")
}

fn init_tracing(logging: &capsule_core::config::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(default_directives(&logging.level))
            .map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("capsule-cli"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("capsule-cli.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())
}
