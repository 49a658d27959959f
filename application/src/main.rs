use std::{io, process::ExitCode, sync::OnceLock};

use application::{api, Args, Config, Context};
use service::{
    infra::{http, Http},
    Service,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_thread_names(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start() -> Result<(), ()> {
    let Args { config, command } = Args::parse().unwrap_or_else(|e| e.exit());

    let Config {
        backend,
        service,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let token = backend.token();
    let backend_config = http::Config::try_from(backend).map_err(|e| {
        log::error!("invalid backend base URL: {e}");
    })?;
    let backend = Http::new(backend_config).map_err(|e| {
        log::error!("failed to initialize `Http` backend client: {e}");
    })?;

    let service = Service::new(service.into(), backend);

    let ctx = Context::new(service, token).await.map_err(report)?;
    log::debug!("authenticated: {}", ctx.is_authenticated());

    let table = api::execute(command, &ctx).await.map_err(report)?;
    print!("{table}");
    Ok(())
}

/// Reports the provided [`application::Error`] to the user.
fn report(e: application::Error) {
    if let Some(trace) = &e.backtrace {
        log::debug!("{trace}");
    }
    eprintln!("error {e}\nhint: {}", e.hint());
}
