//! Text exporter
//!
//! Scrape target for a pull-based collector:
//! - `GET /metrics`: every regular file in the export directory, concatenated
//! - `GET /`: info page
//! - SIGHUP reopens the log file (for external log rotation)

use std::net::SocketAddr;
use std::process::ExitCode;

use clap::Parser;
use textexp_core::error::{Result, TextExpError};
use textexp_core::About;

use textexp_server::{app_state::AppState, config::Cli, obs, router, signal::SignalWatcher};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let about = About::from_build();

    if cli.version {
        println!("{about}");
        return ExitCode::SUCCESS;
    }

    match run(cli, about).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "exiting");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, about: About) -> Result<()> {
    let cfg = cli.resolve()?;

    let sink = if cfg.logging.strict {
        obs::LogSink::open(&cfg.logging.file)?
    } else {
        obs::LogSink::init(&cfg.logging.file)
    };
    obs::init_logging(&sink, cfg.logging.debug)?;
    tracing::info!("BEGIN");
    tracing::info!("{}", about.banner());

    let state = AppState::new(cfg, about.clone())?;

    let (rotation, _rotator) = obs::rotation::spawn(sink, about);
    match SignalWatcher::register() {
        Ok(watcher) => {
            tokio::spawn(watcher.run(rotation));
        }
        Err(e) => tracing::warn!(error = %e, "log rotation on SIGHUP disabled"),
    }

    let listen = state.cfg().server.listen_addr();
    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| TextExpError::Internal(format!("bind {listen} failed: {e}")))?;

    tracing::info!(%listen, export = %state.export().path().display(), "text exporter listening");

    let app = router::build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| TextExpError::Internal(format!("server failed: {e}")))
}
