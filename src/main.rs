//! `stream-pedal` binary: the terminal front end over the system's audio
//! devices.

use std::fs::File;
use std::io;
use std::process::ExitCode;
use std::sync::Mutex;

use crossterm::event::EventStream;
use futures::StreamExt;
use stream_pedal::{dispatch, ui, AudioController, Catalog, CpalEngine, Flow, Session, UiEvent};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "stream-pedal.log";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();

    let controller = AudioController::new(CpalEngine::new());
    let catalog = match Catalog::load(controller.engine()) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!("{}", err);
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(catalog);
    let result = run(&mut session, &controller).await;
    session.teardown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Terminal error: {}", err);
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to a file, and only when `RUST_LOG` is set: the UI owns the
/// terminal.
fn init_tracing() {
    let Ok(filter) = EnvFilter::try_from_default_env() else {
        return;
    };
    let path = std::env::temp_dir().join(LOG_FILE);
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cannot open log file {}: {err}", path.display());
            return;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

async fn run(session: &mut Session, controller: &AudioController) -> io::Result<()> {
    ui::install_panic_hook();
    let mut terminal = ui::TerminalGuard::enter()?;

    let (width, height) = crossterm::terminal::size()?;
    session.resize(width, height);

    let mut events = EventStream::new();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        terminal.draw(session)?;

        tokio::select! {
            () = &mut shutdown => {
                tracing::info!("shutdown signal received");
                session.teardown();
                return Ok(());
            }
            event = events.next() => {
                let Some(event) = event else {
                    // Input closed
                    session.teardown();
                    return Ok(());
                };
                let Some(event) = UiEvent::from_terminal(event?) else {
                    continue;
                };
                if dispatch(session, controller, event) == Flow::Exit {
                    return Ok(());
                }
            }
        }
    }
}

/// Resolves on SIGINT, SIGTERM or SIGHUP. Stays pending if the handlers
/// cannot be installed.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (Ok(mut term), Ok(mut hup)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::hangup()),
        ) else {
            tracing::warn!("cannot install signal handlers");
            return std::future::pending().await;
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
            _ = hup.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
