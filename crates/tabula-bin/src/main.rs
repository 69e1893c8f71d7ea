//! tabula entrypoint.
use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_terminal::{CrosstermScreen, Screen};
use core_text::Point;
use tabula::App;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "tabula.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "tabula", version, about = "tabula editor")]
struct Args {
    /// File to open at startup. A missing file is created on first save.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `tabula.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    let args = Args::parse();
    info!(target: "runtime", path = ?args.path, config = ?args.config, "startup");

    let config = load_from(args.config)?;
    let mut ctx = config.apply(Point::origin());
    let mut screen = CrosstermScreen::enter(ctx.palette.clone())?;
    screen.guard_mut().set_title("tabula")?;
    ctx.terminal = screen.size();

    let mut app = App::new(screen, ctx)?;
    if let Some(path) = args.path.as_deref() {
        app.open_file(path);
    }
    let result = app.run();
    info!(target: "runtime", ok = result.is_ok(), "shutdown");
    result
}
