use std::{
    io::{self, Write},
    panic,
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::Show,
    event::DisableMouseCapture,
    execute,
    style::ResetColor,
    terminal::{LeaveAlternateScreen, disable_raw_mode},
};
use tuirealm::{
    PollStrategy,
    terminal::{CrosstermTerminalAdapter, TerminalBridge},
};

use cyber_tasker::{
    app::App,
    cli::{self, RootCommand},
    logging::{init_logging, print_log_location},
    realm::{RootId, apply_message, init_application, should_quit},
    settings::Settings,
    theme::ThemePreset,
};

#[derive(Parser, Debug)]
#[command(
    name = "cyber-tasker",
    about = "Neon terminal kanban board with AI goal decomposition",
    version = env!("CYBER_TASKER_BUILD_VERSION"),
    author
)]
struct Cli {
    /// Theme preset: cyber, light, or mono
    #[arg(long, value_name = "PRESET")]
    theme: Option<String>,

    /// Read and write the task snapshot at this path instead of the default
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Emit machine-readable JSON from CLI subcommands
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<RootCommand>,
}

enum RunOutcome {
    Continue,
    Exit(i32),
}

static TERMINAL_RESTORED: AtomicBool = AtomicBool::new(false);

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = match init_logging() {
        Ok(path) => Some(path),
        Err(err) => {
            eprintln!("warning: failed to initialize logging: {err}");
            None
        }
    };
    if let Some(path) = log_path.as_ref() {
        install_panic_hook_with_log(path.clone());
    }

    match run_app() {
        Ok(RunOutcome::Continue) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Ok(())
        }
        Ok(RunOutcome::Exit(code)) => {
            std::process::exit(code);
        }
        Err(err) => {
            if let Some(path) = log_path.as_ref() {
                print_log_location(path);
            }
            Err(err)
        }
    }
}

fn run_app() -> Result<RunOutcome> {
    let cli = Cli::parse();

    if let Some(command) = cli.command {
        let settings = Settings::load();
        let code = cli::run(command, &settings, cli.json);
        return Ok(RunOutcome::Exit(code));
    }

    let _guard = TerminalGuard;
    let mut terminal = setup_terminal()?;

    let cli_theme_override = cli
        .theme
        .as_deref()
        .and_then(|value| ThemePreset::from_str(value).ok());
    let app = Arc::new(Mutex::new(App::new(cli.store, cli_theme_override)?));
    let mut realm = init_application(Arc::clone(&app))?;

    let mut redraw = true;
    while !should_quit(&app)? {
        if redraw {
            terminal
                .draw(|frame| realm.view(&RootId::Root, frame, frame.area()))
                .context("failed to render frame")?;
            redraw = false;
        }

        let messages = realm
            .tick(PollStrategy::Once)
            .context("failed to process tui-realm tick")?;

        if !messages.is_empty() {
            redraw = true;
        }

        for message in messages {
            apply_message(&app, message)?;
        }
    }

    let _ = terminal.disable_raw_mode();
    let _ = terminal.leave_alternate_screen();
    let _ = terminal.clear_screen();
    TERMINAL_RESTORED.store(true, Ordering::SeqCst);

    Ok(RunOutcome::Continue)
}

fn setup_terminal() -> Result<TerminalBridge<CrosstermTerminalAdapter>> {
    TERMINAL_RESTORED.store(false, Ordering::SeqCst);

    let mut terminal =
        TerminalBridge::new_crossterm().context("failed to initialize terminal bridge")?;

    terminal
        .enable_raw_mode()
        .context("failed to enable raw mode")?;
    terminal
        .enter_alternate_screen()
        .context("failed to enter alternate screen")?;

    Ok(terminal)
}

fn install_panic_hook_with_log(log_path: std::path::PathBuf) {
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        eprintln!();
        eprintln!("═══════════════════════════════════════════════════════════════");
        eprintln!("  📝 Log file: {}", log_path.display());
        eprintln!("═══════════════════════════════════════════════════════════════");
        eprintln!();
        previous_hook(panic_info);
    }));
}

fn restore_terminal() -> Result<()> {
    if TERMINAL_RESTORED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let _ = disable_raw_mode();

    let mut stderr = io::stderr();
    let _ = execute!(
        stderr,
        LeaveAlternateScreen,
        DisableMouseCapture,
        Show,
        ResetColor
    );
    let _ = stderr.write_all(
        b"\x1b[?1049l\x1b[?1000l\x1b[?1002l\x1b[?1003l\x1b[?1004l\x1b[?1006l\x1b[?1015l\x1b[?2004l\x1b[?7h\x1b[?25h\x1b[0m\x1b[2J\x1b[H",
    );
    let _ = stderr.flush();

    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}
