use anyhow::{Context, Result};
use clap::Parser;
use ratatui::{backend::TermionBackend, Terminal};
use std::fs::File;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use termion::raw::IntoRawMode;
use termion::screen::IntoAlternateScreen;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use querybuilder::config::Config;
use querybuilder::editor::state::QueryBuilder;
use querybuilder::input::InputHandler;
use querybuilder::query::{KeywordParser, QueryParser};
use querybuilder::theme::{get_builtin_theme, list_builtin_themes};
use querybuilder::ui::UI;

/// querybuilder - An interactive, block-structured query line
#[derive(Parser)]
#[command(name = "querybuilder")]
#[command(version)]
#[command(about = "An interactive query line with nested blocks and completion", long_about = None)]
struct Cli {
    /// Initial query (omit to read it from stdin if piped, or start empty)
    query: Option<String>,

    /// Theme name (overrides the config file)
    #[arg(short, long)]
    theme: Option<String>,

    /// Config file (default: ~/.config/querybuilder/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write diagnostics to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Disable automatic completion while typing
    #[arg(long)]
    no_auto_complete: bool,

    /// Print the built-in theme names and exit
    #[arg(long)]
    list_themes: bool,
}

/// Set up a panic hook that restores the terminal before displaying panic information.
///
/// This ensures that panics are visible even when the terminal is in raw mode with alternate screen.
fn setup_panic_hook() {
    use std::panic;

    // Take the default panic hook so we can call it after restoration
    let default_panic = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        // Use stderr to avoid interfering with stdout pipes
        let _ = write!(io::stderr(), "{}", termion::screen::ToMainScreen);
        let _ = write!(io::stderr(), "{}", termion::cursor::Show);
        let _ = io::stderr().flush();

        default_panic(panic_info);
    }));
}

/// Installs a file logger. The terminal belongs to the UI, so nothing is
/// logged without a log file.
fn setup_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install logger: {}", err))
}

fn main() -> Result<()> {
    setup_panic_hook();

    let cli = Cli::parse();

    if cli.list_themes {
        for name in list_builtin_themes() {
            println!("{}", name);
        }
        return Ok(());
    }

    if let Some(path) = &cli.log_file {
        setup_logging(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.no_auto_complete {
        config.auto_complete = false;
    }

    // Read a piped query BEFORE terminal setup
    let (initial, stdin_was_piped) = match cli.query {
        Some(query) => (query, false),
        None if !io::stdin().is_terminal() => {
            let mut query = String::new();
            io::stdin()
                .read_to_string(&mut query)
                .context("Failed to read query from stdin")?;
            (query.trim_end_matches('\n').to_string(), true)
        }
        None => (String::new(), false),
    };

    let theme = match get_builtin_theme(&config.theme) {
        Some(theme) => theme,
        None => {
            warn!(theme = %config.theme, "unknown theme, using default-dark");
            get_builtin_theme("default-dark").context("Built-in theme missing")?
        }
    };

    let parser = KeywordParser::from_config(&config);
    let mut builder = QueryBuilder::with_config(parser, &config);
    builder.set_text(initial);
    builder.move_end();

    let mut input_handler = if stdin_was_piped {
        InputHandler::new_with_tty()
            .context("Failed to open /dev/tty for keyboard input when stdin was piped")?
    } else {
        InputHandler::new()
    };

    // Setup terminal
    let stdout = io::stdout()
        .into_raw_mode()
        .context("Failed to enable raw mode")?;
    let stdout = stdout
        .into_alternate_screen()
        .context("Failed to enter alternate screen")?;

    let backend = TermionBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let ui = UI::new(theme);
    info!(theme = ui.theme_name(), "query builder started");

    let result = run_event_loop(&mut terminal, &ui, &mut input_handler, &mut builder);

    write!(terminal.backend_mut(), "{}", termion::cursor::Show)?;
    terminal.backend_mut().flush()?;
    drop(terminal);

    // Print the final query on the main screen so it can be piped onwards
    if result.is_ok() {
        println!("{}", builder.text());
    }

    result
}

fn run_event_loop<B: ratatui::backend::Backend, P: QueryParser>(
    terminal: &mut Terminal<B>,
    ui: &UI,
    input_handler: &mut InputHandler,
    builder: &mut QueryBuilder<P>,
) -> Result<()> {
    loop {
        ui.render(terminal, builder)?;

        match input_handler.poll_event()? {
            Some(event) => {
                if input_handler.handle_event(event, builder)? {
                    break;
                }
            }
            None => break,
        }
    }

    Ok(())
}
