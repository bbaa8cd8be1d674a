//! Pixel apartment life simulator.
//!
//! A terminal console on the left, the apartment scene engine on the right.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for scripts:
//!
//! ```bash
//! printf '#ready\nmap\n#wait 500\n' | cargo run -p apartment -- --headless
//! ```

mod app;
mod events;
mod headless;
mod ui;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use apartment_core::{Console, ConsoleConfig, HeadlessConfig};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    headless: bool,
    print_events: bool,
    roster: Option<PathBuf>,
    help: bool,
}

impl Options {
    fn parse(args: &[String]) -> anyhow::Result<Self> {
        let mut options = Self::default();
        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--headless" => options.headless = true,
                "--events" => options.print_events = true,
                "--roster" => {
                    let path = iter
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--roster requires a path"))?;
                    options.roster = Some(PathBuf::from(path));
                }
                "-h" | "--help" => options.help = true,
                other => anyhow::bail!("unknown argument: {other}"),
            }
        }
        Ok(options)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    let options = Options::parse(&args)?;

    if options.help {
        print_help();
        return Ok(());
    }

    init_tracing(options.headless)?;

    let mut config = ConsoleConfig::from_env()?;
    if let Some(path) = options.roster {
        config = config.with_roster(path);
    }

    if options.headless {
        let config = HeadlessConfig::new().with_console(config);
        return headless::run_headless(config, options.print_events).await;
    }

    let mut console = Console::new(config)?;
    console.mount()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(console);
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    app.console.unmount();

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Logs go to stderr in headless mode. The TUI owns the terminal, so there
/// they go to the file named by `APARTMENT_LOG`, or nowhere.
fn init_tracing(headless: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else if let Ok(path) = std::env::var("APARTMENT_LOG") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        let size = terminal.size()?;
        app.set_viewport(ratatui::layout::Rect::new(0, 0, size.width, size.height));

        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout for animations
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(app, ev) == EventResult::Quit {
                return Ok(());
            }
        } else {
            app.tick();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("像素公寓生活模拟器 - pixel apartment life simulator");
    println!();
    println!("USAGE:");
    println!("  apartment [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help         Show this help message");
    println!("  --headless         Run in headless mode (text-only, no TUI)");
    println!("  --events           With --headless, print engine events to stderr as JSON");
    println!("  --roster <PATH>    Load residents from a JSON file");
    println!();
    println!("ENVIRONMENT:");
    println!("  APARTMENT_ROSTER      Roster file (overridden by --roster)");
    println!("  APARTMENT_LOG         Log file for TUI mode");
    println!("  RUST_LOG              Log filter (default: warn)");
    println!();
    println!("CONSOLE COMMANDS:");
    println!("  help, list, clear, view <name>, map, tint <#rrggbb>, <anything else>");
    println!();
    println!("EXAMPLES:");
    println!("  apartment                                  # Interactive TUI mode");
    println!("  apartment --headless --events < script.txt");
}
