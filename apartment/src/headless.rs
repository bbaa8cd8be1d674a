//! Headless mode for the apartment console.
//!
//! A line-oriented interface for scripts and automated testing. Console
//! commands are read from stdin, transcript lines are written to stdout
//! as they appear.

use std::time::Duration;

use apartment_core::{CharacterId, EventEnvelope, HeadlessConfig, HeadlessConsole, SceneStatus};
use tokio::io::{AsyncBufReadExt, BufReader};

const DIRECTIVES: [&str; 7] = [
    "  #quit         - Exit",
    "  #ready        - Wait until the scene accepts commands",
    "  #wait <ms>    - Print engine output for a while",
    "  #click <x> <y> - Press the pointer at scene coordinates",
    "  #select <id>  - Select a resident by id",
    "  #status       - Show scene and selection status",
    "  #help         - Show this help",
];

enum Flow {
    Continue,
    Quit,
}

/// Run the console in headless mode.
///
/// Lines starting with `#` are directives; every other line is submitted to
/// the console. With `print_events`, each engine envelope is also written
/// to stderr as JSON.
pub async fn run_headless(config: HeadlessConfig, print_events: bool) -> anyhow::Result<()> {
    let mut game = HeadlessConsole::new(config).await?;

    println!("=== 像素公寓 Headless Mode ===");
    println!("Directives:");
    for line in DIRECTIVES {
        println!("{line}");
    }
    println!();
    flush(&mut game, print_events)?;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else {
                    // Let in-flight replies land before exiting.
                    game.settle(Duration::from_millis(200)).await;
                    flush(&mut game, print_events)?;
                    break;
                };
                if let Some(directive) = line.trim_start().strip_prefix('#') {
                    if let Flow::Quit = run_directive(&mut game, directive).await {
                        break;
                    }
                } else {
                    print_lines(&game.enter(&line));
                }
            }
            envelope = game.next_event() => {
                if envelope.is_none() {
                    println!("[ERROR] Scene engine stopped");
                    break;
                }
            }
        }
        flush(&mut game, print_events)?;
    }

    game.shutdown();
    Ok(())
}

async fn run_directive(game: &mut HeadlessConsole, directive: &str) -> Flow {
    let parts: Vec<&str> = directive.split_whitespace().collect();
    match parts.as_slice() {
        ["quit"] | ["exit"] => {
            println!("Goodbye!");
            return Flow::Quit;
        }
        ["ready"] => {
            if game.wait_until_active().await {
                println!("[READY]");
            } else {
                println!("[ERROR] Scene did not become ready");
            }
        }
        ["wait", ms] => match ms.parse::<u64>() {
            Ok(ms) => print_lines(&game.wait(Duration::from_millis(ms)).await),
            Err(_) => println!("[ERROR] Usage: #wait <ms>"),
        },
        ["click", x, y] => match (x.parse::<f32>(), y.parse::<f32>()) {
            (Ok(x), Ok(y)) => print_lines(&game.click(x, y).await),
            _ => println!("[ERROR] Usage: #click <x> <y>"),
        },
        ["select", id] => match id.parse::<u32>() {
            Ok(id) => print_lines(&game.select(CharacterId(id)).await),
            Err(_) => println!("[ERROR] Usage: #select <id>"),
        },
        ["status"] => print_status(game),
        ["help"] => {
            println!("[HELP]");
            for line in DIRECTIVES {
                println!("{line}");
            }
            println!("  (anything else is submitted as a console command)");
        }
        _ => println!("[ERROR] Unknown directive. Type #help for help."),
    }
    Flow::Continue
}

fn print_status(game: &HeadlessConsole) {
    let store = game.console().store();
    let scene = match store.scene_status() {
        SceneStatus::Unmounted => "unmounted".to_string(),
        SceneStatus::Loading(percent) => format!("loading {percent}%"),
        SceneStatus::Loaded => "loaded".to_string(),
    };
    println!("[STATUS]");
    println!("  Scene: {scene}");
    println!("  Active: {}", game.is_active());
    println!(
        "  Selected: {}",
        store.selection().map(|c| c.name.as_str()).unwrap_or("-")
    );
    println!("  Residents: {}", store.roster().len());
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("> {line}");
    }
}

/// Print transcript lines and envelopes that have not been shown yet.
fn flush(game: &mut HeadlessConsole, print_events: bool) -> anyhow::Result<()> {
    print_lines(&game.take_new_lines());
    let events = game.take_events();
    if print_events {
        for envelope in &events {
            print_event(envelope)?;
        }
    }
    Ok(())
}

fn print_event(envelope: &EventEnvelope) -> anyhow::Result<()> {
    eprintln!("{}", serde_json::to_string(envelope)?);
    Ok(())
}
