//! Console command classification.
//!
//! The router is a total function from a raw input line to a [`Command`].
//! It never executes anything: built-in commands are resolved by the
//! session store, everything else is handed to the scene engine verbatim.

/// A classified console input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Empty or whitespace-only input. Never routed.
    Empty,
    /// `help` - list the available commands.
    Help,
    /// `list` - list every resident.
    List,
    /// `clear` - wipe the transcript.
    Clear,
    /// `view <name>` - select a resident by display name.
    View(String),
    /// Anything else, forwarded to the active scene untouched.
    Passthrough(String),
}

/// Prefix that introduces a `view` command (matched case-insensitively).
const VIEW_PREFIX: &str = "view ";

impl Command {
    /// Classify a raw input line.
    ///
    /// Keywords are case-insensitive and matched against the input with
    /// surrounding whitespace removed. There is no fuzzy matching: `vie cat`
    /// is a passthrough, not an error.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }

        if trimmed.eq_ignore_ascii_case("help") {
            return Command::Help;
        }
        if trimmed.eq_ignore_ascii_case("list") {
            return Command::List;
        }
        if trimmed.eq_ignore_ascii_case("clear") {
            return Command::Clear;
        }

        if let Some(name) = strip_prefix_ignore_case(trimmed, VIEW_PREFIX) {
            let name = name.trim();
            if !name.is_empty() {
                return Command::View(name.to_string());
            }
        }

        Command::Passthrough(raw.to_string())
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    // `prefix` is ASCII, so a non-ASCII head never compares equal.
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        text.get(prefix.len()..)
    } else {
        None
    }
}
