//! Pixel apartment life simulator core.
//!
//! This crate provides:
//! - A command console over a fixed cast of apartment residents
//! - A real-time scene engine running on its own thread
//! - A message-passing bridge between the two: commands go in through
//!   [`SceneHost`], [`EventEnvelope`]s come back through an [`EventSink`]
//! - A headless driver for scripts and tests
//!
//! # Quick Start
//!
//! ```ignore
//! use apartment_core::{Console, ConsoleConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut console = Console::new(ConsoleConfig::from_env()?)?;
//!     console.mount()?;
//!
//!     console.submit("list");
//!     console.pump();
//!     for line in console.transcript() {
//!         println!("{line}");
//!     }
//!
//!     console.unmount();
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod event;
pub mod headless;
pub mod host;
pub mod roster;
pub mod session;
pub mod testing;

// Primary public API
pub use command::Command;
pub use config::{ConsoleConfig, EngineConfig};
pub use console::Console;
pub use engine::EngineHandle;
pub use error::{ConfigError, ConsoleError, EngineError, RosterError};
pub use event::{event_channel, EventEnvelope, EventKind, EventSink, EventStream};
pub use headless::{HeadlessConfig, HeadlessConsole};
pub use host::{MountOutcome, SceneHost};
pub use roster::{Character, CharacterId, Roster, DEFAULT_ROSTER};
pub use session::{SceneStatus, SessionStore};
pub use testing::TestHarness;
