//! TUI widgets for the apartment console

pub mod details;
pub mod input;
pub mod roster;
pub mod scene;
pub mod transcript;

pub use details::DetailsWidget;
pub use input::InputWidget;
pub use roster::RosterWidget;
pub use scene::ScenePanelWidget;
pub use transcript::TranscriptWidget;
