//! UI module for the apartment TUI

pub mod layout;
pub mod render;
pub mod theme;
pub mod widgets;
