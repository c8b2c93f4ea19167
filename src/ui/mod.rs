//! Terminal styling shared by the console event sink and report rendering.

pub mod terminal;
pub mod text;
pub mod theme;

pub use terminal::{detect_capabilities, TerminalCapabilities};
pub use text::ColoredText;
