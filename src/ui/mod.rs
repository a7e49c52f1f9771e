//! Terminal presentation: the list widget, the frame renderer and the
//! raw-mode guard.

pub mod list;
mod terminal;
mod view;

pub use terminal::{install_panic_hook, restore, TerminalGuard};
pub use view::{playing_text, render};

/// Columns of blank margin on each side of the frame.
pub const MARGIN_HORIZONTAL: u16 = 2;

/// Rows of blank margin above and below the frame.
pub const MARGIN_VERTICAL: u16 = 1;

/// Total columns taken by the margin.
pub const FRAME_WIDTH: u16 = MARGIN_HORIZONTAL * 2;

/// Total rows taken by the margin.
pub const FRAME_HEIGHT: u16 = MARGIN_VERTICAL * 2;
