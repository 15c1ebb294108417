//! Pergola is a cross-platform GUI abstraction layer: a style-driven
//! layout engine over an arena widget tree, a cross-thread bridge onto
//! the native toolkit's UI loop, and a command list that keeps native
//! menus in sync.

pub mod backend;
pub mod bridge;
pub mod command;
pub mod content;
pub mod error;
pub mod hint;
pub mod key;
pub mod menu;
pub mod style;
pub mod tree;

mod layout;

pub use geom;

// Public exports
pub use bridge::{AppHandle, AppState, Application, Bridge, Dispatcher, LoopState};
pub use command::{Command, CommandList, CommandToken, Entry, Group, Section};
pub use content::{Content, FixedContent, ImageContent};
pub use error::{Error, Result};
pub use hint::{Hint, SizeHint, rehint};
pub use key::{Mods, Shortcut};
pub use style::{AlignItems, Dim, Style};
pub use tree::{Tree, Widget, WidgetId};

// Export commonly used geometry types at the root
pub use geom::{Direction, Inset, Point, Rect, Size};
