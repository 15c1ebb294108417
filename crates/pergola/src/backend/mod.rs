//! Backend traits.
//!
//! A backend supplies three things: native handles for widgets, a menu
//! surface, and a runtime that owns the platform's event pump. The
//! library drives all three through the traits here, so a test backend
//! can stand in for a real toolkit.

pub mod headless;

use std::fmt::Debug;

use geom::Rect;

use crate::{command::CommandToken, error::Result, key::Shortcut};

/// The native counterpart of a widget. Receives its computed bounds
/// after every layout pass.
pub trait NativeHandle: Debug + Send {
    /// Position and size the native widget.
    fn set_bounds(&mut self, bounds: Rect);
}

/// An opaque backend identifier for a menu container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuId(pub usize);

/// Everything a backend needs to create one menu item.
#[derive(Debug, Clone, Copy)]
pub struct MenuItemSpec<'a> {
    /// Item label.
    pub text: &'a str,
    /// Keyboard shortcut, if the backend supports it.
    pub shortcut: Option<&'a Shortcut>,
    /// Whether the item is enabled.
    pub enabled: bool,
}

/// The native menu surface: a menubar plus optional status indicators.
pub trait MenuBackend {
    /// Remove every menu, submenu, and status indicator.
    fn clear(&mut self);

    /// The root menubar container.
    fn menubar(&mut self) -> MenuId;

    /// Create a submenu under a container.
    fn add_submenu(&mut self, parent: MenuId, text: &str) -> MenuId;

    /// Create a top-level status indicator with its own menu.
    fn add_status_indicator(&mut self, text: &str) -> MenuId;

    /// Append a separator line to a container.
    fn add_separator(&mut self, menu: MenuId);

    /// Append an invokable item to a container. The token is the
    /// backend's only link back to the command.
    fn add_item(&mut self, menu: MenuId, spec: &MenuItemSpec<'_>, token: CommandToken);

    /// Whether the backend can bind this shortcut. Items with
    /// unsupported shortcuts are created without one.
    fn supports_shortcut(&self, _shortcut: &Shortcut) -> bool {
        true
    }
}

/// A platform feature the backend cannot provide. Reported once at
/// startup and logged, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityGap {
    /// Short feature name, e.g. "status indicators".
    pub feature: &'static str,
    /// Human-readable explanation.
    pub detail: String,
}

/// A deferred closure to run on the UI thread.
pub type Task = Box<dyn FnOnce() + Send>;

/// Messages delivered to the UI thread's pump.
pub enum LoopMessage {
    /// Run a closure.
    Task(Task),
    /// The user or the app asked to close; may be vetoed.
    CloseRequest,
    /// Unconditional shutdown.
    Quit,
}

impl Debug for LoopMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopMessage::Task(_) => f.write_str("Task"),
            LoopMessage::CloseRequest => f.write_str("CloseRequest"),
            LoopMessage::Quit => f.write_str("Quit"),
        }
    }
}

/// Whether the runtime should keep pumping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Keep going.
    Continue,
    /// Tear down and return.
    Stop,
}

/// The library side of the event pump. The runtime calls `pump_one`
/// repeatedly until it returns `Stop`.
pub trait LoopClient {
    /// Process one message, blocking until one arrives.
    fn pump_one(&mut self) -> Result<LoopControl>;
}

/// The platform's event loop, owned by the UI thread.
pub trait NativeRuntime: Send {
    /// One-time platform setup. Returns the capability gaps of this
    /// platform, which are logged as warnings.
    fn initialize(&mut self) -> Result<Vec<CapabilityGap>>;

    /// Drive the client until it asks to stop.
    fn run_until_stopped(&mut self, client: &mut dyn LoopClient) -> Result<()>;
}
