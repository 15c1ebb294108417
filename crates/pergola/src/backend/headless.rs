//! A headless backend.
//!
//! Implements the backend traits with no platform underneath: the
//! runtime just pumps the client's queue on the current thread, menus
//! are recorded into an inspectable model, and native handles store the
//! bounds they were last given. This is the backend the test suite runs
//! against.

use std::sync::{Arc, Mutex};

use geom::Rect;

use crate::{
    backend::{
        CapabilityGap, LoopClient, LoopControl, MenuBackend, MenuId, MenuItemSpec, NativeHandle,
        NativeRuntime,
    },
    command::CommandToken,
    error::Result,
    key::Shortcut,
};

/// A runtime with no platform: `run_until_stopped` simply pumps the
/// client until it stops.
#[derive(Debug, Default)]
pub struct HeadlessRuntime {
    gaps: Vec<CapabilityGap>,
}

impl HeadlessRuntime {
    /// A runtime with no capability gaps.
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime that reports the given gaps at initialization.
    pub fn with_gaps(gaps: Vec<CapabilityGap>) -> Self {
        Self { gaps }
    }
}

impl NativeRuntime for HeadlessRuntime {
    fn initialize(&mut self) -> Result<Vec<CapabilityGap>> {
        Ok(std::mem::take(&mut self.gaps))
    }

    fn run_until_stopped(&mut self, client: &mut dyn LoopClient) -> Result<()> {
        while client.pump_one()? == LoopControl::Continue {}
        Ok(())
    }
}

/// What kind of container a recorded menu is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// The root menubar.
    MenuBar,
    /// A submenu under another container.
    Submenu,
    /// A top-level status indicator.
    StatusIndicator,
}

/// A recorded menu item.
#[derive(Debug, Clone)]
pub struct RecordedItem {
    /// Item label.
    pub text: String,
    /// Bound shortcut, if any.
    pub shortcut: Option<Shortcut>,
    /// Enabled flag.
    pub enabled: bool,
    /// The command token the item would fire.
    pub token: CommandToken,
}

impl PartialEq for RecordedItem {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.shortcut == other.shortcut
            && self.enabled == other.enabled
            && self.token.target_addr() == other.token.target_addr()
    }
}

/// One entry in a recorded container.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedEntry {
    /// A separator line.
    Separator,
    /// An invokable item.
    Item(RecordedItem),
}

/// A recorded menu container.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// The container's id.
    pub id: MenuId,
    /// Parent container, if any.
    pub parent: Option<MenuId>,
    /// Container title. Empty for the menubar.
    pub text: String,
    /// What the container is.
    pub kind: ContainerKind,
    /// Entries in creation order.
    pub entries: Vec<RecordedEntry>,
}

#[derive(Debug, Default)]
struct MenuModel {
    containers: Vec<Container>,
    next_id: usize,
}

impl MenuModel {
    fn alloc(&mut self, parent: Option<MenuId>, text: String, kind: ContainerKind) -> MenuId {
        let id = MenuId(self.next_id);
        self.next_id += 1;
        self.containers.push(Container {
            id,
            parent,
            text,
            kind,
            entries: Vec::new(),
        });
        id
    }

    fn container_mut(&mut self, id: MenuId) -> Option<&mut Container> {
        self.containers.iter_mut().find(|c| c.id == id)
    }
}

/// A menu backend that records everything it is told to build.
#[derive(Debug, Default)]
pub struct HeadlessMenus {
    model: Arc<Mutex<MenuModel>>,
    reject_shortcuts: bool,
}

impl HeadlessMenus {
    /// An empty menu surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that reports every shortcut as unsupported.
    pub fn rejecting_shortcuts() -> Self {
        Self {
            model: Arc::default(),
            reject_shortcuts: true,
        }
    }

    /// A handle for inspecting the recorded model after the backend has
    /// been moved elsewhere.
    pub fn inspector(&self) -> MenuInspector {
        MenuInspector {
            model: self.model.clone(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MenuModel> {
        // Mutex poisoning cannot happen here: no recording path panics.
        match self.model.lock() {
            Ok(g) => g,
            Err(e) => e.into_inner(),
        }
    }
}

impl MenuBackend for HeadlessMenus {
    fn clear(&mut self) {
        let mut m = self.lock();
        m.containers.clear();
        m.next_id = 0;
    }

    fn menubar(&mut self) -> MenuId {
        let mut m = self.lock();
        if let Some(bar) = m.containers.iter().find(|c| c.kind == ContainerKind::MenuBar) {
            return bar.id;
        }
        m.alloc(None, String::new(), ContainerKind::MenuBar)
    }

    fn add_submenu(&mut self, parent: MenuId, text: &str) -> MenuId {
        self.lock()
            .alloc(Some(parent), text.to_string(), ContainerKind::Submenu)
    }

    fn add_status_indicator(&mut self, text: &str) -> MenuId {
        self.lock()
            .alloc(None, text.to_string(), ContainerKind::StatusIndicator)
    }

    fn add_separator(&mut self, menu: MenuId) {
        if let Some(c) = self.lock().container_mut(menu) {
            c.entries.push(RecordedEntry::Separator);
        }
    }

    fn add_item(&mut self, menu: MenuId, spec: &MenuItemSpec<'_>, token: CommandToken) {
        if let Some(c) = self.lock().container_mut(menu) {
            c.entries.push(RecordedEntry::Item(RecordedItem {
                text: spec.text.to_string(),
                shortcut: spec.shortcut.copied(),
                enabled: spec.enabled,
                token,
            }));
        }
    }

    fn supports_shortcut(&self, _shortcut: &Shortcut) -> bool {
        !self.reject_shortcuts
    }
}

/// Read-only access to a `HeadlessMenus` model, cloneable across
/// threads.
#[derive(Debug, Clone)]
pub struct MenuInspector {
    model: Arc<Mutex<MenuModel>>,
}

impl MenuInspector {
    /// A copy of every recorded container.
    pub fn snapshot(&self) -> Vec<Container> {
        match self.model.lock() {
            Ok(g) => g.containers.clone(),
            Err(e) => e.into_inner().containers.clone(),
        }
    }

    /// The container with the given title, if recorded.
    pub fn container(&self, text: &str) -> Option<Container> {
        self.snapshot().into_iter().find(|c| c.text == text)
    }
}

/// A native handle that remembers the bounds it was last given.
#[derive(Debug, Default)]
pub struct HeadlessHandle {
    bounds: Arc<Mutex<Option<Rect>>>,
}

impl HeadlessHandle {
    /// A handle with no bounds yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the last bounds set on this handle.
    pub fn bounds(&self) -> Arc<Mutex<Option<Rect>>> {
        self.bounds.clone()
    }
}

impl NativeHandle for HeadlessHandle {
    fn set_bounds(&mut self, bounds: Rect) {
        if let Ok(mut b) = self.bounds.lock() {
            *b = Some(bounds);
        }
    }
}
