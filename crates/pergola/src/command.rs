//! Commands and the ordered command list.
//!
//! A `Command` is an invokable action with a menu position: a group (the
//! submenu path), a section within the group, and insertion order within
//! the section. Backends never hold the command itself; they hold a
//! `CommandToken`, a weak reference that goes inert when the command is
//! dropped, so a stale native menu item can never fire a dead action.

use std::{
    ops::{Deref, DerefMut},
    sync::{Arc, Mutex, Weak},
};

use crate::{
    error::{Error, Result},
    key::Shortcut,
};

/// A command's position in the menu hierarchy.
///
/// The path is the chain of submenu titles from the menubar down; an
/// empty path is the menubar itself. Groups order by path, so commands
/// sharing a prefix cluster together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Group {
    /// Submenu titles from the menubar down.
    pub path: Vec<String>,
    /// True if this group renders as a status indicator rather than a
    /// menubar entry.
    pub status_item: bool,
}

impl Group {
    /// A top-level menubar group.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            path: vec![title.into()],
            status_item: false,
        }
    }

    /// A nested group under this one.
    pub fn child(&self, title: impl Into<String>) -> Self {
        let mut path = self.path.clone();
        path.push(title.into());
        Self {
            path,
            status_item: self.status_item,
        }
    }

    /// A top-level status indicator group.
    pub fn status_indicator(title: impl Into<String>) -> Self {
        Self {
            path: vec![title.into()],
            status_item: true,
        }
    }
}

/// A section index within a group. Sections order numerically; ties are
/// broken by insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Section(pub usize);

impl Section {
    /// The default section.
    pub const FIRST: Section = Section(0);
    /// A sentinel that sorts after every other section. Used to pin
    /// standard items like Exit to the bottom of their group.
    pub const LAST: Section = Section(usize::MAX);
}

/// The shared, invokable core of a command.
struct CommandState {
    action: Mutex<Option<ActionFn>>,
}

type ActionFn = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

impl std::fmt::Debug for CommandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandState").finish_non_exhaustive()
    }
}

impl CommandState {
    fn invoke(&self) -> Result<()> {
        let mut guard = self
            .action
            .lock()
            .map_err(|_| Error::Command("command action poisoned".into()))?;
        match guard.as_mut() {
            Some(f) => f().map_err(Error::Action),
            None => Ok(()),
        }
    }
}

/// An invokable menu command.
#[derive(Debug)]
pub struct Command {
    /// Menu item label.
    pub text: String,
    /// Menu position.
    pub group: Group,
    /// Section within the group.
    pub section: Section,
    /// Optional keyboard shortcut.
    pub shortcut: Option<Shortcut>,
    /// Whether the native item should be enabled.
    pub enabled: bool,
    state: Arc<CommandState>,
}

impl Command {
    /// Create a command with a label, position, and action.
    pub fn new<F>(text: impl Into<String>, group: Group, action: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            text: text.into(),
            group,
            section: Section::FIRST,
            shortcut: None,
            enabled: true,
            state: Arc::new(CommandState {
                action: Mutex::new(Some(Box::new(action))),
            }),
        }
    }

    /// Set the section.
    pub fn section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    /// Set the keyboard shortcut.
    pub fn shortcut(mut self, shortcut: Shortcut) -> Self {
        self.shortcut = Some(shortcut);
        self
    }

    /// Set the enabled flag.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Run the command's action directly.
    pub fn invoke(&self) -> Result<()> {
        self.state.invoke()
    }

    /// A weak token for handing to a backend.
    pub fn token(&self) -> CommandToken {
        CommandToken {
            state: Arc::downgrade(&self.state),
        }
    }
}

/// A weak handle to a command, safe to hold in native menu items.
#[derive(Debug, Clone)]
pub struct CommandToken {
    state: Weak<CommandState>,
}

impl CommandToken {
    /// True if the command is still alive.
    pub fn is_valid(&self) -> bool {
        self.state.strong_count() > 0
    }

    /// Invoke the command if it is still alive. Returns false, without
    /// error, when the command has been dropped.
    pub fn invoke(&self) -> Result<bool> {
        match self.state.upgrade() {
            Some(state) => {
                state.invoke()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The address of the underlying command state. Two tokens for the
    /// same command compare equal on this even after the command dies.
    pub fn target_addr(&self) -> usize {
        self.state.as_ptr() as usize
    }
}

/// One entry in a command list.
#[derive(Debug)]
pub enum Entry {
    /// An invokable item.
    Command(Command),
    /// A separator line at a position in the hierarchy.
    Separator {
        /// The group the separator belongs to.
        group: Group,
        /// The section the separator closes.
        section: Section,
    },
}

impl Entry {
    fn group(&self) -> &Group {
        match self {
            Entry::Command(c) => &c.group,
            Entry::Separator { group, .. } => group,
        }
    }

    fn section(&self) -> Section {
        match self {
            Entry::Command(c) => c.section,
            Entry::Separator { section, .. } => *section,
        }
    }
}

type ChangeListener = Box<dyn FnMut() + Send>;

/// The application's commands, with change notification and batching.
///
/// Every mutation notifies the registered listener so the native menus
/// can be rebuilt. `suspend_updates` batches a burst of mutations into a
/// single notification when the guard drops.
#[derive(Default)]
pub struct CommandList {
    entries: Vec<Entry>,
    listener: Option<ChangeListener>,
    suspend_depth: usize,
    dirty: bool,
}

impl std::fmt::Debug for CommandList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandList")
            .field("entries", &self.entries)
            .field("suspend_depth", &self.suspend_depth)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl CommandList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the change listener, replacing any previous one.
    pub fn set_listener<F>(&mut self, f: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.listener = Some(Box::new(f));
    }

    fn changed(&mut self) {
        if self.suspend_depth > 0 {
            self.dirty = true;
        } else if let Some(listener) = self.listener.as_mut() {
            listener();
        }
    }

    /// Add a command.
    pub fn add(&mut self, command: Command) {
        self.entries.push(Entry::Command(command));
        self.changed();
    }

    /// Add a separator.
    pub fn add_separator(&mut self, group: Group, section: Section) {
        self.entries.push(Entry::Separator { group, section });
        self.changed();
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.changed();
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in menu order: by group path, then section, preserving
    /// insertion order within a section.
    pub fn ordered(&self) -> Vec<&Entry> {
        let mut out: Vec<&Entry> = self.entries.iter().collect();
        out.sort_by(|a, b| {
            a.group()
                .cmp(b.group())
                .then(a.section().cmp(&b.section()))
        });
        out
    }

    /// Suspend change notification until the guard drops. Nesting is
    /// fine; the listener fires once when the outermost guard drops, and
    /// only if something actually changed.
    pub fn suspend_updates(&mut self) -> UpdateGuard<'_> {
        self.begin_update();
        UpdateGuard { list: self }
    }

    /// Suspend change notification without a guard. Every call must be
    /// paired with `end_update`; prefer `suspend_updates` where the
    /// batch stays in one scope.
    pub fn begin_update(&mut self) {
        self.suspend_depth += 1;
    }

    /// Close a batch opened with `begin_update`, firing the listener if
    /// anything changed and this was the outermost batch.
    pub fn end_update(&mut self) {
        self.suspend_depth = self.suspend_depth.saturating_sub(1);
        if self.suspend_depth == 0 && self.dirty {
            self.dirty = false;
            self.changed();
        }
    }
}

/// RAII guard for a batch of command list mutations.
#[derive(Debug)]
pub struct UpdateGuard<'a> {
    list: &'a mut CommandList,
}

impl Deref for UpdateGuard<'_> {
    type Target = CommandList;

    fn deref(&self) -> &CommandList {
        self.list
    }
}

impl DerefMut for UpdateGuard<'_> {
    fn deref_mut(&mut self) -> &mut CommandList {
        self.list
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.list.end_update();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn noop() -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn invoke_runs_action() -> Result<()> {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let cmd = Command::new("Open", Group::new("File"), move || {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        cmd.invoke()?;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn token_outlives_command_safely() -> Result<()> {
        let cmd = Command::new("Open", Group::new("File"), noop);
        let token = cmd.token();
        assert!(token.is_valid());
        assert!(token.invoke()?);

        drop(cmd);
        assert!(!token.is_valid());
        assert!(!token.invoke()?);
        Ok(())
    }

    #[test]
    fn token_addr_is_structural_identity() {
        let a = Command::new("Open", Group::new("File"), noop);
        let b = Command::new("Open", Group::new("File"), noop);
        assert_eq!(a.token().target_addr(), a.token().target_addr());
        assert_ne!(a.token().target_addr(), b.token().target_addr());
    }

    #[test]
    fn action_error_propagates() {
        let cmd = Command::new("Fail", Group::new("File"), || {
            Err(anyhow::anyhow!("boom"))
        });
        assert!(matches!(cmd.invoke(), Err(Error::Action(_))));
    }

    #[test]
    fn ordered_sorts_by_group_then_section() {
        let mut list = CommandList::new();
        list.add(Command::new("Exit", Group::new("File"), noop).section(Section::LAST));
        list.add(Command::new("About", Group::new("Help"), noop));
        list.add(Command::new("Open", Group::new("File"), noop));
        list.add(Command::new("Save", Group::new("File"), noop));

        let texts: Vec<&str> = list
            .ordered()
            .iter()
            .filter_map(|e| match e {
                Entry::Command(c) => Some(c.text.as_str()),
                Entry::Separator { .. } => None,
            })
            .collect();
        // Insertion order holds within a section; the LAST sentinel pins
        // Exit to the bottom of File.
        assert_eq!(texts, vec!["Open", "Save", "Exit", "About"]);
    }

    #[test]
    fn listener_fires_per_mutation() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let mut list = CommandList::new();
        list.set_listener(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        list.add(Command::new("A", Group::new("File"), noop));
        list.add(Command::new("B", Group::new("File"), noop));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn suspend_coalesces_notifications() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let mut list = CommandList::new();
        list.set_listener(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        {
            let mut batch = list.suspend_updates();
            batch.add(Command::new("A", Group::new("File"), noop));
            batch.add(Command::new("B", Group::new("File"), noop));
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_batch_stays_silent() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let mut list = CommandList::new();
        list.set_listener(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        {
            let _batch = list.suspend_updates();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn nested_batches_fire_once() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let mut list = CommandList::new();
        list.set_listener(move || {
            h.fetch_add(1, Ordering::SeqCst);
        });
        {
            let mut outer = list.suspend_updates();
            outer.add(Command::new("A", Group::new("File"), noop));
            {
                let mut inner = outer.suspend_updates();
                inner.add(Command::new("B", Group::new("File"), noop));
            }
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
