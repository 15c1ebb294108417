//! Menu synchronization.
//!
//! `rebuild` projects a `CommandList` onto a `MenuBackend` as a full
//! replace: clear everything, then recreate containers and items in
//! list order. Full replacement keeps the backend trivially consistent
//! with the list, and makes rebuild idempotent for an unchanged list.

use std::collections::HashMap;

use tracing::warn;

use crate::{
    backend::{MenuBackend, MenuId, MenuItemSpec},
    command::{CommandList, Entry, Group},
    error::Result,
};

fn container_for(
    group: &Group,
    backend: &mut dyn MenuBackend,
    cache: &mut HashMap<Group, MenuId>,
) -> MenuId {
    if let Some(id) = cache.get(group) {
        return *id;
    }
    let id = match group.path.split_last() {
        None => backend.menubar(),
        Some((title, rest)) => {
            if rest.is_empty() && group.status_item {
                backend.add_status_indicator(title)
            } else {
                let parent_group = Group {
                    path: rest.to_vec(),
                    status_item: group.status_item,
                };
                let parent = container_for(&parent_group, backend, cache);
                backend.add_submenu(parent, title)
            }
        }
    };
    cache.insert(group.clone(), id);
    id
}

/// Rebuild the backend's menus from the list.
pub fn rebuild(list: &CommandList, backend: &mut dyn MenuBackend) -> Result<()> {
    backend.clear();
    let mut cache: HashMap<Group, MenuId> = HashMap::new();
    for entry in list.ordered() {
        match entry {
            Entry::Separator { group, .. } => {
                let menu = container_for(group, backend, &mut cache);
                backend.add_separator(menu);
            }
            Entry::Command(cmd) => {
                let menu = container_for(&cmd.group, backend, &mut cache);
                let shortcut = match cmd.shortcut.as_ref() {
                    Some(s) if !backend.supports_shortcut(s) => {
                        warn!(command = %cmd.text, shortcut = %s, "shortcut not supported; binding item without one");
                        None
                    }
                    other => other,
                };
                let spec = MenuItemSpec {
                    text: &cmd.text,
                    shortcut,
                    enabled: cmd.enabled,
                };
                backend.add_item(menu, &spec, cmd.token());
            }
        }
    }
    Ok(())
}
