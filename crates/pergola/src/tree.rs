//! The widget tree.
//!
//! Widgets live in a slotmap arena keyed by `WidgetId`; parent and child
//! links are stored as ids, so removal of a subtree never leaves dangling
//! references. The tree owns each widget's style, optional content, and
//! the optional native handle that receives its computed bounds.

use geom::{Rect, Size};
use slotmap::SlotMap;

use crate::{
    backend::NativeHandle,
    content::Content,
    error::{Error, Result},
    layout,
    style::Style,
};

slotmap::new_key_type! {
    /// A stable identifier for a widget in a tree.
    pub struct WidgetId;
}

/// A single widget: style, content, links, and the computed rectangle
/// from the last layout pass.
#[derive(Debug)]
pub struct Widget {
    parent: Option<WidgetId>,
    children: Vec<WidgetId>,
    style: Style,
    content: Option<Box<dyn Content>>,
    native: Option<Box<dyn NativeHandle>>,
    rect: Rect,
}

impl Widget {
    fn new(style: Style) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            style,
            content: None,
            native: None,
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
        }
    }
}

/// An arena-backed widget tree with a fixed root.
#[derive(Debug)]
pub struct Tree {
    nodes: SlotMap<WidgetId, Widget>,
    root: WidgetId,
}

impl Tree {
    /// Create a tree whose root carries the given style.
    pub fn new(root_style: Style) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Widget::new(root_style));
        Self { nodes, root }
    }

    /// The root widget's id.
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// True if the id refers to a live widget in this tree.
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    fn widget(&self, id: WidgetId) -> Result<&Widget> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::Internal(format!("no widget for id {id:?}")))
    }

    fn widget_mut(&mut self, id: WidgetId) -> Result<&mut Widget> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| Error::Internal(format!("no widget for id {id:?}")))
    }

    /// Append a new child under `parent`, returning its id.
    pub fn add_child(&mut self, parent: WidgetId, style: Style) -> Result<WidgetId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::Internal(format!("no widget for id {parent:?}")));
        }
        let mut w = Widget::new(style);
        w.parent = Some(parent);
        let id = self.nodes.insert(w);
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Remove a widget and its entire subtree. The root cannot be removed.
    pub fn remove(&mut self, id: WidgetId) -> Result<()> {
        if id == self.root {
            return Err(Error::Layout("cannot remove the root widget".into()));
        }
        let parent = self.widget(id)?.parent;
        if let Some(p) = parent
            && let Some(pw) = self.nodes.get_mut(p)
        {
            pw.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(w) = self.nodes.remove(cur) {
                stack.extend(w.children);
            }
        }
        Ok(())
    }

    /// The widget's style.
    pub fn style(&self, id: WidgetId) -> Result<&Style> {
        Ok(&self.widget(id)?.style)
    }

    /// Update a widget's style in place.
    pub fn with_style<F>(&mut self, id: WidgetId, f: F) -> Result<()>
    where
        F: FnOnce(Style) -> Style,
    {
        let w = self.widget_mut(id)?;
        w.style = f(w.style.clone());
        Ok(())
    }

    /// Attach or replace the widget's content.
    pub fn set_content(&mut self, id: WidgetId, content: Option<Box<dyn Content>>) -> Result<()> {
        self.widget_mut(id)?.content = content;
        Ok(())
    }

    /// Attach or replace the widget's native handle.
    pub fn set_native(&mut self, id: WidgetId, native: Option<Box<dyn NativeHandle>>) -> Result<()> {
        self.widget_mut(id)?.native = native;
        Ok(())
    }

    /// The widget's rectangle from the last layout pass.
    pub fn rect(&self, id: WidgetId) -> Result<Rect> {
        Ok(self.widget(id)?.rect)
    }

    pub(crate) fn content_of(&self, id: WidgetId) -> Option<&dyn Content> {
        self.nodes.get(id)?.content.as_deref()
    }

    pub(crate) fn children_of(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id)
            .map(|w| w.children.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn set_rect(&mut self, id: WidgetId, rect: Rect) {
        if let Some(w) = self.nodes.get_mut(id) {
            w.rect = rect;
        }
    }

    /// Lay the whole tree out into the available size, then push each
    /// widget's computed bounds to its native handle.
    pub fn layout(&mut self, avail: Size) -> Result<()> {
        if !avail.w.is_finite() || !avail.h.is_finite() || avail.w < 0.0 || avail.h < 0.0 {
            return Err(Error::Layout(format!(
                "invalid available size {}x{}",
                avail.w, avail.h
            )));
        }
        layout::solve(self, avail)?;
        for (_, w) in self.nodes.iter_mut() {
            if let Some(native) = w.native.as_mut() {
                native.set_bounds(w.rect);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let a = t.add_child(t.root(), Style::new())?;
        let b = t.add_child(a, Style::new())?;
        assert!(t.contains(a));
        assert!(t.contains(b));

        t.remove(a)?;
        assert!(!t.contains(a));
        assert!(!t.contains(b));
        assert_eq!(t.children_of(t.root()), &[]);
        Ok(())
    }

    #[test]
    fn root_is_fixed() {
        let mut t = Tree::new(Style::new());
        assert!(t.remove(t.root()).is_err());
    }

    #[test]
    fn style_update() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let a = t.add_child(t.root(), Style::new())?;
        t.with_style(a, |s| s.with_flex(2.0))?;
        assert_eq!(t.style(a)?.flex(), 2.0);
        Ok(())
    }

    #[test]
    fn stale_id_errors() -> Result<()> {
        let mut t = Tree::new(Style::new());
        let a = t.add_child(t.root(), Style::new())?;
        t.remove(a)?;
        assert!(t.style(a).is_err());
        assert!(t.with_style(a, |s| s).is_err());
        Ok(())
    }

    #[test]
    fn invalid_viewport_rejected() {
        let mut t = Tree::new(Style::new());
        assert!(t.layout(Size::new(f64::NAN, 100.0)).is_err());
        assert!(t.layout(Size::new(-1.0, 100.0)).is_err());
    }
}
