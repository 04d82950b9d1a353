//! Host windowing capabilities used by the dock
//!
//! The dock does not draw anything itself. It drives a container widget
//! provided by the host through [`DockContainer`], which exposes the
//! primitive show/hide/resize/paint operations the dock builds on.

use super::types::DialogId;
use ratatui::layout::Rect;
use std::collections::HashMap;
use tracing::debug;

/// Container widget the dock swallows its dialogs into.
///
/// Children are addressed by id only. A container must tolerate ids it has
/// never seen: the dialog behind an id may already be gone.
pub trait DockContainer {
    /// Register the container with the host's top-level window structure.
    /// Called exactly once, when the dock is created.
    fn register_toplevel(&mut self) {}

    /// Whether the container is currently shown
    fn is_visible(&self) -> bool;

    /// Default show primitive
    fn show(&mut self);

    /// Default hide primitive
    fn hide(&mut self);

    /// Current container area
    fn geometry(&self) -> Rect;

    /// Move/resize the container
    fn set_geometry(&mut self, area: Rect);

    /// Make `child` the displayed child, obscuring all others
    fn raise_child(&mut self, child: &DialogId);

    /// The child currently displayed, if any
    fn current_child(&self) -> Option<&DialogId>;

    /// Place `child` at `geometry`
    fn set_child_geometry(&mut self, child: &DialogId, geometry: Rect);

    /// Last geometry assigned to `child`
    fn child_geometry(&self, child: &DialogId) -> Option<Rect>;

    /// Drop every reference the container keeps to `child`
    fn forget_child(&mut self, child: &DialogId);

    /// Set the window title shown by the window manager
    fn set_title(&mut self, title: Option<&str>) {
        let _ = title;
    }

    /// Current window title
    fn title(&self) -> Option<&str> {
        None
    }

    /// Default paint primitive
    fn paint(&mut self) {}
}

/// In-memory container.
///
/// Records everything the dock asks of it. Hosts that draw immediate-mode
/// (such as the terminal demo) read the recorded state back at render time.
#[derive(Debug, Clone, Default)]
pub struct SlotContainer {
    area: Rect,
    visible: bool,
    registered: bool,
    current: Option<DialogId>,
    children: HashMap<DialogId, Rect>,
    title: Option<String>,
    paint_count: u64,
}

impl SlotContainer {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            ..Self::default()
        }
    }

    /// Whether the dock registered this container as a top-level window
    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// Number of paint passes so far
    pub fn paint_count(&self) -> u64 {
        self.paint_count
    }

    /// Number of children the container still holds a geometry for
    pub fn known_children(&self) -> usize {
        self.children.len()
    }
}

impl DockContainer for SlotContainer {
    fn register_toplevel(&mut self) {
        self.registered = true;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn geometry(&self) -> Rect {
        self.area
    }

    fn set_geometry(&mut self, area: Rect) {
        self.area = area;
    }

    fn raise_child(&mut self, child: &DialogId) {
        self.current = Some(child.clone());
    }

    fn current_child(&self) -> Option<&DialogId> {
        self.current.as_ref()
    }

    fn set_child_geometry(&mut self, child: &DialogId, geometry: Rect) {
        self.children.insert(child.clone(), geometry);
    }

    fn child_geometry(&self, child: &DialogId) -> Option<Rect> {
        self.children.get(child).copied()
    }

    fn forget_child(&mut self, child: &DialogId) {
        if self.children.remove(child).is_none() {
            debug!("Container had no record of dialog {}", child);
        }
        if self.current.as_ref() == Some(child) {
            self.current = None;
        }
    }

    fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn paint(&mut self) {
        self.paint_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_container_starts_hidden() {
        let container = SlotContainer::new(Rect::new(0, 0, 80, 24));
        assert!(!container.is_visible());
        assert!(!container.is_registered());
        assert_eq!(container.current_child(), None);
        assert_eq!(container.geometry(), Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn test_forget_unknown_child_is_harmless() {
        let mut container = SlotContainer::default();
        let id = DialogId::new("ghost");
        container.forget_child(&id);
        assert_eq!(container.known_children(), 0);
    }

    #[test]
    fn test_forget_current_child_clears_it() {
        let mut container = SlotContainer::default();
        let id = DialogId::new("selector");
        container.raise_child(&id);
        container.set_child_geometry(&id, Rect::new(0, 0, 10, 10));

        container.forget_child(&id);

        assert_eq!(container.current_child(), None);
        assert_eq!(container.child_geometry(&id), None);
    }
}
