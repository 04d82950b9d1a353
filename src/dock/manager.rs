//! Dialog dock for main dialogs
//!
//! The dock "swallows" main dialogs so only the topmost of them is visible
//! at any given time. It acts as a window stack: closing the topmost dialog
//! makes the next lower one visible again.
//!
//! The dock also handles its own visibility. It is shown if and only if it
//! has a dialog to display, hides itself when the last one is removed and
//! shows itself again when a new one arrives.
//!
//! Any number of main dialogs can be docked as long as no popup dialog is
//! open in between (see [`DialogDock::could_dock`]).

use super::{
    host::DockContainer,
    registry::DialogRegistry,
    types::*,
};
use ratatui::layout::Rect;
use std::rc::Rc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Stack of docked main dialogs sharing one container
pub struct DialogDock {
    /// Docked dialogs (last = topmost)
    stack: Vec<DialogHandle>,

    /// Inset reserved for a side panel next to the visible dialog
    side_bar_width: u16,

    /// Edge the side-bar inset is taken from
    layout_direction: LayoutDirection,

    /// Host container the dialogs are displayed in
    container: Box<dyn DockContainer>,

    /// Every open dialog of the application, docked or not
    registry: Option<Rc<dyn DialogRegistry>>,

    /// Event sender for dock events
    event_sender: Option<mpsc::UnboundedSender<DockEvent>>,
}

impl DialogDock {
    /// Create a dock around `container` and register it with the host.
    ///
    /// Most code should go through [`super::dock()`] instead.
    pub fn new(mut container: Box<dyn DockContainer>) -> Self {
        container.register_toplevel();
        info!("Created main dialog dock");

        Self {
            stack: Vec::new(),
            side_bar_width: 0,
            layout_direction: LayoutDirection::default(),
            container,
            registry: None,
            event_sender: None,
        }
    }

    /// Attach the registry consulted by [`Self::could_dock`]
    pub fn set_registry(&mut self, registry: Rc<dyn DialogRegistry>) {
        self.registry = Some(registry);
    }

    /// Set the event sender for dock events
    pub fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<DockEvent>) {
        self.event_sender = Some(sender);
    }

    pub fn set_layout_direction(&mut self, direction: LayoutDirection) {
        self.layout_direction = direction;
        self.resize_visible_child();
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.layout_direction
    }

    /// Dock a dialog on top of the stack.
    ///
    /// The dock does not take ownership of the dialog. If the dock was
    /// hidden, this shows it. Returns `false` if the dialog is already
    /// docked, in which case nothing changes.
    pub fn add(&mut self, handle: DialogHandle) -> bool {
        if self.contains(handle.id()) {
            warn!("Dialog {} is already docked; ignoring", handle.id());
            return false;
        }

        debug!("Docking dialog {} (stack depth {})", handle.id(), self.stack.len() + 1);
        let id = handle.id().clone();
        self.stack.push(handle);

        if self.container.is_visible() {
            self.show_current_dialog();
        } else {
            self.show();
        }

        self.send_event(DockEvent::Docked(id));
        true
    }

    /// Remove a dialog from the dock.
    ///
    /// With `None` the topmost dialog is removed. Asking for a dialog that
    /// is not docked is a no-op, so this is safe to call while tearing down
    /// any dialog, docked or not. Hides the dock when it becomes empty.
    pub fn remove(&mut self, dialog: Option<&DialogId>) -> Option<DialogHandle> {
        let index = match dialog {
            Some(id) => self.find_in_stack(id),
            None => self.stack.len().checked_sub(1),
        };

        let Some(index) = index else {
            debug!("Nothing to undock for {:?}", dialog.map(DialogId::as_str));
            return None;
        };

        let handle = self.stack.remove(index);
        self.container.forget_child(handle.id());
        debug!("Undocked dialog {} ({} left)", handle.id(), self.stack.len());

        if self.stack.is_empty() {
            debug!("No more dialogs docked, hiding dock");
            self.container.set_title(None);
            self.container.hide();
        } else {
            self.show_current_dialog();
        }

        self.send_event(DockEvent::Undocked(handle.id().clone()));
        Some(handle)
    }

    /// Remove the topmost dialog
    pub fn remove_topmost(&mut self) -> Option<DialogHandle> {
        self.remove(None)
    }

    /// The topmost (visible) dialog, if any
    pub fn topmost_dialog(&self) -> Option<&DialogHandle> {
        self.stack.last()
    }

    /// Whether the next main dialog could be docked.
    ///
    /// Popups always render above everything else, so nothing may be docked
    /// while any popup is open. A registry that cannot be read counts as
    /// having a popup open.
    pub fn could_dock(&self) -> bool {
        let Some(registry) = &self.registry else {
            return true;
        };

        match registry.open_dialogs() {
            Some(open) => !open.iter().any(|dialog| !dialog.kind.is_dockable()),
            None => {
                warn!("Open dialogs unknown, refusing to dock");
                false
            }
        }
    }

    /// Show the dock, making sure the topmost dialog is the one displayed
    pub fn show(&mut self) {
        if !self.stack.is_empty() {
            self.show_current_dialog();
        }
        self.container.show();
    }

    /// Resize the visible dialog to fill the dock minus the side-bar inset
    pub fn resize_visible_child(&mut self) {
        let Some(top) = self.stack.last() else {
            return;
        };

        let area = self.container.geometry();
        let inset = self.side_bar_width.min(area.width);
        let x = match self.layout_direction {
            LayoutDirection::LeftToRight => area.x.saturating_add(inset),
            LayoutDirection::RightToLeft => area.x,
        };
        let child = Rect {
            x,
            y: area.y,
            width: area.width - inset,
            height: area.height,
        };

        if self.container.child_geometry(top.id()) != Some(child) {
            self.container.set_child_geometry(top.id(), child);
        }
    }

    /// Reserve `width` columns next to the visible dialog for a side panel
    pub fn set_side_bar_width(&mut self, width: u16) {
        debug!("Side bar width {} -> {}", self.side_bar_width, width);
        self.side_bar_width = width;
        self.resize_visible_child();
    }

    pub fn side_bar_width(&self) -> u16 {
        self.side_bar_width
    }

    /// Container resize hook
    pub fn handle_resize(&mut self, area: Rect) {
        self.container.set_geometry(area);
        self.resize_visible_child();
    }

    /// Container paint hook.
    ///
    /// Re-syncs the visible dialog with the container before painting in
    /// case something resized one of them behind the dock's back.
    pub fn handle_paint(&mut self) {
        self.resize_visible_child();
        self.container.paint();
    }

    /// Window manager close request.
    ///
    /// The dock is never closed directly. Instead the application gets a
    /// cancel event, just as if the user had cancelled the topmost dialog.
    /// The dock goes away once that leads to its last dialog being removed.
    pub fn handle_close_request(&mut self) {
        let dialog = self.topmost_dialog().map(|handle| handle.id().clone());
        info!("Close request on dock, sending cancel for {:?}", dialog.as_ref().map(DialogId::as_str));
        self.send_event(DockEvent::Cancel { dialog });
    }

    pub fn contains(&self, id: &DialogId) -> bool {
        self.find_in_stack(id).is_some()
    }

    /// Docked dialogs, bottom first
    pub fn dialogs(&self) -> &[DialogHandle] {
        &self.stack
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn state(&self) -> DockState {
        if self.stack.is_empty() {
            DockState::Empty
        } else {
            DockState::Occupied
        }
    }

    pub fn container(&self) -> &dyn DockContainer {
        self.container.as_ref()
    }

    /// Mutable access for host event plumbing
    pub fn container_mut(&mut self) -> &mut dyn DockContainer {
        self.container.as_mut()
    }

    pub fn snapshot(&self) -> DockSnapshot {
        let topmost = self.topmost_dialog().map(|handle| handle.id().clone());
        let child = topmost
            .as_ref()
            .and_then(|id| self.container.child_geometry(id));

        DockSnapshot {
            state: self.state(),
            stack: self.stack.iter().map(|handle| handle.id().clone()).collect(),
            topmost,
            visible: self.container.is_visible(),
            side_bar_width: self.side_bar_width,
            container: self.container.geometry(),
            child,
        }
    }

    /// Raise the topmost dialog, take over its title and fit it to the dock
    fn show_current_dialog(&mut self) {
        let Some(top) = self.stack.last() else {
            return;
        };

        self.container.raise_child(top.id());
        self.container.set_title(top.title());
        self.resize_visible_child();
    }

    fn find_in_stack(&self, id: &DialogId) -> Option<usize> {
        self.stack.iter().position(|handle| handle.id() == id)
    }

    /// Send an event if event sender is configured
    fn send_event(&self, event: DockEvent) {
        if let Some(sender) = &self.event_sender {
            if sender.send(event).is_err() {
                debug!("Dock event receiver is gone");
            }
        }
    }
}

impl std::fmt::Debug for DialogDock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogDock")
            .field("stack", &self.stack)
            .field("side_bar_width", &self.side_bar_width)
            .field("layout_direction", &self.layout_direction)
            .field("visible", &self.container.is_visible())
            .finish()
    }
}
