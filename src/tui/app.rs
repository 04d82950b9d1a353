use crate::config::Config;
use crate::dock::{DialogDock, DialogHandle, DialogId, DialogKind, DockEvent, OpenDialogs};
use crate::tui::{
    dialogs::{self, centered_rect},
    events::Event,
    keys::{Action, KeyMap},
    Frame,
};
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Side-bar width step for the widen/narrow keys
const SIDE_BAR_STEP: u16 = 2;

/// Main application state and controller.
///
/// Plays the dialog-creation layer: it opens and closes dialogs, docks the
/// main ones while docking is possible and floats everything else.
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Show help overlay
    pub show_help: bool,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Status message to display
    pub status_message: Option<String>,

    /// Application configuration
    config: Config,

    /// The dialog dock
    dock: Rc<RefCell<DialogDock>>,

    /// Every open dialog, docked or floating
    dialogs: Rc<RefCell<OpenDialogs>>,

    /// Counter for dialog ids
    next_serial: usize,
}

impl App {
    /// Create a new application instance around `dock`
    pub fn new(
        config: Config,
        dock: Rc<RefCell<DialogDock>>,
        dock_events: mpsc::UnboundedSender<DockEvent>,
    ) -> Self {
        let dialogs = Rc::new(RefCell::new(OpenDialogs::new()));

        {
            let mut dock = dock.borrow_mut();
            dock.set_registry(dialogs.clone());
            dock.set_event_sender(dock_events);
            dock.set_layout_direction(config.layout_direction);
        }

        Self {
            should_quit: false,
            show_help: false,
            key_map: KeyMap::default(),
            status_message: None,
            config,
            dock,
            dialogs,
            next_serial: 0,
        }
    }

    /// Handle incoming events
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if let Some(action) = self.key_map.action_for(&key_event) {
                    self.perform(action);
                }
            }

            Event::Resize(width, height) => {
                let body = Self::body_area(Rect::new(0, 0, width, height));
                self.dock.borrow_mut().handle_resize(body);
            }

            Event::Tick => {}

            Event::Dock(dock_event) => self.handle_dock_event(dock_event),
        }

        Ok(self.should_quit)
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = !self.show_help,
            Action::OpenMain => {
                self.open_dialog(DialogKind::Main);
            }
            Action::OpenWizard => {
                self.open_dialog(DialogKind::Wizard);
            }
            Action::OpenPopup => {
                self.open_dialog(DialogKind::Popup);
            }
            Action::CloseTopmost => {
                let topmost = self.dialogs.borrow().topmost().map(|d| d.id().clone());
                match topmost {
                    Some(id) => {
                        self.close_dialog(&id);
                    }
                    None => self.status_message = Some("No dialog open".to_string()),
                }
            }
            Action::CloseRequest => self.dock.borrow_mut().handle_close_request(),
            Action::WidenSideBar => {
                self.config.side_bar_width = self.config.side_bar_width.saturating_add(SIDE_BAR_STEP);
                self.sync_side_bar();
            }
            Action::NarrowSideBar => {
                self.config.side_bar_width = self.config.side_bar_width.saturating_sub(SIDE_BAR_STEP);
                self.sync_side_bar();
            }
        }
    }

    fn handle_dock_event(&mut self, event: DockEvent) {
        match event {
            DockEvent::Cancel { dialog: Some(id) } => {
                info!("Cancelling dialog {} on close request", id);
                self.close_dialog(&id);
            }
            DockEvent::Cancel { dialog: None } => {
                debug!("Close request on an empty dock");
            }
            DockEvent::Docked(id) => {
                self.status_message = Some(format!("Docked {}", id));
            }
            DockEvent::Undocked(id) => {
                self.status_message = Some(format!("Undocked {}", id));
            }
        }
    }

    /// Open a new dialog of `kind`, docking it if possible
    pub fn open_dialog(&mut self, kind: DialogKind) -> DialogId {
        self.next_serial += 1;
        let (prefix, title) = dialogs::dialog_template(kind);
        let id = DialogId::new(format!("{}-{}", prefix, self.next_serial));
        let handle = DialogHandle::new(id.clone()).with_title(format!("{} #{}", title, self.next_serial));

        // Whether docking is possible depends on what is open before this one
        let dock_it = kind.is_dockable() && self.dock.borrow().could_dock();
        self.dialogs.borrow_mut().open(handle.clone(), kind);

        if dock_it {
            self.dock.borrow_mut().add(handle);
            self.sync_side_bar();
        } else {
            debug!("Opening {} as a separate window", id);
            self.status_message = Some(format!("Opened {} outside the dock", id));
        }

        id
    }

    /// Close an open dialog. Returns `false` if it was not open.
    pub fn close_dialog(&mut self, id: &DialogId) -> bool {
        let closed = self.dialogs.borrow_mut().close(id).is_some();
        // Every dialog undocks itself on close, docked or not
        self.dock.borrow_mut().remove(Some(id));
        self.sync_side_bar();
        closed
    }

    /// Reserve the side bar while a wizard is the visible docked dialog
    fn sync_side_bar(&mut self) {
        let wizard_on_top = {
            let dock = self.dock.borrow();
            let dialogs = self.dialogs.borrow();
            let on_top = dock
                .topmost_dialog()
                .and_then(|top| dialogs.get(top.id()))
                .map_or(false, |dialog| dialog.kind == DialogKind::Wizard);
            on_top
        };

        let width = if wizard_on_top { self.config.side_bar_width } else { 0 };
        let mut dock = self.dock.borrow_mut();
        if dock.side_bar_width() != width {
            dock.set_side_bar_width(width);
        }
    }

    fn body_area(screen: Rect) -> Rect {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),      // Dock and floating dialogs
                Constraint::Length(1),   // Status bar
            ])
            .split(screen)[0]
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let screen = frame.size();
        let body = Self::body_area(screen);
        let status = Rect {
            x: screen.x,
            y: body.y + body.height,
            width: screen.width,
            height: screen.height.saturating_sub(body.height),
        };

        {
            let mut dock = self.dock.borrow_mut();
            if dock.container().geometry() != body {
                dock.handle_resize(body);
            }
            dock.handle_paint();
        }

        self.render_backdrop(frame, body);
        self.render_dock(frame);
        self.render_floating(frame, body);
        self.render_status_bar(frame, status);

        if self.show_help {
            self.render_help_overlay(frame, body);
        }
    }

    fn render_backdrop(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" maindock ")
            .border_style(Style::default().fg(Color::DarkGray));
        let text = Paragraph::new("No main dialog docked. Press m to open one, Ctrl+g for help.")
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(text, area);
    }

    fn render_dock(&self, frame: &mut Frame) {
        let dock = self.dock.borrow();
        let container = dock.container();
        if !container.is_visible() {
            return;
        }

        let Some(top) = dock.topmost_dialog() else {
            return;
        };
        let Some(child) = container.child_geometry(top.id()) else {
            return;
        };

        let area = container.geometry();
        if dock.side_bar_width() > 0 {
            dialogs::render_side_bar(frame, dialogs::side_bar_area(area, child), dock.len());
        }

        let kind = self
            .dialogs
            .borrow()
            .get(top.id())
            .map_or(DialogKind::Main, |dialog| dialog.kind);
        let placement = format!("docked, {} in stack", dock.len());
        dialogs::render_dialog(frame, child, top, kind, &placement);
    }

    fn render_floating(&self, frame: &mut Frame, body: Rect) {
        let dock = self.dock.borrow();
        let dialogs = self.dialogs.borrow();

        for (index, dialog) in dialogs
            .iter()
            .filter(|dialog| !dock.contains(dialog.id()))
            .enumerate()
        {
            let base = match dialog.kind {
                DialogKind::Popup => centered_rect(50, 30, body),
                _ => centered_rect(70, 60, body),
            };
            let offset = index as u16;
            let area = Rect {
                x: base.x.saturating_add(offset * 2),
                y: base.y.saturating_add(offset),
                ..base
            }
            .intersection(body);

            dialogs::render_dialog(frame, area, &dialog.handle, dialog.kind, "window");
        }
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let dock = self.dock.borrow();
        let counts = format!("docked {} | open {}", dock.len(), self.dialogs.borrow().len());
        let status_text = match &self.status_message {
            Some(message) => format!("{} | {}", counts, message),
            None => format!("{} | Ctrl+g help | Ctrl+c quit", counts),
        };

        let status_paragraph =
            Paragraph::new(status_text).style(Style::default().fg(Color::Black).bg(Color::Gray));
        frame.render_widget(status_paragraph, area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame, body: Rect) {
        let help_area = centered_rect(60, 50, body);
        let help_block = Block::default().borders(Borders::ALL).title(" Help ");
        let help_paragraph = Paragraph::new(self.key_map.help_text()).block(help_block);

        frame.render_widget(ratatui::widgets::Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::SlotContainer;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn new_app() -> (App, Rc<RefCell<DialogDock>>, mpsc::UnboundedReceiver<DockEvent>) {
        let dock = Rc::new(RefCell::new(DialogDock::new(Box::new(SlotContainer::new(Rect::new(
            0, 0, 80, 23,
        ))))));
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Config::default(), dock.clone(), tx);
        (app, dock, rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::from(code))).unwrap();
    }

    /// Feed queued dock events back into the app, like the event loop does
    fn pump(app: &mut App, rx: &mut mpsc::UnboundedReceiver<DockEvent>) {
        while let Ok(event) = rx.try_recv() {
            app.handle_event(Event::Dock(event)).unwrap();
        }
    }

    #[test]
    fn test_main_dialogs_stack_in_dock() {
        let (mut app, dock, _rx) = new_app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('m'));

        let dock = dock.borrow();
        assert_eq!(dock.len(), 2);
        assert!(dock.container().is_visible());
        assert_eq!(dock.topmost_dialog().map(|h| h.id().as_str()), Some("selector-2"));
    }

    #[test]
    fn test_popup_prevents_docking() {
        let (mut app, dock, _rx) = new_app();
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('m'));

        assert_eq!(dock.borrow().len(), 1);
        assert_eq!(app.dialogs.borrow().len(), 3);

        // Close the floating main dialog, then the popup
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Esc);
        assert_eq!(dock.borrow().len(), 1);
        assert_eq!(app.dialogs.borrow().len(), 1);

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(dock.borrow().len(), 2);
    }

    #[test]
    fn test_close_request_cancels_topmost() {
        let (mut app, dock, mut rx) = new_app();
        press(&mut app, KeyCode::Char('m'));
        pump(&mut app, &mut rx);

        app.handle_event(Event::Key(KeyEvent::new(KeyCode::F(4), KeyModifiers::ALT)))
            .unwrap();
        assert!(dock.borrow().container().is_visible());

        pump(&mut app, &mut rx);
        assert!(dock.borrow().is_empty());
        assert!(!dock.borrow().container().is_visible());
        assert!(app.dialogs.borrow().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Undocked selector-1"));
    }

    #[test]
    fn test_wizard_reserves_side_bar() {
        let (mut app, dock, _rx) = new_app();
        press(&mut app, KeyCode::Char('m'));
        assert_eq!(dock.borrow().side_bar_width(), 0);

        let wizard = app.open_dialog(DialogKind::Wizard);
        assert_eq!(dock.borrow().side_bar_width(), Config::default().side_bar_width);

        press(&mut app, KeyCode::Char(']'));
        assert_eq!(
            dock.borrow().side_bar_width(),
            Config::default().side_bar_width + SIDE_BAR_STEP
        );

        assert!(app.close_dialog(&wizard));
        assert_eq!(dock.borrow().side_bar_width(), 0);
    }

    #[test]
    fn test_close_unknown_dialog() {
        let (mut app, dock, _rx) = new_app();
        press(&mut app, KeyCode::Char('m'));
        assert!(!app.close_dialog(&DialogId::new("ghost")));
        assert_eq!(dock.borrow().len(), 1);
    }

    #[test]
    fn test_quit_key() {
        let (mut app, _dock, _rx) = new_app();
        let quit = app
            .handle_event(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)))
            .unwrap();
        assert!(quit);
    }

    #[test]
    fn test_render_sizes_dock_to_body() {
        let (mut app, dock, _rx) = new_app();
        app.open_dialog(DialogKind::Wizard);
        app.open_dialog(DialogKind::Popup);
        app.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let dock = dock.borrow();
        let body = Rect::new(0, 0, 100, 29);
        assert_eq!(dock.container().geometry(), body);
        let top = dock.topmost_dialog().unwrap();
        let child = dock.container().child_geometry(top.id()).unwrap();
        let inset = Config::default().side_bar_width;
        assert_eq!(child, Rect::new(inset, 0, 100 - inset, 29));
    }

    #[test]
    fn test_resize_event_updates_dock() {
        let (mut app, dock, _rx) = new_app();
        press(&mut app, KeyCode::Char('m'));
        app.handle_event(Event::Resize(120, 40)).unwrap();

        assert_eq!(dock.borrow().container().geometry(), Rect::new(0, 0, 120, 39));
    }
}
