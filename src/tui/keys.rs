use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, description: &str) -> Self {
        Self {
            key,
            modifiers,
            description: description.to_string(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }

    fn label(&self) -> String {
        let key = match self.key {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            other => format!("{:?}", other),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key)
        } else if self.modifiers.contains(KeyModifiers::ALT) {
            format!("Alt+{}", key)
        } else {
            key
        }
    }
}

/// What a key press asks the demo host to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    OpenMain,
    OpenWizard,
    OpenPopup,
    CloseTopmost,
    CloseRequest,
    WidenSideBar,
    NarrowSideBar,
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit application
    pub quit: KeyBinding,

    /// Show help
    pub help: KeyBinding,

    /// Open a main dialog
    pub open_main: KeyBinding,

    /// Open a wizard dialog
    pub open_wizard: KeyBinding,

    /// Open a popup dialog
    pub open_popup: KeyBinding,

    /// Close the most recently opened dialog
    pub close_topmost: KeyBinding,

    /// Ask the dock to close, as a window manager would (Alt-F4)
    pub close_request: KeyBinding,

    /// Grow the side bar
    pub widen_side_bar: KeyBinding,

    /// Shrink the side bar
    pub narrow_side_bar: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Quit application"),
            help: KeyBinding::new(KeyCode::Char('g'), KeyModifiers::CONTROL, "Show/hide help"),
            open_main: KeyBinding::new(KeyCode::Char('m'), KeyModifiers::NONE, "Open main dialog"),
            open_wizard: KeyBinding::new(KeyCode::Char('w'), KeyModifiers::NONE, "Open wizard dialog"),
            open_popup: KeyBinding::new(KeyCode::Char('p'), KeyModifiers::NONE, "Open popup dialog"),
            close_topmost: KeyBinding::new(KeyCode::Esc, KeyModifiers::NONE, "Close topmost dialog"),
            close_request: KeyBinding::new(KeyCode::F(4), KeyModifiers::ALT, "Window manager close"),
            widen_side_bar: KeyBinding::new(KeyCode::Char(']'), KeyModifiers::NONE, "Widen side bar"),
            narrow_side_bar: KeyBinding::new(KeyCode::Char('['), KeyModifiers::NONE, "Narrow side bar"),
        }
    }
}

impl KeyMap {
    fn bindings(&self) -> [(&KeyBinding, Action); 9] {
        [
            (&self.quit, Action::Quit),
            (&self.help, Action::Help),
            (&self.open_main, Action::OpenMain),
            (&self.open_wizard, Action::OpenWizard),
            (&self.open_popup, Action::OpenPopup),
            (&self.close_topmost, Action::CloseTopmost),
            (&self.close_request, Action::CloseRequest),
            (&self.widen_side_bar, Action::WidenSideBar),
            (&self.narrow_side_bar, Action::NarrowSideBar),
        ]
    }

    /// Map a key press to an action
    pub fn action_for(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings()
            .into_iter()
            .find(|(binding, _)| binding.matches(event))
            .map(|(_, action)| action)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        self.bindings()
            .iter()
            .map(|(binding, _)| format!("{:<8} {}", binding.label(), binding.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_lookup() {
        let keys = KeyMap::default();
        assert_eq!(keys.action_for(&KeyEvent::from(KeyCode::Char('m'))), Some(Action::OpenMain));
        assert_eq!(keys.action_for(&KeyEvent::from(KeyCode::Esc)), Some(Action::CloseTopmost));
        assert_eq!(
            keys.action_for(&KeyEvent::new(KeyCode::F(4), KeyModifiers::ALT)),
            Some(Action::CloseRequest)
        );
        assert_eq!(keys.action_for(&KeyEvent::from(KeyCode::Char('z'))), None);
    }

    #[test]
    fn test_help_text_lists_bindings() {
        let help = KeyMap::default().help_text();
        assert!(help.contains("Ctrl+c"));
        assert!(help.contains("Alt+F4"));
        assert!(help.contains("Open popup dialog"));
    }
}
