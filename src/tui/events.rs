use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::dock::DockEvent;

/// Application events
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Event sent by the dialog dock
    Dock(DockEvent),
}

/// Event handler for managing input events
pub struct EventHandler {
    /// Dock event receiver channel
    receiver: mpsc::UnboundedReceiver<DockEvent>,

    /// Dock event sender channel
    sender: mpsc::UnboundedSender<DockEvent>,

    /// Tick interval for periodic events
    tick_interval: Duration,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new(tick_interval: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            receiver,
            sender,
            tick_interval,
        }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        // Dock events first so a cancel is handled before more input arrives
        if let Ok(event) = self.receiver.try_recv() {
            return Some(Event::Dock(event));
        }

        let tick = self.tick_interval;
        let polled = tokio::task::spawn_blocking(move || -> std::io::Result<Option<CrosstermEvent>> {
            if crossterm::event::poll(tick)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await;

        match polled {
            Ok(Ok(Some(event))) => Some(Self::convert_crossterm_event(event)),
            Ok(Ok(None)) => Some(Event::Tick),
            Ok(Err(e)) => {
                debug!("Terminal event read failed: {}", e);
                Some(Event::Tick)
            }
            Err(e) => {
                debug!("Terminal polling task failed: {}", e);
                None
            }
        }
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Event {
        match event {
            CrosstermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                Event::Key(key_event)
            }
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        }
    }

    /// Get a clone of the dock event sender
    pub fn dock_sender(&self) -> mpsc::UnboundedSender<DockEvent> {
        self.sender.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::DialogId;

    #[tokio::test]
    async fn test_dock_events_are_delivered_first() {
        let mut handler = EventHandler::default();
        let sender = handler.dock_sender();
        sender
            .send(DockEvent::Cancel { dialog: Some(DialogId::new("selector")) })
            .unwrap();

        let event = handler.next().await;
        assert_eq!(
            event,
            Some(Event::Dock(DockEvent::Cancel { dialog: Some(DialogId::new("selector")) }))
        );
    }

    #[test]
    fn test_convert_resize() {
        let event = EventHandler::convert_crossterm_event(CrosstermEvent::Resize(100, 40));
        assert_eq!(event, Event::Resize(100, 40));
    }
}
