//! Drawing of the demo dialogs
//!
//! The demo dialogs have no behaviour of their own. They are boxes with a
//! title and a short description of what kind of dialog they stand for.

use crate::dock::{DialogHandle, DialogKind};
use crate::tui::Frame;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Title and id prefix used for newly opened dialogs of `kind`
pub fn dialog_template(kind: DialogKind) -> (&'static str, &'static str) {
    match kind {
        DialogKind::Main => ("selector", "Software Management"),
        DialogKind::Wizard => ("wizard", "Add-on Products"),
        DialogKind::Popup => ("popup", "Confirm Changes"),
    }
}

fn body_text(kind: DialogKind) -> &'static str {
    match kind {
        DialogKind::Main => {
            "Package selector main window. It is docked while no popup is open; \
             otherwise it opens as a separate window."
        }
        DialogKind::Wizard => {
            "Secondary wizard. While it is the visible docked dialog the dock \
             reserves a side bar next to it."
        }
        DialogKind::Popup => {
            "Popup dialog. It floats above the dock and nothing can be docked \
             until it is closed."
        }
    }
}

fn border_style(kind: DialogKind) -> Style {
    match kind {
        DialogKind::Main => Style::default().fg(Color::Cyan),
        DialogKind::Wizard => Style::default().fg(Color::Green),
        DialogKind::Popup => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    }
}

/// Draw one dialog box
pub fn render_dialog(
    frame: &mut Frame,
    area: Rect,
    handle: &DialogHandle,
    kind: DialogKind,
    placement: &str,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    frame.render_widget(Clear, area);

    let title = format!(" {} ", handle.title().unwrap_or(handle.id().as_str()));
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(kind));

    let lines = vec![
        Line::from(Span::styled(
            format!("{} [{}]", handle.id(), placement),
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from(body_text(kind)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Draw the side bar reserved next to a docked wizard
pub fn render_side_bar(frame: &mut Frame, area: Rect, docked: usize) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let steps = [
        "Add-on Products",
        "Repositories",
        "Software Selection",
        "Installation Summary",
    ];
    let mut lines: Vec<Line> = steps.iter().map(|step| Line::from(format!("• {}", step))).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(format!("{} docked", docked)));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Steps ")
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Area between the dock edge and the visible dialog
pub fn side_bar_area(dock: Rect, child: Rect) -> Rect {
    if child.x > dock.x {
        Rect {
            x: dock.x,
            y: dock.y,
            width: child.x - dock.x,
            height: dock.height,
        }
    } else {
        let child_right = child.right();
        Rect {
            x: child_right,
            y: dock.y,
            width: dock.right().saturating_sub(child_right),
            height: dock.height,
        }
    }
}

/// Create a centered rectangle with given percentage of the screen
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_bar_left_of_child() {
        let dock = Rect::new(0, 0, 80, 23);
        let child = Rect::new(20, 0, 60, 23);
        assert_eq!(side_bar_area(dock, child), Rect::new(0, 0, 20, 23));
    }

    #[test]
    fn test_side_bar_right_of_child() {
        let dock = Rect::new(0, 0, 80, 23);
        let child = Rect::new(0, 0, 60, 23);
        assert_eq!(side_bar_area(dock, child), Rect::new(60, 0, 20, 23));
    }

    #[test]
    fn test_side_bar_at_coordinate_limit() {
        let dock = Rect { x: 65530, y: 0, width: 100, height: 1 };
        let child = Rect { x: 65530, y: 0, width: 90, height: 1 };
        let area = side_bar_area(dock, child);
        assert_eq!(area.x, u16::MAX);
        assert_eq!(area.width, 0);
    }

    #[test]
    fn test_centered_rect_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(50, 50, parent);
        assert!(rect.x >= 20 && rect.x <= 30);
        assert!(rect.width <= 50);
        assert_eq!(parent.intersection(rect), rect);
    }
}
