// ABOUTME: Prompt widgets — the blocking alert and the upload path hint.
// ABOUTME: Both occupy the strip between the chat area and the input.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Render a blocking alert as two Lines: message + dismiss hint.
pub fn alert_lines(message: &str) -> Vec<Line<'static>> {
    let header = Line::from(vec![
        Span::styled(
            "ALERT: ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(message.to_string(), Style::default().fg(Color::White)),
    ]);

    let hint = Line::from(Span::styled(
        "(press any key to continue)",
        Style::default().fg(Color::DarkGray),
    ));

    vec![header, hint]
}

/// Render the upload prompt header and usage hint.
pub fn upload_lines() -> Vec<Line<'static>> {
    let header = Line::from(vec![
        Span::styled(
            "UPLOAD: ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "type the path of a .pdf file (max 10MB)",
            Style::default().fg(Color::White),
        ),
    ]);

    let hint = Line::from(Span::styled(
        "(Enter to attach, Esc to cancel)",
        Style::default().fg(Color::DarkGray),
    ));

    vec![header, hint]
}
