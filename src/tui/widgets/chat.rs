// ABOUTME: Chat widget — renders chat messages into styled ratatui Lines.
// ABOUTME: User and bot messages get distinct prefixes; a dotted row marks a pending reply.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::chat::{FALLBACK_REPLY, Message, Sender};

/// Shown below the history while a reply is outstanding.
pub const LOADING_DOTS: &str = "● ● ●";

/// Render the history (and the loading row, when sending) into styled Lines.
pub fn render_chat_lines(messages: &[Message], sending: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (prefix, prefix_style, body_style) = match msg.sender {
            Sender::User => (
                "❯ ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                Style::default(),
            ),
            Sender::Bot if msg.text == FALLBACK_REPLY => (
                "⏺ ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Red),
            ),
            Sender::Bot => (
                "⏺ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Style::default(),
            ),
        };

        // First line gets the prefix, continuation lines are indented to match.
        for (i, text) in msg.text.split('\n').enumerate() {
            if i == 0 {
                lines.push(Line::from(vec![
                    Span::styled(prefix, prefix_style),
                    Span::styled(text.to_string(), body_style),
                ]));
            } else {
                lines.push(Line::from(Span::styled(format!("  {}", text), body_style)));
            }
        }
    }

    if sending {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(
                "⏺ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                LOADING_DOTS,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ]));
    }

    lines
}
