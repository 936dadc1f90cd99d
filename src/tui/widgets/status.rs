// ABOUTME: Status bar widget — renders endpoint host, message count, session time, and sending state.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary with key hints.

use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Inputs for the status bar.
pub struct StatusBarParams<'a> {
    pub endpoint: &'a str,
    pub message_count: usize,
    pub session_start: Instant,
    pub sending: bool,
    /// Whether PDF upload is offered.
    pub uploads: bool,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", endpoint_host(params.endpoint)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", format_count(params.message_count)),
            Style::default().fg(Color::White),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", format_elapsed(params.session_start.elapsed().as_secs())),
            Style::default().fg(Color::White),
        ),
    ];

    if params.sending {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled("asking... ", Style::default().fg(Color::Yellow)));
    }

    spans.push(Span::styled("| ", dim));
    let hints = if params.uploads {
        "Enter ask · ^U upload · ^R remove · ^L clear · Esc quit"
    } else {
        "Enter ask · ^L clear · Esc quit"
    };
    spans.push(Span::styled(hints, dim));

    Line::from(spans)
}

/// Host (and explicit port) of the endpoint URL, or the whole string if it does not parse.
pub fn endpoint_host(endpoint: &str) -> String {
    let Ok(url) = reqwest::Url::parse(endpoint) else {
        return endpoint.to_string();
    };
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => endpoint.to_string(),
    }
}

fn format_count(count: usize) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{} messages", count)
    }
}

/// Format elapsed seconds as "Xm YYs" or "Xh YYm".
pub fn format_elapsed(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}
