// ABOUTME: Attachment preview widget — one row naming the pending PDF and its size.
// ABOUTME: Rendered above the input only while an attachment is selected.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::chat::PendingAttachment;

/// Render the preview row for a pending attachment.
pub fn attachment_line(attachment: &PendingAttachment) -> Line<'static> {
    Line::from(vec![
        Span::raw(" 📄 "),
        Span::styled(attachment.name.clone(), Style::default().fg(Color::White)),
        Span::styled(
            format!(" ({})", attachment.size_label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled("  [^R ×]", Style::default().fg(Color::DarkGray)),
    ])
}
