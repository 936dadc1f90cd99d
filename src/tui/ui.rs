// ABOUTME: Main TUI rendering function — assembles header, chat, attachment, prompt, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::model::ChatApp;
use crate::tui::widgets::attachment::attachment_line;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::prompt::{alert_lines, upload_lines};
use crate::tui::widgets::status::{StatusBarParams, status_line};

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, app: &mut ChatApp) {
    let area = frame.area();
    let state = &mut app.state;

    let has_attachment = app.pipeline.attachment().is_some();
    let has_prompt = state.has_alert() || state.in_upload_prompt();

    let mut constraints = vec![
        Constraint::Length(2), // Header
        Constraint::Min(3),    // Chat area
    ];
    if has_attachment {
        constraints.push(Constraint::Length(1)); // Attachment preview
    }
    if has_prompt {
        constraints.push(Constraint::Length(2)); // Alert / upload prompt
    }
    constraints.push(Constraint::Length(3)); // Input area
    constraints.push(Constraint::Length(1)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = 0;
    let mut take = || {
        let chunk = chunks[next];
        next += 1;
        chunk
    };

    // Header
    let header = vec![
        Line::from(Span::styled(
            format!(" {}", state.title),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!(" {}", state.subtitle),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Paragraph::new(header), take());

    // Chat area
    let chat_chunk = take();
    let chat_lines = render_chat_lines(app.session.messages(), state.sending);
    let chat_paragraph = Paragraph::new(chat_lines).wrap(Wrap { trim: false });

    // ratatui's own line_count() matches its wrapping exactly, so the bottom of
    // the chat is never hidden by a scroll miscalculation.
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(chat_chunk.height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }
    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Attachment preview
    if let Some(attachment) = app.pipeline.attachment() {
        frame.render_widget(Paragraph::new(attachment_line(attachment)), take());
    }

    // Alert or upload prompt
    if has_prompt {
        let lines = match state.alert {
            Some(ref message) => alert_lines(message),
            None => upload_lines(),
        };
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), take());
    }

    // Input area
    let input_chunk = take();
    let border_color = if state.has_alert() {
        Color::Red
    } else if state.in_upload_prompt() {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let mut input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(border_color));
    if state.sending {
        input_block = input_block.title(Span::styled(" ... ", Style::default().fg(Color::Yellow)));
    } else if state.in_upload_prompt() {
        input_block = input_block.title(Span::styled(" pdf path ", Style::default().fg(Color::Cyan)));
    } else {
        input_block = input_block.title(Span::styled(" Ask ", Style::default().fg(Color::DarkGray)));
    }

    let input_text = if state.input.is_empty() && !state.in_upload_prompt() {
        Span::styled(state.placeholder.clone(), Style::default().fg(Color::DarkGray))
    } else if state.sending {
        Span::styled(state.input.clone(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.input.clone())
    };

    // Keep the cursor visible on long single-line input by scrolling horizontally.
    state.clamp_cursor();
    let prefix: String = state.input.chars().take(state.cursor_pos).collect();
    let visual_col = UnicodeWidthStr::width(prefix.as_str()) as u16;
    let max_visual_col = input_chunk.width.saturating_sub(1);
    let h_scroll = visual_col.saturating_sub(max_visual_col);

    frame.render_widget(
        Paragraph::new(input_text)
            .block(input_block)
            .scroll((0, h_scroll)),
        input_chunk,
    );

    let editable = !state.sending && !state.has_alert();
    if editable && input_chunk.width > 0 && input_chunk.height > 1 {
        let cursor_x = input_chunk
            .x
            .saturating_add(visual_col.min(max_visual_col));
        // +1 for the top border
        let cursor_y = input_chunk.y.saturating_add(1);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        endpoint: &state.endpoint,
        message_count: app.session.len(),
        session_start: state.session_start,
        sending: state.sending,
        uploads: app.pipeline.accepts_attachments(),
    });
    frame.render_widget(Paragraph::new(status), take());
}
