use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::view::{Body, FilterLine, Overlay, Row, RowWindow, ScreenView, Tone};

pub(in crate::tui_shell) fn draw(frame: &mut ratatui::Frame, view: &ScreenView) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(if view.filter.is_some() { 1 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    // Header, with the status pinned to the right.
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            view.header.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))),
        chunks[0],
    );
    if let Some(status) = &view.status {
        frame.render_widget(
            Paragraph::new(Span::styled(status.as_str(), tone_style(Tone::Dim)))
                .alignment(Alignment::Right),
            chunks[0],
        );
    }

    if let Some(filter) = &view.filter {
        draw_filter(frame, filter, chunks[1]);
    }

    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(chunks[2]);
    frame.render_widget(block, chunks[2]);
    draw_body(frame, &view.body, inner);

    if let Some(notice) = &view.notice {
        frame.render_widget(
            Paragraph::new(Span::styled(notice.text.as_str(), tone_style(notice.tone))),
            chunks[3],
        );
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            view.footer.as_str(),
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        )),
        chunks[4],
    );

    if let Some(overlay) = &view.overlay {
        draw_overlay(frame, overlay);
    }
}

fn draw_filter(frame: &mut ratatui::Frame, filter: &FilterLine, area: Rect) {
    let prompt_style = if filter.focused {
        Style::default().fg(Color::Yellow)
    } else {
        tone_style(Tone::Dim)
    };
    let mut spans = vec![Span::styled("/ ", prompt_style)];
    if filter.text.is_empty() {
        spans.push(Span::styled(filter.placeholder, tone_style(Tone::Dim)));
    } else {
        spans.push(Span::raw(filter.text.as_str()));
    }
    if filter.pending {
        spans.push(Span::styled(" …", tone_style(Tone::Dim)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    if filter.focused {
        let x = area.x + 2 + filter.cursor as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
    }
}

fn draw_body(frame: &mut ratatui::Frame, body: &Body, area: Rect) {
    let message = |text: &str, tone: Tone| {
        Paragraph::new(Span::styled(text.to_string(), tone_style(tone))).wrap(Wrap { trim: false })
    };
    match body {
        Body::Loading(msg) => frame.render_widget(message(msg.as_str(), Tone::Accent), area),
        Body::Error(msg) => frame.render_widget(message(&format!("Error: {msg}"), Tone::Bad), area),
        Body::NotFound(msg) => frame.render_widget(message(msg.as_str(), Tone::Warn), area),
        Body::Empty(msg) => frame.render_widget(message(msg.as_str(), Tone::Dim), area),
        Body::Rows(window) => frame.render_widget(Paragraph::new(window_lines(window)), area),
        Body::Text(rows) => {
            let lines: Vec<Line> = rows.iter().map(row_line).collect();
            frame.render_widget(Paragraph::new(lines), area);
        }
    }
}

fn window_lines(window: &RowWindow) -> Vec<Line<'_>> {
    window
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = window.selected == Some(i);
            let marker = if selected { "› " } else { "  " };
            let mut line = row_line(row);
            line.spans.insert(0, Span::raw(marker));
            if selected {
                line = line.style(Style::default().bg(Color::DarkGray));
            }
            line
        })
        .collect()
}

fn row_line(row: &Row) -> Line<'_> {
    let mut spans = Vec::with_capacity(row.cells.len() * 2);
    for (i, cell) in row.cells.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(cell.text.as_str(), tone_style(cell.tone)));
    }
    Line::from(spans)
}

fn draw_overlay(frame: &mut ratatui::Frame, overlay: &Overlay) {
    let area = frame.area();
    let w = area.width.saturating_sub(6).clamp(20, 70);
    let h = (overlay.lines.len() as u16 + 2).min(area.height);
    let box_area = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h,
    };

    frame.render_widget(Clear, box_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(tone_style(overlay.tone))
        .title(Span::styled(overlay.title.as_str(), tone_style(overlay.tone)));
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let lines: Vec<Line> = overlay.lines.iter().map(row_line).collect();
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Normal => Style::default(),
        Tone::Dim => Style::default().fg(Color::DarkGray),
        Tone::Accent => Style::default().fg(Color::Cyan),
        Tone::Good => Style::default().fg(Color::Green),
        Tone::Warn => Style::default().fg(Color::Yellow),
        Tone::Bad => Style::default().fg(Color::Red),
    }
}
