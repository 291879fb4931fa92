use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{App, Screen};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Settings => render_settings(self, area, buf),
            Screen::Playing => render_playing(self, area, buf),
            Screen::Review => render_review(self, area, buf),
        }
    }
}

fn render_settings(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let magenta_style = Style::default().fg(Color::Magenta);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(3), // title
                Constraint::Length(2), // status
                Constraint::Length(4), // settings
                Constraint::Min(0),
                Constraint::Length(2), // key help
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new(Span::styled("wordflash", bold_style.fg(Color::Cyan)))
        .block(Block::default().borders(Borders::BOTTOM))
        .alignment(Alignment::Center);
    title.render(chunks[0], buf);

    let status = Paragraph::new(Span::styled(app.status.as_str(), magenta_style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    status.render(chunks[1], buf);

    let max_hint = match app.trainer.max_count() {
        Some(max) => format!("1-{max}"),
        None => "no items loaded".to_string(),
    };
    let settings = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(format!("items  {}", app.count), bold_style),
            Span::styled(format!("  ({max_hint}, adjust with ↑/↓)"), dim_style),
        ]),
        Line::from(vec![
            Span::styled(format!("delay  {:.1}s", app.delay_secs), bold_style),
            Span::styled("  (between items, adjust with ←/→)", dim_style),
        ]),
    ])
    .alignment(Alignment::Center);
    settings.render(chunks[2], buf);

    let mut help = vec![Span::styled("(s)tart ", dim_style)];
    if app.trainer.can_review() {
        help.push(Span::styled("(l)ist last session ", dim_style));
    }
    help.push(Span::styled("(r)eload ", dim_style));
    help.push(Span::styled("(esc)ape", dim_style));
    Paragraph::new(Line::from(help))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
}

fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.trainer.session() else {
        return;
    };
    let word = session.current_item().unwrap_or_default();
    let (pos, total) = session.position();

    // Center the word vertically; one line of progress underneath.
    let word_lines = if word.width() as u16 > area.width.saturating_sub(HORIZONTAL_MARGIN * 2) {
        2
    } else {
        1
    };
    let top = area.height.saturating_sub(word_lines + 2) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(top),
                Constraint::Length(word_lines),
                Constraint::Length(2),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let word_widget = Paragraph::new(Span::styled(
        word,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    word_widget.render(chunks[1], buf);

    let progress = Paragraph::new(Span::styled(
        format!("speaking ({pos}/{total})"),
        Style::default().add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center);
    progress.render(chunks[2], buf);
}

fn render_review(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(2),
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new(Span::styled("last session", bold_style.fg(Color::Cyan)))
        .block(Block::default().borders(Borders::BOTTOM))
        .alignment(Alignment::Center);
    title.render(chunks[0], buf);

    let items = app.trainer.last_session_items();
    let body = if items.is_empty() {
        Paragraph::new(Span::styled(
            "No items from the last session to display.",
            dim_style,
        ))
        .alignment(Alignment::Center)
    } else {
        // Playback order, 1-based, like the spoken sequence.
        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                Line::from(vec![
                    Span::styled(format!("{:>3}. ", idx + 1), dim_style),
                    Span::raw(item.as_str()),
                ])
            })
            .collect();
        Paragraph::new(lines).alignment(Alignment::Center)
    };
    body.render(chunks[1], buf);

    Paragraph::new(Span::styled("(b)ack (esc)ape", dim_style))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
}
