//! Terminal rendering for the stopwatch screen.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use lapwatch_core::{format_clock, format_duration, TimerSession};

pub fn draw(frame: &mut Frame, session: &TimerSession, hint_visible: bool) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Length(3), // Time display
        Constraint::Min(1),    // Lap list
        Constraint::Length(3), // Footer
    ])
    .split(area);

    draw_header(frame, chunks[0], session.is_running());
    draw_display(frame, chunks[1], session.elapsed_ms());
    draw_laps(frame, chunks[2], session);
    draw_footer(frame, chunks[3], session.is_running());

    if hint_visible {
        draw_hint(frame, area);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, running: bool) {
    let (tag, tag_style) = if running {
        (
            "RUNNING",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        ("STOPPED", Style::default().fg(Color::DarkGray))
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " STOPWATCH ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(tag, tag_style),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_display(frame: &mut Frame, area: Rect, elapsed_ms: u64) {
    let display = Paragraph::new(Line::from(Span::styled(
        format_clock(elapsed_ms),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(display, area);
}

fn draw_laps(frame: &mut Frame, area: Rect, session: &TimerSession) {
    let block = Block::default().title(" Laps ").borders(Borders::ALL);

    if session.laps().is_empty() {
        let empty = Paragraph::new("No lap times recorded yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Most recent lap first
    let items: Vec<ListItem> = session
        .laps()
        .iter()
        .rev()
        .map(|lap| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" #{:<3}", lap.number),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!(" {:>12}", format_duration(lap.split_ms))),
                Span::styled(
                    format!("   {:>12}", format_duration(lap.total_ms)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, running: bool) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let toggle_label = if running { "Stop  " } else { "Start  " };
    // Lap is only available while running
    let (lap_key_style, lap_style) = if running {
        (key_style, Style::default())
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" SPACE ", key_style),
        Span::raw(toggle_label),
        Span::styled(" l ", lap_key_style),
        Span::styled("Lap  ", lap_style),
        Span::styled(" r ", key_style),
        Span::raw("Reset  "),
        Span::styled(" ? ", key_style),
        Span::raw("Help  "),
        Span::styled(" q ", key_style),
        Span::raw("Quit"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn draw_hint(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 30, 9);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw(" Space  Start / Stop"),
        Line::raw(" l      Record lap"),
        Line::raw(" r      Reset"),
        Line::raw(" q      Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let hint =
        Paragraph::new(lines).block(Block::default().title(" Help ").borders(Borders::ALL));
    frame.render_widget(hint, popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width - w) / 2;
    let y = area.y + (area.height - h) / 2;
    Rect::new(x, y, w, h)
}
