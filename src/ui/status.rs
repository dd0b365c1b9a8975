use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::quiz::QuizFailure;

fn centered(area: Rect, height: u16) -> Rect {
    Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area)[1]
}

pub fn render_loading(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("Loading quiz…")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, centered(area, 1));
}

pub fn render_error(frame: &mut Frame, area: Rect, failure: QuizFailure) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(failure.message(), Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );
    frame.render_widget(widget, centered(area, 6));
}
