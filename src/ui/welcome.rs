use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::quiz::Session;

pub fn render(frame: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let title = session.section().title.as_deref().unwrap_or(&session.section().id);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(format!("{} practice questions", session.total()).fg(Color::DarkGray)),
        Line::from(""),
        Line::from("Ready for a quick check-in?"),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
