use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::models::AnswerRecord;
use crate::quiz::{Score, ScoreTier, Session};

const NO_ANSWER_TEXT: &str = "No answer selected";

pub fn render(frame: &mut Frame, area: Rect, session: &Session, scroll: usize) {
    let score = session.score();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], &score);
    render_review(frame, chunks[2], session.records(), scroll);
    render_controls(frame, chunks[3]);
}

fn tier_color(tier: ScoreTier) -> Color {
    match tier {
        ScoreTier::High => Color::Green,
        ScoreTier::Mid => Color::Yellow,
        ScoreTier::Low => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, score: &Score) {
    let color = tier_color(score.tier);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "You answered {} of {} correctly ({}%).",
                score.correct, score.total, score.percentage
            ),
            Style::default().fg(color).bold(),
        )),
        Line::from(score.tier.message().fg(Color::Gray)),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn review_lines(index: usize, record: &AnswerRecord) -> Vec<Line<'_>> {
    let (symbol, color, status) = if record.is_correct {
        ("+", Color::Green, "Correct! Nicely done.")
    } else {
        ("-", Color::Red, "Incorrect. Worth another look.")
    };
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {symbol} "), Style::default().fg(color)),
            Span::styled(format!("{:2}. ", index + 1), label),
            Span::styled(record.prompt.as_str(), Style::default().fg(Color::White)),
        ]),
        Line::from(vec![
            Span::styled("     Your answer: ", label),
            Span::raw(record.selected_option().unwrap_or(NO_ANSWER_TEXT)),
        ]),
        Line::from(vec![
            Span::styled("     Correct answer: ", label),
            Span::raw(record.correct_option().unwrap_or_default()),
        ]),
        Line::from(Span::styled(format!("     {status}"), Style::default().fg(color))),
    ];
    if let Some(explanation) = &record.explanation {
        lines.push(Line::from(vec![
            Span::styled("     Why: ", label),
            Span::raw(explanation.as_str()),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

fn render_review(frame: &mut Frame, area: Rect, records: &[AnswerRecord], scroll: usize) {
    // Scroll by whole review items rather than by lines.
    let lines: Vec<Line> = records
        .iter()
        .enumerate()
        .skip(scroll)
        .flat_map(|(index, record)| review_lines(index, record))
        .collect();

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r retake  ·  b back to start  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
