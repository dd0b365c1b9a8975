mod quiz;
mod result;
mod status;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::App;
use crate::quiz::QuizState;

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.state() {
        QuizState::Loading => status::render_loading(frame, area),
        QuizState::Intro(session) => welcome::render(frame, area, session),
        QuizState::Question(session) => quiz::render(frame, area, app, session),
        QuizState::Results(session) => result::render(frame, area, session, app.result_scroll()),
        QuizState::Error(failure) => status::render_error(frame, area, *failure),
    }
}
