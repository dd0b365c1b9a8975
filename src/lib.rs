//! # tutorial-widgets
//!
//! Client-side widgets for a static tutorial site: the per-chapter quiz,
//! chapter navigation and the page outline, plus two hosts for them. The
//! [`page`] module pre-renders the widgets into tutorial pages, and [`Quiz`]
//! runs a chapter quiz in the terminal.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tutorial_widgets::{BankLoader, Quiz};
//!
//! # async fn demo() -> tutorial_widgets::Result<()> {
//! let loader = BankLoader::new();
//! let quiz = Quiz::load("django-forms", "quiz/questions.json", &loader).await;
//! quiz.run()?;
//! # Ok(())
//! # }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod dom;
pub mod error;
pub mod logging;
pub mod models;
pub mod nav;
pub mod outline;
pub mod page;
pub mod quiz;
pub mod terminal;
mod ui;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

pub use app::App;
pub use config::Config;
pub use data::{BankLoader, BankSource, LoadState, LocationSource};
pub use error::{Error, Result};
pub use models::{ChapterTable, QuestionBank};
pub use quiz::{QuizMachine, QuizState};

/// A chapter quiz that can be run in the terminal.
pub struct Quiz {
    app: App,
}

impl Quiz {
    /// A quiz for `section_id` that is still waiting for its questions.
    pub fn new(section_id: impl Into<String>) -> Self {
        Self {
            app: App::new(section_id),
        }
    }

    pub fn from_app(app: App) -> Self {
        Self { app }
    }

    /// Load the bank at `location` through `loader` and hand the result to
    /// the quiz. A failed load still yields a quiz, showing the error screen.
    pub async fn load<S: BankSource>(
        section_id: impl Into<String>,
        location: &str,
        loader: &BankLoader<S>,
    ) -> Self {
        let mut quiz = Self::new(section_id);
        quiz.app.load(loader.load(location).await);
        quiz
    }

    /// Take over the terminal until the user quits.
    pub fn run(mut self) -> Result<()> {
        let mut session = terminal::TerminalSession::enter()?;
        run_event_loop(session.terminal(), &mut self.app)
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

fn run_event_loop(terminal: &mut terminal::QuizTerminal, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }
    match app.state() {
        QuizState::Loading => false,
        QuizState::Intro(_) => handle_intro_input(app, key),
        QuizState::Question(_) => handle_question_input(app, key),
        QuizState::Results(_) => handle_results_input(app, key),
        QuizState::Error(_) => matches!(key, KeyCode::Esc | KeyCode::Enter),
    }
}

fn handle_intro_input(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::Enter {
        app.start();
    }
    false
}

fn handle_question_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(' ') => app.choose(),
        KeyCode::Char(digit @ '1'..='9') => app.choose_index(digit as usize - '1' as usize),
        KeyCode::Enter => app.submit(),
        _ => {}
    }
    false
}

fn handle_results_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.retake(),
        KeyCode::Char('b') | KeyCode::Char('B') => app.back_to_start(),
        _ => {}
    }
    false
}
