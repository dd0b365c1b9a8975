use tracing::error;

use crate::data::BankResult;
use crate::quiz::{Effect, QuizEvent, QuizMachine, QuizState, Screen, ScrollBlock};

/// Terminal host for one quiz: the state machine plus what only the
/// terminal needs (option cursor, chosen option, warning, review scroll).
pub struct App {
    machine: QuizMachine,
    cursor: usize,
    selected: Option<usize>,
    warning: bool,
    result_scroll: usize,
}

impl App {
    pub fn new(section_id: impl Into<String>) -> Self {
        Self::with_machine(QuizMachine::new(section_id))
    }

    pub fn with_machine(machine: QuizMachine) -> Self {
        Self {
            machine,
            cursor: 0,
            selected: None,
            warning: false,
            result_scroll: 0,
        }
    }

    pub fn state(&self) -> &QuizState {
        self.machine.state()
    }

    pub fn section_id(&self) -> &str {
        self.machine.section_id()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn warning_visible(&self) -> bool {
        self.warning
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn load(&mut self, result: BankResult) {
        self.dispatch(QuizEvent::Loaded(result));
    }

    pub fn start(&mut self) {
        self.dispatch(QuizEvent::Start);
    }

    pub fn submit(&mut self) {
        self.dispatch(QuizEvent::Submit {
            selected: self.selected,
        });
    }

    pub fn retake(&mut self) {
        self.dispatch(QuizEvent::Retake);
    }

    pub fn back_to_start(&mut self) {
        self.dispatch(QuizEvent::BackToStart);
    }

    fn option_count(&self) -> usize {
        match self.state() {
            QuizState::Question(session) => session
                .current_question()
                .map_or(0, |question| question.options.len()),
            _ => 0,
        }
    }

    pub fn select_next_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.cursor = (self.cursor + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.option_count();
        if count > 0 {
            self.cursor = (self.cursor + count - 1) % count;
        }
    }

    /// Choose the option under the cursor.
    pub fn choose(&mut self) {
        if self.option_count() > 0 {
            self.selected = Some(self.cursor);
        }
    }

    /// Choose option `index` directly and move the cursor onto it.
    pub fn choose_index(&mut self, index: usize) {
        if index < self.option_count() {
            self.cursor = index;
            self.selected = Some(index);
        }
    }

    pub fn scroll_results_down(&mut self) {
        if let QuizState::Results(session) = self.state() {
            let max = session.records().len().saturating_sub(1);
            self.result_scroll = (self.result_scroll + 1).min(max);
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn dispatch(&mut self, event: QuizEvent) {
        for effect in self.machine.dispatch(event) {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Render(Screen::Question(_)) => {
                self.cursor = 0;
                self.selected = None;
            }
            Effect::Render(_) => {}
            Effect::ShowWarning => self.warning = true,
            Effect::HideWarning => self.warning = false,
            Effect::ScrollIntoView(ScrollBlock::Start) => self.result_scroll = 0,
            Effect::ScrollIntoView(ScrollBlock::Nearest) => {}
            Effect::LogError(message) => error!(section_id = self.section_id(), "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::models::{Question, QuestionBank, Section};

    fn loaded_app() -> App {
        let bank = QuestionBank {
            sections: vec![Section {
                id: "forms".into(),
                title: None,
                tutorial_path: None,
                questions: (0..3)
                    .map(|n| Question {
                        prompt: format!("Question {n}"),
                        options: vec!["a".into(), "b".into(), "c".into()],
                        answer_index: 0,
                        explanation: None,
                    })
                    .collect(),
            }],
        };
        let mut app = App::with_machine(QuizMachine::with_rng("forms", StdRng::seed_from_u64(11)));
        app.load(Ok(Arc::new(bank)));
        app
    }

    #[test]
    fn cursor_wraps_over_options() {
        let mut app = loaded_app();
        app.start();

        app.select_previous_option();
        assert_eq!(app.cursor(), 2);
        app.select_next_option();
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn submit_without_choice_warns_then_clears() {
        let mut app = loaded_app();
        app.start();

        app.submit();
        assert!(app.warning_visible());
        assert_eq!(app.state().screen(), Screen::Question(0));

        app.select_next_option();
        app.choose();
        app.submit();
        assert!(!app.warning_visible());
        assert_eq!(app.state().screen(), Screen::Question(1));
        assert_eq!(app.selected(), None);
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn finishing_and_retaking() {
        let mut app = loaded_app();
        app.start();
        for _ in 0..3 {
            app.choose_index(1);
            app.submit();
        }
        assert_eq!(app.state().screen(), Screen::Results);

        app.scroll_results_down();
        app.scroll_results_down();
        app.scroll_results_down();
        assert_eq!(app.result_scroll(), 2);

        app.retake();
        assert_eq!(app.state().screen(), Screen::Question(0));
        assert_eq!(app.state().session().map(|s| s.records().len()), Some(0));
    }

    #[test]
    fn keys_outside_question_do_nothing() {
        let mut app = loaded_app();
        app.choose_index(0);
        app.submit();
        assert_eq!(app.selected(), None);
        assert_eq!(app.state().screen(), Screen::Intro);
    }
}
