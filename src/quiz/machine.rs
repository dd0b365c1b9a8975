//! Quiz flow as explicit transitions.
//!
//! `Loading -> Intro -> Question(0..n) -> Results`, with a terminal `Error`
//! reachable while loading. Every transition returns the next state and the
//! effects the host must perform; nothing here touches a UI.

use std::mem;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::data::BankResult;
use crate::models::{AnswerRecord, PreparedQuestion, Section};

use super::prepare::prepare_questions;
use super::score::Score;

/// Why a quiz cannot be shown. Terminal for the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizFailure {
    /// The question bank could not be fetched or decoded.
    LoadFailed,
    /// The section is missing or has no questions.
    NoQuestions,
    /// The section has questions that cannot be answered.
    InvalidData,
}

impl QuizFailure {
    pub fn message(self) -> &'static str {
        match self {
            Self::LoadFailed => {
                "We could not load the quiz questions. Please refresh and try again."
            }
            Self::NoQuestions => "No quiz questions available yet for this chapter.",
            Self::InvalidData => "This quiz is unavailable right now.",
        }
    }
}

/// Session data for one run through the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    section: Arc<Section>,
    questions: Vec<PreparedQuestion>,
    records: Vec<AnswerRecord>,
    index: usize,
}

impl Session {
    fn fresh<R: Rng + ?Sized>(section: Arc<Section>, rng: &mut R) -> Self {
        let questions = prepare_questions(&section.questions, rng);
        Self {
            section,
            questions,
            records: Vec::new(),
            index: 0,
        }
    }

    /// Discard records and progress and reshuffle everything.
    fn restarted<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        Self::fresh(self.section, rng)
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn questions(&self) -> &[PreparedQuestion] {
        &self.questions
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&PreparedQuestion> {
        self.questions.get(self.index)
    }

    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    pub fn score(&self) -> Score {
        Score::from_records(&self.records)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    Loading,
    Intro(Session),
    Question(Session),
    Results(Session),
    Error(QuizFailure),
}

impl QuizState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Intro(session) | Self::Question(session) | Self::Results(session) => {
                Some(session)
            }
            Self::Loading | Self::Error(_) => None,
        }
    }

    pub fn screen(&self) -> Screen {
        match self {
            Self::Loading => Screen::Loading,
            Self::Intro(_) => Screen::Intro,
            Self::Question(session) => Screen::Question(session.index),
            Self::Results(_) => Screen::Results,
            Self::Error(failure) => Screen::Error(*failure),
        }
    }
}

/// What the host should currently display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Intro,
    Question(usize),
    Results,
    Error(QuizFailure),
}

#[derive(Debug, Clone)]
pub enum QuizEvent {
    /// The shared bank load finished.
    Loaded(BankResult),
    Start,
    /// The answer form was submitted, with the chosen option if any.
    Submit { selected: Option<usize> },
    Retake,
    BackToStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Nearest,
}

/// Side effects requested by a transition, in the order to apply them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Render(Screen),
    ShowWarning,
    HideWarning,
    ScrollIntoView(ScrollBlock),
    LogError(String),
}

#[derive(Debug)]
pub struct Transition {
    pub state: QuizState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: QuizState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    fn stay(state: QuizState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// Compute the next state for `event`. Events that make no sense in the
/// current state leave it untouched and produce no effects.
pub fn transition<R: Rng + ?Sized>(
    state: QuizState,
    event: QuizEvent,
    section_id: &str,
    rng: &mut R,
) -> Transition {
    match (state, event) {
        (QuizState::Loading, QuizEvent::Loaded(result)) => on_loaded(result, section_id, rng),

        (QuizState::Intro(session), QuizEvent::Start) => {
            let session = session.restarted(rng);
            Transition::to(
                QuizState::Question(session),
                vec![
                    Effect::Render(Screen::Question(0)),
                    Effect::ScrollIntoView(ScrollBlock::Nearest),
                ],
            )
        }

        (QuizState::Question(session), QuizEvent::Submit { selected }) => {
            on_submit(session, selected)
        }

        (QuizState::Results(session), QuizEvent::Retake) => {
            let session = session.restarted(rng);
            Transition::to(
                QuizState::Question(session),
                vec![
                    Effect::Render(Screen::Question(0)),
                    Effect::ScrollIntoView(ScrollBlock::Nearest),
                ],
            )
        }

        (QuizState::Results(session), QuizEvent::BackToStart) => {
            let session = session.restarted(rng);
            Transition::to(
                QuizState::Intro(session),
                vec![
                    Effect::Render(Screen::Intro),
                    Effect::ScrollIntoView(ScrollBlock::Start),
                ],
            )
        }

        (state, event) => {
            debug!(screen = ?state.screen(), ?event, "ignoring quiz event");
            Transition::stay(state)
        }
    }
}

fn on_loaded<R: Rng + ?Sized>(result: BankResult, section_id: &str, rng: &mut R) -> Transition {
    let bank = match result {
        Ok(bank) => bank,
        Err(err) => {
            return Transition::to(
                QuizState::Error(QuizFailure::LoadFailed),
                vec![
                    Effect::LogError(format!("Failed to fetch chapter quiz data: {err}")),
                    Effect::Render(Screen::Error(QuizFailure::LoadFailed)),
                ],
            );
        }
    };

    let section = match bank.section(section_id) {
        Some(section) if !section.questions.is_empty() => section,
        _ => {
            debug!(section_id, "no questions for section");
            return Transition::to(
                QuizState::Error(QuizFailure::NoQuestions),
                vec![Effect::Render(Screen::Error(QuizFailure::NoQuestions))],
            );
        }
    };

    if let Err(err) = section.validate() {
        warn!(section_id, error = %err, "rejecting malformed quiz section");
        return Transition::to(
            QuizState::Error(QuizFailure::InvalidData),
            vec![Effect::Render(Screen::Error(QuizFailure::InvalidData))],
        );
    }

    let session = Session::fresh(Arc::new(section.clone()), rng);
    Transition::to(QuizState::Intro(session), vec![Effect::Render(Screen::Intro)])
}

fn on_submit(mut session: Session, selected: Option<usize>) -> Transition {
    let Some(question) = session.current_question() else {
        return Transition::stay(QuizState::Question(session));
    };

    let selected = selected.filter(|&index| index < question.options.len());
    let Some(selected) = selected else {
        return Transition::to(QuizState::Question(session), vec![Effect::ShowWarning]);
    };

    let record = AnswerRecord::new(question, selected);
    session.records.push(record);

    if session.is_last_question() {
        Transition::to(
            QuizState::Results(session),
            vec![
                Effect::HideWarning,
                Effect::Render(Screen::Results),
                Effect::ScrollIntoView(ScrollBlock::Start),
            ],
        )
    } else {
        session.index += 1;
        let index = session.index;
        Transition::to(
            QuizState::Question(session),
            vec![
                Effect::HideWarning,
                Effect::Render(Screen::Question(index)),
                Effect::ScrollIntoView(ScrollBlock::Nearest),
            ],
        )
    }
}

/// One quiz container: its section id, current state and random source.
#[derive(Debug)]
pub struct QuizMachine<R = StdRng> {
    section_id: String,
    state: QuizState,
    rng: R,
}

impl QuizMachine<StdRng> {
    pub fn new(section_id: impl Into<String>) -> Self {
        Self::with_rng(section_id, StdRng::from_entropy())
    }
}

impl<R: Rng> QuizMachine<R> {
    pub fn with_rng(section_id: impl Into<String>, rng: R) -> Self {
        Self {
            section_id: section_id.into(),
            state: QuizState::Loading,
            rng,
        }
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// Apply `event` and return the effects to perform.
    pub fn dispatch(&mut self, event: QuizEvent) -> Vec<Effect> {
        let state = mem::replace(&mut self.state, QuizState::Loading);
        let Transition { state, effects } =
            transition(state, event, &self.section_id, &mut self.rng);
        self.state = state;
        effects
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use crate::error::LoadError;
    use crate::models::{Question, QuestionBank};

    use super::*;

    fn bank_with(section: Section) -> BankResult {
        Ok(Arc::new(QuestionBank {
            sections: vec![section],
        }))
    }

    fn intro_section() -> Section {
        Section {
            id: "intro".into(),
            title: Some("Introduction".into()),
            tutorial_path: None,
            questions: vec![
                Question {
                    prompt: "First?".into(),
                    options: vec!["yes".into(), "no".into(), "maybe".into()],
                    answer_index: 0,
                    explanation: None,
                },
                Question {
                    prompt: "Second?".into(),
                    options: vec!["left".into(), "right".into()],
                    answer_index: 1,
                    explanation: Some("Right is right.".into()),
                },
            ],
        }
    }

    fn machine() -> QuizMachine {
        QuizMachine::with_rng("intro", StdRng::seed_from_u64(42))
    }

    fn loaded_machine() -> QuizMachine {
        let mut machine = machine();
        machine.dispatch(QuizEvent::Loaded(bank_with(intro_section())));
        machine
    }

    fn current(machine: &QuizMachine) -> PreparedQuestion {
        machine
            .state()
            .session()
            .and_then(Session::current_question)
            .cloned()
            .unwrap()
    }

    fn wrong_answer(question: &PreparedQuestion) -> usize {
        (question.answer_index + 1) % question.options.len()
    }

    #[test]
    fn loading_resolves_to_intro() {
        let mut machine = machine();
        let effects = machine.dispatch(QuizEvent::Loaded(bank_with(intro_section())));

        assert_eq!(effects, vec![Effect::Render(Screen::Intro)]);
        let session = machine.state().session().unwrap();
        assert_eq!(session.total(), 2);
        assert!(session.records().is_empty());
    }

    #[test]
    fn load_failure_is_terminal_and_logged() {
        let mut machine = machine();
        let err = Arc::new(LoadError::Status {
            location: "q.json".into(),
            status: 500,
        });

        let effects = machine.dispatch(QuizEvent::Loaded(Err(err)));

        assert!(matches!(effects[0], Effect::LogError(_)));
        assert_eq!(effects[1], Effect::Render(Screen::Error(QuizFailure::LoadFailed)));
        assert_eq!(machine.state(), &QuizState::Error(QuizFailure::LoadFailed));

        assert!(machine.dispatch(QuizEvent::Start).is_empty());
        assert_eq!(machine.state(), &QuizState::Error(QuizFailure::LoadFailed));
    }

    #[test]
    fn missing_or_empty_section_has_no_questions() {
        let mut missing = QuizMachine::with_rng("elsewhere", StdRng::seed_from_u64(1));
        let effects = missing.dispatch(QuizEvent::Loaded(bank_with(intro_section())));
        assert_eq!(effects, vec![Effect::Render(Screen::Error(QuizFailure::NoQuestions))]);

        let mut empty = machine();
        let mut section = intro_section();
        section.questions.clear();
        empty.dispatch(QuizEvent::Loaded(bank_with(section)));
        assert_eq!(empty.state(), &QuizState::Error(QuizFailure::NoQuestions));
    }

    #[test]
    fn malformed_section_is_rejected_up_front() {
        let mut machine = machine();
        let mut section = intro_section();
        section.questions[1].answer_index = 9;

        machine.dispatch(QuizEvent::Loaded(bank_with(section)));

        assert_eq!(machine.state(), &QuizState::Error(QuizFailure::InvalidData));
    }

    #[test]
    fn submit_without_selection_is_rejected() {
        let mut machine = loaded_machine();
        machine.dispatch(QuizEvent::Start);

        let effects = machine.dispatch(QuizEvent::Submit { selected: None });
        assert_eq!(effects, vec![Effect::ShowWarning]);

        let out_of_range = machine.dispatch(QuizEvent::Submit { selected: Some(99) });
        assert_eq!(out_of_range, vec![Effect::ShowWarning]);

        let session = machine.state().session().unwrap();
        assert_eq!(session.index(), 0);
        assert!(session.records().is_empty());
    }

    #[test]
    fn one_wrong_one_right_scores_fifty_mid() {
        let mut machine = loaded_machine();
        machine.dispatch(QuizEvent::Start);

        let first = current(&machine);
        let effects = machine.dispatch(QuizEvent::Submit {
            selected: Some(wrong_answer(&first)),
        });
        assert_eq!(effects[0], Effect::HideWarning);
        assert_eq!(effects[1], Effect::Render(Screen::Question(1)));

        let second = current(&machine);
        let effects = machine.dispatch(QuizEvent::Submit {
            selected: Some(second.answer_index),
        });
        assert_eq!(effects[1], Effect::Render(Screen::Results));

        let QuizState::Results(session) = machine.state() else {
            panic!("expected results, got {:?}", machine.state());
        };
        assert_eq!(session.records().len(), 2);
        let score = session.score();
        assert_eq!((score.correct, score.percentage), (1, 50));
        assert_eq!(score.tier, crate::quiz::ScoreTier::Mid);
        assert!(!session.records()[0].is_correct);
        assert!(session.records()[1].is_correct);
    }

    #[test]
    fn retake_and_back_to_start_reset_the_session() {
        let mut machine = loaded_machine();
        machine.dispatch(QuizEvent::Start);
        for _ in 0..2 {
            let question = current(&machine);
            machine.dispatch(QuizEvent::Submit {
                selected: Some(question.answer_index),
            });
        }
        assert_eq!(machine.state().screen(), Screen::Results);

        let mut before = machine.rng.clone();
        let mut expected_rng = machine.rng.clone();
        let expected = prepare_questions(&intro_section().questions, &mut expected_rng);

        let effects = machine.dispatch(QuizEvent::Retake);
        assert_eq!(effects[0], Effect::Render(Screen::Question(0)));
        let session = machine.state().session().unwrap();
        assert_eq!(session.index(), 0);
        assert!(session.records().is_empty());
        assert_eq!(session.total(), 2);
        assert_eq!(session.questions(), expected.as_slice());
        assert_eq!(machine.rng.clone().next_u64(), expected_rng.next_u64());
        assert_ne!(machine.rng.clone().next_u64(), before.next_u64());

        for _ in 0..2 {
            let question = current(&machine);
            machine.dispatch(QuizEvent::Submit {
                selected: Some(question.answer_index),
            });
        }
        let mut expected_rng = machine.rng.clone();
        let expected = prepare_questions(&intro_section().questions, &mut expected_rng);
        let effects = machine.dispatch(QuizEvent::BackToStart);
        assert_eq!(
            effects,
            vec![
                Effect::Render(Screen::Intro),
                Effect::ScrollIntoView(ScrollBlock::Start)
            ]
        );
        let session = machine.state().session().unwrap();
        assert_eq!(session.index(), 0);
        assert!(session.records().is_empty());
        assert_eq!(session.questions(), expected.as_slice());
    }

    #[test]
    fn out_of_order_events_are_ignored() {
        let mut machine = loaded_machine();
        let before = machine.state().clone();

        assert!(machine.dispatch(QuizEvent::Submit { selected: Some(0) }).is_empty());
        assert!(machine.dispatch(QuizEvent::Retake).is_empty());
        assert!(machine
            .dispatch(QuizEvent::Loaded(bank_with(intro_section())))
            .is_empty());

        assert_eq!(machine.state(), &before);
    }
}
