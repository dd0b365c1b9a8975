//! Chapter quiz: session preparation, the flow state machine and its views.

mod machine;
mod prepare;
mod score;
pub mod view;

pub use machine::{
    transition, Effect, QuizEvent, QuizFailure, QuizMachine, QuizState, Screen, ScrollBlock,
    Session, Transition,
};
pub use prepare::prepare_questions;
pub use score::{Score, ScoreTier};
