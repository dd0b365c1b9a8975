use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single multiple-choice question as authored in the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl Question {
    /// Text of the correct option, if the answer index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.answer_index).map(String::as_str)
    }
}

/// A named bucket of questions, keyed by the id a quiz container declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutorial_path: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    /// Check every question before a session is built from it.
    pub fn validate(&self) -> Result<(), DataError> {
        for (index, question) in self.questions.iter().enumerate() {
            if question.options.is_empty() {
                return Err(DataError::NoOptions {
                    section: self.id.clone(),
                    question: index,
                });
            }
            if question.answer_index >= question.options.len() {
                return Err(DataError::AnswerOutOfRange {
                    section: self.id.clone(),
                    question: index,
                    answer_index: question.answer_index,
                    option_count: question.options.len(),
                });
            }
        }
        Ok(())
    }
}

/// The whole question bank document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl QuestionBank {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }
}

/// A question with its options shuffled for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub explanation: Option<String>,
}

/// What the user answered for one question. Never mutated once logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub prompt: String,
    pub options: Vec<String>,
    pub answer_index: usize,
    pub selected_index: usize,
    pub is_correct: bool,
    pub explanation: Option<String>,
}

impl AnswerRecord {
    pub fn new(question: &PreparedQuestion, selected_index: usize) -> Self {
        Self {
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            answer_index: question.answer_index,
            selected_index,
            is_correct: selected_index == question.answer_index,
            explanation: question.explanation.clone(),
        }
    }

    pub fn selected_option(&self) -> Option<&str> {
        self.options.get(self.selected_index).map(String::as_str)
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.answer_index).map(String::as_str)
    }
}
