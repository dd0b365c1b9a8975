mod chapter;
mod heading;
mod question;

pub use chapter::{Chapter, ChapterTable, Icons};
pub use heading::HeadingEntry;
pub use question::{AnswerRecord, PreparedQuestion, Question, QuestionBank, Section};
