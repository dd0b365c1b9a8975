//! Element trees for each quiz screen, using the `chapter-quiz__*` classes
//! the tutorial stylesheet targets.

use crate::dom::{Element, Node};
use crate::models::AnswerRecord;

use super::machine::{QuizState, Session};
use super::score::Score;

const WARNING_TEXT: &str = "Choose an answer before continuing.";
const NO_ANSWER_TEXT: &str = "No answer selected";

/// Children for the `.chapter-quiz__app` mount point in `state`.
pub fn render(state: &QuizState, warning_visible: bool) -> Vec<Node> {
    let node = match state {
        QuizState::Loading => Element::new("p")
            .class("chapter-quiz__loading")
            .text("Loading quiz…"),
        QuizState::Intro(session) => render_intro(session),
        QuizState::Question(session) => render_question(session, warning_visible),
        QuizState::Results(session) => render_results(session),
        QuizState::Error(failure) => Element::new("p")
            .class("chapter-quiz__error")
            .text(failure.message()),
    };
    vec![node.into()]
}

fn button(label: &str, variant: &str, action: &str) -> Element {
    Element::new("button")
        .class(&format!("chapter-quiz__button chapter-quiz__button--{variant}"))
        .attr("type", "button")
        .attr("data-action", action)
        .text(label)
}

fn render_intro(session: &Session) -> Element {
    let mut card = Element::new("div").class("chapter-quiz__card").child(
        Element::new("p")
            .class("chapter-quiz__meta")
            .text(format!("{} practice questions", session.total())),
    );
    if let Some(title) = &session.section().title {
        card = card.child(Element::new("p").class("chapter-quiz__section").text(title.as_str()));
    }
    card.child(
        Element::new("h3")
            .class("chapter-quiz__question")
            .text("Ready for a quick check-in?"),
    )
    .child(
        Element::new("p")
            .class("chapter-quiz__tip")
            .text("Answer each question, then review which ones to revisit."),
    )
    .child(
        Element::new("div")
            .class("chapter-quiz__actions chapter-quiz__actions--center")
            .child(button("Start quiz", "primary", "start")),
    )
}

fn render_question(session: &Session, warning_visible: bool) -> Element {
    let Some(question) = session.current_question() else {
        return Element::new("p")
            .class("chapter-quiz__error")
            .text("This quiz is unavailable right now.");
    };

    let options = question.options.iter().enumerate().map(|(index, text)| {
        Element::new("label")
            .class("chapter-quiz__option")
            .child(
                Element::new("input")
                    .attr("type", "radio")
                    .attr("name", "answer")
                    .attr("value", index.to_string()),
            )
            .child(Element::new("span").text(text.as_str()))
    });

    let mut alert = Element::new("div").class("chapter-quiz__alert").text(WARNING_TEXT);
    alert.set_attr("style", if warning_visible { "display: block" } else { "display: none" });

    let submit_label = if session.is_last_question() {
        "See results"
    } else {
        "Next question"
    };

    Element::new("form")
        .class("chapter-quiz__card")
        .child(
            Element::new("p")
                .class("chapter-quiz__meta")
                .text(format!("Question {} of {}", session.index() + 1, session.total())),
        )
        .child(
            Element::new("h3")
                .class("chapter-quiz__question")
                .text(question.prompt.as_str()),
        )
        .child(Element::new("fieldset").class("chapter-quiz__options").children(options))
        .child(alert)
        .child(
            Element::new("div").class("chapter-quiz__actions").child(
                Element::new("button")
                    .class("chapter-quiz__button chapter-quiz__button--primary")
                    .attr("type", "submit")
                    .text(submit_label),
            ),
        )
}

fn render_results(session: &Session) -> Element {
    let score = session.score();

    let review = session
        .records()
        .iter()
        .enumerate()
        .map(|(index, record)| render_review_item(index, record));

    Element::new("div")
        .class("chapter-quiz__card")
        .child(render_score(&score))
        .child(Element::new("div").class("chapter-quiz__review").children(review))
        .child(
            Element::new("div")
                .class("chapter-quiz__actions chapter-quiz__actions--center")
                .child(button("Retake quiz", "primary", "retake"))
                .child(button("Back to start", "secondary", "back-to-start")),
        )
}

fn render_score(score: &Score) -> Element {
    Element::new("div")
        .class(&format!("chapter-quiz__score {}", score.tier.class()))
        .child(Element::new("p").text(format!(
            "You answered {} of {} correctly ({}%).",
            score.correct, score.total, score.percentage
        )))
        .child(Element::new("p").text(score.tier.message()))
}

fn labelled(label: &str, value: &str) -> Element {
    Element::new("p")
        .child(Element::new("strong").text(label))
        .text(value)
}

fn render_review_item(index: usize, record: &AnswerRecord) -> Element {
    let outcome = if record.is_correct { "correct" } else { "incorrect" };
    let status = if record.is_correct {
        "Correct! Nicely done."
    } else {
        "Incorrect. Worth another look."
    };

    let mut item = Element::new("article")
        .class(&format!("chapter-quiz__review-item {outcome}"))
        .child(Element::new("h4").text(format!("Question {}", index + 1)))
        .child(labelled("Prompt: ", &record.prompt))
        .child(labelled(
            "Your answer: ",
            record.selected_option().unwrap_or(NO_ANSWER_TEXT),
        ))
        .child(labelled(
            "Correct answer: ",
            record.correct_option().unwrap_or_default(),
        ))
        .child(Element::new("p").text(status));

    if let Some(explanation) = &record.explanation {
        item = item.child(labelled("Why: ", explanation));
    }
    item
}
