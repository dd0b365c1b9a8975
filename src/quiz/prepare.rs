use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{PreparedQuestion, Question};

/// Shuffle the question order and, independently, each question's options.
///
/// The correct option travels with its text, so `answer_index` always points
/// at the same option text it did before shuffling.
pub fn prepare_questions<R: Rng + ?Sized>(
    questions: &[Question],
    rng: &mut R,
) -> Vec<PreparedQuestion> {
    let mut order: Vec<&Question> = questions.iter().collect();
    order.shuffle(rng);

    order
        .into_iter()
        .map(|question| prepare_question(question, rng))
        .collect()
}

fn prepare_question<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> PreparedQuestion {
    let mut paired: Vec<(usize, &String)> = question.options.iter().enumerate().collect();
    paired.shuffle(rng);

    let answer_index = paired
        .iter()
        .position(|(original, _)| *original == question.answer_index)
        .unwrap_or(question.answer_index);

    PreparedQuestion {
        prompt: question.prompt.clone(),
        options: paired.into_iter().map(|(_, text)| text.clone()).collect(),
        answer_index,
        explanation: question.explanation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn question(prompt: &str, options: &[&str], answer_index: usize) -> Question {
        Question {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer_index,
            explanation: None,
        }
    }

    #[test]
    fn shuffled_options_keep_the_correct_text() {
        let questions = vec![
            question("q1", &["a", "b", "c", "d"], 2),
            question("q2", &["w", "x", "y", "z", "v"], 0),
            question("q3", &["only"], 0),
        ];

        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let prepared = prepare_questions(&questions, &mut rng);
            assert_eq!(prepared.len(), questions.len());

            for prepared in &prepared {
                let original = questions.iter().find(|q| q.prompt == prepared.prompt).unwrap();

                let mut before = original.options.clone();
                let mut after = prepared.options.clone();
                before.sort();
                after.sort();
                assert_eq!(before, after);

                assert_eq!(
                    prepared.options[prepared.answer_index],
                    original.options[original.answer_index]
                );
            }
        }
    }

    #[test]
    fn every_question_appears_once() {
        let questions: Vec<_> = (0..10)
            .map(|i| question(&format!("q{i}"), &["a", "b"], 1))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        let mut prompts: Vec<_> = prepare_questions(&questions, &mut rng)
            .into_iter()
            .map(|q| q.prompt)
            .collect();
        prompts.sort();
        let mut expected: Vec<_> = questions.iter().map(|q| q.prompt.clone()).collect();
        expected.sort();
        assert_eq!(prompts, expected);
    }

    #[test]
    fn duplicate_option_texts_still_track_the_correct_slot() {
        let questions = vec![question("dup", &["same", "same", "other"], 1)];
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let prepared = &prepare_questions(&questions, &mut rng)[0];
            assert_eq!(prepared.options[prepared.answer_index], "same");
        }
    }

    #[test]
    fn empty_section_prepares_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(prepare_questions(&[], &mut rng).is_empty());
    }
}
