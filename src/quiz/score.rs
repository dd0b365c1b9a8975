use crate::models::AnswerRecord;

/// Feedback band chosen from the percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Mid,
    Low,
}

impl ScoreTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => Self::High,
            50.. => Self::Mid,
            _ => Self::Low,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::High => "Fantastic! You're on top of this chapter.",
            Self::Mid => "Good progress—review a few spots and try again.",
            Self::Low => "No worries! Revisit the content and give it another go.",
        }
    }

    /// Style tag applied to the score banner.
    pub fn class(self) -> &'static str {
        match self {
            Self::High => "chapter-quiz__score--high",
            Self::Mid => "chapter-quiz__score--mid",
            Self::Low => "chapter-quiz__score--low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: ScoreTier,
}

impl Score {
    pub fn from_records(records: &[AnswerRecord]) -> Self {
        let total = records.len();
        let correct = records.iter().filter(|record| record.is_correct).count();
        let percentage = percentage(correct, total);
        Self {
            correct,
            total,
            percentage,
            tier: ScoreTier::from_percentage(percentage),
        }
    }
}

/// `round(100 * correct / total)` with halves rounded up; 0 when `total` is 0.
fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(outcomes: &[bool]) -> Vec<AnswerRecord> {
        outcomes
            .iter()
            .map(|&is_correct| AnswerRecord {
                prompt: "p".into(),
                options: vec!["a".into(), "b".into()],
                answer_index: 0,
                selected_index: if is_correct { 0 } else { 1 },
                is_correct,
                explanation: None,
            })
            .collect()
    }

    #[test]
    fn empty_session_scores_zero() {
        let score = Score::from_records(&[]);
        assert_eq!(score.percentage, 0);
        assert_eq!(score.tier, ScoreTier::Low);
    }

    #[test]
    fn rounds_like_math_round() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn tiers_follow_thresholds() {
        assert_eq!(ScoreTier::from_percentage(80), ScoreTier::High);
        assert_eq!(ScoreTier::from_percentage(79), ScoreTier::Mid);
        assert_eq!(ScoreTier::from_percentage(50), ScoreTier::Mid);
        assert_eq!(ScoreTier::from_percentage(49), ScoreTier::Low);
    }

    #[test]
    fn half_right_is_mid() {
        let score = Score::from_records(&records(&[false, true]));
        assert_eq!((score.correct, score.total, score.percentage), (1, 2, 50));
        assert_eq!(score.tier, ScoreTier::Mid);
        assert_eq!(score.tier.class(), "chapter-quiz__score--mid");
    }
}
