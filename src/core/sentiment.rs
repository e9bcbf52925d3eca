use crate::models::SurveyResponses;

/// Text sentiment polarity source.
///
/// Implementations map free text onto [-1.0, 1.0], negative to positive.
/// Exact values are implementation-specific; only the bounded range and the
/// ordering of clearly-negative vs clearly-positive text are relied upon.
pub trait SentimentAnalyzer: Send + Sync {
    /// Polarity of `text`, or `None` when the text cannot be scored.
    /// An unscorable answer drops that question pair from the average.
    fn polarity(&self, text: &str) -> Option<f64>;
}

/// VADER lexicon analyzer, the default polarity source.
///
/// The compound score is already normalized into [-1, 1].
pub struct VaderAnalyzer {
    inner: vader_sentiment::SentimentIntensityAnalyzer<'static>,
}

impl VaderAnalyzer {
    pub fn new() -> Self {
        Self {
            inner: vader_sentiment::SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer for VaderAnalyzer {
    fn polarity(&self, text: &str) -> Option<f64> {
        self.inner.polarity_scores(text).get("compound").copied()
    }
}

/// Calculate the sentiment compatibility score (0.0-10.0) for two sets of
/// survey answers.
///
/// For every question answered non-empty by both sides, polarity similarity
/// is `max(0, 1 - |polarity_a - polarity_b|)`; the result is the mean
/// similarity scaled by 10. Questions answered by only one side are skipped.
/// No qualifying pairs at all yields 0.0.
pub fn sentiment_match_score(
    analyzer: &dyn SentimentAnalyzer,
    ours: &SurveyResponses,
    theirs: &SurveyResponses,
) -> f64 {
    let mut total_similarity = 0.0;
    let mut count = 0u32;

    for (question, our_answer) in ours {
        let their_answer = match theirs.get(question) {
            Some(answer) => answer,
            None => continue,
        };

        if our_answer.is_empty() || their_answer.is_empty() {
            continue;
        }

        let (our_polarity, their_polarity) =
            match (analyzer.polarity(our_answer), analyzer.polarity(their_answer)) {
                (Some(ours), Some(theirs)) => (ours, theirs),
                _ => continue,
            };

        let difference = (our_polarity - their_polarity).abs();
        total_similarity += (1.0 - difference).max(0.0);
        count += 1;
    }

    if count == 0 {
        0.0
    } else {
        total_similarity / count as f64 * 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Fixed polarity table, so the scorer's arithmetic is tested on its own.
    struct TableAnalyzer(HashMap<&'static str, f64>);

    impl SentimentAnalyzer for TableAnalyzer {
        fn polarity(&self, text: &str) -> Option<f64> {
            self.0.get(text).copied()
        }
    }

    fn responses(pairs: &[(&str, &str)]) -> SurveyResponses {
        pairs
            .iter()
            .map(|(q, a)| (q.to_string(), a.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_sets_score_zero() {
        let analyzer = TableAnalyzer(HashMap::new());
        let empty = SurveyResponses::new();
        let answered = responses(&[("q1", "great")]);

        assert_eq!(sentiment_match_score(&analyzer, &empty, &empty), 0.0);
        assert_eq!(sentiment_match_score(&analyzer, &answered, &empty), 0.0);
        assert_eq!(sentiment_match_score(&analyzer, &empty, &answered), 0.0);
    }

    #[test]
    fn test_identical_polarity_scores_ten() {
        let analyzer = TableAnalyzer(HashMap::from([("great", 0.8)]));
        let ours = responses(&[("q1", "great")]);
        let theirs = responses(&[("q1", "great")]);

        let score = sentiment_match_score(&analyzer, &ours, &theirs);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_opposite_extremes_clamp_to_zero() {
        let analyzer = TableAnalyzer(HashMap::from([("love it", 1.0), ("hate it", -1.0)]));
        let ours = responses(&[("q1", "love it")]);
        let theirs = responses(&[("q1", "hate it")]);

        assert_eq!(sentiment_match_score(&analyzer, &ours, &theirs), 0.0);
    }

    #[test]
    fn test_mean_over_answered_questions() {
        let analyzer = TableAnalyzer(HashMap::from([
            ("great", 0.8),
            ("fine", 0.3),
            ("bad", -0.2),
        ]));
        // q1: |0.8 - 0.8| -> similarity 1.0
        // q2: |0.3 - (-0.2)| -> similarity 0.5
        let ours = responses(&[("q1", "great"), ("q2", "fine")]);
        let theirs = responses(&[("q1", "great"), ("q2", "bad")]);

        let score = sentiment_match_score(&analyzer, &ours, &theirs);
        assert!((score - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_unshared_questions_skipped() {
        let analyzer = TableAnalyzer(HashMap::from([("great", 0.8)]));
        let ours = responses(&[("q1", "great"), ("q2", "great")]);
        let theirs = responses(&[("q1", "great"), ("q3", "great")]);

        // Only q1 qualifies; q2 and q3 have no counterpart.
        let score = sentiment_match_score(&analyzer, &ours, &theirs);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_answers_skipped() {
        let analyzer = TableAnalyzer(HashMap::from([("great", 0.8)]));
        let ours = responses(&[("q1", "great"), ("q2", "")]);
        let theirs = responses(&[("q1", "great"), ("q2", "great")]);

        let score = sentiment_match_score(&analyzer, &ours, &theirs);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_unscorable_answer_drops_pair() {
        // "???" is not in the table, so q2 is dropped rather than failing.
        let analyzer = TableAnalyzer(HashMap::from([("great", 0.8)]));
        let ours = responses(&[("q1", "great"), ("q2", "???")]);
        let theirs = responses(&[("q1", "great"), ("q2", "great")]);

        let score = sentiment_match_score(&analyzer, &ours, &theirs);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_score_stays_in_range() {
        let analyzer = TableAnalyzer(HashMap::from([
            ("a", 1.0),
            ("b", -1.0),
            ("c", 0.0),
        ]));
        let ours = responses(&[("q1", "a"), ("q2", "b"), ("q3", "c")]);
        let theirs = responses(&[("q1", "b"), ("q2", "b"), ("q3", "a")]);

        let score = sentiment_match_score(&analyzer, &ours, &theirs);
        assert!((0.0..=10.0).contains(&score));
    }

    #[test]
    fn test_vader_orders_agreement_above_disagreement() {
        let analyzer = VaderAnalyzer::new();

        let ours = responses(&[("q1", "I love long walks")]);
        let agreeing = responses(&[("q1", "I really enjoy walking")]);
        let disagreeing = responses(&[("q1", "I hate long walks")]);

        let agree_score = sentiment_match_score(&analyzer, &ours, &agreeing);
        let disagree_score = sentiment_match_score(&analyzer, &ours, &disagreeing);

        assert!(agree_score > 6.0, "agreeing answers scored {}", agree_score);
        assert!(
            disagree_score < 3.0,
            "disagreeing answers scored {}",
            disagree_score
        );
        assert!(agree_score > disagree_score);
    }
}
