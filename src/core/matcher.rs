use crate::core::attributes::{attribute_match_score, same_species};
use crate::core::sentiment::{sentiment_match_score, SentimentAnalyzer, VaderAnalyzer};
use crate::models::{AttributeWeights, CandidateRecord, RankedMatch, SurveyResponses, UserRecord};
use std::sync::Arc;
use thiserror::Error;

/// Failures the ranker can signal to its caller.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The current user has no pet profile at all. Individual blank fields
    /// never raise this; they only skip their scoring rules.
    #[error("no pet profile found for current user")]
    ProfileIncomplete,
}

/// Ranking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Attribute score only. No species prefilter.
    Attributes,
    /// Attribute + sentiment sum. The pool is restricted to candidates of
    /// the current user's species; the attribute-only mode is not.
    Combined,
}

/// Result of a ranking run.
#[derive(Debug)]
pub struct MatchOutcome {
    pub matches: Vec<RankedMatch>,
    pub total_candidates: usize,
}

/// Match ranker: scores a candidate pool against the current user and
/// returns it ordered by final score.
///
/// Pure computation over already-fetched records; candidates and surveys
/// are supplied by the caller and nothing is cached between calls.
#[derive(Clone)]
pub struct Matcher {
    weights: AttributeWeights,
    analyzer: Arc<dyn SentimentAnalyzer>,
}

impl Matcher {
    pub fn new(weights: AttributeWeights, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self { weights, analyzer }
    }

    pub fn with_default_weights(analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self {
            weights: AttributeWeights::default(),
            analyzer,
        }
    }

    /// Rank `candidates` against the current user.
    ///
    /// Candidates without a pet profile are silently excluded. In
    /// [`MatchMode::Combined`], candidates of a different (or missing)
    /// species are excluded as well, and a missing survey on either side
    /// scores as an empty one rather than failing.
    ///
    /// Ordering is descending by final score; equal scores fall back to
    /// candidate id ascending so ranking is reproducible across runs.
    /// No result cap is applied here; that is the caller's call.
    pub fn rank(
        &self,
        current: &UserRecord,
        current_survey: Option<&SurveyResponses>,
        candidates: Vec<CandidateRecord>,
        mode: MatchMode,
    ) -> Result<MatchOutcome, MatchError> {
        let current_pet = current
            .pet_profile
            .as_ref()
            .ok_or(MatchError::ProfileIncomplete)?;

        let total_candidates = candidates.len();

        let empty_survey = SurveyResponses::new();
        let our_survey = current_survey.unwrap_or(&empty_survey);

        let mut matches: Vec<RankedMatch> = candidates
            .into_iter()
            .filter(|candidate| candidate.user.uid != current.uid)
            .filter_map(|candidate| {
                let CandidateRecord { user, survey } = candidate;
                let pet_profile = user.pet_profile?;

                if mode == MatchMode::Combined && !same_species(current_pet, &pet_profile) {
                    return None;
                }

                let attribute_score =
                    attribute_match_score(current_pet, &pet_profile, &self.weights);

                let sentiment_score = match mode {
                    MatchMode::Attributes => None,
                    MatchMode::Combined => {
                        let their_survey = survey.unwrap_or_default();
                        Some(sentiment_match_score(
                            self.analyzer.as_ref(),
                            our_survey,
                            &their_survey,
                        ))
                    }
                };

                let final_score = attribute_score as f64 + sentiment_score.unwrap_or(0.0);

                Some(RankedMatch {
                    uid: user.uid,
                    display_name: user.display_name,
                    pet_profile,
                    attribute_score,
                    sentiment_score,
                    final_score,
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.uid.cmp(&b.uid))
        });

        Ok(MatchOutcome {
            matches,
            total_candidates,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights(Arc::new(VaderAnalyzer::new()))
    }
}
