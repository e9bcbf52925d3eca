// Core algorithm exports
pub mod attributes;
pub mod matcher;
pub mod sentiment;

pub use attributes::{attribute_match_score, same_species};
pub use matcher::{MatchError, MatchMode, MatchOutcome, Matcher};
pub use sentiment::{sentiment_match_score, SentimentAnalyzer, VaderAnalyzer};
