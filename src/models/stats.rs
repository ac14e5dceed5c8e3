// src/models/stats.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One graded attempt in a quiz's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub score: f64,
    pub timestamp: DateTime<Utc>,
    pub passed: bool,
}

/// Rolling statistics stored on the quiz document.
/// Absent until the first graded attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizStats {
    pub attempts: i64,
    pub passes: i64,
    pub fails: i64,
    pub high_score: f64,
    pub low_score: f64,
    pub average_score: f64,

    /// Every attempt ever graded, oldest first. Never trimmed.
    #[serde(default)]
    pub history: Vec<AttemptRecord>,
}

impl Default for QuizStats {
    fn default() -> Self {
        Self {
            attempts: 0,
            passes: 0,
            fails: 0,
            high_score: 0.0,
            low_score: 100.0,
            average_score: 0.0,
            history: Vec::new(),
        }
    }
}

/// Statistics snapshot returned with a grade result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub attempts: i64,
    pub passes: i64,
    pub fails: i64,
    pub high_score: f64,
    pub low_score: f64,
    pub average_score: f64,
    pub pass_rate: f64,
}
