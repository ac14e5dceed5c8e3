// src/services/stats.rs

use crate::{
    models::stats::{AttemptRecord, QuizStats, StatsSummary},
    utils::rounding::round2,
};

impl QuizStats {
    /// Folds one graded attempt into the rolling statistics.
    pub fn record(&mut self, attempt: AttemptRecord) {
        let previous_attempts = self.attempts;
        let score = attempt.score;

        self.attempts += 1;
        if attempt.passed {
            self.passes += 1;
        } else {
            self.fails += 1;
        }

        self.high_score = self.high_score.max(score);
        // The zero-state low of 100 must not survive the first attempt.
        self.low_score = if previous_attempts == 0 {
            score
        } else {
            self.low_score.min(score)
        };
        self.average_score = round2(
            (self.average_score * previous_attempts as f64 + score) / self.attempts as f64,
        );

        self.history.push(attempt);
    }

    /// Share of passing attempts in percent, two decimals.
    pub fn pass_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        round2(100.0 * self.passes as f64 / self.attempts as f64)
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            attempts: self.attempts,
            passes: self.passes,
            fails: self.fails,
            high_score: self.high_score,
            low_score: self.low_score,
            average_score: self.average_score,
            pass_rate: self.pass_rate(),
        }
    }
}
