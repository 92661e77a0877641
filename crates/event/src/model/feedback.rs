use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub feedback_id: i32,
    pub event_id: i32,
    pub participant_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate over every feedback of an event, regardless of any list filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackStats {
    pub total: i64,
    /// Mean rating rounded to one decimal, `0.0` when nothing was submitted.
    pub average_rating: f64,
    /// Count per rating, index 0 holding rating 1.
    pub distribution: [i64; 5],
}

impl FeedbackStats {
    pub fn from_counts(counts: impl IntoIterator<Item = (i32, i64)>) -> Self {
        let mut stats = FeedbackStats::default();
        let mut sum = 0i64;

        for (rating, count) in counts {
            if !(MIN_RATING..=MAX_RATING).contains(&rating) {
                continue;
            }
            stats.distribution[(rating - MIN_RATING) as usize] += count;
            stats.total += count;
            sum += i64::from(rating) * count;
        }

        if stats.total > 0 {
            let mean = sum as f64 / stats.total as f64;
            stats.average_rating = (mean * 10.0).round() / 10.0;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_is_rounded_to_one_decimal() {
        let stats = FeedbackStats::from_counts([(5, 2), (4, 1)]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_rating, 4.7);
        assert_eq!(stats.distribution, [0, 0, 0, 1, 2]);
    }

    #[test]
    fn no_feedback_means_zero_average() {
        let stats = FeedbackStats::from_counts([]);
        assert_eq!(stats, FeedbackStats::default());
    }
}
