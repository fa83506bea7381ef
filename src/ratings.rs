use serde::{Serialize, Serializer};

/// Review-count bucket shown on store cards: the exact count up to 3, the
/// "3+" label for anything larger. Serializes as a bare number or the label,
/// so callers must not reinterpret the label as a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerCount {
    Exact(i64),
    Capped,
}

impl Serialize for ReviewerCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ReviewerCount::Exact(n) => serializer.serialize_i64(*n),
            ReviewerCount::Capped => serializer.serialize_str("3+"),
        }
    }
}

/// Arithmetic mean of the ratings, rounded to one decimal place.
/// An empty set is a defined case and yields 0.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

pub fn reviewer_count(count: usize) -> ReviewerCount {
    if count > 3 {
        ReviewerCount::Capped
    } else {
        ReviewerCount::Exact(count as i64)
    }
}

/// Share of ratings above 3, rounded to the nearest integer and rendered
/// with a trailing percent sign. "0%" for the empty set.
pub fn good_review_percentage(ratings: &[i32]) -> String {
    if ratings.is_empty() {
        return "0%".to_string();
    }
    let good = ratings.iter().filter(|r| **r > 3).count();
    let pct = (good as f64 * 100.0 / ratings.len() as f64).round();
    format!("{}%", pct as i64)
}
