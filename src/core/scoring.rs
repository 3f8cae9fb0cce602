use crate::domain::model::{Comercio, Review};
use crate::utils::error::Result;
use crate::utils::validation::validate_score_range;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 5.0;

/// The historical running-mean update:
/// `scoring' = (scoring * nscore + new_score) / (nscore + 1)`.
/// Only reconstructs the true mean when the prior `scoring` was exact.
/// Kept as the wire-contract formula; the write path uses [`recompute`].
pub fn incremental_mean(scoring: f64, nscore: u32, new_score: f64) -> f64 {
    (scoring * f64::from(nscore) + new_score) / f64::from(nscore + 1)
}

/// Exact aggregate over the full review list: `(mean, count)`.
/// An empty list yields `(0.0, 0)`, the state of a fresh listing.
pub fn recompute(reviews: &[Review]) -> (f64, u32) {
    if reviews.is_empty() {
        return (0.0, 0);
    }
    let sum: f64 = reviews.iter().map(|r| r.score).sum();
    (sum / reviews.len() as f64, reviews.len() as u32)
}

/// Appends a review and refreshes `scoring`/`nscore`.
///
/// The score is range-checked here, not only at the input edge; an
/// out-of-range value never enters the aggregate. The aggregate is
/// recomputed from the full list, not updated incrementally, so the stored
/// mean is exact regardless of what earlier writers left behind.
pub fn push_review(comercio: &mut Comercio, text: impl Into<String>, score: f64) -> Result<()> {
    validate_score_range("score", score, MIN_SCORE, MAX_SCORE)?;

    comercio.reviews.push(Review {
        text: text.into(),
        score,
    });
    let (scoring, nscore) = recompute(&comercio.reviews);
    comercio.scoring = scoring;
    comercio.nscore = nscore;
    Ok(())
}
