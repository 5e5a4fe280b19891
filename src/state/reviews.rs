//! Review Store - Append-only list of accepted reviews.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::reactive::{Dependency, Field};
use crate::types::Review;

/// Insertion order is display order. Entries are never edited or removed.
#[derive(Clone, Debug)]
pub struct ReviewStore {
    reviews: Field<Vec<Review>>,
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            reviews: Field::new(Vec::new()),
        }
    }

    /// Store a review that has already passed validation.
    pub fn append(&self, review: Review) {
        debug!(name = %review.name, rating = %review.rating, "review stored");
        self.reviews.update(|reviews| reviews.push(review));
    }

    /// Decode a channel payload and append it.
    pub fn append_payload(&self, payload: &Value) -> anyhow::Result<()> {
        let review = Review::deserialize(payload)?;
        self.append(review);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.reviews.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the stored reviews, oldest first.
    pub fn reviews(&self) -> Vec<Review> {
        self.reviews.get()
    }

    pub fn dependency(&self) -> Dependency {
        self.reviews.dependency()
    }

    /// The stored reviews as a JSON array.
    pub fn to_value(&self) -> Value {
        self.reviews.with(|reviews| serde_json::to_value(reviews).unwrap_or(Value::Null))
    }
}
