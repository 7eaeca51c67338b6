use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// An ordered sequence of feature values produced by one extractor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct FeatureVector {
    data: Vec<f32>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// A zero-filled vector of the given length
    #[inline]
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// True when every element is a finite number
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

impl Mul<f32> for &FeatureVector {
    type Output = FeatureVector;

    fn mul(self, scalar: f32) -> FeatureVector {
        FeatureVector::new(self.data.iter().map(|x| x * scalar).collect())
    }
}
