use serde::{Deserialize, Serialize};

/// One y-value at its position along the x-axis. `None` means the chart has
/// no data at that index, which is different from a value of zero.
pub type Sample = Option<f64>;

/// Ordered, dense sequence of samples. Position in the vector is the x-axis
/// index, starting at 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    /// Build a series from optional samples. Non-finite values are stored as
    /// absent so every present value is a usable number.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        let samples = samples
            .into_iter()
            .map(|s| s.filter(|v| v.is_finite()))
            .collect();
        Self { samples }
    }

    /// Build a series from raw values, treating NaN and infinities as absent.
    pub fn from_values(values: &[f64]) -> Self {
        Self::from_samples(values.iter().copied().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Sample {
        self.samples.get(index).copied().flatten()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples that carry a value.
    pub fn present_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    pub fn absent_count(&self) -> usize {
        self.len() - self.present_count()
    }

    /// Present values in x-axis order, absent samples dropped.
    pub fn present_values(&self) -> Vec<f64> {
        self.samples.iter().filter_map(|s| *s).collect()
    }

    /// Present values paired with their original x-axis index.
    pub fn present_points(&self) -> Vec<(usize, f64)> {
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.map(|v| (i, v)))
            .collect()
    }
}

impl From<Vec<f64>> for SampleSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(&values)
    }
}

impl FromIterator<Sample> for SampleSeries {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self::from_samples(iter.into_iter().collect())
    }
}
