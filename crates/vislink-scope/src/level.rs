//! Min/max range of a run of samples.

/// The lowest and highest sample seen over one history slot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelRange {
    /// Most negative sample.
    pub min: f32,
    /// Most positive sample.
    pub max: f32,
}

impl LevelRange {
    /// Range covering a single sample.
    #[inline]
    pub fn from_sample(sample: f32) -> Self {
        Self {
            min: sample,
            max: sample,
        }
    }

    /// Smallest range covering `self` and `sample`.
    #[inline]
    pub fn union_with(self, sample: f32) -> Self {
        Self {
            min: self.min.min(sample),
            max: self.max.max(sample),
        }
    }

    /// Largest absolute excursion in the range.
    #[inline]
    pub fn peak(&self) -> f32 {
        self.min.abs().max(self.max.abs())
    }

    /// Distance between `max` and `min`.
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}
