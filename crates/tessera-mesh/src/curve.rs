//! Monotonic height-response curves.

/// Errors raised when building a [`HeightCurve`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// A curve needs at least one key.
    #[error("height curve has no keys")]
    Empty,

    /// Key times must be finite and strictly increasing.
    #[error("key {index} time {time} does not follow the previous key")]
    UnorderedKey {
        /// Index of the offending key.
        index: usize,
        /// Its time.
        time: f32,
    },

    /// Key values must never decrease.
    #[error("key {index} value {value} is lower than the previous key")]
    NotMonotonic {
        /// Index of the offending key.
        index: usize,
        /// Its value.
        value: f32,
    },
}

/// A piecewise-linear, non-decreasing mapping from normalized height to
/// vertical displacement factor.
///
/// Inputs before the first key or after the last are clamped to the end
/// values, so flat lowlands and capped peaks are expressed with keys alone.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightCurve {
    keys: Vec<(f32, f32)>,
}

impl HeightCurve {
    /// Builds a curve from `(time, value)` keys.
    ///
    /// # Errors
    ///
    /// Returns a [`CurveError`] if `keys` is empty, times are not strictly
    /// increasing, or values decrease.
    pub fn new(keys: Vec<(f32, f32)>) -> Result<Self, CurveError> {
        if keys.is_empty() {
            return Err(CurveError::Empty);
        }
        for (index, pair) in keys.windows(2).enumerate() {
            let ((t0, v0), (t1, v1)) = (pair[0], pair[1]);
            if !t1.is_finite() || t1 <= t0 {
                return Err(CurveError::UnorderedKey {
                    index: index + 1,
                    time: t1,
                });
            }
            if v1 < v0 {
                return Err(CurveError::NotMonotonic {
                    index: index + 1,
                    value: v1,
                });
            }
        }
        Ok(Self { keys })
    }

    /// The identity curve on `[0, 1]`.
    pub fn linear() -> Self {
        Self {
            keys: vec![(0.0, 0.0), (1.0, 1.0)],
        }
    }

    /// The curve's keys.
    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    /// Evaluates the curve at `t`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        let last = self.keys[self.keys.len() - 1];
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }
        // `t` lies strictly inside the key range, so a bracketing pair exists.
        let upper = self.keys.partition_point(|&(time, _)| time <= t);
        let (t0, v0) = self.keys[upper - 1];
        let (t1, v1) = self.keys[upper];
        v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    }
}

impl Default for HeightCurve {
    fn default() -> Self {
        Self::linear()
    }
}
