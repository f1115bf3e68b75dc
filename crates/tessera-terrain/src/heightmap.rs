//! Multi-octave fractal Brownian motion (fBm) noise layer.
//!
//! Composites octaves of simplex noise into a smooth scalar field. The same
//! sampler drives height, temperature and humidity, each with its own seed
//! and frequency.

use noise::{NoiseFn, Simplex};

/// Configuration for one fBm noise layer.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseLayerParams {
    /// Seed for this layer.
    pub seed: u32,
    /// Number of octaves to composite. Typical range: 3-6.
    pub octaves: u32,
    /// Frequency multiplier between successive octaves. Default: 2.0.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves. Default: 0.5.
    pub persistence: f64,
    /// Frequency of the first octave, in cycles per world unit.
    pub base_frequency: f64,
}

impl Default for NoiseLayerParams {
    fn default() -> Self {
        Self {
            seed: 0,
            octaves: 4,
            lacunarity: 2.0,
            persistence: 0.5,
            base_frequency: 0.02,
        }
    }
}

/// Samples a 2D fBm field over simplex noise.
pub struct NoiseLayer {
    noise: Simplex,
    params: NoiseLayerParams,
    max_amplitude: f64,
}

impl NoiseLayer {
    /// Create a new layer with the given parameters.
    pub fn new(params: NoiseLayerParams) -> Self {
        let noise = Simplex::new(params.seed);
        let mut max_amplitude = 0.0;
        let mut amp = 1.0;
        for _ in 0..params.octaves {
            max_amplitude += amp;
            amp *= params.persistence;
        }
        Self {
            noise,
            params,
            max_amplitude,
        }
    }

    /// Raw fBm value at `(x, y)`, in `[-max_amplitude, +max_amplitude]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = 1.0;

        for _ in 0..self.params.octaves {
            total += self.noise.get([x * frequency, y * frequency]) * amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total
    }

    /// fBm value remapped to `[0, 1]`.
    ///
    /// A layer with zero octaves yields the midpoint `0.5` everywhere.
    pub fn sample_normalized(&self, x: f64, y: f64) -> f64 {
        if self.max_amplitude == 0.0 {
            return 0.5;
        }
        ((self.sample(x, y) / self.max_amplitude + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Geometric sum of all octave amplitudes.
    pub fn max_amplitude(&self) -> f64 {
        self.max_amplitude
    }

    /// Return a reference to the current parameters.
    pub fn params(&self) -> &NoiseLayerParams {
        &self.params
    }
}
