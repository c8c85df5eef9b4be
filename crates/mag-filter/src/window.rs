//! Moving-Average Window

use crate::sample::MagSample;

/// Circular per-axis history of the last `N` samples
///
/// Slots start at zero and the average always spans all `N` of them, so the
/// first `N - 1` averages are pulled toward zero.
#[derive(Debug, Clone)]
pub struct AverageWindow<const N: usize> {
    x: [f32; N],
    y: [f32; N],
    z: [f32; N],
    idx: usize,
}

impl<const N: usize> AverageWindow<N> {
    const NON_EMPTY: () = assert!(N > 0, "window must hold at least one sample");

    /// Create a zero-filled window
    pub fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            x: [0.0; N],
            y: [0.0; N],
            z: [0.0; N],
            idx: 0,
        }
    }

    /// Overwrite the oldest slot with `sample`
    pub fn update(&mut self, sample: MagSample) {
        self.x[self.idx] = sample.x;
        self.y[self.idx] = sample.y;
        self.z[self.idx] = sample.z;
        self.idx = (self.idx + 1) % N;
    }

    /// Mean of every slot, per axis
    pub fn average(&self) -> MagSample {
        let n = N as f32;
        MagSample {
            x: self.x.iter().sum::<f32>() / n,
            y: self.y.iter().sum::<f32>() / n,
            z: self.z.iter().sum::<f32>() / n,
        }
    }

    /// Slot the next sample will overwrite
    pub fn index(&self) -> usize {
        self.idx
    }
}

impl<const N: usize> Default for AverageWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}
