use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::NoiseLayer;

/// Stateless multi-octave Perlin evaluator shared by every layer.
pub struct NoiseField {
    perlin: FastNoiseLite,
}

impl NoiseField {
    pub fn new(seed: i32) -> Self {
        let mut perlin = FastNoiseLite::with_seed(seed);
        perlin.set_noise_type(Some(NoiseType::Perlin));
        perlin.set_frequency(Some(1.0));
        Self { perlin }
    }

    /// Single Perlin sample remapped to `[0, 1]`.
    #[inline]
    fn perlin01(&self, x: f32, z: f32) -> f32 {
        ((self.perlin.get_noise_2d(x, z) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Fractal sum of `layer.octaves` octaves at doubling frequency, plus the offset.
    pub fn evaluate_2d(&self, x: f32, z: f32, layer: &NoiseLayer) -> f32 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        for _ in 0..layer.octaves {
            total += self.perlin01(x * layer.scale * frequency, z * layer.scale * frequency)
                * layer.height_scale;
            frequency *= 2.0;
        }
        total + layer.height_offset
    }

    /// Mean of the six axis-pair evaluations; varies along all three axes.
    pub fn evaluate_3d(&self, x: f32, y: f32, z: f32, layer: &NoiseLayer) -> f32 {
        let xy = self.evaluate_2d(x, y, layer);
        let yz = self.evaluate_2d(y, z, layer);
        let yx = self.evaluate_2d(y, x, layer);
        let zy = self.evaluate_2d(z, y, layer);
        let xz = self.evaluate_2d(x, z, layer);
        let zx = self.evaluate_2d(z, x, layer);
        (xy + yz + yx + zy + xz + zx) / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_height_scale_yields_offset() {
        let n = NoiseField::new(7);
        let flat = NoiseLayer::new(3, 0.37, 0.0, 2.0, 0.0);
        for (x, z) in [(0.0, 0.0), (13.5, -4.25), (1000.0, 77.0)] {
            assert_eq!(n.evaluate_2d(x, z, &flat), 2.0);
            assert_eq!(n.evaluate_3d(x, 5.0, z, &flat), 2.0);
        }
    }

    #[test]
    fn octave_sum_is_bounded() {
        let n = NoiseField::new(0);
        let layer = NoiseLayer::new(4, 0.013, 10.0, 5.0, 0.0);
        for i in 0..200 {
            let v = n.evaluate_2d(i as f32 * 1.7, i as f32 * -0.9, &layer);
            assert!((5.0..=45.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let a = NoiseField::new(42);
        let b = NoiseField::new(42);
        let layer = NoiseLayer::new(2, 0.1, 4.0, 0.0, 0.0);
        for i in 0..50 {
            let (x, y, z) = (i as f32 * 0.7, i as f32 * 1.3, i as f32 * -2.1);
            assert_eq!(
                a.evaluate_3d(x, y, z, &layer).to_bits(),
                b.evaluate_3d(x, y, z, &layer).to_bits()
            );
        }
    }
}
