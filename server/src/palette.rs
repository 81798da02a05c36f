use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::Rgba;

/// Random marker colors from a random source this generator owns.
#[derive(Debug, Clone)]
pub struct ColorGenerator<R = StdRng> {
    rng: R,
    alpha: u8,
}

impl ColorGenerator<StdRng> {
    /// Opaque colors from an entropy-seeded source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible sequence for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for ColorGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ColorGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            alpha: Rgba::OPAQUE,
        }
    }

    /// Uses `alpha` for every generated color instead of fully opaque.
    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Red, green and blue are each uniform over the full `u8` range.
    pub fn next_color(&mut self) -> Rgba {
        Rgba::new(self.rng.gen(), self.rng.gen(), self.rng.gen(), self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alpha_is_opaque() {
        let mut colors = ColorGenerator::seeded(1);
        for _ in 0..100 {
            assert_eq!(colors.next_color().a, 255);
        }
    }

    #[test]
    fn test_alpha_override() {
        let mut colors = ColorGenerator::seeded(1).with_alpha(128);
        assert_eq!(colors.alpha(), 128);
        for _ in 0..100 {
            assert_eq!(colors.next_color().a, 128);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ColorGenerator::seeded(42);
        let mut b = ColorGenerator::seeded(42);
        for _ in 0..20 {
            assert_eq!(a.next_color(), b.next_color());
        }
    }

    #[test]
    fn test_channels_cover_full_range() {
        let mut colors = ColorGenerator::seeded(7);
        let (mut saw_low, mut saw_high) = (false, false);

        for _ in 0..20_000 {
            let c = colors.next_color();
            for channel in [c.r, c.g, c.b] {
                saw_low |= channel == 0;
                saw_high |= channel == 255;
            }
        }

        assert!(saw_low, "channel value 0 never produced");
        assert!(saw_high, "channel value 255 never produced");
    }

    #[test]
    fn test_channels_vary() {
        let mut colors = ColorGenerator::new();
        let first = colors.next_color();
        let differs = (0..50).any(|_| colors.next_color() != first);
        assert!(differs);
    }
}
