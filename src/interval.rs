//! Interval arithmetic for ray parameter ranges.

/// Closed interval [min, max] used for ray t-values and color clamping.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Create a new interval with given min and max values
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval contains the given value (inclusive bounds)
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Check if the interval surrounds the given value (exclusive bounds)
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamp the given value to be within this interval's bounds
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrounds_is_exclusive() {
        let i = Interval::new(0.001, 2.0);
        assert!(i.surrounds(1.0));
        assert!(!i.surrounds(0.001));
        assert!(!i.surrounds(2.0));
        assert!(i.contains(2.0));
    }

    #[test]
    fn test_clamp() {
        let i = Interval::new(0.0, 1.0);
        assert_eq!(i.clamp(-0.5), 0.0);
        assert_eq!(i.clamp(0.25), 0.25);
        assert_eq!(i.clamp(7.0), 1.0);
    }
}
