//! # Game Mathematics
//!
//! Mathematical utility functions for stat scaling.

/// Scales a base stat for an NPC level.
///
/// Level 1 keeps the base value; each further level adds `growth` of it.
/// The result is rounded to the nearest integer and never drops below 1.
///
/// # Examples
///
/// ```
/// use gridcrawl::scale_by_level;
///
/// assert_eq!(scale_by_level(100, 1, 0.15), 100);
/// assert_eq!(scale_by_level(100, 3, 0.15), 130);
/// assert_eq!(scale_by_level(0, 5, 0.15), 1);
/// ```
pub fn scale_by_level(base: u32, level: u32, growth: f64) -> u32 {
    let multiplier = 1.0 + growth * f64::from(level.saturating_sub(1));
    let scaled = (f64::from(base) * multiplier).round();
    if scaled < 1.0 {
        1
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

/// Clamps a probability into `[0, 1]`, mapping NaN to 0.
pub fn clamp_probability(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_rounds_to_nearest() {
        // 8 * 1.15 = 9.2
        assert_eq!(scale_by_level(8, 2, 0.15), 9);
        // 20 * 1.15 = 23
        assert_eq!(scale_by_level(20, 2, 0.15), 23);
        // 60 * 1.45 = 87
        assert_eq!(scale_by_level(60, 4, 0.15), 87);
    }

    #[test]
    fn test_scale_minimum_one() {
        assert_eq!(scale_by_level(0, 1, 0.15), 1);
        assert_eq!(scale_by_level(0, 10, 0.15), 1);
    }

    #[test]
    fn test_clamp_probability() {
        assert_eq!(clamp_probability(-0.5), 0.0);
        assert_eq!(clamp_probability(0.25), 0.25);
        assert_eq!(clamp_probability(3.0), 1.0);
        assert_eq!(clamp_probability(f64::NAN), 0.0);
    }
}
