/// Clamp `value` into `[min, max]`.
///
/// Argument order follows the call sites: lower bound first, value in the
/// middle, upper bound last.
pub fn clamp(min: f32, value: f32, max: f32) -> f32 {
    if value < min {
        return min;
    }
    if value <= max {
        return value;
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_range_passes_through() {
        assert_eq!(clamp(0.0, 0.5, 1.0), 0.5);
        assert_eq!(clamp(-89.0, 0.0, 89.0), 0.0);
    }

    #[test]
    fn below_min_returns_min() {
        assert_eq!(clamp(0.0, -0.1, 1.0), 0.0);
        assert_eq!(clamp(-89.0, -1000.0, 89.0), -89.0);
    }

    #[test]
    fn above_max_returns_max() {
        assert_eq!(clamp(0.0, 1.1, 1.0), 1.0);
        assert_eq!(clamp(-89.0, 360.0, 89.0), 89.0);
    }

    #[test]
    fn degenerate_range_returns_bound() {
        assert_eq!(clamp(1.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(1.0, 1.0, 1.0), 1.0);
        assert_eq!(clamp(1.0, 2.0, 1.0), 1.0);
    }

    #[test]
    fn boundary_values_are_inclusive() {
        assert_eq!(clamp(0.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.0, 1.0, 1.0), 1.0);
    }
}
