//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit a value to the given range.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Return the euclidian norm (distance between) of two points.
///
/// If the points do not have the same number of dimentions then `None` is
/// returned.
pub fn norm<T>(point_0: &[T], point_1: &[T]) -> Option<T>
where
    T: Float + std::ops::AddAssign
{
    // Check that the dimentions match
    if point_0.len() != point_1.len() {
        return None;
    }

    // Sum all elements of the points
    let mut sum = T::from(0).unwrap();

    for i in 0..point_0.len() {
        sum += (point_0[i] - point_1[i]).powi(2);
    }

    // Return the squareroot of the sum
    Some(sum.sqrt())
}

/// Round a value to the given number of decimal places.
///
/// Intended for presentation at publication boundaries, internal calculations
/// should keep full precision.
pub fn round_to_dp(value: f64, decimal_places: u32) -> f64 {
    let scale = 10f64.powi(decimal_places as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&0.5f64, &0f64, &1f64), 0.5f64);
        assert_eq!(clamp(&-0.5f64, &0f64, &1f64), 0f64);
        assert_eq!(clamp(&1.5f64, &0f64, &1f64), 1f64);
        assert_eq!(clamp(&f64::INFINITY, &0f64, &1f64), 1f64);
        assert_eq!(clamp(&f64::NEG_INFINITY, &0f64, &1f64), 0f64);
    }

    #[test]
    fn test_norm() {
        assert_eq!(norm(&[0f64, 0f64], &[3f64, 4f64]), Some(5f64));
        assert_eq!(norm(&[1f64], &[1f64, 2f64]), None);
    }

    #[test]
    fn test_round_to_dp() {
        assert_eq!(round_to_dp(7.30656, 2), 7.31);
        assert_eq!(round_to_dp(7.0, 2), 7.0);
        assert_eq!(round_to_dp(-1.005, 1), -1.0);
    }
}
