/// Floating point type used throughout the network.
pub type Real = f64;

/// Sign of `v` as used by the power-law elements: zero stays zero.
pub fn signum_or_zero(v: Real) -> Real {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signum_keeps_zero() {
        assert_eq!(signum_or_zero(0.0), 0.0);
        assert_eq!(signum_or_zero(-0.0), 0.0);
        assert_eq!(signum_or_zero(3.0), 1.0);
        assert_eq!(signum_or_zero(-3.0), -1.0);
    }
}
