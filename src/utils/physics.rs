use crate::math::Real;

/// The mixing rule used for unset material pairs: `a * b / (a + b)`.
///
/// Mixing two zeros gives zero instead of NaN.
pub fn harmonic_mix(a: Real, b: Real) -> Real {
    let sum = a + b;

    if sum == 0.0 {
        0.0
    } else {
        a * b / sum
    }
}

/// Computes the shear modulus from the young modulus and poisson ratio.
pub fn shear_modulus(young_modulus: Real, poisson_ratio: Real) -> Real {
    young_modulus / (2.0 * (1.0 + poisson_ratio))
}

/// Computes the bulk modulus from the young modulus and poisson ratio.
pub fn bulk_modulus(young_modulus: Real, poisson_ratio: Real) -> Real {
    young_modulus / (3.0 * (1.0 - 2.0 * poisson_ratio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmonic_mix_of_zeros_is_zero() {
        assert_eq!(harmonic_mix(0.0, 0.0), 0.0);
        assert_eq!(harmonic_mix(2.0, 2.0), 1.0);
        assert_eq!(harmonic_mix(1.0, 3.0), 0.75);
    }

    #[test]
    fn moduli_from_young_and_poisson() {
        assert!((shear_modulus(2.5, 0.25) - 1.0).abs() < 1.0e-12);
        assert!((bulk_modulus(3.0, 0.0) - 1.0).abs() < 1.0e-12);
    }
}
