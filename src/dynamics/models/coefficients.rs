use super::{MaterialPair, MaterialTable};
use crate::dynamics::solver::McaError;
use crate::math::Real;
use std::ops::RangeInclusive;

/// Parses a 1-based type range (`n`, `*`, `n*`, `*n` or `m*n`) into a 0-based range.
pub fn parse_type_range(range: &str, num_types: usize) -> Result<RangeInclusive<usize>, McaError> {
    let invalid = || McaError::InvalidTypeRange {
        range: range.to_string(),
    };
    let parse = |s: &str| s.parse::<usize>().map_err(|_| invalid());

    let (lo, hi) = match range.find('*') {
        None => {
            let n = parse(range)?;
            (n, n)
        }
        Some(star) => {
            let (lo, hi) = (&range[..star], &range[star + 1..]);
            let lo = if lo.is_empty() { 1 } else { parse(lo)? };
            let hi = if hi.is_empty() { num_types } else { parse(hi)? };
            (lo, hi)
        }
    };

    if lo < 1 || lo > hi || hi > num_types {
        return Err(invalid());
    }

    Ok(lo - 1..=hi - 1)
}

fn parse_number(value: &str) -> Result<Real, McaError> {
    value.parse::<Real>().map_err(|_| McaError::InvalidNumber {
        value: value.to_string(),
    })
}

impl MaterialTable {
    /// Applies the coefficient command `type_range_a type_range_b G K [Sy [Eh]]`.
    ///
    /// The yield stress defaults to `-1` (no plasticity) and the hardening modulus to `0`.
    /// Returns the number of pairs set.
    pub fn coeff(&mut self, args: &[&str]) -> Result<usize, McaError> {
        if args.len() < 4 || args.len() > 6 {
            return Err(McaError::InvalidCoefficientArgs { count: args.len() });
        }

        let range_i = parse_type_range(args[0], self.num_types)?;
        let range_j = parse_type_range(args[1], self.num_types)?;
        let shear_modulus = parse_number(args[2])?;
        let bulk_modulus = parse_number(args[3])?;
        let yield_stress = args.get(4).map(|s| parse_number(s)).transpose()?;
        let hardening_modulus = args.get(5).map(|s| parse_number(s)).transpose()?;

        let pair = MaterialPair {
            shear_modulus,
            bulk_modulus,
            yield_stress: yield_stress.unwrap_or(-1.0),
            hardening_modulus: hardening_modulus.unwrap_or(0.0),
        };

        self.set(range_i, range_j, pair)
    }
}
