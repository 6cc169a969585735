use crate::dynamics::solver::McaError;
use crate::math::{Real, CUTOFF_FACTOR};
use crate::utils;
use std::ops::RangeInclusive;

/// Elastic-plastic coefficients of one pair of particle types.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MaterialPair {
    pub shear_modulus: Real,
    pub bulk_modulus: Real,
    /// A negative yield stress disables plasticity.
    pub yield_stress: Real,
    pub hardening_modulus: Real,
}

impl MaterialPair {
    pub fn elastic(shear_modulus: Real, bulk_modulus: Real) -> Self {
        Self {
            shear_modulus,
            bulk_modulus,
            yield_stress: -1.0,
            hardening_modulus: 0.0,
        }
    }

    pub fn plastic(
        shear_modulus: Real,
        bulk_modulus: Real,
        yield_stress: Real,
        hardening_modulus: Real,
    ) -> Self {
        Self {
            shear_modulus,
            bulk_modulus,
            yield_stress,
            hardening_modulus,
        }
    }

    pub fn has_plasticity(&self) -> bool {
        self.yield_stress >= 0.0
    }

    /// Normal stiffness `2G`.
    #[inline]
    pub fn normal_stiffness(&self) -> Real {
        2.0 * self.shear_modulus
    }

    /// Weight of the mean-stress drift on the normal pressure, `1 - 2G / (3K)`.
    #[inline]
    pub fn mean_stress_weight(&self) -> Real {
        1.0 - self.normal_stiffness() / (3.0 * self.bulk_modulus)
    }

    fn mix(a: &Self, b: &Self) -> Self {
        Self {
            shear_modulus: utils::harmonic_mix(a.shear_modulus, b.shear_modulus),
            bulk_modulus: utils::harmonic_mix(a.bulk_modulus, b.bulk_modulus),
            yield_stress: utils::harmonic_mix(a.yield_stress, b.yield_stress),
            hardening_modulus: utils::harmonic_mix(a.hardening_modulus, b.hardening_modulus),
        }
    }
}

impl Default for MaterialPair {
    fn default() -> Self {
        Self::elastic(0.0, 0.0)
    }
}

/// Global settings persisted ahead of the coefficient table.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PairSettings {
    pub cut_global: Real,
    pub mix_flag: i32,
}

impl Default for PairSettings {
    fn default() -> Self {
        Self {
            cut_global: 0.0,
            mix_flag: 0,
        }
    }
}

/// Symmetric table of material coefficients indexed by pairs of 0-based type ids.
///
/// Entries that were not set explicitly are mixed from the diagonal with
/// `x_ij = x_ii * x_jj / (x_ii + x_jj)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct MaterialTable {
    pub(crate) num_types: usize,
    pub(crate) entries: Vec<MaterialPair>,
    pub(crate) explicitly_set: Vec<bool>,
    pub settings: PairSettings,
}

impl MaterialTable {
    pub fn new(num_types: usize) -> Self {
        Self {
            num_types,
            entries: vec![MaterialPair::default(); num_types * num_types],
            explicitly_set: vec![false; num_types * num_types],
            settings: PairSettings::default(),
        }
    }

    pub fn num_types(&self) -> usize {
        self.num_types
    }

    #[inline]
    pub(crate) fn id(&self, i: usize, j: usize) -> usize {
        i * self.num_types + j
    }

    #[inline]
    fn upper_id(&self, i: usize, j: usize) -> usize {
        self.id(i.min(j), i.max(j))
    }

    pub fn contains(&self, material: usize) -> bool {
        material < self.num_types
    }

    /// Whether the pair was set explicitly instead of being mixed.
    pub fn is_set(&self, i: usize, j: usize) -> bool {
        self.explicitly_set[self.upper_id(i, j)]
    }

    /// Sets the coefficients of every pair `(i, j)` with `i` in `range_i`, `j` in `range_j`
    /// and `i <= j`. Returns the number of pairs set.
    pub fn set(
        &mut self,
        range_i: RangeInclusive<usize>,
        range_j: RangeInclusive<usize>,
        pair: MaterialPair,
    ) -> Result<usize, McaError> {
        for range in [&range_i, &range_j] {
            if !range.is_empty() && *range.end() >= self.num_types {
                return Err(McaError::InvalidTypeRange {
                    range: format!("{}*{}", range.start() + 1, range.end() + 1),
                });
            }
        }

        let mut count = 0;
        for i in range_i {
            for j in (*range_j.start()).max(i)..=*range_j.end() {
                let id = self.id(i, j);
                self.entries[id] = pair;
                self.explicitly_set[id] = true;
                count += 1;
            }
        }

        if count == 0 {
            Err(McaError::EmptyTypeRange)
        } else {
            Ok(count)
        }
    }

    /// The coefficients of the pair `(i, j)`, mixed from the diagonal if not set explicitly.
    pub fn pair(&self, i: usize, j: usize) -> MaterialPair {
        let id = self.upper_id(i, j);

        if self.explicitly_set[id] {
            self.entries[id]
        } else {
            MaterialPair::mix(
                &self.entries[self.id(i, i)],
                &self.entries[self.id(j, j)],
            )
        }
    }

    /// The coefficients of a single material.
    #[inline]
    pub fn material(&self, i: usize) -> &MaterialPair {
        &self.entries[self.id(i, i)]
    }

    /// Resolves the pair `(i, j)` into both `(i, j)` and `(j, i)` and returns the
    /// interaction cutoff.
    pub fn init_one(&mut self, i: usize, j: usize, radius: Real) -> Real {
        let pair = self.pair(i, j);
        let ij = self.id(i, j);
        let ji = self.id(j, i);
        self.entries[ij] = pair;
        self.entries[ji] = pair;
        CUTOFF_FACTOR * radius
    }

    /// Resolves every pair, returning the largest cutoff.
    pub fn init_all(&mut self, radius: Real) -> Result<Real, McaError> {
        self.check_complete()?;

        let mut cutoff: Real = 0.0;
        for i in 0..self.num_types {
            for j in i..self.num_types {
                cutoff = cutoff.max(self.init_one(i, j, radius));
            }
        }

        Ok(cutoff)
    }

    /// Checks that every diagonal entry was set.
    pub fn check_complete(&self) -> Result<(), McaError> {
        match (0..self.num_types).find(|i| !self.explicitly_set[self.id(*i, *i)]) {
            Some(material) => Err(McaError::MissingCoefficients { material }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_types() -> MaterialTable {
        let mut table = MaterialTable::new(2);
        table
            .set(0..=0, 0..=0, MaterialPair::plastic(1.0, 2.0, 0.5, 0.1))
            .unwrap();
        table
            .set(1..=1, 1..=1, MaterialPair::plastic(3.0, 6.0, 1.5, 0.3))
            .unwrap();
        table
    }

    #[test]
    fn unset_pairs_are_mixed_harmonically() {
        let table = two_types();
        let mixed = table.pair(0, 1);

        assert!(!table.is_set(0, 1));
        assert_eq!(mixed.shear_modulus, 1.0 * 3.0 / (1.0 + 3.0));
        assert_eq!(mixed.bulk_modulus, 2.0 * 6.0 / (2.0 + 6.0));
        assert_eq!(mixed.yield_stress, 0.5 * 1.5 / (0.5 + 1.5));
        assert_eq!(mixed.hardening_modulus, 0.1 * 0.3 / (0.1 + 0.3));
        assert_eq!(table.pair(1, 0), mixed);
    }

    #[test]
    fn explicit_pairs_are_not_mixed() {
        let mut table = two_types();
        table
            .set(0..=1, 0..=1, MaterialPair::elastic(7.0, 8.0))
            .unwrap();

        assert!(table.is_set(1, 0));
        assert_eq!(table.pair(1, 0), MaterialPair::elastic(7.0, 8.0));
    }

    #[test]
    fn set_only_fills_the_upper_triangle() {
        let mut table = MaterialTable::new(3);
        let count = table
            .set(0..=2, 0..=2, MaterialPair::elastic(1.0, 1.0))
            .unwrap();
        assert_eq!(count, 6);

        assert_eq!(
            table.set(2..=2, 0..=1, MaterialPair::elastic(1.0, 1.0)),
            Err(McaError::EmptyTypeRange)
        );
    }

    #[test]
    fn init_one_mirrors_and_returns_the_cutoff() {
        let mut table = two_types();
        let cutoff = table.init_one(1, 0, 0.5);

        assert!((cutoff - 0.6).abs() < 1.0e-12);
        assert_eq!(table.entries[table.id(0, 1)], table.entries[table.id(1, 0)]);
        assert_eq!(table.entries[table.id(0, 1)], table.pair(0, 1));
    }

    #[test]
    fn missing_diagonal_is_reported() {
        let mut table = MaterialTable::new(2);
        table
            .set(0..=0, 0..=1, MaterialPair::elastic(1.0, 1.0))
            .unwrap();
        assert_eq!(
            table.check_complete(),
            Err(McaError::MissingCoefficients { material: 1 })
        );
    }

    #[test]
    fn elastic_materials_have_no_plasticity() {
        assert!(!MaterialPair::elastic(1.0, 2.0).has_plasticity());
        assert!(MaterialPair::plastic(1.0, 2.0, 0.0, 0.0).has_plasticity());
        assert!((MaterialPair::elastic(1.0, 2.0).mean_stress_weight() - 2.0 / 3.0).abs() < 1.0e-15);
    }
}
