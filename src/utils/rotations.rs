//! Composition of rotation vectors.
//!
//! A rotation vector is the rotation axis scaled by the rotation angle. Composition is not
//! commutative: `rotation_sum(a, b)` is the rotation `b` followed by the rotation `a`.

use crate::math::{AngVector, Real};
use na::UnitQuaternion;

/// Second-order composition of two small rotations: `a + b + (a × b) / 2`.
///
/// This is the truncation of the Baker–Campbell–Hausdorff series after the first commutator.
/// It must not be replaced by [`rotation_sum`]: the bond history is integrated with this
/// approximation and the results diverge otherwise.
#[inline]
pub fn small_rotation_sum(a: &AngVector<Real>, b: &AngVector<Real>) -> AngVector<Real> {
    a + b + a.cross(b) * 0.5
}

/// Exact composition of two finite rotations, computed through unit quaternions.
#[inline]
pub fn rotation_sum(a: &AngVector<Real>, b: &AngVector<Real>) -> AngVector<Real> {
    (UnitQuaternion::new(*a) * UnitQuaternion::new(*b)).scaled_axis()
}
