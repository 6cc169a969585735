use crate::math::{AngVector, Real, Vector};

/// One owner's half of the mechanical history of a bond.
///
/// The same physical bond is described by two half-records, one owned by each bonded
/// particle. They are never copied into each other: the update algebra keeps them
/// consistent so that their difference (shear, moment) and their mean (pressure) are
/// meaningful at force assembly.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BondHalf {
    /// Tag of the bonded partner.
    pub partner: u64,

    pub distance: Real,
    pub distance_prev: Real,
    /// Elastic radial strain of this side.
    pub strain: Real,
    /// Normal pressure, positive in tension.
    pub pressure: Real,
    pub pressure_prev: Real,
    /// Unit vector from the owner to the partner.
    pub normal: Vector<Real>,
    pub normal_prev: Vector<Real>,
    pub shear: Vector<Real>,
    pub shear_prev: Vector<Real>,
    /// Integrated shear strain, stored as an axial vector scaled by `2G`.
    pub integrated_shear: AngVector<Real>,
    pub integrated_shear_prev: AngVector<Real>,
    /// Shear traction, `integrated_shear × normal`.
    pub shear_traction: Vector<Real>,
    /// Bending/torsion moment.
    pub moment: AngVector<Real>,
    pub broken: bool,
}

impl BondHalf {
    /// The number of scalars of the serialized layout, see [`BondHalf::to_scalars`].
    pub const NUM_SCALARS: usize = 31;

    /// A fresh, unloaded half-record for a bond formed at the given distance along `normal`.
    pub fn new(partner: u64, distance: Real, normal: Vector<Real>) -> Self {
        Self {
            partner,
            distance,
            distance_prev: distance,
            strain: 0.0,
            pressure: 0.0,
            pressure_prev: 0.0,
            normal,
            normal_prev: normal,
            shear: Vector::zeros(),
            shear_prev: Vector::zeros(),
            integrated_shear: AngVector::zeros(),
            integrated_shear_prev: AngVector::zeros(),
            shear_traction: Vector::zeros(),
            moment: AngVector::zeros(),
            broken: false,
        }
    }

    /// Distance from the owner's center to the contact point.
    #[inline]
    pub fn contact_offset(&self, radius: Real) -> Real {
        radius * (1.0 + self.strain)
    }

    /// Commits the current values as the previous-step values.
    pub fn swap_history(&mut self) {
        self.distance_prev = self.distance;
        self.pressure_prev = self.pressure;
        self.normal_prev = self.normal;
        self.shear_prev = self.shear;
        self.integrated_shear_prev = self.integrated_shear;
    }

    /// Ordered scalar layout used by checkpoints:
    /// partner, r, r_prev, e, p, p_prev, n, n_prev, shear, shear_prev, y, y_prev, s, m, broken.
    pub fn to_scalars(&self) -> [Real; Self::NUM_SCALARS] {
        let mut out = [0.0; Self::NUM_SCALARS];
        out[0] = self.partner as Real;
        out[1] = self.distance;
        out[2] = self.distance_prev;
        out[3] = self.strain;
        out[4] = self.pressure;
        out[5] = self.pressure_prev;

        let vectors = [
            &self.normal,
            &self.normal_prev,
            &self.shear,
            &self.shear_prev,
            &self.integrated_shear,
            &self.integrated_shear_prev,
            &self.shear_traction,
            &self.moment,
        ];
        for (k, v) in vectors.iter().enumerate() {
            out[6 + 3 * k..9 + 3 * k].copy_from_slice(v.as_slice());
        }

        out[30] = if self.broken { 1.0 } else { 0.0 };
        out
    }

    pub fn from_scalars(data: &[Real; Self::NUM_SCALARS]) -> Self {
        let v = |k: usize| Vector::new(data[6 + 3 * k], data[7 + 3 * k], data[8 + 3 * k]);

        Self {
            partner: data[0] as u64,
            distance: data[1],
            distance_prev: data[2],
            strain: data[3],
            pressure: data[4],
            pressure_prev: data[5],
            normal: v(0),
            normal_prev: v(1),
            shear: v(2),
            shear_prev: v(3),
            integrated_shear: v(4),
            integrated_shear_prev: v(5),
            shear_traction: v(6),
            moment: v(7),
            broken: data[30] != 0.0,
        }
    }
}
