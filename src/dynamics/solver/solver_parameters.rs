use crate::math::Real;

bitflags::bitflags! {
    /// Accounting requested by the host integrator for the current step.
    ///
    /// Bonds contribute neither energy nor virial.
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    pub struct ComputeFlags: u8 {
        const NONE = 0;
        const ENERGY = 1 << 0;
        const VIRIAL = 1 << 1;
    }
}

#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct McaParameters {
    pub dt: Real,
    /// Fraction of `dt` over which the angular velocity contributes to the rotation increment.
    pub implicit_factor: Real,
    /// Radius shared by every particle.
    pub radius: Real,
    /// Reference contact area of a bond.
    pub contact_area: Real,
    /// Nominal number of bonds per particle, used to normalize the stress aggregates.
    pub coordination_number: usize,
    pub mean_stress_feedback: bool,
    pub enable_rotations: bool,
}

impl McaParameters {
    /// Parameters for a close-packed (fcc) lattice of particles with the given radius.
    pub fn fcc(radius: Real) -> Self {
        Self {
            radius,
            // Each particle is split into twelve pyramids of height `radius`.
            contact_area: (2.0 as Real).sqrt() * radius * radius,
            coordination_number: 12,
            ..Self::default()
        }
    }

    #[inline]
    pub fn dt_implicit(&self) -> Real {
        self.implicit_factor * self.dt
    }

    /// Distance between the centers of two particles at rest.
    #[inline]
    pub fn rest_length(&self) -> Real {
        2.0 * self.radius
    }
}

impl Default for McaParameters {
    fn default() -> Self {
        McaParameters {
            dt: 1.0e-6,
            implicit_factor: 0.5,
            radius: 1.0,
            contact_area: (2.0 as Real).sqrt(),
            coordination_number: 12,
            mean_stress_feedback: true,
            enable_rotations: true,
        }
    }
}
