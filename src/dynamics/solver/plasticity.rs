use super::McaSolver;
use crate::dynamics::models::{MaterialPair, MaterialTable};
use crate::dynamics::{Particle, ParticleSet};
use crate::math::{Real, NOISE_FLOOR};
use rayon::prelude::*;

/// Outcome of the radial return of one particle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlasticCorrection {
    /// Factor applied to the deviatoric part of every bond stress.
    pub scale: Real,
    /// The corrected equivalent stress.
    pub equivalent_stress: Real,
    /// Work dissipated by the correction.
    pub dissipation: Real,
}

/// Radial return of a single particle onto its hardened yield surface.
///
/// Updates the accumulated equivalent strain unconditionally, and scales the deviatoric
/// bond stresses if the particle yields. Returns the applied correction, if any.
pub fn correct_particle(
    particle: &mut Particle,
    material: &MaterialPair,
) -> Option<PlasticCorrection> {
    let three_g = 3.0 * material.shear_modulus;
    let sgm = particle.equivalent_stress;
    let dsgm = sgm - particle.equivalent_stress_prev;
    let strain = particle.equivalent_strain + dsgm / three_g;

    let yield_strain = if material.has_plasticity() {
        material.yield_stress / three_g
    } else {
        10.0 * strain
    };

    particle.equivalent_strain = strain;

    if !material.has_plasticity()
        || sgm <= NOISE_FLOOR
        || dsgm <= 0.0
        || strain <= yield_strain
    {
        return None;
    }

    let yield_stress = material.yield_stress;
    let hardened = yield_stress + (strain - yield_strain) * material.hardening_modulus;
    let scale = hardened / sgm;

    if 1.0 - scale <= NOISE_FLOOR {
        return None;
    }

    particle.equivalent_stress = hardened;

    let dissipation = yield_stress * yield_stress / (2.0 * three_g)
        + 0.5 * (yield_stress + hardened) * (strain - yield_strain)
        - hardened * hardened / (2.0 * three_g);
    if dissipation > 0.0 {
        particle.plastic_heat = dissipation;
    }

    let mean_stress = particle.mean_stress;
    for bond in &mut particle.bonds {
        bond.pressure = bond.pressure * scale + mean_stress * (1.0 - scale);
        bond.shear *= scale;
        bond.shear_traction *= scale;
        bond.integrated_shear *= scale;
        bond.moment *= scale;
    }

    Some(PlasticCorrection {
        scale,
        equivalent_stress: hardened,
        dissipation,
    })
}

impl McaSolver {
    /// Applies the radial return to every local bonded particle.
    ///
    /// Returns the number of corrected particles and the total dissipated work.
    pub(crate) fn correct_plasticity(
        table: &MaterialTable,
        particles: &mut ParticleSet,
    ) -> (usize, Real) {
        particles
            .particles
            .par_iter_mut()
            .filter(|p| !p.ghost && p.has_bonds())
            .filter_map(|particle| {
                let material = table.material(particle.material);
                correct_particle(particle, material)
            })
            .map(|correction| (1, correction.dissipation.max(0.0)))
            .reduce(|| (0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1))
    }
}
