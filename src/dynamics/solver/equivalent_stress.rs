use super::McaSolver;
use crate::dynamics::solver::McaParameters;
use crate::dynamics::{Particle, ParticleSet};
use crate::math::Real;
use rayon::prelude::*;

/// The mean stress of a particle: the sum of its bond pressures over the coordination number.
pub fn mean_stress_of(particle: &Particle, coordination_number: usize) -> Real {
    let sum: Real = particle.bonds.iter().map(|b| b.pressure).sum();
    sum / coordination_number as Real
}

/// The von Mises-like equivalent stress of a particle around the given mean stress.
pub fn equivalent_stress_of(
    particle: &Particle,
    mean_stress: Real,
    coordination_number: usize,
) -> Real {
    let sum: Real = particle
        .bonds
        .iter()
        .map(|b| {
            let deviatoric = b.pressure - mean_stress;
            deviatoric * deviatoric + b.shear_traction.norm_squared()
        })
        .sum();

    (4.5 * sum / coordination_number as Real).sqrt()
}

impl McaSolver {
    /// Aggregates the bond stresses of every local particle into its mean and equivalent
    /// stresses, and commits the rotation of the previous step.
    pub(crate) fn compute_equivalent_stress(params: &McaParameters, particles: &mut ParticleSet) {
        let nc = params.coordination_number;
        let feedback = params.mean_stress_feedback;

        particles.for_each_local_mut(|particle| {
            particle.rotation_prev = particle.rotation;

            if feedback && particle.has_bonds() {
                particle.mean_stress = mean_stress_of(particle, nc);
            }
        });

        particles
            .particles
            .par_iter_mut()
            .filter(|p| !p.ghost && p.has_bonds())
            .for_each(|particle| {
                particle.equivalent_stress =
                    equivalent_stress_of(particle, particle.mean_stress, nc);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BondHalf;
    use na::{point, vector, Vector3};

    fn loaded_particle(pressures: &[Real]) -> Particle {
        let mut particle = Particle::new(0, 0, point![0.0, 0.0, 0.0]);
        for (k, p) in pressures.iter().enumerate() {
            let mut bond = BondHalf::new(k as u64 + 1, 2.0, Vector3::x());
            bond.pressure = *p;
            particle.bonds.push(bond);
        }
        particle
    }

    #[test]
    fn uniform_pressure_has_no_equivalent_stress() {
        let particle = loaded_particle(&[0.5; 12]);
        let ms = mean_stress_of(&particle, 12);
        assert!((ms - 0.5).abs() < 1.0e-15);
        assert!(equivalent_stress_of(&particle, ms, 12).abs() < 1.0e-7);
    }

    #[test]
    fn shear_traction_contributes() {
        let mut particle = loaded_particle(&[0.0; 2]);
        particle.bonds[0].shear_traction = vector![0.0, 2.0, 0.0];
        let eq = equivalent_stress_of(&particle, 0.0, 2);
        assert!((eq - (4.5 * 4.0 / 2.0 as Real).sqrt()).abs() < 1.0e-15);
    }

    #[test]
    fn mean_stress_is_normalized_by_the_coordination_number() {
        let particle = loaded_particle(&[1.0, 2.0, 3.0]);
        assert!((mean_stress_of(&particle, 12) - 0.5).abs() < 1.0e-15);
    }

    #[test]
    fn feedback_can_be_disabled() {
        let mut particles = ParticleSet::new();
        let mut particle = loaded_particle(&[1.0, -1.0]);
        particle.mean_stress = 0.25;
        particle.rotation = vector![0.0, 0.0, 0.1];
        particles.insert(particle);

        let params = McaParameters {
            mean_stress_feedback: false,
            coordination_number: 2,
            ..McaParameters::default()
        };
        McaSolver::compute_equivalent_stress(&params, &mut particles);

        let particle = &particles.particles()[0];
        assert_eq!(particle.mean_stress, 0.25);
        assert_eq!(particle.rotation_prev, particle.rotation);
        let expected = (4.5 * (0.75 * 0.75 + 1.25 * 1.25) / 2.0 as Real).sqrt();
        assert!((particle.equivalent_stress - expected).abs() < 1.0e-14);
    }

    #[test]
    fn ghosts_are_left_untouched() {
        let mut particles = ParticleSet::new();
        let mut ghost = loaded_particle(&[1.0]);
        ghost.ghost = true;
        ghost.rotation = vector![0.1, 0.0, 0.0];
        particles.insert(ghost);

        McaSolver::compute_equivalent_stress(&McaParameters::default(), &mut particles);
        let ghost = &particles.particles()[0];
        assert_eq!(ghost.mean_stress, 0.0);
        assert_eq!(ghost.equivalent_stress, 0.0);
        assert_eq!(ghost.rotation_prev, Vector3::zeros());
    }
}
