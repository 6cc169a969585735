use super::{BondSide, McaSolver};
use crate::dynamics::models::MaterialTable;
use crate::dynamics::solver::McaParameters;
use crate::dynamics::{BondPair, ParticleSet};
use crate::math::{AngVector, Real, Vector};
use rayon::prelude::*;
use std::sync::atomic::{AtomicPtr, Ordering};

/// Force and torques exchanged by the two particles of a bond.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PairForces {
    /// Force applied to the first particle. The second receives its opposite.
    pub force: Vector<Real>,
    pub first_torque: AngVector<Real>,
    pub second_torque: AngVector<Real>,
}

/// The forces of an unbroken bond, from the updated half-records of both sides.
pub fn pair_forces(params: &McaParameters, first: BondSide, second: BondSide) -> PairForces {
    let (h1, h2) = (first.bond, second.bond);
    let q1 = h1.contact_offset(params.radius);
    let q2 = h2.contact_offset(params.radius);

    // The contact dilates with the mean stresses and the bond stretch.
    let area = params.contact_area
        * (1.0
            + 0.5
                * (first.particle.mean_stress / first.material.bulk_modulus
                    + second.particle.mean_stress / second.material.bulk_modulus))
        * params.rest_length()
        / h1.distance;

    // Geometric normal, not the stored one.
    let normal = (second.particle.position - first.particle.position).normalize();
    let normal_force = normal * (0.5 * (h1.pressure + h2.pressure));
    let shear_force = (h2.shear_traction - h1.shear_traction) * 0.5;
    let shear_torque = normal.cross(&shear_force) * area;
    let bending_torque = (h2.moment - h1.moment) * (0.5 * area);

    PairForces {
        force: (normal_force + shear_force) * area,
        first_torque: shear_torque * q1 + bending_torque,
        second_torque: shear_torque * q2 - bending_torque,
    }
}

impl McaSolver {
    /// Accumulates the bond forces and torques of every unique bonded pair into the
    /// non-ghost particles. Returns the number of broken pairs skipped.
    pub(crate) fn assemble_forces(
        params: &McaParameters,
        table: &MaterialTable,
        particles: &mut ParticleSet,
    ) -> usize {
        let set = &*particles;
        let contributions: Vec<Option<PairForces>> = set
            .topology
            .pairs()
            .par_iter()
            .map(|pair| {
                let (p1, p2) = (&set.particles[pair.first], &set.particles[pair.second]);
                let (h1, h2) = (&p1.bonds[pair.first_slot], &p2.bonds[pair.second_slot]);

                if h1.broken || h2.broken {
                    if h1.pressure > 0.0 || h2.pressure > 0.0 {
                        warn!(
                            "Broken bond {}-{} still carries a tensile pressure ({}, {}).",
                            p1.tag, p2.tag, h1.pressure, h2.pressure
                        );
                    } else {
                        debug!("Skipping broken bond {}-{}.", p1.tag, p2.tag);
                    }
                    return None;
                }

                let first = BondSide {
                    particle: p1,
                    material: table.material(p1.material),
                    bond: h1,
                };
                let second = BondSide {
                    particle: p2,
                    material: table.material(p2.material),
                    bond: h2,
                };
                Some(pair_forces(params, first, second))
            })
            .collect();

        let skipped = contributions.iter().filter(|c| c.is_none()).count();

        let ParticleSet {
            particles: list,
            topology,
            ..
        } = particles;
        let pairs = topology.pairs();
        let list = &AtomicPtr::new(list.as_mut_ptr());

        for color in topology.colors() {
            color.par_iter().for_each(|pair_id| {
                let forces = match &contributions[*pair_id] {
                    Some(forces) => forces,
                    None => return,
                };
                let BondPair { first, second, .. } = pairs[*pair_id];
                let base = list.load(Ordering::Relaxed);

                // No two pairs of the same color share a particle.
                let first = unsafe { &mut *base.add(first) };
                if !first.ghost {
                    first.force += forces.force;
                    first.torque += forces.first_torque;
                }

                let second = unsafe { &mut *base.add(second) };
                if !second.ghost {
                    second.force -= forces.force;
                    second.torque += forces.second_torque;
                }
            });
        }

        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::models::MaterialPair;
    use crate::dynamics::{BondHalf, Particle};
    use na::{point, vector};

    fn side<'a>(p: &'a Particle, m: &'a MaterialPair) -> BondSide<'a> {
        BondSide {
            particle: p,
            material: m,
            bond: &p.bonds[0],
        }
    }

    fn pair(pressure: Real) -> (Particle, Particle) {
        let mut a = Particle::new(1, 0, point![0.0, 0.0, 0.0]);
        let mut b = Particle::new(2, 0, point![2.0, 0.0, 0.0]);
        a.bonds.push(BondHalf::new(2, 2.0, Vector::x()));
        b.bonds.push(BondHalf::new(1, 2.0, -Vector::x()));
        a.bonds[0].pressure = pressure;
        b.bonds[0].pressure = pressure;
        (a, b)
    }

    #[test]
    fn tension_pulls_the_particles_together() {
        let params = McaParameters::default();
        let material = MaterialPair::elastic(1.0, 2.0);
        let (a, b) = pair(0.1);

        let forces = pair_forces(&params, side(&a, &material), side(&b, &material));
        assert!(forces.force.x > 0.0);
        assert!((forces.force.x - 0.1 * params.contact_area).abs() < 1.0e-15);
        assert_eq!(forces.first_torque, AngVector::zeros());
    }

    #[test]
    fn mean_stress_dilates_the_contact() {
        let params = McaParameters::default();
        let material = MaterialPair::elastic(1.0, 2.0);
        let (mut a, mut b) = pair(-0.1);
        a.mean_stress = -0.4;
        b.mean_stress = -0.4;

        let forces = pair_forces(&params, side(&a, &material), side(&b, &material));
        let area = params.contact_area * (1.0 - 0.2);
        assert!((forces.force.x + 0.1 * area).abs() < 1.0e-15);
    }

    #[test]
    fn opposite_moments_give_opposite_torques() {
        let params = McaParameters::default();
        let material = MaterialPair::elastic(1.0, 2.0);
        let (mut a, mut b) = pair(0.0);
        a.bonds[0].moment = vector![0.0, 0.0, -0.2];
        b.bonds[0].moment = vector![0.0, 0.0, 0.2];

        let forces = pair_forces(&params, side(&a, &material), side(&b, &material));
        assert_eq!(forces.force, Vector::zeros());
        assert!((forces.first_torque + forces.second_torque).norm() < 1.0e-15);
        assert!((forces.first_torque.z - 0.2 * params.contact_area).abs() < 1.0e-15);
    }

    #[test]
    fn shear_tractions_are_differenced() {
        let params = McaParameters::default();
        let material = MaterialPair::elastic(1.0, 2.0);
        let (mut a, mut b) = pair(0.0);
        a.bonds[0].shear_traction = vector![0.0, -0.1, 0.0];
        b.bonds[0].shear_traction = vector![0.0, 0.1, 0.0];

        let forces = pair_forces(&params, side(&a, &material), side(&b, &material));
        assert!((forces.force.y - 0.1 * params.contact_area).abs() < 1.0e-15);
        // Both particles turn the same way under a pure shear.
        assert!(forces.first_torque.z > 0.0);
        assert!((forces.first_torque - forces.second_torque).norm() < 1.0e-15);
    }
}
