use super::McaSolver;
use crate::dynamics::models::{MaterialPair, MaterialTable};
use crate::dynamics::solver::McaParameters;
use crate::dynamics::{BondHalf, Particle, ParticleSet};
use crate::math::AngVector;
use crate::utils::{self, rotation_sum, small_rotation_sum};
use rayon::prelude::*;

/// One side of a bond, as read by the elastic update.
#[derive(Copy, Clone)]
pub struct BondSide<'a> {
    pub particle: &'a Particle,
    pub material: &'a MaterialPair,
    pub bond: &'a BondHalf,
}

impl McaSolver {
    /// Incremental elastic update of the normal pressure, shear history and moment of every
    /// local half-record.
    ///
    /// Every update only reads state frozen by the previous phase; the new half-records are
    /// committed once all of them are computed.
    pub(crate) fn compute_elastic_force(
        params: &McaParameters,
        table: &MaterialTable,
        particles: &mut ParticleSet,
    ) {
        let set = &*particles;

        let updated: Vec<Option<Vec<BondHalf>>> = set
            .particles
            .par_iter()
            .enumerate()
            .map(|(i, particle)| {
                if particle.ghost || !particle.has_bonds() {
                    return None;
                }

                let material = table.material(particle.material);
                let bonds = particle
                    .bonds
                    .iter()
                    .zip(set.topology.links(i))
                    .map(|(bond, link)| {
                        let partner = &set.particles[link.partner];
                        let own = BondSide {
                            particle,
                            material,
                            bond,
                        };
                        let other = BondSide {
                            particle: partner,
                            material: table.material(partner.material),
                            bond: &partner.bonds[link.reciprocal],
                        };
                        elastic_bond_update(params, own, other)
                    })
                    .collect();

                Some(bonds)
            })
            .collect();

        particles
            .particles
            .par_iter_mut()
            .zip(updated.into_par_iter())
            .for_each(|(particle, bonds)| {
                if let Some(bonds) = bonds {
                    particle.bonds = bonds;
                }
            });
    }
}

/// The elastic update of `own.bond`, given the partner's reciprocal half-record.
///
/// Only the returned half-record is new; neither side is modified.
pub fn elastic_bond_update(params: &McaParameters, own: BondSide, other: BondSide) -> BondHalf {
    let radius = params.radius;
    let bond = own.bond;
    let reciprocal = other.bond;

    let g_i = own.material.shear_modulus;
    let g_j = other.material.shear_modulus;
    let h_i = own.material.normal_stiffness();
    let h_j = other.material.normal_stiffness();
    let dsgm_i = own.material.mean_stress_weight()
        * (own.particle.mean_stress - own.particle.mean_stress_prev);
    let dsgm_j = other.material.mean_stress_weight()
        * (other.particle.mean_stress - other.particle.mean_stress_prev);

    /*
     * Central force: both sides share the strain increment that balances their pressures.
     */
    let de0 = (bond.distance - bond.distance_prev) / radius;
    let de = (reciprocal.pressure_prev - bond.pressure_prev + h_j * de0 + dsgm_j - dsgm_i)
        / (h_i + h_j);
    let dp = h_i * de + dsgm_i;

    /*
     * Shear force.
     */
    let q_i = bond.contact_offset(radius);
    let q_j = reciprocal.contact_offset(radius);

    // Rigid rotation of the contact frame, scaled into a tangential displacement.
    let mut tangential = bond.normal_prev.cross(&bond.normal) * bond.distance;

    let (dtheta_i, dtheta_j) = if params.enable_rotations {
        let dt_implicit = params.dt_implicit();
        (
            own.particle.rotation_increment(dt_implicit),
            other.particle.rotation_increment(dt_implicit),
        )
    } else {
        (AngVector::zeros(), AngVector::zeros())
    };

    if params.enable_rotations {
        let rotation = small_rotation_sum(&(dtheta_i * q_i), &(dtheta_j * q_j));
        let tangential_rotation = rotation - bond.normal * rotation.dot(&bond.normal);
        tangential = small_rotation_sum(&tangential, &-tangential_rotation);
    }

    let k_s = 1.0 / (q_j * g_i + q_i * g_j);
    let q_r = q_i * 0.5 * k_s;
    let relative_shear = (reciprocal.integrated_shear_prev - bond.integrated_shear_prev) * q_r;
    let dshear = small_rotation_sum(&(tangential * (-g_j * k_s)), &relative_shear);

    let shear = rotation_sum(&bond.shear_prev, &dshear);
    let integrated_shear = rotation_sum(&(bond.integrated_shear_prev / h_i), &dshear) * h_i;
    let shear_traction = integrated_shear.cross(&bond.normal);

    /*
     * Bending and torsion torque.
     */
    let moment = if params.enable_rotations {
        rotation_sum(&(dtheta_i * q_i), &(dtheta_j * -q_j)) * utils::harmonic_mix(g_i, g_j)
    } else {
        AngVector::zeros()
    };

    BondHalf {
        strain: bond.strain + de,
        pressure: bond.pressure_prev + dp,
        shear,
        integrated_shear,
        shear_traction,
        moment,
        ..*bond
    }
}
