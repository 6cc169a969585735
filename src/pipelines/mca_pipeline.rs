use crate::dynamics::models::MaterialTable;
use crate::dynamics::solver::{ComputeFlags, McaError, McaParameters, McaSolver, StepReport};
use crate::dynamics::ParticleSet;

/// The per-timestep entry point of the bond mechanics, called once per step by the host
/// integrator.
pub struct McaPipeline {
    first_step: bool,
    step_id: u64,
    unsupported_flags_reported: bool,
}

impl McaPipeline {
    pub fn new() -> Self {
        McaPipeline {
            first_step: true,
            step_id: 0,
            unsupported_flags_reported: false,
        }
    }

    /// Number of steps completed so far.
    pub fn step_id(&self) -> u64 {
        self.step_id
    }

    /// Advances the bond state of `particles` by one step and accumulates the bond forces
    /// and torques.
    ///
    /// The bond geometry must have been updated from the current positions beforehand (see
    /// [`ParticleSet::update_bond_geometry`]). An error leaves the particles in an undefined
    /// state and the run must be aborted.
    pub fn step(
        &mut self,
        params: &McaParameters,
        flags: ComputeFlags,
        table: &mut MaterialTable,
        particles: &mut ParticleSet,
    ) -> Result<StepReport, McaError> {
        if self.first_step {
            let cutoff = table.init_all(params.radius)?;
            info!(
                "Initialized {} materials, interaction cutoff: {}",
                table.num_types(),
                cutoff
            );
            self.first_step = false;
        }

        if !self.unsupported_flags_reported
            && flags.intersects(ComputeFlags::ENERGY | ComputeFlags::VIRIAL)
        {
            warn!("Bonds do not contribute to the energy or virial, ignoring {:?}.", flags);
            self.unsupported_flags_reported = true;
        }

        particles.update_topology(self.step_id)?;

        if let Some(particle) = particles.iter().find(|p| !table.contains(p.material)) {
            return Err(McaError::UnknownMaterial {
                particle: particle.tag,
                material: particle.material,
            });
        }

        let report = McaSolver::step(params, table, particles);
        self.step_id += 1;
        Ok(report)
    }
}

impl Default for McaPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::models::MaterialPair;
    use crate::dynamics::{BondHalf, Particle};
    use na::{point, Vector3};

    fn elastic_table() -> MaterialTable {
        let mut table = MaterialTable::new(1);
        table
            .set(0..=0, 0..=0, MaterialPair::elastic(1.0, 2.0))
            .unwrap();
        table
    }

    #[test]
    fn incomplete_tables_are_rejected_on_the_first_step() {
        let mut table = MaterialTable::new(2);
        table
            .set(0..=0, 0..=0, MaterialPair::elastic(1.0, 2.0))
            .unwrap();
        let mut particles = ParticleSet::new();

        let result = McaPipeline::new().step(
            &McaParameters::default(),
            ComputeFlags::NONE,
            &mut table,
            &mut particles,
        );
        assert_eq!(result, Err(McaError::MissingCoefficients { material: 1 }));
    }

    #[test]
    fn unknown_materials_are_rejected() {
        let mut table = elastic_table();
        let mut particles = ParticleSet::new();
        particles.insert(Particle::new(4, 3, point![0.0, 0.0, 0.0]));

        let result = McaPipeline::new().step(
            &McaParameters::default(),
            ComputeFlags::NONE,
            &mut table,
            &mut particles,
        );
        assert_eq!(
            result,
            Err(McaError::UnknownMaterial {
                particle: 4,
                material: 3
            })
        );
    }

    #[test]
    fn resolution_errors_carry_the_step_id() {
        let mut table = elastic_table();
        let mut particles = ParticleSet::new();
        particles.insert(Particle::new(1, 0, point![0.0, 0.0, 0.0]));
        let params = McaParameters::default();
        let mut pipeline = McaPipeline::new();

        for _ in 0..2 {
            pipeline
                .step(&params, ComputeFlags::ENERGY, &mut table, &mut particles)
                .unwrap();
        }

        particles.particles_mut()[0]
            .bonds
            .push(BondHalf::new(2, 2.0, Vector3::x()));
        particles.mark_topology_changed();

        assert_eq!(
            pipeline.step(&params, ComputeFlags::NONE, &mut table, &mut particles),
            Err(McaError::MissingBondPartner {
                particle: 1,
                partner: 2,
                step: 2
            })
        );
        assert_eq!(pipeline.step_id(), 2);
    }

    #[test]
    fn bonds_edited_in_place_are_resolved_before_the_phases() {
        let mut table = elastic_table();
        let mut particles = ParticleSet::new();
        particles.insert(Particle::new(1, 0, point![0.0, 0.0, 0.0]));
        particles.insert(Particle::new(2, 0, point![2.0, 0.0, 0.0]));
        let params = McaParameters::default();
        let mut pipeline = McaPipeline::new();

        pipeline
            .step(&params, ComputeFlags::NONE, &mut table, &mut particles)
            .unwrap();
        assert!(particles.topology().pairs().is_empty());

        // Bonds added without marking the topology as changed.
        let mut first = BondHalf::new(2, 2.0, Vector3::x());
        first.distance = 1.98;
        let mut second = BondHalf::new(1, 2.0, -Vector3::x());
        second.distance = 1.98;
        particles.particles_mut()[0].bonds.push(first);
        particles.particles_mut()[1].bonds.push(second);

        let report = pipeline
            .step(&params, ComputeFlags::NONE, &mut table, &mut particles)
            .unwrap();
        assert_eq!(report.broken_bonds_skipped, 0);
        assert_eq!(particles.topology().pairs().len(), 1);

        let p1 = &particles.particles()[0];
        let p2 = &particles.particles()[1];
        assert!(p1.force.x < 0.0);
        assert_eq!(p1.force, -p2.force);
    }
}
