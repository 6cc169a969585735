use crate::dynamics::models::MaterialTable;
use crate::dynamics::solver::McaParameters;
use crate::dynamics::ParticleSet;
use crate::math::Real;

/// Summary of one bond mechanics step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct StepReport {
    /// Number of particles brought back onto their yield surface.
    pub plastic_corrections: usize,
    /// Work dissipated by the plastic corrections.
    pub plastic_work: Real,
    /// Number of broken bonds ignored by the force assembly.
    pub broken_bonds_skipped: usize,
}

/// The constitutive engine of the movable cellular automaton (MCA) bonds.
pub struct McaSolver;

impl McaSolver {
    /// Runs the four phases of a step, in order, on a resolved bond topology.
    ///
    /// Each phase completes over every particle before the next one starts. The material of
    /// every particle must be part of `table`. Use [`crate::pipelines::McaPipeline::step`],
    /// which resolves the topology and checks the materials first.
    pub(crate) fn step(
        params: &McaParameters,
        table: &MaterialTable,
        particles: &mut ParticleSet,
    ) -> StepReport {
        let tt0 = instant::now();

        let t0 = instant::now();
        Self::compute_elastic_force(params, table, particles);
        info!("Elastic force update: {}ms", instant::now() - t0);

        let t0 = instant::now();
        Self::compute_equivalent_stress(params, particles);
        info!("Equivalent stress: {}ms", instant::now() - t0);

        let t0 = instant::now();
        let (plastic_corrections, plastic_work) = Self::correct_plasticity(table, particles);
        info!("Plasticity correction: {}ms", instant::now() - t0);

        if plastic_work > 0.0 {
            debug!(
                "{} plastic corrections, dissipated work: {}",
                plastic_corrections, plastic_work
            );
        }

        let t0 = instant::now();
        let broken_bonds_skipped = Self::assemble_forces(params, table, particles);
        info!("Force assembly: {}ms", instant::now() - t0);

        info!(">> Total bond step computation time: {}ms", instant::now() - tt0);

        StepReport {
            plastic_corrections,
            plastic_work,
            broken_bonds_skipped,
        }
    }
}
