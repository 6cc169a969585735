use crate::dynamics::BondHalf;
use crate::math::{AngVector, Point, Real, Vector};

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Particle {
    /// Global identifier, shared by every replica of this particle.
    pub tag: u64,
    /// Type id, indexing the material table.
    pub material: usize,
    /// Read-only replica of a particle owned elsewhere.
    pub ghost: bool,

    pub position: Point<Real>,
    pub velocity: Vector<Real>,
    pub rotation: AngVector<Real>,
    pub rotation_prev: AngVector<Real>,
    pub angular_velocity: AngVector<Real>,

    // Stress state.
    pub mean_stress: Real,
    pub mean_stress_prev: Real,
    pub equivalent_stress: Real,
    pub equivalent_stress_prev: Real,
    pub equivalent_strain: Real,
    pub plastic_heat: Real,

    // Accumulators written by the force assembly.
    pub force: Vector<Real>,
    pub torque: AngVector<Real>,

    pub bonds: Vec<BondHalf>,
}

impl Particle {
    pub fn new(tag: u64, material: usize, position: Point<Real>) -> Self {
        Self {
            tag,
            material,
            ghost: false,
            position,
            velocity: Vector::zeros(),
            rotation: AngVector::zeros(),
            rotation_prev: AngVector::zeros(),
            angular_velocity: AngVector::zeros(),
            mean_stress: 0.0,
            mean_stress_prev: 0.0,
            equivalent_stress: 0.0,
            equivalent_stress_prev: 0.0,
            equivalent_strain: 0.0,
            plastic_heat: 0.0,
            force: Vector::zeros(),
            torque: AngVector::zeros(),
            bonds: vec![],
        }
    }

    pub fn ghost(tag: u64, material: usize, position: Point<Real>) -> Self {
        Self {
            ghost: true,
            ..Self::new(tag, material, position)
        }
    }

    pub fn has_bonds(&self) -> bool {
        !self.bonds.is_empty()
    }

    pub fn bond_to(&self, partner: u64) -> Option<&BondHalf> {
        self.bonds.iter().find(|b| b.partner == partner)
    }

    pub fn bond_to_mut(&mut self, partner: u64) -> Option<&mut BondHalf> {
        self.bonds.iter_mut().find(|b| b.partner == partner)
    }

    /// The rotation increment of the current step: `rotation ⊕ (-rotation_prev)`, further
    /// composed with the implicit angular-velocity contribution `angular_velocity * dt_implicit`.
    pub fn rotation_increment(&self, dt_implicit: Real) -> AngVector<Real> {
        let explicit = crate::utils::small_rotation_sum(&self.rotation, &-self.rotation_prev);
        crate::utils::small_rotation_sum(&explicit, &(self.angular_velocity * dt_implicit))
    }

    pub fn reset_accumulators(&mut self) {
        self.force.fill(0.0);
        self.torque.fill(0.0);
    }
}
