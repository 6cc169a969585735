use crate::dynamics::solver::McaError;
use crate::dynamics::{BondHalf, BondTopology, Particle};
use crate::math::{Real, Vector};
use parry::utils::hashmap::HashMap;
use rayon::prelude::*;

/// The local and ghost particles seen by this participant, with their bonds.
#[derive(Clone)]
pub struct ParticleSet {
    pub(crate) particles: Vec<Particle>,
    pub(crate) tag_to_index: HashMap<u64, usize>,
    pub(crate) topology: BondTopology,
    pub(crate) topology_changed: bool,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self {
            particles: vec![],
            tag_to_index: HashMap::default(),
            topology: BondTopology::default(),
            topology_changed: true,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles.
    ///
    /// Call [`ParticleSet::mark_topology_changed`] after adding or removing bonds through
    /// this slice.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn index_of(&self, tag: u64) -> Option<usize> {
        self.tag_to_index.get(&tag).copied()
    }

    pub fn get_by_tag(&self, tag: u64) -> Option<&Particle> {
        self.particles.get(self.index_of(tag)?)
    }

    pub fn get_by_tag_mut(&mut self, tag: u64) -> Option<&mut Particle> {
        let i = self.index_of(tag)?;
        self.particles.get_mut(i)
    }

    pub fn set_particles(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
        self.tag_to_index.clear();
        for i in 0..self.particles.len() {
            self.register_tag(i);
        }
        self.topology_changed = true;
    }

    pub fn insert(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        let i = self.particles.len() - 1;
        self.register_tag(i);
        self.topology_changed = true;
        i
    }

    pub fn insert_batch(&mut self, particles: Vec<Particle>) {
        for particle in particles {
            let _ = self.insert(particle);
        }
    }

    fn register_tag(&mut self, i: usize) {
        let particles = &self.particles;
        let tag = particles[i].tag;
        // Local particles take precedence over ghost replicas with the same tag.
        let replace = match self.tag_to_index.get(&tag) {
            Some(&existing) => particles[existing].ghost && !particles[i].ghost,
            None => true,
        };

        if replace {
            self.tag_to_index.insert(tag, i);
        }
    }

    /// Creates the two half-records of a new bond between the particles `a` and `b`, at
    /// their current distance.
    ///
    /// Returns `false` if one of the tags is unknown or if both particles are at the same
    /// position.
    pub fn create_bond(&mut self, a: u64, b: u64) -> bool {
        let (ia, ib) = match (self.index_of(a), self.index_of(b)) {
            (Some(ia), Some(ib)) if ia != ib => (ia, ib),
            _ => return false,
        };

        let dpos = self.particles[ib].position - self.particles[ia].position;
        let distance = dpos.norm();
        if distance <= 0.0 {
            return false;
        }
        let normal = dpos / distance;

        self.particles[ia]
            .bonds
            .push(BondHalf::new(b, distance, normal));
        self.particles[ib]
            .bonds
            .push(BondHalf::new(a, distance, -normal));
        self.topology_changed = true;
        true
    }

    /// Flags both halves of the bond between `a` and `b` as broken.
    ///
    /// Broken bonds are kept in the bond lists and skipped by the force assembly.
    pub fn break_bond(&mut self, a: u64, b: u64) -> bool {
        let mut found = false;

        for (owner, partner) in [(a, b), (b, a)] {
            if let Some(bond) = self
                .get_by_tag_mut(owner)
                .and_then(|p| p.bond_to_mut(partner))
            {
                bond.broken = true;
                found = true;
            }
        }

        found
    }

    pub fn mark_topology_changed(&mut self) {
        self.topology_changed = true;
    }

    pub fn topology(&self) -> &BondTopology {
        &self.topology
    }

    /// Rebuilds the adjacency index if the bond network changed since the last call.
    ///
    /// A bond list whose length no longer matches the index also triggers a rebuild.
    pub fn update_topology(&mut self, step: u64) -> Result<(), McaError> {
        let stale = self.topology.links.len() != self.particles.len()
            || self
                .particles
                .iter()
                .enumerate()
                .any(|(i, p)| !p.ghost && p.bonds.len() != self.topology.links(i).len());

        if self.topology_changed || stale {
            self.topology = BondTopology::build(&self.particles, &self.tag_to_index, step)?;
            self.topology_changed = false;
        }

        Ok(())
    }

    #[inline(always)]
    pub fn for_each_local_mut(&mut self, f: impl Fn(&mut Particle) + Sync) {
        self.particles
            .par_iter_mut()
            .filter(|p| !p.ghost)
            .for_each(|p| f(p))
    }

    /// Recomputes the current distance and unit normal of every local half-record from the
    /// particle positions.
    ///
    /// Bonds whose partner cannot be found are left untouched; the next step reports them.
    pub fn update_bond_geometry(&mut self) {
        let particles = &self.particles;
        let tag_to_index = &self.tag_to_index;

        let geometry: Vec<Vec<Option<(Real, Vector<Real>)>>> = particles
            .par_iter()
            .map(|particle| {
                if particle.ghost {
                    return vec![];
                }

                particle
                    .bonds
                    .iter()
                    .map(|bond| {
                        let partner = &particles[*tag_to_index.get(&bond.partner)?];
                        let dpos = partner.position - particle.position;
                        let distance = dpos.norm();
                        Some((distance, dpos / distance))
                    })
                    .collect()
            })
            .collect();

        self.particles
            .par_iter_mut()
            .zip(geometry.into_par_iter())
            .for_each(|(particle, geometry)| {
                for (bond, geometry) in particle.bonds.iter_mut().zip(geometry) {
                    if let Some((distance, normal)) = geometry {
                        bond.distance = distance;
                        bond.normal = normal;
                    }
                }
            });
    }

    /// Commits the current bond and stress values as previous-step values.
    ///
    /// The rotation is committed by the equivalent-stress phase instead.
    pub fn swap_history(&mut self) {
        self.for_each_local_mut(|particle| {
            particle.mean_stress_prev = particle.mean_stress;
            particle.equivalent_stress_prev = particle.equivalent_stress;
            particle.bonds.iter_mut().for_each(BondHalf::swap_history);
        })
    }

    pub fn reset_accumulators(&mut self) {
        self.particles
            .par_iter_mut()
            .for_each(Particle::reset_accumulators)
    }
}

impl Default for ParticleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ParticleSet {
    type Item = &'a Particle;
    type IntoIter = <&'a Vec<Particle> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        (&self.particles).into_iter()
    }
}
