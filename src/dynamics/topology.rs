use crate::dynamics::solver::McaError;
use crate::dynamics::Particle;
use parry::utils::hashmap::HashMap;

/// Resolution of one bond slot: the partner's index and the slot of the reciprocal
/// half-record in the partner's bond list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BondLink {
    pub partner: usize,
    pub reciprocal: usize,
}

/// A bonded pair, visited once by the force assembly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BondPair {
    pub first: usize,
    pub first_slot: usize,
    pub second: usize,
    pub second_slot: usize,
}

/// Adjacency index of the bond network.
///
/// Only depends on which particles are bonded, so it is rebuilt when the topology changes,
/// not every step.
#[derive(Clone, Debug, Default)]
pub struct BondTopology {
    pub(crate) links: Vec<Vec<BondLink>>,
    pub(crate) pairs: Vec<BondPair>,
    /// Pair indices grouped so that no two pairs of the same color share a particle.
    pub(crate) colors: Vec<Vec<usize>>,
}

impl BondTopology {
    pub fn build(
        particles: &[Particle],
        tag_to_index: &HashMap<u64, usize>,
        step: u64,
    ) -> Result<Self, McaError> {
        let t0 = instant::now();

        let slots: Vec<HashMap<u64, usize>> = particles
            .iter()
            .map(|p| {
                p.bonds
                    .iter()
                    .enumerate()
                    .map(|(k, bond)| (bond.partner, k))
                    .collect()
            })
            .collect();

        let mut links = Vec::with_capacity(particles.len());
        let mut pairs = vec![];

        for (i, particle) in particles.iter().enumerate() {
            // Ghosts are only ever read through the bonds of local particles.
            if particle.ghost {
                links.push(vec![]);
                continue;
            }

            let mut particle_links = Vec::with_capacity(particle.bonds.len());

            for (k, bond) in particle.bonds.iter().enumerate() {
                let j = *tag_to_index
                    .get(&bond.partner)
                    .ok_or(McaError::MissingBondPartner {
                        particle: particle.tag,
                        partner: bond.partner,
                        step,
                    })?;
                let reciprocal =
                    *slots[j]
                        .get(&particle.tag)
                        .ok_or(McaError::MissingReciprocalBond {
                            particle: particle.tag,
                            partner: bond.partner,
                            step,
                        })?;

                particle_links.push(BondLink {
                    partner: j,
                    reciprocal,
                });

                if particles[j].ghost || i < j {
                    pairs.push(BondPair {
                        first: i,
                        first_slot: k,
                        second: j,
                        second_slot: reciprocal,
                    });
                }
            }

            links.push(particle_links);
        }

        let colors = Self::color_pairs(particles.len(), &pairs);
        info!(
            "Bond topology: {} pairs in {} colors, built in {}ms",
            pairs.len(),
            colors.len(),
            instant::now() - t0
        );

        Ok(Self {
            links,
            pairs,
            colors,
        })
    }

    /// Greedy edge coloring of the bond graph.
    fn color_pairs(num_particles: usize, pairs: &[BondPair]) -> Vec<Vec<usize>> {
        let mut used: Vec<Vec<usize>> = vec![vec![]; num_particles];
        let mut colors: Vec<Vec<usize>> = vec![];

        for (pair_id, pair) in pairs.iter().enumerate() {
            let color = (0..)
                .find(|c| !used[pair.first].contains(c) && !used[pair.second].contains(c))
                .unwrap_or(colors.len());

            if color == colors.len() {
                colors.push(vec![]);
            }

            colors[color].push(pair_id);
            used[pair.first].push(color);
            used[pair.second].push(color);
        }

        colors
    }

    pub fn links(&self, particle: usize) -> &[BondLink] {
        self.links.get(particle).map(|l| &l[..]).unwrap_or(&[])
    }

    pub fn pairs(&self) -> &[BondPair] {
        &self.pairs
    }

    pub fn colors(&self) -> &[Vec<usize>] {
        &self.colors
    }
}
