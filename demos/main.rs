//! Uniaxial compression of a bonded fcc block of elastic-plastic particles.
//!
//! The bottom layer is fixed and the top layer is pushed down at a constant velocity. Run
//! with `RUST_LOG=info` to see the timings of every phase.

extern crate nalgebra as na;
#[macro_use]
extern crate log;

use mca3d::prelude::*;
use na::vector;

const RADIUS: Real = 1.0;
const DENSITY: Real = 1.0;
const CELLS: usize = 3;
const PRESS_VELOCITY: Real = 1.0e-3;

/// Particles of a face-centered cubic block, with touching nearest neighbors.
fn fcc_block(cells: usize, radius: Real, randomize: bool) -> Vec<Particle> {
    let mut rand64 = oorandom::Rand64::new(42);
    let cell_width = 2.0 * (2.0 as Real).sqrt() * radius;
    let basis = [
        vector![0.0, 0.0, 0.0],
        vector![0.5, 0.5, 0.0],
        vector![0.5, 0.0, 0.5],
        vector![0.0, 0.5, 0.5],
    ];

    let mut particles = vec![];
    let mut tag = 0;

    for i in 0..cells {
        for j in 0..cells {
            for k in 0..cells {
                let corner = vector![i as Real, j as Real, k as Real];
                for offset in &basis {
                    let mut pos = Point::from((corner + offset) * cell_width);
                    if randomize {
                        pos.x += (rand64.rand_float() - 0.5) * 1.0e-3 * radius;
                    }
                    particles.push(Particle::new(tag, 0, pos));
                    tag += 1;
                }
            }
        }
    }

    particles
}

struct Block {
    particles: ParticleSet,
    fixed: Vec<bool>,
    pressed: Vec<bool>,
}

fn init_block(params: &McaParameters) -> Block {
    let mut particles = ParticleSet::new();
    particles.insert_batch(fcc_block(CELLS, params.radius, true));

    let tags: Vec<_> = particles.iter().map(|p| (p.tag, p.position)).collect();
    let bond_length = 1.1 * params.rest_length();
    let mut num_bonds = 0;

    for (a, (tag_a, pos_a)) in tags.iter().enumerate() {
        for (tag_b, pos_b) in &tags[a + 1..] {
            if na::distance(pos_a, pos_b) < bond_length && particles.create_bond(*tag_a, *tag_b) {
                num_bonds += 1;
            }
        }
    }

    let min_y = tags.iter().map(|(_, p)| p.y).fold(Real::MAX, Real::min);
    let max_y = tags.iter().map(|(_, p)| p.y).fold(-Real::MAX, Real::max);
    let fixed = particles
        .iter()
        .map(|p| p.position.y < min_y + 0.5 * params.radius)
        .collect();
    let pressed = particles
        .iter()
        .map(|p| p.position.y > max_y - 0.5 * params.radius)
        .collect();

    info!(
        "Created a block of {} particles and {} bonds.",
        particles.len(),
        num_bonds
    );

    Block {
        particles,
        fixed,
        pressed,
    }
}

fn integrate(params: &McaParameters, block: &mut Block) {
    let mass = DENSITY * 4.0 / 3.0 * std::f64::consts::PI as Real * params.radius.powi(3);
    let inertia = 0.4 * mass * params.radius * params.radius;
    let dt = params.dt;
    let Block {
        particles,
        fixed,
        pressed,
    } = block;

    for (i, particle) in particles.particles_mut().iter_mut().enumerate() {
        if fixed[i] {
            particle.velocity = Vector::zeros();
        } else if pressed[i] {
            particle.velocity = vector![0.0, -PRESS_VELOCITY, 0.0];
        } else {
            particle.velocity += particle.force * (dt / mass);
            particle.angular_velocity += particle.torque * (dt / inertia);
        }

        particle.position += particle.velocity * dt;
        particle.rotation += particle.angular_velocity * dt;
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let params = McaParameters {
        dt: 0.05,
        ..McaParameters::fcc(RADIUS)
    };

    let young_modulus = 2.5;
    let poisson_ratio = 0.25;
    let shear = mca3d::utils::shear_modulus(young_modulus, poisson_ratio).to_string();
    let bulk = mca3d::utils::bulk_modulus(young_modulus, poisson_ratio).to_string();

    let mut table = MaterialTable::new(1);
    table.coeff(&["*", "*", shear.as_str(), bulk.as_str(), "0.02", "0.05"])?;
    table.write_data(&mut std::io::stdout())?;

    let mut block = init_block(&params);
    let mut pipeline = McaPipeline::new();
    let mut total_corrections = 0;
    let mut total_work = 0.0;

    for step in 0..2000 {
        integrate(&params, &mut block);

        let particles = &mut block.particles;
        particles.reset_accumulators();
        particles.update_bond_geometry();
        let report = pipeline.step(&params, ComputeFlags::NONE, &mut table, particles)?;
        particles.swap_history();

        total_corrections += report.plastic_corrections;
        total_work += report.plastic_work;

        if step % 200 == 0 {
            let reaction: Real = particles
                .iter()
                .zip(block.pressed.iter())
                .filter(|(_, pressed)| **pressed)
                .map(|(p, _)| p.force.y)
                .sum();
            let max_stress = particles
                .iter()
                .map(|p| p.equivalent_stress)
                .fold(0.0, Real::max);
            println!(
                "step {}: reaction {:.6e}, max equivalent stress {:.6e}, plastic corrections {}",
                step, reaction, max_stress, report.plastic_corrections
            );
        }
    }

    println!(
        "{} plastic corrections in total, dissipated work: {:.6e}",
        total_corrections, total_work
    );

    Ok(())
}
