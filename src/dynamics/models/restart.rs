use super::{MaterialPair, MaterialTable, PairSettings};
use anyhow::Context;
use bytemuck::Pod;
use std::io::{Read, Write};

/// The participants of a distributed run, as seen by the restart reader.
///
/// Only the root participant reads the restart file; every value it reads is broadcast to
/// the others.
pub trait Communicator {
    fn is_root(&self) -> bool;
    fn broadcast(&self, bytes: &mut [u8]);
}

/// A single-process run.
impl Communicator for () {
    fn is_root(&self) -> bool {
        true
    }

    fn broadcast(&self, _: &mut [u8]) {
        /* nothing */
    }
}

fn write_pod<T: Pod>(writer: &mut impl Write, value: T) -> anyhow::Result<()> {
    writer
        .write_all(bytemuck::bytes_of(&value))
        .context("failed to write the mca restart data")
}

fn read_pod<T: Pod>(reader: &mut impl Read, comm: &impl Communicator) -> anyhow::Result<T> {
    let mut value = T::zeroed();

    if comm.is_root() {
        reader
            .read_exact(bytemuck::bytes_of_mut(&mut value))
            .context("failed to read the mca restart data")?;
    }

    comm.broadcast(bytemuck::bytes_of_mut(&mut value));
    Ok(value)
}

impl MaterialTable {
    pub fn write_restart_settings(&self, writer: &mut impl Write) -> anyhow::Result<()> {
        write_pod(writer, self.settings.cut_global)?;
        write_pod(writer, self.settings.mix_flag)
    }

    pub fn read_restart_settings(
        &mut self,
        reader: &mut impl Read,
        comm: &impl Communicator,
    ) -> anyhow::Result<()> {
        self.settings = PairSettings {
            cut_global: read_pod(reader, comm)?,
            mix_flag: read_pod(reader, comm)?,
        };
        Ok(())
    }

    /// Writes the settings block followed by every upper-triangular pair, row-major: its
    /// set flag, then its coefficients if set.
    pub fn write_restart(&self, writer: &mut impl Write) -> anyhow::Result<()> {
        self.write_restart_settings(writer)?;

        for i in 0..self.num_types {
            for j in i..self.num_types {
                let id = self.id(i, j);
                write_pod(writer, self.explicitly_set[id] as i32)?;

                if self.explicitly_set[id] {
                    let pair = &self.entries[id];
                    write_pod(writer, pair.shear_modulus)?;
                    write_pod(writer, pair.bulk_modulus)?;
                    write_pod(writer, pair.yield_stress)?;
                    write_pod(writer, pair.hardening_modulus)?;
                }
            }
        }

        Ok(())
    }

    /// Reads a table written by [`MaterialTable::write_restart`], replacing all coefficients.
    ///
    /// The number of types is not part of the file: `self` must already have the right size.
    pub fn read_restart(
        &mut self,
        reader: &mut impl Read,
        comm: &impl Communicator,
    ) -> anyhow::Result<()> {
        self.read_restart_settings(reader, comm)?;
        *self = Self {
            settings: self.settings,
            ..Self::new(self.num_types)
        };

        for i in 0..self.num_types {
            for j in i..self.num_types {
                let set: i32 = read_pod(reader, comm)
                    .with_context(|| format!("missing set flag of pair ({}, {})", i + 1, j + 1))?;
                let id = self.id(i, j);
                self.explicitly_set[id] = set != 0;

                if set != 0 {
                    self.entries[id] = MaterialPair {
                        shear_modulus: read_pod(reader, comm)?,
                        bulk_modulus: read_pod(reader, comm)?,
                        yield_stress: read_pod(reader, comm)?,
                        hardening_modulus: read_pod(reader, comm)?,
                    };
                }
            }
        }

        Ok(())
    }

    /// Writes one line `type G K Sy Eh` per type, with 1-based type ids.
    pub fn write_data(&self, writer: &mut impl Write) -> anyhow::Result<()> {
        for i in 0..self.num_types {
            let m = self.material(i);
            writeln!(
                writer,
                "{} {} {} {} {}",
                i + 1,
                m.shear_modulus,
                m.bulk_modulus,
                m.yield_stress,
                m.hardening_modulus
            )?;
        }

        Ok(())
    }

    /// Writes one line `type_i type_j G K Sy Eh` per upper-triangular pair.
    pub fn write_data_all(&self, writer: &mut impl Write) -> anyhow::Result<()> {
        for i in 0..self.num_types {
            for j in i..self.num_types {
                let m = self.pair(i, j);
                writeln!(
                    writer,
                    "{} {} {} {} {} {}",
                    i + 1,
                    j + 1,
                    m.shear_modulus,
                    m.bulk_modulus,
                    m.yield_stress,
                    m.hardening_modulus
                )?;
            }
        }

        Ok(())
    }
}
