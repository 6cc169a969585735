use std::fmt;

/// Errors raised while configuring or stepping the bond mechanics.
///
/// The partner-resolution errors are fatal: the state of a partially completed phase is
/// undefined and the step must not be resumed.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum McaError {
    /// A bond references a partner that is neither a local nor a ghost particle.
    MissingBondPartner { particle: u64, partner: u64, step: u64 },
    /// The partner exists but has no half-record pointing back to the particle.
    MissingReciprocalBond { particle: u64, partner: u64, step: u64 },
    /// A coefficient command must have between 4 and 6 arguments.
    InvalidCoefficientArgs { count: usize },
    InvalidTypeRange { range: String },
    InvalidNumber { value: String },
    /// The type ranges of a coefficient command did not select any pair.
    EmptyTypeRange,
    /// The diagonal coefficients of this material were never set.
    MissingCoefficients { material: usize },
    /// A particle's type id is outside of the material table.
    UnknownMaterial { particle: u64, material: usize },
}

impl fmt::Display for McaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBondPartner {
                particle,
                partner,
                step,
            } => write!(f, "bond atoms {particle} {partner} missing at step {step}"),
            Self::MissingReciprocalBond {
                particle,
                partner,
                step,
            } => write!(
                f,
                "particle {partner} has no bond back to particle {particle} at step {step}"
            ),
            Self::InvalidCoefficientArgs { count } => write!(
                f,
                "incorrect args for mca pair coefficients: expected 4 to 6, got {count}"
            ),
            Self::InvalidTypeRange { range } => write!(f, "invalid type range '{range}'"),
            Self::InvalidNumber { value } => write!(f, "expected a number, got '{value}'"),
            Self::EmptyTypeRange => {
                write!(f, "incorrect args for mca pair coefficients: empty type range")
            }
            Self::MissingCoefficients { material } => {
                write!(f, "mca pair coefficients of type {} are not set", material + 1)
            }
            Self::UnknownMaterial { particle, material } => write!(
                f,
                "particle {particle} has type {} which is outside of the material table",
                material + 1
            ),
        }
    }
}

impl std::error::Error for McaError {}
