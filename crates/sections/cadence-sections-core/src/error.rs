use thiserror::Error;

/// Tracker construction problems. Observing signals never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionError {
    #[error("a section tracker needs at least one section")]
    NoSections,
    #[error("section `{0}` is declared more than once")]
    DuplicateSection(String),
    #[error("visibility threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
    #[error("hysteresis {0} must be finite and within [0, 0.5)")]
    InvalidHysteresis(f64),
}
