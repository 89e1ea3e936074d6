use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    // File I/O Errors
    #[error("Failed to open input file '{path}': {source}")]
    InputFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read line {line} in file '{path}': {source}")]
    DataFileError {
        path: String,
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write trajectory '{path}': {source}")]
    DumpFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Parsing Errors
    #[error("Invalid command {command} found line: {line}")]
    UnknownCommand { command: String, line: usize },

    #[error("Missing argument on line {line}")]
    MissingArgument { line: usize },

    #[error("Error parsing floating number from string {string}: {source}")]
    FloatParseError {
        string: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("Error parsing integer number from string {string}: {source}")]
    IntParseError {
        string: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("Invalid argument: {string} at line: {line}")]
    InvalidArgument { string: String, line: usize },

    // Configuration errors
    #[error("No beads defined, a read_data command is required")]
    NoBeadsDefined,

    #[error("Cell dimensions must be positive and finite, got ({x}, {y})")]
    InvalidCell { x: f64, y: f64 },

    #[error("Parameter '{name}' has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Parameter '{name}' is required but was not given")]
    MissingParameter { name: &'static str },

    #[error("Only 2 spatial dimensions are supported, got {n_dim}")]
    InvalidDimension { n_dim: usize },

    #[error("Bead count mismatch: expected {expected}, found {found}")]
    BeadCountMismatch { expected: usize, found: usize },

    #[error("Bead index {index} out of range (total beads: {n_beads})")]
    InvalidBeadIndex { index: usize, n_beads: usize },

    #[error("Interaction between bead {index} and itself")]
    SelfInteraction { index: usize },

    #[error("Unknown ensemble: '{name}'")]
    UnknownEnsemble { name: String },

    // Physics errors
    #[error("Beads {i} and {j} are coincident")]
    CoincidentBeads { i: usize, j: usize },

    #[error("Potential energy is not finite: {energy}")]
    NonFiniteEnergy { energy: f64 },

    #[error("Volume scaling base {base} is not positive")]
    InvalidScale { base: f64 },

    // Distributed errors
    #[error("Interaction {interaction} is owned by {owners} ranks instead of exactly one")]
    PartitionMismatch { interaction: usize, owners: usize },

    #[error("Force evaluation failed on {failed} other rank(s)")]
    PeerFailure { failed: usize },

    #[error("Communication with rank {rank} was lost")]
    Communication { rank: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
