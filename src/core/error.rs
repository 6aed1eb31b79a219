use thiserror::Error;

/// Fatal configuration problems, detected at load time where possible.
///
/// Resource shortfalls are deliberately absent here: a shortfall is a normal
/// per-timestep outcome represented as data (skip counts, activity status),
/// never an error.
#[derive(Error, Debug)]
pub enum MusterError {
    #[error("Unknown companion-metric unit '{unit}' for metric '{metric}'")]
    UnknownMetricUnit { metric: String, unit: String },

    #[error("Unknown companion-metric identifier: {0}")]
    UnknownMetric(String),

    #[error("Unknown labour limit policy: {0}")]
    UnknownLimitPolicy(String),

    #[error("Unknown filter field: {0}")]
    UnknownFilterField(String),

    #[error("Unknown filter comparison: {0}")]
    UnknownFilterComparison(String),

    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(String),

    #[error("Activity '{0}' declares no filter group; at least one is required")]
    MissingFilterGroup(String),

    #[error("Labour requirement of activity '{0}' declares no labour group")]
    MissingLabourGroup(String),

    #[error("Invalid activity definition: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MusterError>;
