/// Rejected game configuration. No playable field follows from these values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroPlatformCount,
    NonPositive { field: &'static str, value: f32 },
    InvalidKindWeights,
    InvalidSpeedRange { min: f32, max: f32 },
    InvalidProbability { field: &'static str, value: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroPlatformCount => write!(f, "platform count must be at least 1"),
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive and finite, got {value}")
            },
            Self::InvalidKindWeights => write!(
                f,
                "platform kind weights must be non-negative, finite, and not all zero"
            ),
            Self::InvalidSpeedRange { min, max } => {
                write!(f, "invalid moving platform speed range: {min}..={max}")
            },
            Self::InvalidProbability { field, value } => {
                write!(f, "{field} must be within 0.0..=1.0, got {value}")
            },
        }
    }
}

impl std::error::Error for ConfigError {}
