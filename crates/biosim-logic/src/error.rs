//! Parameter validation errors.

use crate::landscape::Terrain;

/// Rejected parameter update. Updates are validated in full before any
/// value is merged, so an error always means nothing changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// Value below zero.
    Negative { key: &'static str, value: f64 },
    /// Value above one for a parameter bounded to [0, 1].
    OutOfUnitRange { key: &'static str, value: f64 },
    /// NaN or infinite.
    NotFinite { key: &'static str },
    /// Terrain kind that grows no food and so has no food table.
    NoFoodParameters(Terrain),
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::Negative { key, value } => {
                write!(f, "value {} for parameter \"{}\" is negative", value, key)
            }
            ParamError::OutOfUnitRange { key, value } => {
                write!(
                    f,
                    "value {} for parameter \"{}\" must satisfy 0 <= {} <= 1",
                    value, key, key
                )
            }
            ParamError::NotFinite { key } => {
                write!(f, "value for parameter \"{}\" is not a finite number", key)
            }
            ParamError::NoFoodParameters(terrain) => {
                write!(f, "{} has no food parameters", terrain)
            }
        }
    }
}

impl std::error::Error for ParamError {}

/// Check a single supplied value. `unit_bounded` additionally requires `value <= 1`.
pub(crate) fn check_value(
    key: &'static str,
    value: f64,
    unit_bounded: bool,
) -> Result<(), ParamError> {
    if !value.is_finite() {
        return Err(ParamError::NotFinite { key });
    }
    if value < 0.0 {
        return Err(ParamError::Negative { key, value });
    }
    if unit_bounded && value > 1.0 {
        return Err(ParamError::OutOfUnitRange { key, value });
    }
    Ok(())
}
