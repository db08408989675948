//! Weighted option tables.
//!
//! Palettes and noise presets are chosen from tables where each entry carries
//! a relative weight. The probability of entry `i` is `weight_i / sum(weights)`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::provider::RandomSource;

/// One entry of a weighted option table.
///
/// The value's fields are flattened next to `weight` when serialized, so a
/// palette entry reads `{ "name": ..., "colors": [...], "weight": 2 }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weighted<T> {
    #[serde(flatten)]
    pub value: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }
}

/// Check that a table is non-empty, every weight is finite and non-negative,
/// and at least one weight is positive. Returns the total weight.
pub fn validate_weights<T>(table: &'static str, options: &[Weighted<T>]) -> Result<f64, ConfigError> {
    if options.is_empty() {
        return Err(ConfigError::EmptyTable(table));
    }
    let mut total = 0.0;
    for option in options {
        if !option.weight.is_finite() || option.weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                table,
                weight: option.weight,
            });
        }
        total += option.weight;
    }
    if total <= 0.0 {
        return Err(ConfigError::ZeroTotalWeight(table));
    }
    Ok(total)
}

/// Pick one entry with probability proportional to its weight.
///
/// Draws `r = random() * total`, then walks the table subtracting each weight
/// until `r` falls below the current entry's weight. If rounding lets `r`
/// run past every entry, the last entry is returned.
pub fn select_weighted<'a, T, R>(
    table: &'static str,
    options: &'a [Weighted<T>],
    random: &mut R,
) -> Result<&'a Weighted<T>, ConfigError>
where
    R: RandomSource + ?Sized,
{
    let total = validate_weights(table, options)?;
    let mut r = random.random() * total;
    for option in options {
        if r < option.weight {
            return Ok(option);
        }
        r -= option.weight;
    }
    // validate_weights guarantees a non-empty table
    Ok(&options[options.len() - 1])
}
