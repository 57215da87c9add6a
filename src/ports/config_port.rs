//! Configuration access port trait.

use crate::domain::error::FxTraderError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Parsed value, `default` when the key is absent, an error when present
    /// but unparsable.
    fn get_usize(&self, section: &str, key: &str, default: usize) -> Result<usize, FxTraderError> {
        get_parsed(self, section, key, default, "a non-negative integer")
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, FxTraderError> {
        get_parsed(self, section, key, default, "a number")
    }
}

fn get_parsed<C, T>(
    config: &C,
    section: &str,
    key: &str,
    default: T,
    expected: &str,
) -> Result<T, FxTraderError>
where
    C: ConfigPort + ?Sized,
    T: std::str::FromStr,
{
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| FxTraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("expected {}, got '{}'", expected, raw),
        }),
    }
}
