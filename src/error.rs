use thiserror::Error;

/// Everything that can go wrong when building or driving a lattice.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Non-positive width or temperature, non-finite field, bad schedule, ...
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A bounded random source ran out after `draws` values.
    #[error("random source exhausted after {draws} draws")]
    RandomSourceExhausted { draws: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

/// Reject anything that is not a strictly positive, finite temperature.
pub(crate) fn check_temperature(t: f64) -> Result<()> {
    if t.is_finite() && t > 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!("temperature must be positive and finite, got {t}")))
    }
}

pub(crate) fn check_field(h: f64) -> Result<()> {
    if h.is_finite() {
        Ok(())
    } else {
        Err(Error::config(format!("external field must be finite, got {h}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_guard() {
        assert!(check_temperature(1e-6).is_ok());
        assert!(check_temperature(0.0).is_err());
        assert!(check_temperature(-1.0).is_err());
        assert!(check_temperature(f64::NAN).is_err());
        assert!(check_temperature(f64::INFINITY).is_err());
    }

    #[test]
    fn display_messages() {
        let e = Error::RandomSourceExhausted { draws: 7 };
        assert_eq!(e.to_string(), "random source exhausted after 7 draws");
        let e = Error::config("width must be >= 1");
        assert_eq!(e.to_string(), "invalid configuration: width must be >= 1");
    }
}
