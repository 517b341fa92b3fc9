use std::fmt;

use crate::error::{Error, Result};

/// An airport of the flight network.
///
/// Equality and hashing compare code, name and location together. The flight
/// graph on the other hand registers airports by code alone (first one wins),
/// so two airports with the same code but different names are unequal here
/// yet collide at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Airport {
    code: String,
    name: String,
    location: String,
}

impl Airport {
    pub fn new(code: impl Into<String>, name: impl Into<String>, location: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let name = name.into();

        if code.is_empty() || name.is_empty() {
            return Err(Error::invalid_argument("Airport code and name cannot be empty"));
        }

        Ok(Self { code, name, location: location.into() })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument("Airport name cannot be empty"));
        }
        self.name = name;
        Ok(())
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.code, self.location)
    }
}
