//! `RINEX` revision description
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Latest `RINEX` revision supported to this day
pub const SUPPORTED_VERSION: Version = Version { major: 4, minor: 2 };

/// Oldest `RINEX` revision supported to this day
pub const OLDEST_VERSION: Version = Version { major: 2, minor: 0 };

/// Version is used to describe RINEX standards revisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

#[derive(Clone, Debug, Error)]
pub enum ParsingError {
    #[error("failed to parse version")]
    ParseIntError(#[from] std::num::ParseIntError),
}

impl Default for Version {
    fn default() -> Self {
        SUPPORTED_VERSION
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('.') {
            Some((major, minor)) => Ok(Self {
                major: major.trim().parse::<u8>()?,
                minor: if minor.trim().is_empty() {
                    0
                } else {
                    minor.trim().parse::<u8>()?
                },
            }),
            None => Ok(Self {
                major: s.parse::<u8>()?,
                minor: 0,
            }),
        }
    }
}

impl Version {
    /// Builds a new [Version]
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
    /// Returns true if this revision can be decoded
    pub fn is_supported(&self) -> bool {
        *self >= OLDEST_VERSION && self.major <= SUPPORTED_VERSION.major
    }
    /// Returns true if this revision follows the modern
    /// (RINEX 3 and 4) record layout.
    pub fn is_modern(&self) -> bool {
        self.major > 2
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    #[test]
    fn version_parsing() {
        let version = Version::from_str("2.11").unwrap();
        assert_eq!(version, Version::new(2, 11));
        assert!(!version.is_modern());

        let version = Version::from_str("     3.05   ").unwrap();
        assert_eq!(version, Version::new(3, 5));
        assert!(version.is_modern());

        assert_eq!(Version::from_str("4").unwrap(), Version::new(4, 0));
        assert!(Version::from_str("OBSERVATION").is_err());
    }
    #[test]
    fn version_support() {
        assert!(Version::new(2, 10).is_supported());
        assert!(Version::new(3, 0).is_supported());
        assert!(Version::new(4, 1).is_supported());
        assert!(SUPPORTED_VERSION.is_supported());
        assert!(!Version::new(1, 0).is_supported());
        assert!(!Version::new(5, 0).is_supported());
    }
    #[test]
    fn version_display() {
        assert_eq!(Version::new(3, 5).to_string(), "3.05");
        assert_eq!(Version::new(2, 11).to_string(), "2.11");
    }
}
