//! Cassandra release version

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// `major.minor.patch` release number
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = SchemaError;

    /// Parse `[v]major.minor[.patch][-SNAPSHOT]`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let version = trimmed.strip_suffix("-SNAPSHOT").unwrap_or(trimmed);
        let version = version.strip_prefix('v').unwrap_or(version);

        let parts: Vec<&str> = version.split('.').collect();
        if parts.len() < 2 {
            return Err(SchemaError::InvalidVersion(s.to_string()));
        }

        let number = |name: &str, part: &str| {
            part.parse::<u32>().map_err(|e| {
                SchemaError::InvalidVersion(format!("{s} (invalid {name} version {part:?}: {e})"))
            })
        };

        Ok(Self {
            major: number("major", parts[0])?,
            minor: number("minor", parts[1])?,
            patch: match parts.get(2) {
                Some(part) => number("patch", part)?,
                None => 0,
            },
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        let cases = [
            ("3.11.4", Version::new(3, 11, 4)),
            ("4.0", Version::new(4, 0, 0)),
            ("v2.1.9", Version::new(2, 1, 9)),
            ("5.0.1-SNAPSHOT", Version::new(5, 0, 1)),
            ("v4.1-SNAPSHOT", Version::new(4, 1, 0)),
        ];

        for (input, expected) in cases {
            assert_eq!(input.parse::<Version>().unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_invalid_versions() {
        for input in ["", "4", "four.0", "4.x", "4.0.beta"] {
            let err = input.parse::<Version>().unwrap_err();
            assert!(matches!(err, SchemaError::InvalidVersion(_)), "{input}");
        }
    }

    #[test]
    fn test_display_and_order() {
        assert_eq!(Version::new(3, 11, 4).to_string(), "v3.11.4");
        assert!(Version::new(4, 0, 0) > Version::new(3, 11, 4));
    }
}
