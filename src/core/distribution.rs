//! Distribution references.
//!
//! Toolchains are owned by one or more distributions, named either plainly
//! (`SULONG_TOOLCHAIN_LAUNCHERS`) or qualified with their suite
//! (`sulong:SULONG_TOOLCHAIN_LAUNCHERS`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A possibly suite-qualified distribution name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistributionRef {
    suite: Option<String>,
    name: String,
}

impl DistributionRef {
    /// Create an unqualified reference.
    pub fn new(name: impl Into<String>) -> Self {
        DistributionRef {
            suite: None,
            name: name.into(),
        }
    }

    /// Create a suite-qualified reference.
    pub fn qualified(suite: impl Into<String>, name: impl Into<String>) -> Self {
        DistributionRef {
            suite: Some(suite.into()),
            name: name.into(),
        }
    }

    /// Parse `suite:NAME` or `NAME`.
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((suite, name)) => DistributionRef::qualified(suite, name),
            None => DistributionRef::new(s),
        }
    }

    /// The unqualified distribution name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning suite, if qualified.
    pub fn suite(&self) -> Option<&str> {
        self.suite.as_deref()
    }

    /// Qualify with `suite` unless already qualified.
    pub fn qualify(&self, suite: &str) -> DistributionRef {
        match self.suite {
            Some(_) => self.clone(),
            None => DistributionRef::qualified(suite, self.name.clone()),
        }
    }
}

impl fmt::Display for DistributionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.suite {
            Some(suite) => write!(f, "{}:{}", suite, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for DistributionRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DistributionRef::parse(s))
    }
}

impl Serialize for DistributionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DistributionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(DistributionRef::parse(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified() {
        let d = DistributionRef::parse("sulong:SULONG_BOOTSTRAP_TOOLCHAIN");
        assert_eq!(d.suite(), Some("sulong"));
        assert_eq!(d.name(), "SULONG_BOOTSTRAP_TOOLCHAIN");
        assert_eq!(d.to_string(), "sulong:SULONG_BOOTSTRAP_TOOLCHAIN");
    }

    #[test]
    fn test_qualify_keeps_existing_suite() {
        let plain = DistributionRef::new("LAUNCHERS");
        assert_eq!(plain.qualify("sulong").to_string(), "sulong:LAUNCHERS");

        let other = DistributionRef::parse("tools:LAUNCHERS");
        assert_eq!(other.qualify("sulong").to_string(), "tools:LAUNCHERS");
    }
}
