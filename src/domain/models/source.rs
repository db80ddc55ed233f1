use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Origin of configuration data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Local `.env` file loaded into the process environment
    #[serde(rename = "env")]
    Environment,
    /// Configuration file found in one of the search directories
    File,
    /// Remote key/value provider
    Remote,
}

impl Source {
    /// Every source
    pub const ALL: [Self; 3] = [Self::Environment, Self::File, Self::Remote];

    /// Short name used in logs, CLI flags and provenance metadata
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "env",
            Self::File => "file",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "env" | "environment" => Ok(Self::Environment),
            "file" => Ok(Self::File),
            "remote" | "consul" => Ok(Self::Remote),
            _ => Err(anyhow::anyhow!("Invalid configuration source: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_round_trips_through_display() {
        for source in Source::ALL {
            assert_eq!(source.to_string().parse::<Source>().unwrap(), source);
        }
    }

    #[test]
    fn test_source_aliases() {
        assert_eq!("ENVIRONMENT".parse::<Source>().unwrap(), Source::Environment);
        assert_eq!("consul".parse::<Source>().unwrap(), Source::Remote);
        assert!("database".parse::<Source>().is_err());
    }
}
