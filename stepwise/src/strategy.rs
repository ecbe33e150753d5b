//! Execution strategy selection.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// How a suite's tree is turned into units of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Level-synchronized: each action runs once and its result is forked to
    /// every child.
    #[default]
    Fast,
    /// Path-enumerated: every root-to-leaf chain runs independently.
    Chain,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Fast => "fast",
            Strategy::Chain => "chain",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "fast" => Ok(Strategy::Fast),
            "chain" => Ok(Strategy::Chain),
            other => bail!("unknown strategy '{other}' (expected fast or chain)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("fast".parse::<Strategy>().expect("fast"), Strategy::Fast);
        assert_eq!("chain".parse::<Strategy>().expect("chain"), Strategy::Chain);
        let err = "breadth".parse::<Strategy>().expect_err("unknown");
        assert!(err.to_string().contains("breadth"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Strategy::Chain).expect("serialize");
        assert_eq!(json, "\"chain\"");
        assert_eq!(Strategy::default(), Strategy::Fast);
    }
}
