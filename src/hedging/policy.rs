use crate::core::inputs::RiskRules;
use crate::hedging::rules::RiskRule;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while running the hedging pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HedgeError {
    /// A dependent rule was configured without the rule it builds on.
    /// Reported before any arithmetic runs.
    #[error("invalid parameter combination: {rule} requires {requires} to be set")]
    InvalidParameterCombination { rule: RiskRule, requires: RiskRule },
    /// A rule reached a value that its prerequisite never produced.
    #[error("{rule} needs a value from {requires}, which is not set")]
    MissingPrerequisite { rule: RiskRule, requires: RiskRule },
    #[error("unknown prerequisite policy '{0}', expected strict, at-point-of-use or lenient")]
    UnknownPolicy(String),
}

/// How the pipeline treats a dependent rule whose prerequisite is absent.
///
/// Three rules depend on another: the trailing stop and the volatility stop
/// compare against the stop-loss level, and diversification splits the
/// amount left over by partial hedging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrerequisitePolicy {
    /// Reject the configuration up front.
    #[default]
    Strict,
    /// Run the pipeline and fail only when the missing value is actually read.
    #[serde(alias = "faithful")]
    AtPointOfUse,
    /// Never fail: a missing stop-loss level reads as `f64::MIN_POSITIVE` and
    /// diversification without partial hedging splits the current amount.
    Lenient,
}

impl PrerequisitePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrerequisitePolicy::Strict => "strict",
            PrerequisitePolicy::AtPointOfUse => "at-point-of-use",
            PrerequisitePolicy::Lenient => "lenient",
        }
    }

    /// Check `rules` against this policy before the pipeline runs.
    ///
    /// Only [`PrerequisitePolicy::Strict`] rejects anything here; the other
    /// policies defer to the pipeline itself.
    pub fn validate(&self, rules: &RiskRules) -> Result<(), HedgeError> {
        if *self != PrerequisitePolicy::Strict {
            return Ok(());
        }
        for rule in RiskRule::ORDER {
            if rule.parameter(rules).is_none() {
                continue;
            }
            if let Some(requires) = rule.prerequisite() {
                if requires.parameter(rules).is_none() {
                    return Err(HedgeError::InvalidParameterCombination { rule, requires });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for PrerequisitePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrerequisitePolicy {
    type Err = HedgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(PrerequisitePolicy::Strict),
            "at-point-of-use" | "at_point_of_use" | "faithful" => {
                Ok(PrerequisitePolicy::AtPointOfUse)
            }
            "lenient" => Ok(PrerequisitePolicy::Lenient),
            _ => Err(HedgeError::UnknownPolicy(s.to_string())),
        }
    }
}
