//! Token scopes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a token may be used for. Lookups are always restricted to one scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    /// Confirms ownership of the registration email address.
    Activation,
    /// Authenticates API requests.
    Authentication,
}

impl TokenScope {
    /// Returns the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activation => "activation",
            Self::Authentication => "authentication",
        }
    }
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenScope {
    type Err = greenlight_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activation" => Ok(Self::Activation),
            "authentication" => Ok(Self::Authentication),
            _ => Err(greenlight_core::AppError::validation(format!(
                "Invalid token scope: '{s}'. Expected one of: activation, authentication"
            ))),
        }
    }
}
