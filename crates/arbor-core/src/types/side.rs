//! Option side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ArborError;

/// Side of an option contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionSide {
    /// Right to buy at the strike.
    Call,
    /// Right to sell at the strike.
    Put,
}

impl OptionSide {
    /// Payoff direction: +1 for call, -1 for put.
    #[must_use]
    pub fn phi(&self) -> f64 {
        match self {
            OptionSide::Call => 1.0,
            OptionSide::Put => -1.0,
        }
    }

    /// Value of exercising at `price` against `strike`.
    ///
    /// `max(price - strike, 0)` for calls, `max(strike - price, 0)` for puts.
    #[must_use]
    pub fn intrinsic(&self, price: f64, strike: f64) -> f64 {
        (self.phi() * (price - strike)).max(0.0)
    }

    /// Returns the canonical name used in persisted contracts.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionSide::Call => "Call",
            OptionSide::Put => "Put",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OptionSide {
    type Err = ArborError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionSide::Call),
            "put" | "p" => Ok(OptionSide::Put),
            _ => Err(ArborError::serialization(format!("unknown option side '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intrinsic() {
        assert_eq!(OptionSide::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionSide::Call.intrinsic(90.0, 100.0), 0.0);
        assert_eq!(OptionSide::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionSide::Put.intrinsic(110.0, 100.0), 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Call".parse::<OptionSide>().unwrap(), OptionSide::Call);
        assert_eq!(" put ".parse::<OptionSide>().unwrap(), OptionSide::Put);
        assert!("straddle".parse::<OptionSide>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&OptionSide::Put).unwrap(), "\"Put\"");
        let side: OptionSide = serde_json::from_str("\"Call\"").unwrap();
        assert_eq!(side, OptionSide::Call);
        assert!(serde_json::from_str::<OptionSide>("\"Undefined\"").is_err());
    }
}
