use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Identificador de cada backend de cálculo conocido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Calculator {
    Chemaxon,
    Epi,
    Test,
    Sparc,
    Measured,
    Opera,
    ChemInfo,
    Metabolizer,
}

impl Calculator {
    pub const ALL: [Calculator; 8] = [Calculator::Chemaxon,
                                      Calculator::Epi,
                                      Calculator::Test,
                                      Calculator::Sparc,
                                      Calculator::Measured,
                                      Calculator::Opera,
                                      Calculator::ChemInfo,
                                      Calculator::Metabolizer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Calculator::Chemaxon => "chemaxon",
            Calculator::Epi => "epi",
            Calculator::Test => "test",
            Calculator::Sparc => "sparc",
            Calculator::Measured => "measured",
            Calculator::Opera => "opera",
            Calculator::ChemInfo => "cheminfo",
            Calculator::Metabolizer => "metabolizer",
        }
    }

    /// El metabolizer produce árboles de transformación, no propiedades.
    pub fn is_property_calculator(&self) -> bool {
        !matches!(self, Calculator::Metabolizer)
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Calculator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Calculator::ALL.iter()
                       .copied()
                       .find(|c| c.as_str() == wanted)
                       .ok_or_else(|| DomainError::UnknownCalculator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_name_and_rejects_unknown() {
        for calc in Calculator::ALL {
            assert_eq!(calc.as_str().parse::<Calculator>().unwrap(), calc);
        }
        assert_eq!(" EPI ".parse::<Calculator>().unwrap(), Calculator::Epi);
        assert_eq!("cts".parse::<Calculator>(), Err(DomainError::UnknownCalculator("cts".into())));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Calculator::ChemInfo).unwrap(), "\"cheminfo\"");
        let c: Calculator = serde_json::from_str("\"sparc\"").unwrap();
        assert_eq!(c, Calculator::Sparc);
    }
}
