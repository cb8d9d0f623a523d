//! The closed set of organizational units owning stock.
//!
//! A `Company` is either the central hub (Comandancia), which stocks and
//! distributes material, or one of the branch companies. Every material,
//! certificate, and firefighter is scoped to exactly one company.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Organizational unit owning its own material stock.
///
/// Modeled as a closed enum rather than a free-form string so cross-company
/// matching can never silently diverge on a typo.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Company {
    /// The central hub. Distributes material to the branch companies.
    #[serde(rename = "Comandancia")]
    Comandancia,
    #[serde(rename = "Primera Compañía")]
    Primera,
    #[serde(rename = "Segunda Compañía")]
    Segunda,
    #[serde(rename = "Tercera Compañía")]
    Tercera,
    #[serde(rename = "Cuarta Compañía")]
    Cuarta,
    #[serde(rename = "Quinta Compañía")]
    Quinta,
    #[serde(rename = "Sexta Compañía")]
    Sexta,
}

impl Company {
    /// All companies, hub first.
    pub const ALL: [Company; 7] = [
        Company::Comandancia,
        Company::Primera,
        Company::Segunda,
        Company::Tercera,
        Company::Cuarta,
        Company::Quinta,
        Company::Sexta,
    ];

    /// Whether this company is the distinguished hub.
    pub fn is_hub(&self) -> bool {
        matches!(self, Company::Comandancia)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Company::Comandancia => "Comandancia",
            Company::Primera => "Primera Compañía",
            Company::Segunda => "Segunda Compañía",
            Company::Tercera => "Tercera Compañía",
            Company::Cuarta => "Cuarta Compañía",
            Company::Quinta => "Quinta Compañía",
            Company::Sexta => "Sexta Compañía",
        }
    }
}

impl core::fmt::Display for Company {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Company {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Company::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown company '{s}'")))
    }
}
