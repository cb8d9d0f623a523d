//! Firefighter entity.

use serde::{Deserialize, Serialize};

use brigada_core::{Company, FirefighterId};

/// The counterpart of a delivery or reception certificate.
///
/// The home company matters twice: it decides whether a `Unit`-mode
/// reception crosses company boundaries, and hub members get elevated
/// privileges at the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firefighter {
    pub id: FirefighterId,
    pub name: String,
    pub company: Company,
}

impl Firefighter {
    pub fn new(name: impl Into<String>, company: Company) -> Self {
        Self {
            id: FirefighterId::new(),
            name: name.into(),
            company,
        }
    }
}
