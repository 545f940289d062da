//! Portfolio document served by the binary
//!
//! Every field defaults when absent and unknown fields are ignored, so older
//! snapshot files keep loading as the schema grows.

use serde::{Deserialize, Serialize};

/// Full portfolio payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    pub funds: Vec<Fund>,
    pub capital: String,
    pub cdi: String,
    pub strategy: String,
}

/// A single fund and its history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fund {
    pub name: String,
    pub enabled: bool,
    pub target: String,
    /// UI state: whether the fund row is expanded
    pub expanded: bool,
    pub id: String,
    pub aportes: Vec<Contribution>,
    pub balances: Vec<Balance>,
}

/// Money contributed to a fund on a given date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contribution {
    pub value: String,
    #[serde(rename = "return")]
    pub returns: String,
    pub date: String,
}

/// Fund balance observed on a given date
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub date: String,
    pub value: String,
}
