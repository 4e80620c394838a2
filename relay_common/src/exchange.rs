//! Exchanges whose ticker suffix is appended to unmapped logical symbols.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Listing venue used to build a provider identifier for symbols missing from
/// the symbol map.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum Exchange {
    /// National Stock Exchange of India.
    #[default]
    Nse,
    /// Bombay Stock Exchange.
    Bse,
}

impl Exchange {
    /// Provider ticker suffix for this venue.
    pub fn suffix(self) -> &'static str {
        match self {
            Exchange::Nse => ".NS",
            Exchange::Bse => ".BO",
        }
    }
}
