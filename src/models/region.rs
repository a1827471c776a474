//! Grid regions and the energy sources demand is attributed to

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A grid-operator service territory
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Region {
    #[default]
    TX,
    CA,
    NY,
    FL,
    IL,
}

impl Region {
    pub const ALL: [Region; 5] = [Region::TX, Region::CA, Region::NY, Region::FL, Region::IL];

    /// Grid operator publishing demand for this region
    pub fn grid_operator(&self) -> &'static str {
        match self {
            Region::TX => "ERCOT",
            Region::CA => "CAISO",
            Region::NY => "NYISO",
            Region::FL => "FRCC",
            Region::IL => "PJM",
        }
    }

    /// Full state name, used in explanation prose
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::TX => "Texas",
            Region::CA => "California",
            Region::NY => "New York",
            Region::FL => "Florida",
            Region::IL => "Illinois",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Region::TX => "TX",
            Region::CA => "CA",
            Region::NY => "NY",
            Region::FL => "FL",
            Region::IL => "IL",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TX" => Ok(Region::TX),
            "CA" => Ok(Region::CA),
            "NY" => Ok(Region::NY),
            "FL" => Ok(Region::FL),
            "IL" => Ok(Region::IL),
            other => Err(format!("unknown region '{}'", other)),
        }
    }
}

/// Generation source a demand value is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergySource {
    Gas,
    Nuclear,
    Solar,
    Wind,
}

impl EnergySource {
    pub const ALL: [EnergySource; 4] = [
        EnergySource::Gas,
        EnergySource::Nuclear,
        EnergySource::Solar,
        EnergySource::Wind,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergySource::Gas => "Gas",
            EnergySource::Nuclear => "Nuclear",
            EnergySource::Solar => "Solar",
            EnergySource::Wind => "Wind",
        }
    }

    /// Parse a comma-separated selection such as `Gas,Wind`.
    /// Blank input is the empty selection, which means every source.
    pub fn parse_selection(raw: &str) -> Result<Vec<EnergySource>, String> {
        let mut selection = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let source: EnergySource = part.parse()?;
            if !selection.contains(&source) {
                selection.push(source);
            }
        }
        Ok(selection)
    }
}

impl fmt::Display for EnergySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gas" => Ok(EnergySource::Gas),
            "nuclear" => Ok(EnergySource::Nuclear),
            "solar" => Ok(EnergySource::Solar),
            "wind" => Ok(EnergySource::Wind),
            other => Err(format!("unknown energy source '{}'", other)),
        }
    }
}
