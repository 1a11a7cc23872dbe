//! Newsletter sectors and editions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Industry sector covered by a newsletter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    OilGas,
    Transportation,
    Electricity,
}

impl Sector {
    pub const ALL: [Sector; 3] = [Sector::OilGas, Sector::Transportation, Sector::Electricity];

    /// URL and directory key, e.g. `oil_gas`
    pub fn key(&self) -> &'static str {
        match self {
            Self::OilGas => "oil_gas",
            Self::Transportation => "transportation",
            Self::Electricity => "electricity",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OilGas => "Oil & Gas",
            Self::Transportation => "Transportation",
            Self::Electricity => "Electricity",
        }
    }

    /// Prompt file path relative to the base directory
    pub fn prompt_file(&self) -> &'static str {
        match self {
            Self::OilGas => "prompts/OilGas.txt",
            Self::Transportation => "prompts/Transportation.txt",
            Self::Electricity => "prompts/Electricity.txt",
        }
    }

    /// File name of the prompt inside the prompts directory
    pub fn prompt_file_name(&self) -> &'static str {
        self.prompt_file().trim_start_matches("prompts/")
    }

    /// Sector name as used in output file names, e.g. `Oil&Gas`
    pub fn compact_name(&self) -> String {
        self.name().replace(' ', "")
    }

    pub fn sections(&self) -> &'static [&'static str; 7] {
        match self {
            Self::OilGas => &[
                "Market Snapshot",
                "Upstream \u{2013} Exploration & Production (Egypt)",
                "Midstream \u{2013} Pipelines, Gas & LNG (Egypt)",
                "Downstream \u{2013} Refining & Petrochemicals (Egypt)",
                "Fertilizers (Egypt)",
                "Upstream Chemicals (Egypt)",
                "Projects (Egypt)",
            ],
            Self::Transportation => &[
                "Market Snapshot",
                "Urban Rail & Metro (Egypt)",
                "National Rail (Egypt)",
                "Roads & Bridges (Egypt)",
                "Ports, Logistics & Suez Canal (Egypt)",
                "Public Transport & BRT (Egypt)",
                "Projects & Tenders (Egypt)",
            ],
            Self::Electricity => &[
                "Market Snapshot",
                "Policy & Tariffs (Egypt)",
                "Generation \u{2014} Thermal & IPP (Egypt)",
                "Renewables \u{2014} Solar/Wind/Hydro (Egypt)",
                "Transmission & Grid Services (Egypt)",
                "Distribution & Smart Metering (Egypt)",
                "Projects & Tenders (Egypt)",
            ],
        }
    }

    pub fn info(&self) -> SectorInfo {
        SectorInfo {
            name: self.name(),
            prompt_file: self.prompt_file(),
            sections: self.sections().to_vec(),
        }
    }
}

impl FromStr for Sector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sector::ALL
            .into_iter()
            .find(|sector| sector.key() == s)
            .ok_or_else(|| Error::InvalidSector(s.to_string()))
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Public description of a sector
#[derive(Debug, Clone, Serialize)]
pub struct SectorInfo {
    pub name: &'static str,
    pub prompt_file: &'static str,
    pub sections: Vec<&'static str>,
}

/// Every sector keyed by its URL key
pub fn sector_catalog() -> BTreeMap<&'static str, SectorInfo> {
    Sector::ALL.iter().map(|s| (s.key(), s.info())).collect()
}

/// Newsletter variant produced for each sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edition {
    Principals,
    #[serde(rename = "Egyptian Clients")]
    EgyptianClients,
}

impl Edition {
    /// In the order the model is asked to produce them
    pub const ALL: [Edition; 2] = [Edition::Principals, Edition::EgyptianClients];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Principals => "Principals",
            Self::EgyptianClients => "Egyptian Clients",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_keys_round_trip() {
        for sector in Sector::ALL {
            assert_eq!(sector.key().parse::<Sector>().unwrap(), sector);
        }
        assert!(matches!("mining".parse::<Sector>(), Err(Error::InvalidSector(_))));
    }

    #[test]
    fn test_sector_details() {
        assert_eq!(Sector::OilGas.compact_name(), "Oil&Gas");
        assert_eq!(Sector::OilGas.prompt_file_name(), "OilGas.txt");
        assert_eq!(Sector::Electricity.sections()[0], "Market Snapshot");

        let catalog = sector_catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog["transportation"].prompt_file, "prompts/Transportation.txt");
    }

    #[test]
    fn test_edition_serialization() {
        assert_eq!(
            serde_json::to_string(&Edition::EgyptianClients).unwrap(),
            "\"Egyptian Clients\""
        );
    }
}
