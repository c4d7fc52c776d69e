use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Fixed set of report categories. Serialized as their display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
pub enum ReportCategory {
    #[serde(rename = "Roads")]
    Roads,
    #[serde(rename = "Street Lighting")]
    StreetLighting,
    #[serde(rename = "Water and Sanitation")]
    WaterAndSanitation,
    #[serde(rename = "Waste and Cleaning")]
    WasteAndCleaning,
    #[serde(rename = "Parks and Public Spaces")]
    ParksAndPublicSpaces,
    #[serde(rename = "Electricity and Telecommunications")]
    ElectricityAndTelecommunications,
    #[serde(rename = "Public Buildings")]
    PublicBuildings,
    #[serde(rename = "Urban Security")]
    UrbanSecurity,
    #[serde(rename = "Public Transport")]
    PublicTransport,
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 10] = [
        ReportCategory::Roads,
        ReportCategory::StreetLighting,
        ReportCategory::WaterAndSanitation,
        ReportCategory::WasteAndCleaning,
        ReportCategory::ParksAndPublicSpaces,
        ReportCategory::ElectricityAndTelecommunications,
        ReportCategory::PublicBuildings,
        ReportCategory::UrbanSecurity,
        ReportCategory::PublicTransport,
        ReportCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportCategory::Roads => "Roads",
            ReportCategory::StreetLighting => "Street Lighting",
            ReportCategory::WaterAndSanitation => "Water and Sanitation",
            ReportCategory::WasteAndCleaning => "Waste and Cleaning",
            ReportCategory::ParksAndPublicSpaces => "Parks and Public Spaces",
            ReportCategory::ElectricityAndTelecommunications => {
                "Electricity and Telecommunications"
            }
            ReportCategory::PublicBuildings => "Public Buildings",
            ReportCategory::UrbanSecurity => "Urban Security",
            ReportCategory::PublicTransport => "Public Transport",
            ReportCategory::Other => "Other",
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}
