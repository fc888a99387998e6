//! Spot data types

use serde::{Deserialize, Serialize};

/// Location where sessions take place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spot {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub gps_coordinates: Option<String>,
    #[serde(default)]
    pub meeting_point: Option<String>,
}
