use std::collections::BTreeMap;

use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::domain::OceanProximity;

/// Body of `POST /predict`: seven numeric features plus the one-hot encoded
/// ocean proximity. Only constructed from a validated form.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub longitude: f64,
    pub latitude: f64,
    pub housing_median_age: f64,
    pub total_rooms: f64,
    pub population: f64,
    pub households: f64,
    pub median_income: f64,
    pub ocean_proximity: OceanProximity,
}

impl PredictionRequest {
    /// Indicator vector aligned to `OceanProximity::ALL`.
    pub fn one_hot(&self) -> [u8; 4] {
        OceanProximity::ALL.map(|option| u8::from(option == self.ocean_proximity))
    }
}

impl Serialize for PredictionRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7 + OceanProximity::ALL.len()))?;
        map.serialize_entry("longitude", &self.longitude)?;
        map.serialize_entry("latitude", &self.latitude)?;
        map.serialize_entry("housing_median_age", &self.housing_median_age)?;
        map.serialize_entry("total_rooms", &self.total_rooms)?;
        map.serialize_entry("population", &self.population)?;
        map.serialize_entry("households", &self.households)?;
        map.serialize_entry("median_income", &self.median_income)?;
        for (option, indicator) in OceanProximity::ALL.into_iter().zip(self.one_hot()) {
            map.serialize_entry(option.wire_field(), &indicator)?;
        }
        map.end()
    }
}

/// Any body the prediction service may answer with. Success bodies carry
/// `predicted_price`, failure bodies carry `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// Answer of `GET /` on the prediction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}
