use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::UnknownField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Longitude,
    Latitude,
    HousingMedianAge,
    TotalRooms,
    Population,
    Households,
    MedianIncome,
    OceanProximity,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::Longitude,
        FormField::Latitude,
        FormField::HousingMedianAge,
        FormField::TotalRooms,
        FormField::Population,
        FormField::Households,
        FormField::MedianIncome,
        FormField::OceanProximity,
    ];

    pub const NUMERIC: [FormField; 7] = [
        FormField::Longitude,
        FormField::Latitude,
        FormField::HousingMedianAge,
        FormField::TotalRooms,
        FormField::Population,
        FormField::Households,
        FormField::MedianIncome,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormField::Longitude => "longitude",
            FormField::Latitude => "latitude",
            FormField::HousingMedianAge => "housing_median_age",
            FormField::TotalRooms => "total_rooms",
            FormField::Population => "population",
            FormField::Households => "households",
            FormField::MedianIncome => "median_income",
            FormField::OceanProximity => "ocean_proximity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Longitude => "Longitude",
            FormField::Latitude => "Latitude",
            FormField::HousingMedianAge => "Housing median age",
            FormField::TotalRooms => "Total rooms",
            FormField::Population => "Population",
            FormField::Households => "Households",
            FormField::MedianIncome => "Median income",
            FormField::OceanProximity => "Ocean proximity",
        }
    }

    /// Guidance shown while the field is still empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Longitude => "-124 to -114",
            FormField::Latitude => "32 to 42",
            FormField::HousingMedianAge => "0 to 100",
            FormField::TotalRooms | FormField::Population | FormField::Households => {
                "positive integer"
            }
            FormField::MedianIncome => "positive (e.g. 8.3), tens of thousands of USD",
            FormField::OceanProximity => "one of: <1H OCEAN, INLAND, NEAR BAY, NEAR OCEAN",
        }
    }

    /// Inclusive bound for numeric fields; `None` for the categorical field.
    pub fn bound(self) -> Option<FieldBound> {
        match self {
            FormField::Longitude => Some(FieldBound::between(-124.0, -114.0)),
            FormField::Latitude => Some(FieldBound::between(32.0, 42.0)),
            FormField::HousingMedianAge => Some(FieldBound::between(0.0, 100.0)),
            FormField::TotalRooms
            | FormField::Population
            | FormField::Households
            | FormField::MedianIncome => Some(FieldBound::at_least(0.0)),
            FormField::OceanProximity => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBound {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldBound {
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OceanProximity {
    #[serde(rename = "<1H OCEAN")]
    LessThanOneHour,
    #[serde(rename = "INLAND")]
    Inland,
    #[serde(rename = "NEAR BAY")]
    NearBay,
    #[serde(rename = "NEAR OCEAN")]
    NearOcean,
}

impl OceanProximity {
    /// Fixed option order; one-hot vectors are aligned to it.
    pub const ALL: [OceanProximity; 4] = [
        OceanProximity::LessThanOneHour,
        OceanProximity::Inland,
        OceanProximity::NearBay,
        OceanProximity::NearOcean,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OceanProximity::LessThanOneHour => "<1H OCEAN",
            OceanProximity::Inland => "INLAND",
            OceanProximity::NearBay => "NEAR BAY",
            OceanProximity::NearOcean => "NEAR OCEAN",
        }
    }

    pub fn wire_field(self) -> &'static str {
        match self {
            OceanProximity::LessThanOneHour => "ocean_proximity_<1H OCEAN",
            OceanProximity::Inland => "ocean_proximity_INLAND",
            OceanProximity::NearBay => "ocean_proximity_NEAR BAY",
            OceanProximity::NearOcean => "ocean_proximity_NEAR OCEAN",
        }
    }

    /// Exact, case-sensitive match against the option labels.
    pub fn from_label(label: &str) -> Option<Self> {
        OceanProximity::ALL
            .into_iter()
            .find(|option| option.label() == label)
    }
}

impl fmt::Display for OceanProximity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free text as entered, one slot per field. Empty by default so callers show
/// placeholder guidance instead of a zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFormValues {
    pub longitude: String,
    pub latitude: String,
    pub housing_median_age: String,
    pub total_rooms: String,
    pub population: String,
    pub households: String,
    pub median_income: String,
    pub ocean_proximity: String,
}

impl RawFormValues {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Longitude => &self.longitude,
            FormField::Latitude => &self.latitude,
            FormField::HousingMedianAge => &self.housing_median_age,
            FormField::TotalRooms => &self.total_rooms,
            FormField::Population => &self.population,
            FormField::Households => &self.households,
            FormField::MedianIncome => &self.median_income,
            FormField::OceanProximity => &self.ocean_proximity,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Longitude => &mut self.longitude,
            FormField::Latitude => &mut self.latitude,
            FormField::HousingMedianAge => &mut self.housing_median_age,
            FormField::TotalRooms => &mut self.total_rooms,
            FormField::Population => &mut self.population,
            FormField::Households => &mut self.households,
            FormField::MedianIncome => &mut self.median_income,
            FormField::OceanProximity => &mut self.ocean_proximity,
        };
        *slot = value.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}
