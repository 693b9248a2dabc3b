//! Parse-then-validate pipeline from raw form text to a `PredictionRequest`.

use std::collections::BTreeMap;

use crate::{
    domain::{FieldBound, FormField, OceanProximity, RawFormValues},
    error::ParseFailure,
    protocol::PredictionRequest,
};

/// Per-field messages; a missing key means the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: FormField, message: String) {
        self.0.insert(field, message);
    }
}

pub fn parse_number(raw: &str) -> Result<f64, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseFailure::NotANumber),
    }
}

fn bound_message(field: FormField, bound: FieldBound) -> String {
    let label = field.label();
    match (bound.min, bound.max) {
        (Some(min), Some(max)) => format!("{label} must be between {min} and {max}"),
        (Some(min), None) if min == 0.0 => format!("{label} must be a non-negative number"),
        (Some(min), None) => format!("{label} must be at least {min}"),
        (None, Some(max)) => format!("{label} must be at most {max}"),
        (None, None) => format!("{label} must be a number"),
    }
}

fn numeric_field(values: &RawFormValues, field: FormField) -> Result<f64, String> {
    let bound = field
        .bound()
        .unwrap_or(FieldBound { min: None, max: None });
    match parse_number(values.get(field)) {
        Ok(value) if bound.contains(value) => Ok(value),
        _ => Err(bound_message(field, bound)),
    }
}

fn proximity_field(values: &RawFormValues) -> Result<OceanProximity, String> {
    OceanProximity::from_label(values.get(FormField::OceanProximity))
        .ok_or_else(|| "Select an ocean proximity option".to_string())
}

pub fn validate(values: &RawFormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in FormField::NUMERIC {
        if let Err(message) = numeric_field(values, field) {
            errors.insert(field, message);
        }
    }
    if let Err(message) = proximity_field(values) {
        errors.insert(FormField::OceanProximity, message);
    }
    errors
}

/// Builds the wire payload, or returns the same errors `validate` reports.
pub fn build_payload(values: &RawFormValues) -> Result<PredictionRequest, ValidationErrors> {
    let errors = validate(values);
    if !errors.is_empty() {
        return Err(errors);
    }

    let number = |field| numeric_field(values, field).map_err(|_| errors.clone());
    Ok(PredictionRequest {
        longitude: number(FormField::Longitude)?,
        latitude: number(FormField::Latitude)?,
        housing_median_age: number(FormField::HousingMedianAge)?,
        total_rooms: number(FormField::TotalRooms)?,
        population: number(FormField::Population)?,
        households: number(FormField::Households)?,
        median_income: number(FormField::MedianIncome)?,
        ocean_proximity: proximity_field(values).map_err(|_| errors.clone())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> RawFormValues {
        RawFormValues {
            longitude: "-122.4".into(),
            latitude: "37.8".into(),
            housing_median_age: "20".into(),
            total_rooms: "1500".into(),
            population: "900".into(),
            households: "400".into(),
            median_income: "5.2".into(),
            ocean_proximity: "NEAR BAY".into(),
        }
    }

    #[test]
    fn parse_number_tags_failures() {
        assert_eq!(parse_number(" 12.5 "), Ok(12.5));
        assert_eq!(parse_number("-124"), Ok(-124.0));
        assert_eq!(parse_number(""), Err(ParseFailure::Empty));
        assert_eq!(parse_number("   "), Err(ParseFailure::Empty));
        assert_eq!(parse_number("12abc"), Err(ParseFailure::NotANumber));
        assert_eq!(parse_number("NaN"), Err(ParseFailure::NotANumber));
        assert_eq!(parse_number("inf"), Err(ParseFailure::NotANumber));
    }

    #[test]
    fn valid_form_has_no_errors() {
        assert!(validate(&valid_form()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_field() {
        let errors = validate(&RawFormValues::default());
        assert_eq!(errors.len(), FormField::ALL.len());
        assert_eq!(
            errors.get(FormField::OceanProximity),
            Some("Select an ocean proximity option")
        );
    }

    #[test]
    fn boundaries_are_inclusive_and_one_beyond_is_rejected() {
        let cases = [
            (FormField::Longitude, ["-124", "-114"], ["-125", "-113"]),
            (FormField::Latitude, ["32", "42"], ["31", "43"]),
            (FormField::HousingMedianAge, ["0", "100"], ["-1", "101"]),
        ];
        for (field, inside, outside) in cases {
            for raw in inside {
                let mut form = valid_form();
                form.set(field, raw);
                assert!(!validate(&form).contains(field), "{field}={raw} should pass");
            }
            for raw in outside {
                let mut form = valid_form();
                form.set(field, raw);
                assert!(validate(&form).contains(field), "{field}={raw} should fail");
            }
        }

        for field in [
            FormField::TotalRooms,
            FormField::Population,
            FormField::Households,
            FormField::MedianIncome,
        ] {
            let mut form = valid_form();
            form.set(field, "0");
            assert!(validate(&form).is_empty());
            form.set(field, "-1");
            assert!(validate(&form).contains(field));
        }
    }

    #[test]
    fn messages_name_field_and_range() {
        let mut form = valid_form();
        form.longitude = "-130".into();
        form.total_rooms = "many".into();
        let errors = validate(&form);
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get(FormField::Longitude),
            Some("Longitude must be between -124 and -114")
        );
        assert_eq!(
            errors.get(FormField::TotalRooms),
            Some("Total rooms must be a non-negative number")
        );
    }

    #[test]
    fn validation_is_deterministic() {
        let mut form = valid_form();
        form.latitude = "x".into();
        form.ocean_proximity = "inland".into();
        assert_eq!(validate(&form), validate(&form));
    }

    #[test]
    fn payload_carries_parsed_numbers_and_one_hot() {
        let mut form = valid_form();
        form.ocean_proximity = "INLAND".into();
        let payload = build_payload(&form).expect("payload");
        assert_eq!(payload.one_hot(), [0, 1, 0, 0]);
        assert_eq!(payload.longitude, -122.4);
        assert_eq!(payload.latitude, 37.8);
        assert_eq!(payload.housing_median_age, 20.0);
        assert_eq!(payload.total_rooms, 1500.0);
        assert_eq!(payload.population, 900.0);
        assert_eq!(payload.households, 400.0);
        assert_eq!(payload.median_income, 5.2);
    }

    #[test]
    fn end_to_end_near_bay_payload() {
        let form = valid_form();
        assert!(validate(&form).is_empty());
        let value = serde_json::to_value(build_payload(&form).expect("payload")).expect("json");
        assert_eq!(value["ocean_proximity_NEAR BAY"], 1);
        assert_eq!(value["ocean_proximity_<1H OCEAN"], 0);
        assert_eq!(value["ocean_proximity_INLAND"], 0);
        assert_eq!(value["ocean_proximity_NEAR OCEAN"], 0);
    }

    #[test]
    fn payload_refused_without_category() {
        let mut form = valid_form();
        form.ocean_proximity.clear();
        let errors = build_payload(&form).expect_err("no category");
        assert!(errors.contains(FormField::OceanProximity));
    }
}
