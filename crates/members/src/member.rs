use std::collections::BTreeMap;

use foundation::ids::MemberId;
use foundation::math::{LatLng, is_valid_latlng};
use serde::{Deserialize, Deserializer, Serialize};

/// One member record.
///
/// Only `id`, `coordinates`, `country` and `city` matter to the map engine;
/// the descriptive fields are carried for presentation and filtering.
/// Unknown JSON fields are preserved in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub firstname: String,
    /// `None` when the source had no usable `[lat, lng]` pair.
    #[serde(
        default,
        deserialize_with = "lenient_coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    pub coordinates: Option<LatLng>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub promotion_type: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Member {
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            name: String::new(),
            firstname: String::new(),
            coordinates: None,
            country: String::new(),
            city: String::new(),
            graduation_year: None,
            promotion_type: String::new(),
            company: String::new(),
            position: String::new(),
            location: String::new(),
            biography: String::new(),
            image: String::new(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Some(LatLng::new(lat, lng));
        self
    }

    pub fn with_place(mut self, country: impl Into<String>, city: impl Into<String>) -> Self {
        self.country = country.into();
        self.city = city.into();
        self
    }

    pub fn with_name(mut self, firstname: impl Into<String>, name: impl Into<String>) -> Self {
        self.firstname = firstname.into();
        self.name = name.into();
        self
    }

    /// Coordinate if present and inside the valid lat/lng ranges.
    pub fn position(&self) -> Option<LatLng> {
        self.coordinates.filter(|p| is_valid_latlng(*p))
    }

    /// Coordinate as stored, with missing values as NaN.
    pub fn raw_position(&self) -> LatLng {
        self.coordinates.unwrap_or_else(LatLng::missing)
    }

    pub fn display_name(&self) -> String {
        match (self.firstname.is_empty(), self.name.is_empty()) {
            (false, false) => format!("{} {}", self.firstname, self.name),
            (false, true) => self.firstname.clone(),
            _ => self.name.clone(),
        }
    }
}

fn lenient_coordinates<'de, D>(deserializer: D) -> Result<Option<LatLng>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::Array(items)) = raw else {
        return Ok(None);
    };
    match items.as_slice() {
        [lat, lng] => Ok(lat
            .as_f64()
            .zip(lng.as_f64())
            .map(|(lat, lng)| LatLng::new(lat, lng))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::Member;
    use foundation::ids::MemberId;
    use foundation::math::LatLng;

    #[test]
    fn parses_dataset_record() {
        let json = r#"{
            "id": 7,
            "name": "Martin",
            "firstname": "Claire",
            "coordinates": [48.8566, 2.3522],
            "country": "France",
            "city": "Paris",
            "graduationYear": 2019,
            "promotionType": "Master",
            "company": "Acme",
            "linkedin": "https://example.org/claire"
        }"#;
        let m: Member = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, MemberId(7));
        assert_eq!(m.coordinates, Some(LatLng::new(48.8566, 2.3522)));
        assert_eq!(m.graduation_year, Some(2019));
        assert_eq!(m.promotion_type, "Master");
        assert_eq!(m.display_name(), "Claire Martin");
        assert!(m.extra.contains_key("linkedin"));
    }

    #[test]
    fn malformed_coordinates_become_none() {
        for coords in ["null", "[]", "[1.0]", "[1.0, 2.0, 3.0]", "[\"a\", 2.0]", "\"x\""] {
            let json = format!(r#"{{"id": 1, "coordinates": {coords}}}"#);
            let m: Member = serde_json::from_str(&json).unwrap();
            assert_eq!(m.coordinates, None, "coords {coords}");
        }
        let m: Member = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert_eq!(m.coordinates, None);
    }

    #[test]
    fn position_rejects_out_of_range() {
        let ok = Member::new(MemberId(1)).with_coordinates(10.0, 20.0);
        let bad = Member::new(MemberId(2)).with_coordinates(95.0, 20.0);
        assert_eq!(ok.position(), Some(LatLng::new(10.0, 20.0)));
        assert_eq!(bad.position(), None);
        assert_eq!(bad.raw_position(), LatLng::new(95.0, 20.0));
        assert!(Member::new(MemberId(3)).raw_position().lat.is_nan());
    }
}
