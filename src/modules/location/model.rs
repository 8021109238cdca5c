use std::fmt;

use serde::{Deserialize, Serialize};

/// Backends hand out numeric or string ids depending on the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationId::Number(id) => write!(f, "{}", id),
            LocationId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub state_id: LocationId,
    pub state_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    #[serde(default)]
    pub district_id: Option<LocationId>,
    pub district_name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StateList {
    #[serde(default)]
    pub states: Vec<State>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DistrictList {
    #[serde(default)]
    pub districts: Vec<District>,
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Case-insensitive lookup by display name.
pub fn find_state<'a>(states: &'a [State], name: &str) -> Option<&'a State> {
    states.iter().find(|s| same_name(&s.state_name, name))
}

pub fn find_district<'a>(districts: &'a [District], name: &str) -> Option<&'a District> {
    districts.iter().find(|d| same_name(&d.district_name, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_accept_numbers_and_strings() {
        let states: StateList = serde_json::from_value(json!({
            "states": [
                { "state_id": 27, "state_name": "Maharashtra" },
                { "state_id": "KA", "state_name": "Karnataka" }
            ]
        }))
        .unwrap();

        assert_eq!(states.states[0].state_id.to_string(), "27");
        assert_eq!(states.states[1].state_id, LocationId::Text("KA".to_string()));
    }

    #[test]
    fn district_id_is_optional() {
        let list: DistrictList = serde_json::from_value(json!({
            "districts": [{ "district_name": "Pune" }]
        }))
        .unwrap();

        assert_eq!(list.districts[0].district_name, "Pune");
        assert!(list.districts[0].district_id.is_none());
    }

    #[test]
    fn lookup_ignores_case_and_padding() {
        let districts = vec![
            District {
                district_id: Some(LocationId::Number(1)),
                district_name: "Pune".to_string(),
            },
            District {
                district_id: None,
                district_name: "Nashik".to_string(),
            },
        ];

        assert_eq!(
            find_district(&districts, " nashik ").map(|d| d.district_name.as_str()),
            Some("Nashik")
        );
        assert!(find_district(&districts, "Mumbai").is_none());
    }
}
