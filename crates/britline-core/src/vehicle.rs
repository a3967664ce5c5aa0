//! Vehicle catalog entries and the built-in seed list.
//!
//! Vehicles are the one ordered store without durable ids in legacy data:
//! mutation endpoints address them by array index. Ids are filled lazily on
//! load and persist with the next write.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleYear {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub brand: String,
    /// Model slug used in catalog paths and URLs.
    pub value: String,
    /// Display name, e.g. "DEFENDER / L316".
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub years: Vec<VehicleYear>,
    /// Absent in blobs written before ordering existed; backfilled from
    /// array position on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

/// Fields supplied when creating or replacing a vehicle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub brand: String,
    pub value: String,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub years: Vec<VehicleYear>,
}

fn seed(brand: &str, value: &str, title: &str, years: &[(&str, &str)]) -> Vehicle {
    Vehicle {
        id: None,
        brand: brand.to_string(),
        value: value.to_string(),
        title: title.to_string(),
        image: String::new(),
        years: years
            .iter()
            .map(|(value, label)| VehicleYear {
                value: (*value).to_string(),
                label: (*label).to_string(),
            })
            .collect(),
        order: None,
    }
}

/// Built-in vehicle list served when storage has never been written.
///
/// Mirrors the line-up the site launched with, including the mixed-case
/// legacy model slugs that the normalizer is expected to tolerate.
#[must_use]
pub fn default_vehicles() -> Vec<Vehicle> {
    vec![
        seed(
            "land-rover",
            "DEFENDER-l316",
            "DEFENDER / L316",
            &[("2007-2016", "2007–2016")],
        ),
        seed(
            "land-rover",
            "DISCOVERY4-l319",
            "DISCOVERY 4 / L319",
            &[("2010-2016", "2010–2016")],
        ),
        seed(
            "land-rover",
            "discovery-5-l462",
            "DISCOVERY 5 / L462",
            &[("2017-2020", "2017–2020"), ("2021+", "2021+")],
        ),
        seed(
            "land-rover",
            "discovery-sport-l550",
            "DISCOVERY SPORT / L550",
            &[
                ("2015-2019", "2015-2019"),
                ("2020", "2020"),
                ("2021+", "2021+"),
            ],
        ),
        seed(
            "land-rover",
            "freelander-2-l359",
            "FREELANDER 2 / L359",
            &[("2006-2014", "2006-2014")],
        ),
        seed(
            "land-rover",
            "new-defender-2020-l663",
            "NEW DEFENDER 2020 / L663",
            &[("2020+", "2020+")],
        ),
        seed(
            "land-rover",
            "new-range-rover-l460",
            "NEW RANGE ROVER / L460",
            &[("2022+", "2022+")],
        ),
        seed(
            "land-rover",
            "new-range-rover-evoque-l551",
            "NEW RANGE ROVER EVOQUE / L551",
            &[("2019-2020", "2019-2020"), ("2021+", "2021+")],
        ),
        seed(
            "land-rover",
            "new-range-rover-sport-l461",
            "NEW RANGE ROVER SPORT / L461",
            &[("2023+", "2023+")],
        ),
        seed(
            "land-rover",
            "range-rover-l322",
            "RANGE ROVER / L322",
            &[("2010-2012", "2010-2012")],
        ),
        seed(
            "land-rover",
            "range-rover-l405",
            "RANGE ROVER / L405",
            &[
                ("2013-2016", "2013-2016"),
                ("2017", "2017"),
                ("2018-2021", "2018-2021"),
            ],
        ),
        seed(
            "land-rover",
            "range-rover-evoque-l538",
            "RANGE ROVER EVOQUE / L538",
            &[("2012-2015", "2012-2015"), ("2016-2019", "2016-2019")],
        ),
        seed(
            "land-rover",
            "range-rover-sport-l320",
            "RANGE ROVER SPORT / L320",
            &[("2010-2013", "2010-2013")],
        ),
        seed(
            "land-rover",
            "range-rover-sport-l494",
            "RANGE ROVER SPORT / L494",
            &[
                ("2014-2016", "2014-2016"),
                ("2017", "2017"),
                ("2018-2022", "2018-2022"),
            ],
        ),
        seed(
            "land-rover",
            "range-rover-velar-l560",
            "RANGE ROVER VELAR / L560",
            &[("2017-2020", "2017-2020"), ("2021+", "2021+")],
        ),
        seed(
            "jaguar",
            "e-pace",
            "E-PACE",
            &[("2017-2020", "2017–2020"), ("2021+", "2021+")],
        ),
        seed(
            "jaguar",
            "f-pace",
            "F-PACE",
            &[("2016-2020", "2016–2020"), ("2021+", "2021+")],
        ),
        seed("jaguar", "f-type", "F-TYPE", &[("2014+", "2014+")]),
        seed(
            "jaguar",
            "i-pace",
            "I-PACE",
            &[("2018-2020", "2018–2020"), ("2021+", "2021+")],
        ),
        seed(
            "jaguar",
            "xe",
            "XE",
            &[("2015-2020", "2015-2020"), ("2021+", "2021+")],
        ),
        seed(
            "jaguar",
            "xf",
            "XF",
            &[
                ("2009-2015", "2009–2015"),
                ("2016-2020", "2016-2020"),
                ("2021+", "2021+"),
            ],
        ),
        seed(
            "jaguar",
            "xj",
            "XJ",
            &[("2010-2019", "2010–2019"), ("2020+", "2020+")],
        ),
    ]
}
