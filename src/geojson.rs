// src/geojson.rs
//
// Map layer derived from the dataset: one Point feature per geocoded location.
// Always rebuilt in full; never edited in place.

use serde::{Deserialize, Serialize};

use crate::model::{Award, CityDataset};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Point,
    pub properties: FeatureProps,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lng, lat]`, GeoJSON axis order.
    pub coordinates: [f64; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureProps {
    pub city: String,
    pub pizzeria_name: String,
    pub address: Option<String>,
    pub url: String,
    /// Position among the pizzeria's locations, from 0.
    pub location_index: usize,
    pub total_locations: usize,
    pub awards: Vec<Award>,
}

pub fn project(dataset: &CityDataset) -> FeatureCollection {
    let mut features = Vec::with_capacity(dataset.location_count());
    for (city, record) in dataset.iter() {
        for pizzeria in &record.pizzerias {
            let total = pizzeria.locations.len();
            for (index, loc) in pizzeria.locations.iter().enumerate() {
                if !loc.is_geocoded() {
                    continue;
                }
                features.push(Feature {
                    kind: s!("Feature"),
                    geometry: Point { kind: s!("Point"), coordinates: [loc.lng, loc.lat] },
                    properties: FeatureProps {
                        city: city.clone(),
                        pizzeria_name: pizzeria.name.clone(),
                        address: loc.address.clone(),
                        url: pizzeria.url.clone(),
                        location_index: index,
                        total_locations: total,
                        awards: pizzeria.awards.clone(),
                    },
                });
            }
        }
    }
    FeatureCollection { kind: s!("FeatureCollection"), features }
}
