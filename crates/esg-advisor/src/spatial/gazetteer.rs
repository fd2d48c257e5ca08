use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::geometry::GeoPoint;
use super::SpatialError;

/// Resolves a place name to coordinates.
pub trait Geocoder {
    fn geocode(&self, name: &str) -> Result<GeoPoint, SpatialError>;
}

/// Offline geocoder backed by a `name,latitude,longitude` table.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    places: HashMap<String, GeoPoint>,
}

#[derive(Debug, Deserialize)]
struct PlaceRow {
    name: String,
    latitude: f64,
    longitude: f64,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Gazetteer {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SpatialError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SpatialError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut gazetteer = Self::default();
        for record in csv_reader.deserialize::<PlaceRow>() {
            let row = record?;
            gazetteer.insert(&row.name, GeoPoint::new(row.latitude, row.longitude));
        }
        Ok(gazetteer)
    }

    /// Later entries for the same name replace earlier ones.
    pub fn insert(&mut self, name: &str, point: GeoPoint) {
        self.places.insert(normalize(name), point);
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn geocode(&self, name: &str) -> Result<GeoPoint, SpatialError> {
        self.places
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| SpatialError::NotFound(name.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACES: &str = "name,latitude,longitude\nDes Moines, 41.5868,-93.6250\nAmes,42.0347,-93.6200\n";

    #[test]
    fn geocodes_case_insensitively() {
        let gazetteer = Gazetteer::from_reader(PLACES.as_bytes()).expect("gazetteer loads");
        assert_eq!(gazetteer.len(), 2);

        let point = gazetteer.geocode("  des moines ").expect("known place");
        assert_eq!(point, GeoPoint::new(41.5868, -93.6250));
    }

    #[test]
    fn unknown_place_is_not_found() {
        let gazetteer = Gazetteer::from_reader(PLACES.as_bytes()).expect("gazetteer loads");
        match gazetteer.geocode("Atlantis") {
            Err(SpatialError::NotFound(name)) => assert_eq!(name, "Atlantis"),
            other => panic!("expected not found, got {other:?}"),
        }
    }
}
