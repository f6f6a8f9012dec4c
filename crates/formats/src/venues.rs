use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::FormatError;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub lat: f64,
    pub lon: f64,
}

/// Stadium name to coordinates, in document order.
///
/// Order matters: "first available venue" is the fallback when neither the
/// stadium nor the default venue key is known.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VenueTable {
    entries: Vec<(String, Venue)>,
}

impl VenueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(payload: &str) -> Result<Self, FormatError> {
        serde_json::from_str(payload).map_err(|source| FormatError::Json {
            dataset: "venues.json",
            source,
        })
    }

    /// Existing names keep their position and take the new value; new names append.
    pub fn insert(&mut self, name: impl Into<String>, venue: Venue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = venue,
            None => self.entries.push((name, venue)),
        }
    }

    pub fn merge_from(&mut self, other: &VenueTable) {
        for (name, venue) in &other.entries {
            self.insert(name.clone(), *venue);
        }
    }

    pub fn get(&self, name: &str) -> Option<Venue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn first(&self) -> Option<Venue> {
        self.entries.first().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

impl<'de> Deserialize<'de> for VenueTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = VenueTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of venue name to {lat, lon}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut table = VenueTable::new();
                while let Some((name, venue)) = map.next_entry::<String, Venue>()? {
                    table.insert(name, venue);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

impl Serialize for VenueTable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, venue) in &self.entries {
            map.serialize_entry(name, venue)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{Venue, VenueTable};

    #[test]
    fn keeps_document_order() {
        let t = VenueTable::from_json_str(
            r#"{"Zeta": {"lat": 1.0, "lon": 2.0}, "Alpha": {"lat": 3.0, "lon": 4.0}}"#,
        )
        .expect("parse");
        assert_eq!(t.names().collect::<Vec<_>>(), vec!["Zeta", "Alpha"]);
        assert_eq!(t.first(), Some(Venue { lat: 1.0, lon: 2.0 }));
    }

    #[test]
    fn merge_overrides_in_place_and_appends() {
        let mut cup = VenueTable::new();
        cup.insert("A", Venue { lat: 0.0, lon: 0.0 });
        cup.insert("B", Venue { lat: 1.0, lon: 1.0 });
        let mut global = VenueTable::new();
        global.insert("B", Venue { lat: 9.0, lon: 9.0 });
        global.insert("C", Venue { lat: 2.0, lon: 2.0 });
        cup.merge_from(&global);
        assert_eq!(cup.names().collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert_eq!(cup.get("B"), Some(Venue { lat: 9.0, lon: 9.0 }));
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(VenueTable::from_json_str(r#"{"A": {"lat": "x"}}"#).is_err());
    }
}
