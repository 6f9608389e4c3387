//! File input and output helpers for campus data.
//!
//! Every format here is JSON; decoding failures surface as
//! [`io::ErrorKind::InvalidData`].

pub mod geojson;
pub mod project;

use std::io;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::directory::Building;
use crate::events::CampusEvent;

pub(crate) fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> io::Result<T> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub(crate) fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    std::fs::write(path, json)
}

/// Reads a JSON array of buildings.
pub fn read_buildings_json(path: &str) -> io::Result<Vec<Building>> {
    read_json(path)
}

pub fn write_buildings_json(path: &str, buildings: &[Building]) -> io::Result<()> {
    write_json(path, buildings)
}

/// Reads a JSON array of events (camelCase fields, ISO dates).
pub fn read_events_json(path: &str) -> io::Result<Vec<CampusEvent>> {
    read_json(path)
}

pub fn write_events_json(path: &str, events: &[CampusEvent]) -> io::Result<()> {
    write_json(path, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventStore;

    #[test]
    fn events_file_keeps_every_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let path = path.to_str().unwrap();
        let store = EventStore::sample();
        write_events_json(path, store.events()).unwrap();
        assert_eq!(read_events_json(path).unwrap(), store.events());
    }

    #[test]
    fn malformed_catalogue_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buildings.json");
        std::fs::write(&path, "[{\"id\": 1}]").unwrap();
        let err = read_buildings_json(path.to_str().unwrap()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
