//! Map view over a pluggable rendering backend.
//!
//! Two backends exist: the hosted map widget, which needs an API key, and the
//! open tile layer, which needs none. Both only have to draw markers; the view
//! owns the load state and turns marker clicks into info popups.

mod backend;

pub use backend::{HostedMapBackend, TileLayerBackend, API_KEY_PLACEHOLDER, OSM_ATTRIBUTION, OSM_TILE_URL};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::directory::Building;
use crate::geometry::GeoPoint;
use crate::styles;

/// Text of the panel shown instead of the map when loading fails.
pub const LOAD_ERROR_TEXT: &str = "Failed to load map. Please check your API key.";

pub const USER_MARKER_ID: &str = "user-location";
const USER_MARKER_COLOR: &str = "#3B82F6";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("missing or invalid map API key")]
    MissingCredential,
    #[error("map backend failed: {0}")]
    Backend(String),
}

/// Which backend renders the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapType {
    #[default]
    Hosted,
    Tiles,
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapType::Hosted => f.write_str("hosted"),
            MapType::Tiles => f.write_str("tiles"),
        }
    }
}

impl FromStr for MapType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hosted" | "google" => Ok(MapType::Hosted),
            "tiles" | "leaflet" | "osm" => Ok(MapType::Tiles),
            other => Err(format!("unknown map type {other:?}")),
        }
    }
}

/// Settings handed to a backend at initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub api_key: Option<String>,
    pub center: GeoPoint,
    pub zoom: u8,
}

/// A marker as the backend should draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub position: GeoPoint,
    pub title: String,
    pub color: &'static str,
    /// Marker radius in pixels.
    pub scale: u8,
}

/// Rendering backend of a [`MapView`].
pub trait MapBackend {
    fn name(&self) -> &'static str;

    /// Prepares the backend. Called once per view.
    fn initialize(&mut self, config: &MapConfig) -> Result<(), MapError>;

    /// Replaces all markers currently drawn.
    fn render_markers(&mut self, markers: &[MapMarker]);
}

impl MapBackend for Box<dyn MapBackend> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn initialize(&mut self, config: &MapConfig) -> Result<(), MapError> {
        (**self).initialize(config)
    }

    fn render_markers(&mut self, markers: &[MapMarker]) {
        (**self).render_markers(markers)
    }
}

/// Creates the backend for `map_type`.
pub fn backend_for(map_type: MapType) -> Box<dyn MapBackend> {
    match map_type {
        MapType::Hosted => Box::new(HostedMapBackend::default()),
        MapType::Tiles => Box::new(TileLayerBackend::default()),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum MapLoadState {
    #[default]
    Loading,
    Ready,
    Failed(MapError),
}

/// Contents of the popup opened by a marker click.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoPopup {
    pub title: String,
    /// `CODE • Category`
    pub subtitle: String,
    pub description: String,
    pub hours: String,
}

impl InfoPopup {
    pub fn for_building(building: &Building) -> Self {
        Self {
            title: building.name.clone(),
            subtitle: format!("{} • {}", building.code, building.category.label()),
            description: building.description.clone(),
            hours: building.hours.clone(),
        }
    }
}

pub struct MapView<B: MapBackend> {
    backend: B,
    config: MapConfig,
    state: MapLoadState,
    selected: Option<String>,
    user_location: Option<GeoPoint>,
}

impl<B: MapBackend> MapView<B> {
    pub fn new(backend: B, config: MapConfig) -> Self {
        Self {
            backend,
            config,
            state: MapLoadState::Loading,
            selected: None,
            user_location: None,
        }
    }

    /// Initializes the backend on first call; later calls return the
    /// settled state.
    pub fn load(&mut self) -> &MapLoadState {
        if self.state == MapLoadState::Loading {
            self.state = match self.backend.initialize(&self.config) {
                Ok(()) => {
                    log::debug!("{} map ready", self.backend.name());
                    MapLoadState::Ready
                }
                Err(e) => {
                    log::error!("error loading {} map: {}", self.backend.name(), e);
                    MapLoadState::Failed(e)
                }
            };
        }
        &self.state
    }

    pub fn state(&self) -> &MapLoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == MapLoadState::Ready
    }

    /// Text for the error panel when loading failed.
    pub fn error_panel(&self) -> Option<&'static str> {
        match self.state {
            MapLoadState::Failed(_) => Some(LOAD_ERROR_TEXT),
            _ => None,
        }
    }

    /// Highlights a building's marker on the next render.
    pub fn select(&mut self, building_id: Option<&str>) {
        self.selected = building_id.map(str::to_string);
    }

    /// Sets or clears the user marker.
    pub fn set_user_location(&mut self, location: Option<GeoPoint>) {
        self.user_location = location;
    }

    /// Markers for `buildings`, plus the user marker when known.
    pub fn markers(&self, buildings: &[Building]) -> Vec<MapMarker> {
        let mut markers: Vec<MapMarker> = buildings
            .iter()
            .map(|b| MapMarker {
                id: b.id.clone(),
                position: b.position,
                title: b.name.clone(),
                color: styles::building_color(b.category),
                scale: if self.selected.as_deref() == Some(b.id.as_str()) { 12 } else { 8 },
            })
            .collect();
        if let Some(position) = self.user_location {
            markers.push(MapMarker {
                id: USER_MARKER_ID.to_string(),
                position,
                title: "Your Location".to_string(),
                color: USER_MARKER_COLOR,
                scale: 10,
            });
        }
        markers
    }

    /// Draws the markers. Returns `false` until the map is ready.
    pub fn render(&mut self, buildings: &[Building]) -> bool {
        if !self.is_ready() {
            return false;
        }
        let markers = self.markers(buildings);
        self.backend.render_markers(&markers);
        true
    }

    /// Popup for the clicked marker, if it belongs to a building.
    pub fn marker_clicked(&self, buildings: &[Building], marker_id: &str) -> Option<InfoPopup> {
        buildings
            .iter()
            .find(|b| b.id == marker_id)
            .map(InfoPopup::for_building)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
