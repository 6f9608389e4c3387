//! Headless map backends recording what they were asked to draw.

use super::{MapBackend, MapConfig, MapError, MapMarker};

/// Sample value shipped in environment templates; never a real key.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_GOOGLE_MAPS_API_KEY_HERE";

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Hosted map widget that requires an API key.
#[derive(Debug, Default)]
pub struct HostedMapBackend {
    api_key: Option<String>,
    markers: Vec<MapMarker>,
}

impl HostedMapBackend {
    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl MapBackend for HostedMapBackend {
    fn name(&self) -> &'static str {
        "hosted"
    }

    fn initialize(&mut self, config: &MapConfig) -> Result<(), MapError> {
        match config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() && key != API_KEY_PLACEHOLDER => {
                self.api_key = Some(key.to_string());
                Ok(())
            }
            _ => Err(MapError::MissingCredential),
        }
    }

    fn render_markers(&mut self, markers: &[MapMarker]) {
        self.markers = markers.to_vec();
    }
}

/// Open tile layer; no credential involved.
#[derive(Debug)]
pub struct TileLayerBackend {
    pub tile_url: String,
    pub attribution: String,
    markers: Vec<MapMarker>,
}

impl Default for TileLayerBackend {
    fn default() -> Self {
        Self {
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            markers: Vec::new(),
        }
    }
}

impl TileLayerBackend {
    pub fn markers(&self) -> &[MapMarker] {
        &self.markers
    }
}

impl MapBackend for TileLayerBackend {
    fn name(&self) -> &'static str {
        "tiles"
    }

    fn initialize(&mut self, _config: &MapConfig) -> Result<(), MapError> {
        if self.tile_url.is_empty() {
            return Err(MapError::Backend("no tile URL configured".to_string()));
        }
        Ok(())
    }

    fn render_markers(&mut self, markers: &[MapMarker]) {
        self.markers = markers.to_vec();
    }
}
