//! Interactive map annotation editor.
//!
//! The editor is a small state machine over [`EditorMode`]. Raw map clicks
//! are interpreted according to the current mode and accumulate into
//! location pins, road polylines or planned routes.

mod navigation;

pub use navigation::{format_distance, format_time, NavigationPanel, TurnInstruction};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geolocation::{GeolocationWatcher, PositionSource};
use crate::geometry::{path_length, GeoPoint};
use crate::styles::{self, LineStyle};

/// Default map center used before any user location is known.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 40.7128,
    lng: -74.0060,
};
pub const DEFAULT_ZOOM: u8 = 13;
/// Zoom applied when recentering on the user.
pub const RECENTER_ZOOM: u8 = 16;

/// Minutes of travel assumed per kilometer.
///
/// This is a flat placeholder speed, not a routing estimate.
pub const MINUTES_PER_KM: f64 = 2.0;

/// Meaning of the next map click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditorMode {
    #[default]
    View,
    AddLocation,
    DrawRoad,
    PlanRoute,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::View => "view",
            EditorMode::AddLocation => "add-location",
            EditorMode::DrawRoad => "draw-road",
            EditorMode::PlanRoute => "plan-route",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "view" => Ok(EditorMode::View),
            "add-location" => Ok(EditorMode::AddLocation),
            "draw-road" => Ok(EditorMode::DrawRoad),
            "plan-route" => Ok(EditorMode::PlanRoute),
            other => Err(format!("unknown editor mode {other:?}")),
        }
    }
}

/// Keyboard input understood by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    /// Commit the shape being drawn.
    Enter,
    /// Discard everything in progress.
    Escape,
    Other(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationCategory {
    Restaurant,
    Hospital,
    School,
    Shopping,
    Gas,
    Hotel,
    Custom,
}

impl LocationCategory {
    pub const ALL: [LocationCategory; 7] = [
        LocationCategory::Restaurant,
        LocationCategory::Hospital,
        LocationCategory::School,
        LocationCategory::Shopping,
        LocationCategory::Gas,
        LocationCategory::Hotel,
        LocationCategory::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationCategory::Restaurant => "restaurant",
            LocationCategory::Hospital => "hospital",
            LocationCategory::School => "school",
            LocationCategory::Shopping => "shopping",
            LocationCategory::Gas => "gas",
            LocationCategory::Hotel => "hotel",
            LocationCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for LocationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown location category {s:?}"))
    }
}

/// A user-placed pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub position: GeoPoint,
    pub category: LocationCategory,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn icon(&self) -> &'static str {
        styles::location_icon(self.category)
    }
}

/// Form contents submitted when saving a location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationDraft {
    pub name: String,
    pub description: String,
    pub category: LocationCategory,
}

impl LocationDraft {
    pub fn new(name: &str, category: LocationCategory) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            category,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub id: String,
    pub name: String,
    pub coordinates: Vec<GeoPoint>,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl Road {
    pub fn length(&self) -> f64 {
        path_length(&self.coordinates)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
    pub waypoints: Vec<GeoPoint>,
    /// Meters along the waypoints.
    pub distance: f64,
    /// Minutes, see [`MINUTES_PER_KM`].
    pub estimated_time: f64,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Builds a route over `waypoints`. Needs at least two points.
    pub fn from_waypoints(name: String, waypoints: Vec<GeoPoint>) -> Option<Self> {
        if waypoints.len() < 2 {
            return None;
        }
        let distance = path_length(&waypoints);
        Some(Self {
            id: new_id(),
            name,
            estimated_time: estimate_minutes(distance),
            distance,
            waypoints,
            created_at: Utc::now(),
        })
    }
}

/// Travel time in minutes for `meters` under the flat speed heuristic.
pub fn estimate_minutes(meters: f64) -> f64 {
    meters / 1000.0 * MINUTES_PER_KM
}

/// Result of a map click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    Ignored,
    /// The location form should open for this coordinate.
    LocationFormOpened(GeoPoint),
    /// Road accumulator now holds this many points.
    RoadPointAdded(usize),
    /// Waypoint accumulator now holds this many points.
    WaypointAdded(usize),
}

/// Entity produced by committing the shape in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Committed {
    Road(Road),
    Route(Route),
}

/// Live rendering of the shape being drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub points: Vec<GeoPoint>,
    pub style: LineStyle,
    /// Numbered (1-based) waypoint pins; empty while drawing roads.
    pub waypoint_markers: Vec<(usize, GeoPoint)>,
}

/// Owner of all editor state.
#[derive(Debug, Clone)]
pub struct MapEditor {
    mode: EditorMode,
    locations: Vec<Location>,
    roads: Vec<Road>,
    routes: Vec<Route>,
    road_points: Vec<GeoPoint>,
    waypoints: Vec<GeoPoint>,
    pending_location: Option<GeoPoint>,
    show_locations: bool,
    show_roads: bool,
    active_route: Option<Route>,
    center: GeoPoint,
    zoom: u8,
}

impl Default for MapEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MapEditor {
    pub fn new() -> Self {
        Self {
            mode: EditorMode::View,
            locations: Vec::new(),
            roads: Vec::new(),
            routes: Vec::new(),
            road_points: Vec::new(),
            waypoints: Vec::new(),
            pending_location: None,
            show_locations: true,
            show_roads: true,
            active_route: None,
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }

    /// Rebuilds an editor from previously saved entities.
    pub fn with_entities(locations: Vec<Location>, roads: Vec<Road>, routes: Vec<Route>) -> Self {
        Self {
            locations,
            roads,
            routes,
            ..Self::new()
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn road_points(&self) -> &[GeoPoint] {
        &self.road_points
    }

    pub fn waypoints(&self) -> &[GeoPoint] {
        &self.waypoints
    }

    /// Coordinate awaiting the location form, if the form is open.
    pub fn pending_location(&self) -> Option<GeoPoint> {
        self.pending_location
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Switches mode. In-progress state of the mode being left is dropped.
    pub fn set_mode(&mut self, mode: EditorMode) {
        if mode == self.mode {
            return;
        }
        log::debug!("editor mode {} -> {}", self.mode, mode);
        self.clear_in_progress();
        self.mode = mode;
    }

    /// Control-panel toggle: the active mode's button returns to `View`.
    pub fn toggle_mode(&mut self, mode: EditorMode) {
        if self.mode == mode {
            self.set_mode(EditorMode::View);
        } else {
            self.set_mode(mode);
        }
    }

    pub fn click(&mut self, point: GeoPoint) -> ClickOutcome {
        match self.mode {
            EditorMode::View => ClickOutcome::Ignored,
            EditorMode::AddLocation => {
                self.pending_location = Some(point);
                ClickOutcome::LocationFormOpened(point)
            }
            EditorMode::DrawRoad => {
                self.road_points.push(point);
                ClickOutcome::RoadPointAdded(self.road_points.len())
            }
            EditorMode::PlanRoute => {
                self.waypoints.push(point);
                ClickOutcome::WaypointAdded(self.waypoints.len())
            }
        }
    }

    /// Saves the open location form. Returns `None` when no form is open or
    /// the name is blank; a blank name leaves the form open.
    pub fn save_location(&mut self, draft: LocationDraft) -> Option<&Location> {
        if self.mode != EditorMode::AddLocation {
            return None;
        }
        let position = self.pending_location?;
        let name = draft.name.trim();
        if name.is_empty() {
            log::warn!("location name is required");
            return None;
        }
        let location = Location {
            id: new_id(),
            position,
            category: draft.category,
            name: name.to_string(),
            description: draft.description,
            created_at: Utc::now(),
        };
        log::debug!("saved location {} at {}", location.name, location.position);
        self.pending_location = None;
        self.mode = EditorMode::View;
        self.locations.push(location);
        self.locations.last()
    }

    /// Closes the location form without saving.
    pub fn cancel_location(&mut self) {
        if self.mode == EditorMode::AddLocation {
            self.pending_location = None;
            self.mode = EditorMode::View;
        }
    }

    /// Commits the road or route in progress.
    ///
    /// Does nothing outside the drawing modes or with fewer than two points.
    pub fn finish(&mut self) -> Option<Committed> {
        let committed = match self.mode {
            EditorMode::DrawRoad if self.road_points.len() >= 2 => {
                let road = Road {
                    id: new_id(),
                    name: format!("Road {}", self.roads.len() + 1),
                    coordinates: std::mem::take(&mut self.road_points),
                    kind: "custom".to_string(),
                    created_at: Utc::now(),
                };
                self.roads.push(road.clone());
                Committed::Road(road)
            }
            EditorMode::PlanRoute if self.waypoints.len() >= 2 => {
                let name = format!("Route {}", self.routes.len() + 1);
                let route = Route::from_waypoints(name, std::mem::take(&mut self.waypoints))?;
                self.routes.push(route.clone());
                Committed::Route(route)
            }
            _ => return None,
        };
        log::debug!("committed {:?} shape", self.mode);
        self.mode = EditorMode::View;
        Some(committed)
    }

    /// Drops everything in progress and returns to `View`.
    pub fn cancel(&mut self) {
        self.clear_in_progress();
        self.mode = EditorMode::View;
    }

    pub fn handle_key(&mut self, key: EditorKey) -> Option<Committed> {
        match key {
            EditorKey::Enter => self.finish(),
            EditorKey::Escape => {
                self.cancel();
                None
            }
            EditorKey::Other(_) => None,
        }
    }

    /// Dashed line for the shape being drawn, once it has two points.
    pub fn preview(&self) -> Option<Preview> {
        match self.mode {
            EditorMode::DrawRoad if self.road_points.len() > 1 => Some(Preview {
                points: self.road_points.clone(),
                style: styles::ROAD_DRAFT_STYLE,
                waypoint_markers: Vec::new(),
            }),
            // Waypoint pins show from the first click, the line from the second.
            EditorMode::PlanRoute if !self.waypoints.is_empty() => Some(Preview {
                points: if self.waypoints.len() > 1 {
                    self.waypoints.clone()
                } else {
                    Vec::new()
                },
                style: styles::ROUTE_DRAFT_STYLE,
                waypoint_markers: self
                    .waypoints
                    .iter()
                    .enumerate()
                    .map(|(i, p)| (i + 1, *p))
                    .collect(),
            }),
            _ => None,
        }
    }

    pub fn toggle_locations(&mut self) -> bool {
        self.show_locations = !self.show_locations;
        self.show_locations
    }

    pub fn toggle_roads(&mut self) -> bool {
        self.show_roads = !self.show_roads;
        self.show_roads
    }

    pub fn visible_locations(&self) -> &[Location] {
        if self.show_locations {
            &self.locations
        } else {
            &[]
        }
    }

    pub fn visible_roads(&self) -> &[Road] {
        if self.show_roads {
            &self.roads
        } else {
            &[]
        }
    }

    /// Navigates along the most recently created route.
    pub fn start_navigation(&mut self) -> bool {
        match self.routes.last() {
            Some(route) => {
                log::debug!("navigating {}", route.name);
                self.active_route = Some(route.clone());
                true
            }
            None => false,
        }
    }

    pub fn stop_navigation(&mut self) {
        self.active_route = None;
    }

    pub fn is_navigating(&self) -> bool {
        self.active_route.is_some()
    }

    pub fn active_route(&self) -> Option<&Route> {
        self.active_route.as_ref()
    }

    /// Panel shown while navigating.
    pub fn navigation_panel(&self, user_location: Option<GeoPoint>) -> Option<NavigationPanel> {
        self.active_route
            .as_ref()
            .map(|route| NavigationPanel::new(route, user_location))
    }

    /// Where the recenter control would move the map; `None` disables it.
    pub fn recenter_target<S: PositionSource>(
        &self,
        watcher: &GeolocationWatcher<S>,
    ) -> Option<(GeoPoint, u8)> {
        watcher.location().map(|p| (p, RECENTER_ZOOM))
    }

    /// Moves the view to the user's location. Returns `false` when unknown.
    pub fn recenter<S: PositionSource>(&mut self, watcher: &GeolocationWatcher<S>) -> bool {
        match self.recenter_target(watcher) {
            Some((center, zoom)) => {
                self.center = center;
                self.zoom = zoom;
                true
            }
            None => false,
        }
    }

    fn clear_in_progress(&mut self) {
        self.road_points.clear();
        self.waypoints.clear();
        self.pending_location = None;
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
