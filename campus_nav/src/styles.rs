//! Marker and polyline styling for map entities.
//!
//! Every category maps to its style through an exhaustive `match`, so adding
//! a category fails to build until it has a color and an icon.

use crate::directory::BuildingCategory;
use crate::editor::LocationCategory;

/// Stroke pattern of a polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Solid,
    /// Dash and gap lengths in pixels.
    Dashed(u8, u8),
}

impl LineType {
    /// SVG-style dash array, `None` for solid lines.
    pub fn dash_array(&self) -> Option<String> {
        match self {
            LineType::Solid => None,
            LineType::Dashed(dash, gap) => Some(format!("{dash}, {gap}")),
        }
    }
}

/// Style of a polyline on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub line_type: LineType,
    pub color: &'static str,
    pub weight: u8,
    pub opacity: f32,
}

impl LineStyle {
    pub const fn new(line_type: LineType, color: &'static str, weight: u8, opacity: f32) -> Self {
        Self {
            line_type,
            color,
            weight,
            opacity,
        }
    }
}

pub const ROAD_STYLE: LineStyle = LineStyle::new(LineType::Solid, "#10B981", 4, 0.8);
pub const ROAD_DRAFT_STYLE: LineStyle = LineStyle::new(LineType::Dashed(10, 10), "#F59E0B", 4, 0.8);
pub const ROUTE_STYLE: LineStyle = LineStyle::new(LineType::Solid, "#8B5CF6", 6, 0.9);
pub const ROUTE_DRAFT_STYLE: LineStyle = LineStyle::new(LineType::Dashed(5, 5), "#EF4444", 4, 0.8);

/// Fill color of a building's map marker.
pub fn building_color(category: BuildingCategory) -> &'static str {
    match category {
        BuildingCategory::Academic => "#3B82F6",
        BuildingCategory::Library => "#8B5CF6",
        BuildingCategory::Dining => "#F97316",
        BuildingCategory::Residential => "#10B981",
        BuildingCategory::Recreation => "#EC4899",
        BuildingCategory::Administrative => "#6B7280",
        BuildingCategory::Parking => "#EAB308",
        BuildingCategory::Emergency => "#EF4444",
    }
}

/// Glyph drawn inside a user-created location's pin.
pub fn location_icon(category: LocationCategory) -> &'static str {
    match category {
        LocationCategory::Restaurant => "🍽️",
        LocationCategory::Hospital => "🏥",
        LocationCategory::School => "🏫",
        LocationCategory::Shopping => "🛍️",
        LocationCategory::Gas => "⛽",
        LocationCategory::Hotel => "🏨",
        LocationCategory::Custom => "📍",
    }
}
