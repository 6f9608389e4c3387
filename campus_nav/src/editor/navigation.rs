//! Navigation panel content for an active route.

use crate::geometry::GeoPoint;

use super::Route;

/// One line of the turn-by-turn list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnInstruction {
    /// `"1"`, `"2"`, ... or `"🎯"` for the arrival step.
    pub marker: String,
    pub text: String,
}

/// Everything the navigation panel displays.
///
/// The turn-by-turn steps are a fixed start/continue/arrive placeholder and
/// do not follow the route geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationPanel {
    pub route_name: String,
    pub time: String,
    pub distance: String,
    pub user_location: Option<GeoPoint>,
    pub instructions: Vec<TurnInstruction>,
}

impl NavigationPanel {
    pub fn new(route: &Route, user_location: Option<GeoPoint>) -> Self {
        Self {
            route_name: route.name.clone(),
            time: format_time(route.estimated_time),
            distance: format_distance(route.distance),
            user_location,
            instructions: placeholder_instructions(),
        }
    }
}

fn placeholder_instructions() -> Vec<TurnInstruction> {
    [
        ("1", "Head north on current road"),
        ("2", "Continue on the planned route"),
        ("🎯", "Arrive at destination"),
    ]
    .into_iter()
    .map(|(marker, text)| TurnInstruction {
        marker: marker.to_string(),
        text: text.to_string(),
    })
    .collect()
}

/// `"N min"` below an hour, `"Hh Mm"` otherwise.
pub fn format_time(minutes: f64) -> String {
    let total = minutes.round() as i64;
    if total < 60 {
        return format!("{total} min");
    }
    format!("{}h {}m", total / 60, total % 60)
}

/// `"N m"` below a kilometer, `"X.Y km"` otherwise.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
