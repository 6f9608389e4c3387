//! Building directory: the static campus data and the admin-managed catalogue.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::admin::AdminSession;
use crate::geometry::GeoPoint;

/// Kind of campus building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildingCategory {
    Academic,
    Dining,
    Residential,
    Recreation,
    Administrative,
    Library,
    Parking,
    Emergency,
}

impl BuildingCategory {
    pub const ALL: [BuildingCategory; 8] = [
        BuildingCategory::Academic,
        BuildingCategory::Dining,
        BuildingCategory::Residential,
        BuildingCategory::Recreation,
        BuildingCategory::Administrative,
        BuildingCategory::Library,
        BuildingCategory::Parking,
        BuildingCategory::Emergency,
    ];

    /// Identifier used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildingCategory::Academic => "academic",
            BuildingCategory::Dining => "dining",
            BuildingCategory::Residential => "residential",
            BuildingCategory::Recreation => "recreation",
            BuildingCategory::Administrative => "administrative",
            BuildingCategory::Library => "library",
            BuildingCategory::Parking => "parking",
            BuildingCategory::Emergency => "emergency",
        }
    }

    /// Capitalized label for display.
    pub fn label(&self) -> &'static str {
        match self {
            BuildingCategory::Academic => "Academic",
            BuildingCategory::Dining => "Dining",
            BuildingCategory::Residential => "Residential",
            BuildingCategory::Recreation => "Recreation",
            BuildingCategory::Administrative => "Administrative",
            BuildingCategory::Library => "Library",
            BuildingCategory::Parking => "Parking",
            BuildingCategory::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for BuildingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown building category {s:?}"))
    }
}

/// A campus building as listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: String,
    pub name: String,
    pub code: String,
    pub category: BuildingCategory,
    pub description: String,
    pub hours: String,
    pub services: Vec<String>,
    pub position: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Building {
    /// Creates a building without contact details.
    pub fn new(
        id: &str,
        name: &str,
        code: &str,
        category: BuildingCategory,
        position: GeoPoint,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            code: code.to_string(),
            category,
            description: String::new(),
            hours: String::new(),
            services: Vec::new(),
            position,
            phone: None,
            email: None,
            image: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_hours(mut self, hours: &str) -> Self {
        self.hours = hours.to_string();
        self
    }

    pub fn with_services(mut self, services: &[&str]) -> Self {
        self.services = services.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_string());
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

static CAMPUS_BUILDINGS: Lazy<Vec<Building>> = Lazy::new(|| {
    vec![
        Building::new("1", "Memorial Library", "LIB", BuildingCategory::Library, GeoPoint::new(40.7134, -74.0051))
            .with_description("Main campus library with study rooms, archives and a quiet reading room.")
            .with_hours("7:00 AM - 12:00 AM")
            .with_services(&["Book lending", "Study rooms", "Printing", "Research help"])
            .with_phone("(555) 123-4501")
            .with_email("library@campus.edu"),
        Building::new("2", "Science & Technology Center", "STC", BuildingCategory::Academic, GeoPoint::new(40.7141, -74.0072))
            .with_description("Laboratories and lecture halls for the engineering and science faculties.")
            .with_hours("6:00 AM - 10:00 PM")
            .with_services(&["Computer labs", "Lecture halls", "Maker space"])
            .with_phone("(555) 123-4502"),
        Building::new("3", "Johnson Hall", "JH", BuildingCategory::Academic, GeoPoint::new(40.7122, -74.0066))
            .with_description("Humanities classrooms and faculty offices.")
            .with_hours("7:00 AM - 9:00 PM")
            .with_services(&["Classrooms", "Faculty offices", "Writing center"]),
        Building::new("4", "Campus Commons", "CC", BuildingCategory::Dining, GeoPoint::new(40.7127, -74.0045))
            .with_description("Dining hall and student lounge in the heart of campus.")
            .with_hours("7:00 AM - 8:00 PM")
            .with_services(&["Cafeteria", "Coffee bar", "Meal plan office"]),
        Building::new("5", "North Residence Hall", "NRH", BuildingCategory::Residential, GeoPoint::new(40.7158, -74.0059))
            .with_description("First-year residence with shared kitchens and study lounges.")
            .with_hours("24 hours (residents only)")
            .with_services(&["Laundry", "Study lounge", "Mail room"]),
        Building::new("6", "Fitness & Recreation Center", "FRC", BuildingCategory::Recreation, GeoPoint::new(40.7110, -74.0040))
            .with_description("Gym, indoor track, pool and multipurpose courts.")
            .with_hours("6:00 AM - 11:00 PM")
            .with_services(&["Gym", "Swimming pool", "Fitness classes"]),
        Building::new("7", "Administration Building", "ADM", BuildingCategory::Administrative, GeoPoint::new(40.7131, -74.0080))
            .with_description("Admissions, registrar, financial aid and the study abroad office.")
            .with_hours("8:00 AM - 5:00 PM")
            .with_services(&["Admissions", "Registrar", "Financial aid", "Conference room"])
            .with_phone("(555) 123-4507")
            .with_email("admin@campus.edu"),
        Building::new("8", "Law Library Annex", "LLA", BuildingCategory::Library, GeoPoint::new(40.7117, -74.0075))
            .with_description("Legal collections and moot court practice rooms.")
            .with_hours("8:00 AM - 10:00 PM")
            .with_services(&["Legal databases", "Practice rooms"]),
        Building::new("9", "West Parking Garage", "WPG", BuildingCategory::Parking, GeoPoint::new(40.7105, -74.0091))
            .with_description("Multi-level garage for students, staff and visitors.")
            .with_hours("24 hours")
            .with_services(&["Visitor parking", "EV charging", "Bike storage"]),
        Building::new("10", "Campus Health & Safety", "CHS", BuildingCategory::Emergency, GeoPoint::new(40.7139, -74.0038))
            .with_description("Campus security dispatch and the student health clinic.")
            .with_hours("24 hours")
            .with_services(&["Security", "First aid", "Health clinic"])
            .with_phone("(555) 911-4357"),
        Building::new("11", "University Arena", "UA", BuildingCategory::Recreation, GeoPoint::new(40.7098, -74.0052))
            .with_description("Home of the Eagles basketball and volleyball teams.")
            .with_hours("Event days only")
            .with_services(&["Ticket office", "Concessions"]),
    ]
});

/// Returns the built-in campus buildings.
pub fn campus_buildings() -> &'static [Building] {
    &CAMPUS_BUILDINGS
}

/// Owned, admin-editable list of buildings.
#[derive(Debug, Clone, Default)]
pub struct BuildingCatalog {
    buildings: Vec<Building>,
}

impl BuildingCatalog {
    /// Creates a catalog seeded with [`campus_buildings`].
    pub fn with_campus_buildings() -> Self {
        Self {
            buildings: campus_buildings().to_vec(),
        }
    }

    pub fn from_buildings(buildings: Vec<Building>) -> Self {
        Self { buildings }
    }

    /// Returns a slice of all buildings in insertion order.
    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    /// Looks up a building by identifier.
    pub fn get(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Adds a building. Returns `false` if the id is already taken.
    pub fn add(&mut self, _session: &AdminSession, building: Building) -> bool {
        if self.get(&building.id).is_some() {
            log::warn!("building {} already exists", building.id);
            return false;
        }
        log::debug!("adding building {}", building.id);
        self.buildings.push(building);
        true
    }

    /// Replaces the building with the same id.
    pub fn update(&mut self, _session: &AdminSession, building: Building) -> bool {
        match self.buildings.iter_mut().find(|b| b.id == building.id) {
            Some(b) => {
                *b = building;
                true
            }
            None => false,
        }
    }

    /// Removes the building with the given id.
    pub fn delete(&mut self, _session: &AdminSession, id: &str) -> Option<Building> {
        let idx = self.buildings.iter().position(|b| b.id == id)?;
        log::debug!("deleting building {id}");
        Some(self.buildings.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn campus_ids_are_unique() {
        let ids: HashSet<_> = campus_buildings().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids.len(), campus_buildings().len());
    }

    #[test]
    fn category_round_trips_through_str() {
        for c in BuildingCategory::ALL {
            assert_eq!(c.as_str().parse::<BuildingCategory>().unwrap(), c);
        }
        assert_eq!("LIBRARY".parse::<BuildingCategory>().unwrap(), BuildingCategory::Library);
        assert!("gym".parse::<BuildingCategory>().is_err());
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&BuildingCategory::Administrative).unwrap();
        assert_eq!(json, "\"administrative\"");
    }
}
