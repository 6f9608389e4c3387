//! Substring search over the building directory and the events catalogue.

use std::str::FromStr;

use crate::directory::{Building, BuildingCategory};
use crate::events::{CampusEvent, EventCategory};

/// Category selection of a search: everything or a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter<C> {
    #[default]
    All,
    Only(C),
}

impl<C: PartialEq> CategoryFilter<C> {
    pub fn matches(&self, category: &C) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == category,
        }
    }
}

/// Accepts `all` or any value `C` parses from.
impl<C: FromStr<Err = String>> FromStr for CategoryFilter<C> {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

/// A record that can be found by free-text search.
pub trait Searchable {
    type Category: PartialEq;

    fn category(&self) -> &Self::Category;

    /// Every text field the query is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match of an already lower-cased query.
    fn matches_query(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|f| f.to_lowercase().contains(needle))
    }
}

impl Searchable for Building {
    type Category = BuildingCategory;

    fn category(&self) -> &BuildingCategory {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.code.as_str(), self.description.as_str()];
        fields.extend(self.services.iter().map(String::as_str));
        fields
    }
}

impl Searchable for CampusEvent {
    type Category = EventCategory;

    fn category(&self) -> &EventCategory {
        &self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![
            self.name.as_str(),
            self.description.as_str(),
            self.venue.as_str(),
            self.organizer.as_str(),
        ];
        fields.extend(self.tags.iter().map(String::as_str));
        fields
    }
}

/// Returns the records matching both `query` and `category`, in source order.
///
/// An empty query matches every record.
pub fn filter_records<'a, T: Searchable>(
    records: &'a [T],
    query: &str,
    category: CategoryFilter<T::Category>,
) -> Vec<&'a T> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| category.matches(r.category()) && r.matches_query(&needle))
        .collect()
}

pub fn filter_buildings<'a>(
    buildings: &'a [Building],
    query: &str,
    category: CategoryFilter<BuildingCategory>,
) -> Vec<&'a Building> {
    filter_records(buildings, query, category)
}

pub fn filter_events<'a>(
    events: &'a [CampusEvent],
    query: &str,
    category: CategoryFilter<EventCategory>,
) -> Vec<&'a CampusEvent> {
    filter_records(events, query, category)
}

/// Finds the building an event venue refers to.
///
/// A building matches when its name contains the venue, the venue contains
/// its name, or its code equals the venue, all case-insensitively.
pub fn find_building_for_venue<'a>(buildings: &'a [Building], venue: &str) -> Option<&'a Building> {
    let venue = venue.trim().to_lowercase();
    if venue.is_empty() {
        return None;
    }
    buildings.iter().find(|b| {
        let name = b.name.to_lowercase();
        name.contains(&venue) || venue.contains(&name) || b.code.to_lowercase() == venue
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::campus_buildings;

    #[test]
    fn empty_query_returns_everything() {
        let all = filter_buildings(campus_buildings(), "", CategoryFilter::All);
        assert_eq!(all.len(), campus_buildings().len());
    }

    #[test]
    fn category_only_filter() {
        let libs = filter_buildings(campus_buildings(), "", CategoryFilter::Only(BuildingCategory::Library));
        assert!(!libs.is_empty());
        assert!(libs.iter().all(|b| b.category == BuildingCategory::Library));
    }

    #[test]
    fn matches_services_case_insensitively() {
        let hits = filter_buildings(campus_buildings(), "EV CHARGING", CategoryFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "WPG");
    }

    #[test]
    fn parse_category_filter() {
        assert_eq!("All".parse::<CategoryFilter<BuildingCategory>>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "dining".parse::<CategoryFilter<BuildingCategory>>().unwrap(),
            CategoryFilter::Only(BuildingCategory::Dining)
        );
        assert!("nope".parse::<CategoryFilter<EventCategory>>().is_err());
    }

    #[test]
    fn venue_lookup() {
        let b = find_building_for_venue(campus_buildings(), "Memorial Library - Reading Room").unwrap();
        assert_eq!(b.code, "LIB");
        let b = find_building_for_venue(campus_buildings(), "ua").unwrap();
        assert_eq!(b.name, "University Arena");
        assert!(find_building_for_venue(campus_buildings(), "Various Locations").is_none());
        assert!(find_building_for_venue(campus_buildings(), "  ").is_none());
    }
}
