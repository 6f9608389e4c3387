//! Campus events catalogue and its owned store.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::admin::AdminSession;
use crate::search::{filter_records, CategoryFilter};

/// Kind of campus event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Academic,
    Social,
    Sports,
    Cultural,
    Workshop,
    Career,
    Volunteer,
    Orientation,
}

impl EventCategory {
    pub const ALL: [EventCategory; 8] = [
        EventCategory::Academic,
        EventCategory::Social,
        EventCategory::Sports,
        EventCategory::Cultural,
        EventCategory::Workshop,
        EventCategory::Career,
        EventCategory::Volunteer,
        EventCategory::Orientation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Academic => "academic",
            EventCategory::Social => "social",
            EventCategory::Sports => "sports",
            EventCategory::Cultural => "cultural",
            EventCategory::Workshop => "workshop",
            EventCategory::Career => "career",
            EventCategory::Volunteer => "volunteer",
            EventCategory::Orientation => "orientation",
        }
    }

    /// Label shown in the category picker.
    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Academic => "Academic",
            EventCategory::Social => "Social",
            EventCategory::Sports => "Sports",
            EventCategory::Cultural => "Cultural",
            EventCategory::Workshop => "Workshops",
            EventCategory::Career => "Career",
            EventCategory::Volunteer => "Volunteer",
            EventCategory::Orientation => "Orientation",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown event category {s:?}"))
    }
}

/// Registration state shown on an event card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    NotRequired,
    /// Registration is required but no capacity is published.
    Required,
    Full,
    SpotsLeft(u32),
    Open,
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationStatus::NotRequired => f.write_str("No registration required"),
            RegistrationStatus::Required => f.write_str("Registration Required"),
            RegistrationStatus::Full => f.write_str("Full"),
            RegistrationStatus::SpotsLeft(n) => write!(f, "{n} spots left"),
            RegistrationStatus::Open => f.write_str("Registration Open"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusEvent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    /// Free-form time range, e.g. `9:00 AM - 5:00 PM`.
    pub time: String,
    pub venue: String,
    pub category: EventCategory,
    pub organizer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_count: Option<u32>,
    pub registration_required: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CampusEvent {
    pub fn registration_status(&self) -> RegistrationStatus {
        if !self.registration_required {
            return RegistrationStatus::NotRequired;
        }
        let Some(capacity) = self.capacity else {
            return RegistrationStatus::Required;
        };
        let taken = self.registered_count.unwrap_or(0);
        match capacity.saturating_sub(taken) {
            0 => RegistrationStatus::Full,
            n if n <= 10 => RegistrationStatus::SpotsLeft(n),
            _ => RegistrationStatus::Open,
        }
    }

    /// True when the event takes place on or after `today`.
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }

    /// Long date such as `Monday, January 20, 2025`.
    pub fn formatted_date(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }
}

/// Owner of the events list. All edits go through here and need an
/// [`AdminSession`].
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<CampusEvent>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn from_events(events: Vec<CampusEvent>) -> Self {
        Self { events }
    }

    /// Store seeded with the campus events catalogue.
    pub fn sample() -> Self {
        Self::from_events(sample_events())
    }

    pub fn events(&self) -> &[CampusEvent] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &CampusEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CampusEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Appends an event.
    pub fn add(&mut self, _session: &AdminSession, event: CampusEvent) {
        log::debug!("adding event {}", event.id);
        self.events.push(event);
    }

    /// Replaces the event with the same id. Returns `false` if none matched.
    pub fn update(&mut self, _session: &AdminSession, event: CampusEvent) -> bool {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => {
                *slot = event;
                true
            }
            None => {
                log::warn!("no event {} to update", event.id);
                false
            }
        }
    }

    /// Removes the event with the given id.
    pub fn delete(&mut self, _session: &AdminSession, id: &str) -> Option<CampusEvent> {
        let idx = self.events.iter().position(|e| e.id == id)?;
        log::debug!("deleting event {id}");
        Some(self.events.remove(idx))
    }

    /// Events matching `query` and `category`, in store order.
    pub fn search(&self, query: &str, category: CategoryFilter<EventCategory>) -> Vec<&CampusEvent> {
        filter_records(&self.events, query, category)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

#[allow(clippy::too_many_arguments)]
fn event(
    id: &str,
    name: &str,
    description: &str,
    date: NaiveDate,
    time: &str,
    venue: &str,
    category: EventCategory,
    organizer: &str,
    registration: Option<(Option<u32>, Option<u32>)>,
    tags: &[&str],
) -> CampusEvent {
    let (capacity, registered_count) = registration.unwrap_or((None, None));
    CampusEvent {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        date,
        time: time.to_string(),
        venue: venue.to_string(),
        category,
        organizer: organizer.to_string(),
        capacity,
        registered_count,
        registration_required: registration.is_some(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn sample_events() -> Vec<CampusEvent> {
    use EventCategory::*;
    vec![
        event("1", "Welcome Week Orientation",
            "Join us for an exciting week of activities designed to help new students get acquainted with campus life, meet fellow students, and learn about available resources.",
            date(2025, 1, 20), "9:00 AM - 5:00 PM", "Campus Commons", Orientation, "Student Affairs Office",
            Some((Some(500), Some(342))), &["new-students", "orientation", "networking"]),
        event("2", "AI & Machine Learning Symposium",
            "A comprehensive symposium featuring industry experts discussing the latest trends in artificial intelligence and machine learning applications.",
            date(2025, 1, 25), "10:00 AM - 4:00 PM", "Science & Technology Center", Academic, "Computer Science Department",
            Some((Some(200), Some(156))), &["technology", "AI", "research", "symposium"]),
        event("3", "Spring Concert Series",
            "An evening of musical performances featuring student bands, solo artists, and special guest performers from the local music scene.",
            date(2025, 1, 28), "7:00 PM - 10:00 PM", "Campus Amphitheater", Cultural, "Music Department",
            None, &["music", "performance", "entertainment"]),
        event("4", "Career Fair 2025",
            "Connect with top employers from various industries. Bring your resume and dress professionally for this networking opportunity.",
            date(2025, 2, 2), "11:00 AM - 4:00 PM", "Fitness & Recreation Center", Career, "Career Services",
            Some((Some(1000), Some(678))), &["career", "networking", "jobs", "internships"]),
        event("5", "Basketball vs. State University",
            "Cheer on our Eagles as they take on State University in this exciting home game. Student tickets are free with ID.",
            date(2025, 2, 5), "7:30 PM - 9:30 PM", "University Arena", Sports, "Athletics Department",
            None, &["basketball", "sports", "competition"]),
        event("6", "Sustainability Workshop",
            "Learn practical ways to live more sustainably on campus and beyond. Topics include waste reduction, energy conservation, and eco-friendly practices.",
            date(2025, 2, 8), "2:00 PM - 4:00 PM", "Johnson Hall - Room 205", Workshop, "Environmental Club",
            Some((Some(50), Some(23))), &["sustainability", "environment", "workshop"]),
        event("7", "International Food Festival",
            "Celebrate diversity with food from around the world prepared by international student organizations. Free samples and cultural performances.",
            date(2025, 2, 12), "12:00 PM - 6:00 PM", "Student Plaza", Cultural, "International Student Association",
            None, &["food", "culture", "international", "festival"]),
        event("8", "Community Service Day",
            "Join fellow students in giving back to the local community through various volunteer opportunities including park cleanup and food bank assistance.",
            date(2025, 2, 15), "8:00 AM - 3:00 PM", "Various Locations", Volunteer, "Community Outreach Office",
            Some((Some(150), Some(89))), &["volunteer", "community", "service"]),
        event("9", "Poetry Night Open Mic",
            "Share your original poetry or enjoy performances by fellow students in this intimate evening of creative expression.",
            date(2025, 2, 18), "7:00 PM - 9:00 PM", "Memorial Library - Reading Room", Cultural, "Creative Writing Club",
            None, &["poetry", "open-mic", "creative", "literature"]),
        event("10", "Study Abroad Information Session",
            "Discover exciting study abroad opportunities, learn about application processes, scholarships, and hear from students who have studied internationally.",
            date(2025, 2, 22), "4:00 PM - 6:00 PM", "Administration Building - Conference Room", Academic, "Study Abroad Office",
            Some((Some(75), Some(45))), &["study-abroad", "international", "education"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> CampusEvent {
        EventStore::sample().get("6").cloned().unwrap()
    }

    #[test]
    fn registration_status_variants() {
        let mut e = base();
        assert_eq!(e.registration_status(), RegistrationStatus::Open);
        e.registered_count = Some(45);
        assert_eq!(e.registration_status(), RegistrationStatus::SpotsLeft(5));
        e.registered_count = Some(60);
        assert_eq!(e.registration_status(), RegistrationStatus::Full);
        e.capacity = None;
        assert_eq!(e.registration_status(), RegistrationStatus::Required);
        e.registration_required = false;
        assert_eq!(e.registration_status(), RegistrationStatus::NotRequired);
    }

    #[test]
    fn upcoming_includes_today() {
        let e = base();
        assert!(e.is_upcoming(date(2025, 2, 8)));
        assert!(!e.is_upcoming(date(2025, 2, 9)));
    }

    #[test]
    fn formatted_date_is_long_form() {
        assert_eq!(base().formatted_date(), "Saturday, February 8, 2025");
    }

    #[test]
    fn store_add_update_delete() {
        let session = crate::admin::AdminGate::new(Some("pw".into())).login("pw").unwrap();
        let mut store = EventStore::sample();
        assert_eq!(store.len(), 10);

        let mut e = base();
        e.id = "11".into();
        store.add(&session, e.clone());
        assert_eq!(store.len(), 11);

        e.name = "Composting 101".into();
        assert!(store.update(&session, e.clone()));
        assert_eq!(store.get("11").unwrap().name, "Composting 101");

        e.id = "missing".into();
        assert!(!store.update(&session, e));

        assert_eq!(store.delete(&session, "11").unwrap().name, "Composting 101");
        assert!(store.delete(&session, "11").is_none());
        assert_eq!(store.len(), 10);
    }

    #[test]
    fn event_json_uses_camel_case() {
        let json = serde_json::to_value(base()).unwrap();
        assert_eq!(json["registrationRequired"], true);
        assert_eq!(json["registeredCount"], 23);
        assert_eq!(json["date"], "2025-02-08");
    }
}
