use campus_nav::{
    directory::{campus_buildings, Building, BuildingCategory},
    events::{EventCategory, EventStore},
    search::{filter_buildings, filter_events, CategoryFilter},
};

fn ids(bs: &[&Building]) -> Vec<String> {
    bs.iter().map(|b| b.id.clone()).collect()
}

#[test]
fn lib_query_matches_expected_subset_in_order() {
    let all = campus_buildings();
    let hits = filter_buildings(all, "lib", CategoryFilter::All);

    let expected: Vec<String> = all
        .iter()
        .filter(|b| {
            b.name.to_lowercase().contains("lib")
                || b.code.to_lowercase().contains("lib")
                || b.description.to_lowercase().contains("lib")
                || b.services.iter().any(|s| s.to_lowercase().contains("lib"))
        })
        .map(|b| b.id.clone())
        .collect();

    assert!(!expected.is_empty());
    assert_eq!(ids(&hits), expected);
}

#[test]
fn building_filter_is_idempotent() {
    let cases = [
        ("", CategoryFilter::All),
        ("hall", CategoryFilter::All),
        ("lib", CategoryFilter::Only(BuildingCategory::Library)),
        ("24 hours", CategoryFilter::Only(BuildingCategory::Emergency)),
        ("zzz", CategoryFilter::All),
    ];
    for (query, category) in cases {
        let once: Vec<Building> = filter_buildings(campus_buildings(), query, category)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_buildings(&once, query, category);
        assert_eq!(ids(&twice), once.iter().map(|b| b.id.clone()).collect::<Vec<_>>());
    }
}

#[test]
fn repeated_query_gives_same_output() {
    let a = filter_buildings(campus_buildings(), "center", CategoryFilter::All);
    let b = filter_buildings(campus_buildings(), "center", CategoryFilter::All);
    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn events_match_tags_and_organizer() {
    let store = EventStore::sample();
    let by_tag = filter_events(store.events(), "INTERNSHIPS", CategoryFilter::All);
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].name, "Career Fair 2025");

    let by_org = store.search("music department", CategoryFilter::All);
    assert_eq!(by_org.len(), 1);

    let cultural = store.search("", CategoryFilter::Only(EventCategory::Cultural));
    assert_eq!(cultural.len(), 3);

    let none = store.search("international", CategoryFilter::Only(EventCategory::Sports));
    assert!(none.is_empty());
}
