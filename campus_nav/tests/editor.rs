use campus_nav::{
    editor::{ClickOutcome, Committed, EditorKey, EditorMode, LocationCategory, LocationDraft, MapEditor},
    geolocation::{GeolocationWatcher, PositionEvent, PositionSample, ReplaySource, UnsupportedSource},
    geometry::{path_length, GeoPoint},
    io::project::{read_project_json, write_project_json, AnnotationProject},
};

fn p(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng)
}

#[test]
fn finishing_short_shapes_is_a_no_op() {
    for mode in [EditorMode::DrawRoad, EditorMode::PlanRoute] {
        for clicks in 0..2 {
            let mut ed = MapEditor::new();
            ed.set_mode(mode);
            for i in 0..clicks {
                ed.click(p(i as f64, 0.0));
            }
            assert!(ed.finish().is_none());
            assert_eq!(ed.mode(), mode);
            assert!(ed.roads().is_empty());
            assert!(ed.routes().is_empty());
        }
    }
}

#[test]
fn enter_in_view_or_add_location_does_nothing() {
    let mut ed = MapEditor::new();
    assert!(ed.handle_key(EditorKey::Enter).is_none());
    ed.set_mode(EditorMode::AddLocation);
    ed.click(p(1.0, 1.0));
    assert!(ed.handle_key(EditorKey::Enter).is_none());
    assert_eq!(ed.mode(), EditorMode::AddLocation);
}

#[test]
fn route_distance_symmetric_under_reversal() {
    let pts = vec![p(12.97, 77.59), p(13.0, 77.6), p(13.05, 77.55), p(12.9, 77.7)];
    let mut rev = pts.clone();
    rev.reverse();

    let build = |points: &[GeoPoint]| {
        let mut ed = MapEditor::new();
        ed.set_mode(EditorMode::PlanRoute);
        for pt in points {
            ed.click(*pt);
        }
        match ed.finish() {
            Some(Committed::Route(r)) => r,
            other => panic!("expected route, got {other:?}"),
        }
    };
    let fwd = build(&pts);
    let bwd = build(&rev);
    assert!(fwd.distance >= 0.0);
    assert!((fwd.distance - bwd.distance).abs() < 1e-6);
    assert!((fwd.distance - path_length(&pts)).abs() < 1e-9);
}

#[test]
fn one_degree_of_longitude_at_equator() {
    let mut ed = MapEditor::new();
    ed.set_mode(EditorMode::PlanRoute);
    assert_eq!(ed.click(p(0.0, 0.0)), ClickOutcome::WaypointAdded(1));
    assert_eq!(ed.click(p(0.0, 1.0)), ClickOutcome::WaypointAdded(2));
    let Some(Committed::Route(r)) = ed.handle_key(EditorKey::Enter) else {
        panic!("route not created");
    };
    assert!((r.distance - 111_195.0).abs() < 1.0);
    assert!((r.estimated_time - 222.4).abs() < 0.05);
}

#[test]
fn names_count_per_kind() {
    let mut ed = MapEditor::new();
    for _ in 0..2 {
        ed.set_mode(EditorMode::DrawRoad);
        ed.click(p(0.0, 0.0));
        ed.click(p(0.1, 0.1));
        ed.finish();
    }
    ed.set_mode(EditorMode::PlanRoute);
    ed.click(p(0.0, 0.0));
    ed.click(p(0.1, 0.1));
    ed.finish();
    let names: Vec<_> = ed.roads().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["Road 1", "Road 2"]);
    assert_eq!(ed.routes()[0].name, "Route 1");
}

#[test]
fn recenter_disabled_without_location() {
    let mut ed = MapEditor::new();
    let mut watcher = GeolocationWatcher::new(UnsupportedSource);
    watcher.start();
    assert!(ed.recenter_target(&watcher).is_none());
    assert!(!ed.recenter(&watcher));
    assert_eq!(ed.zoom(), 13);
}

#[test]
fn recenter_moves_to_user() {
    let mut ed = MapEditor::new();
    let sample = PositionEvent::Sample(PositionSample::new(p(12.9, 77.6)));
    let mut watcher = GeolocationWatcher::new(ReplaySource::new(vec![sample]));
    watcher.start();
    watcher.poll();
    assert!(ed.recenter(&watcher));
    assert_eq!(ed.center(), p(12.9, 77.6));
    assert_eq!(ed.zoom(), 16);

    ed.set_mode(EditorMode::PlanRoute);
    ed.click(p(0.0, 0.0));
    ed.click(p(0.0, 1.0));
    ed.finish();
    ed.start_navigation();
    let panel = ed.navigation_panel(watcher.location()).unwrap();
    assert_eq!(panel.user_location, Some(p(12.9, 77.6)));
    assert_eq!(panel.distance, "111.2 km");
}

#[test]
fn project_file_restores_annotations() {
    let mut ed = MapEditor::new();
    ed.set_mode(EditorMode::AddLocation);
    ed.click(p(40.71, -74.0));
    ed.save_location(LocationDraft::new("Food truck", LocationCategory::Restaurant));
    ed.set_mode(EditorMode::DrawRoad);
    ed.click(p(40.71, -74.0));
    ed.click(p(40.72, -74.01));
    ed.finish();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("annotations.json");
    let path = path.to_str().unwrap();
    write_project_json(path, &AnnotationProject::from_editor(&ed)).unwrap();

    let restored = read_project_json(path).unwrap().into_editor();
    assert_eq!(restored.locations(), ed.locations());
    assert_eq!(restored.roads(), ed.roads());
    assert_eq!(restored.mode(), EditorMode::View);
}
