//! GeoJSON export of buildings and editor annotations.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};

use crate::directory::Building;
use crate::editor::{Location, MapEditor, Road, Route};
use crate::geometry::{to_line_string, GeoPoint};
use crate::styles::{self, LineStyle};

fn point_geometry(p: GeoPoint) -> Geometry {
    let point: geo_types::Point<f64> = p.into();
    Geometry::new(Value::from(&point))
}

fn line_geometry(points: &[GeoPoint]) -> Geometry {
    Geometry::new(Value::from(&to_line_string(points)))
}

fn feature(id: &str, geometry: Geometry, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: Some(geojson::feature::Id::String(id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

fn props<const N: usize>(pairs: [(&str, JsonValue); N]) -> JsonObject {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Adds simplestyle stroke members for `style`.
fn with_stroke(mut properties: JsonObject, style: &LineStyle) -> JsonObject {
    properties.insert("stroke".to_string(), style.color.into());
    properties.insert("stroke-width".to_string(), style.weight.into());
    properties.insert("stroke-opacity".to_string(), f64::from(style.opacity).into());
    properties
}

pub fn building_feature(b: &Building) -> Feature {
    feature(
        &b.id,
        point_geometry(b.position),
        props([
            ("kind", "building".into()),
            ("name", b.name.clone().into()),
            ("code", b.code.clone().into()),
            ("category", b.category.as_str().into()),
            ("marker-color", styles::building_color(b.category).into()),
        ]),
    )
}

pub fn location_feature(l: &Location) -> Feature {
    feature(
        &l.id,
        point_geometry(l.position),
        props([
            ("kind", "location".into()),
            ("name", l.name.clone().into()),
            ("description", l.description.clone().into()),
            ("category", l.category.as_str().into()),
            ("created_at", l.created_at.to_rfc3339().into()),
        ]),
    )
}

pub fn road_feature(r: &Road) -> Feature {
    feature(
        &r.id,
        line_geometry(&r.coordinates),
        with_stroke(
            props([
                ("kind", "road".into()),
                ("name", r.name.clone().into()),
                ("type", r.kind.clone().into()),
                ("length_m", r.length().into()),
                ("created_at", r.created_at.to_rfc3339().into()),
            ]),
            &styles::ROAD_STYLE,
        ),
    )
}

pub fn route_feature(r: &Route) -> Feature {
    feature(
        &r.id,
        line_geometry(&r.waypoints),
        with_stroke(
            props([
                ("kind", "route".into()),
                ("name", r.name.clone().into()),
                ("distance_m", r.distance.into()),
                ("estimated_minutes", r.estimated_time.into()),
                ("created_at", r.created_at.to_rfc3339().into()),
            ]),
            &styles::ROUTE_STYLE,
        ),
    )
}

pub fn buildings_to_geojson(buildings: &[Building]) -> GeoJson {
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features: buildings.iter().map(building_feature).collect(),
        foreign_members: None,
    })
}

/// All locations, roads and routes of the editor as one collection.
pub fn annotations_to_geojson(editor: &MapEditor) -> GeoJson {
    let features = editor
        .locations()
        .iter()
        .map(location_feature)
        .chain(editor.roads().iter().map(road_feature))
        .chain(editor.routes().iter().map(route_feature))
        .collect();
    GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

pub fn write_geojson(path: &str, geojson: &GeoJson) -> std::io::Result<()> {
    std::fs::write(path, geojson.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::campus_buildings;
    use crate::editor::EditorMode;

    #[test]
    fn building_point_is_lng_lat() {
        let f = building_feature(&campus_buildings()[0]);
        match f.geometry.unwrap().value {
            Value::Point(coords) => {
                assert_eq!(coords[0], campus_buildings()[0].position.lng);
                assert_eq!(coords[1], campus_buildings()[0].position.lat);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn annotations_include_roads() {
        let mut ed = MapEditor::new();
        ed.set_mode(EditorMode::DrawRoad);
        ed.click(GeoPoint::new(0.0, 0.0));
        ed.click(GeoPoint::new(0.0, 1.0));
        ed.finish();
        let GeoJson::FeatureCollection(fc) = annotations_to_geojson(&ed) else {
            panic!("expected collection");
        };
        assert_eq!(fc.features.len(), 1);
        let f = &fc.features[0];
        assert_eq!(f.property("kind").and_then(|v| v.as_str()), Some("road"));
        assert!(matches!(f.geometry.as_ref().unwrap().value, Value::LineString(ref c) if c.len() == 2));
        assert_eq!(f.property("stroke").and_then(|v| v.as_str()), Some(styles::ROAD_STYLE.color));
        let length = f.property("length_m").and_then(|v| v.as_f64()).unwrap();
        assert!((length - 111_195.0).abs() < 1.0);
    }

    #[test]
    fn routes_use_route_stroke() {
        let mut ed = MapEditor::new();
        ed.set_mode(EditorMode::PlanRoute);
        ed.click(GeoPoint::new(0.0, 0.0));
        ed.click(GeoPoint::new(1.0, 0.0));
        ed.finish();
        let f = route_feature(&ed.routes()[0]);
        assert_eq!(f.property("stroke").and_then(|v| v.as_str()), Some("#8B5CF6"));
        assert_eq!(f.property("stroke-width").and_then(|v| v.as_u64()), Some(6));
    }
}
