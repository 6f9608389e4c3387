//! Line-oriented editor scripts.
//!
//! Each non-empty line is one command, split with shell quoting rules:
//!
//! ```text
//! mode draw-road
//! click 40.7128,-74.0060
//! click 40.7130,-74.0050
//! key enter
//! mode add-location
//! click 40.7140,-74.0010
//! save-location "Coffee Cart" restaurant "Near the quad"
//! ```
//!
//! Lines starting with `#` are comments.

use campus_nav::{
    editor::{Committed, LocationCategory, LocationDraft},
    EditorKey, EditorMode, GeoPoint, MapEditor,
};

fn parse_key(s: &str) -> Result<EditorKey, String> {
    match s.to_ascii_lowercase().as_str() {
        "enter" | "return" => Ok(EditorKey::Enter),
        "escape" | "esc" => Ok(EditorKey::Escape),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(EditorKey::Other(c)),
                _ => Err(format!("unknown key {s:?}")),
            }
        }
    }
}

fn arg<'a>(args: &'a [String], idx: usize, what: &str) -> Result<&'a str, String> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| format!("missing {what}"))
}

fn apply(
    editor: &mut MapEditor,
    args: &[String],
    on_commit: &mut impl FnMut(&Committed),
) -> Result<(), String> {
    let committed = match args[0].as_str() {
        "mode" => {
            let mode: EditorMode = arg(args, 1, "mode")?.parse()?;
            editor.set_mode(mode);
            None
        }
        "toggle" => {
            let mode: EditorMode = arg(args, 1, "mode")?.parse()?;
            editor.toggle_mode(mode);
            None
        }
        "click" => {
            let point: GeoPoint = arg(args, 1, "coordinate")?.parse()?;
            editor.click(point);
            None
        }
        "key" => editor.handle_key(parse_key(arg(args, 1, "key")?)?),
        "finish" => editor.finish(),
        "cancel" => {
            editor.cancel();
            None
        }
        "save-location" => {
            let name = arg(args, 1, "location name")?;
            let category: LocationCategory = match args.get(2) {
                Some(c) => c.parse()?,
                None => LocationCategory::Custom,
            };
            let mut draft = LocationDraft::new(name, category);
            if let Some(desc) = args.get(3) {
                draft = draft.with_description(desc);
            }
            if editor.save_location(draft).is_none() {
                return Err("no location form open or name is blank".to_string());
            }
            None
        }
        "cancel-location" => {
            editor.cancel_location();
            None
        }
        "navigate" => {
            if !editor.start_navigation() {
                log::warn!("no route to navigate");
            }
            None
        }
        "stop-navigation" => {
            editor.stop_navigation();
            None
        }
        "toggle-locations" => {
            editor.toggle_locations();
            None
        }
        "toggle-roads" => {
            editor.toggle_roads();
            None
        }
        other => return Err(format!("unknown command {other:?}")),
    };
    if let Some(c) = committed {
        on_commit(&c);
    }
    Ok(())
}

/// Replays `script` on a fresh editor, reporting every committed road or route.
pub fn run(script: &str, mut on_commit: impl FnMut(&Committed)) -> Result<MapEditor, String> {
    let mut editor = MapEditor::new();
    for (idx, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let args = shell_words::split(line).map_err(|e| format!("line {}: {}", idx + 1, e))?;
        if args.is_empty() {
            continue;
        }
        apply(&mut editor, &args, &mut on_commit).map_err(|e| format!("line {}: {}", idx + 1, e))?;
    }
    Ok(editor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_a_road_and_a_route() {
        let script = "\
# two shapes
mode draw-road
click 0,0
click 0,1
key enter
mode plan-route
click 0,0
click 1,0
finish
";
        let mut commits = Vec::new();
        let editor = run(script, |c| commits.push(c.clone())).unwrap();
        assert_eq!(editor.roads().len(), 1);
        assert_eq!(editor.routes().len(), 1);
        assert_eq!(commits.len(), 2);
        assert_eq!(editor.mode(), EditorMode::View);
    }

    #[test]
    fn quoted_location_names() {
        let script = "mode add-location\nclick 40.7,-74.0\nsave-location \"Coffee Cart\" restaurant\n";
        let editor = run(script, |_| {}).unwrap();
        assert_eq!(editor.locations()[0].name, "Coffee Cart");
        assert_eq!(editor.locations()[0].category, LocationCategory::Restaurant);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = run("mode view\nfly away\n", |_| {}).unwrap_err();
        assert!(err.starts_with("line 2:"), "{err}");
    }

    #[test]
    fn single_point_road_is_not_committed() {
        let editor = run("mode draw-road\nclick 0,0\nkey enter\n", |_| {}).unwrap();
        assert!(editor.roads().is_empty());
        assert_eq!(editor.mode(), EditorMode::DrawRoad);
    }

    #[test]
    fn parse_keys() {
        assert_eq!(parse_key("Enter").unwrap(), EditorKey::Enter);
        assert_eq!(parse_key("esc").unwrap(), EditorKey::Escape);
        assert_eq!(parse_key("q").unwrap(), EditorKey::Other('q'));
        assert!(parse_key("space").is_err());
    }
}
