use serde::{Deserialize, Serialize};

use crate::editor::{Location, MapEditor, Road, Route};

/// Saved editor annotations.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnnotationProject {
    pub locations: Vec<Location>,
    pub roads: Vec<Road>,
    pub routes: Vec<Route>,
}

impl AnnotationProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_editor(editor: &MapEditor) -> Self {
        Self {
            locations: editor.locations().to_vec(),
            roads: editor.roads().to_vec(),
            routes: editor.routes().to_vec(),
        }
    }

    pub fn into_editor(self) -> MapEditor {
        MapEditor::with_entities(self.locations, self.roads, self.routes)
    }
}

/// Loads a project saved by [`write_project_json`].
pub fn read_project_json(path: &str) -> std::io::Result<AnnotationProject> {
    super::read_json(path)
}

pub fn write_project_json(path: &str, project: &AnnotationProject) -> std::io::Result<()> {
    super::write_json(path, project)
}
