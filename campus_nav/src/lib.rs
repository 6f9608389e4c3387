//! Core library for the campus navigation application.

pub mod admin;
pub mod config;
pub mod directory;
pub mod editor;
pub mod events;
pub mod favorites;
pub mod geolocation;
pub mod geometry;
pub mod io;
pub mod map;
pub mod search;
pub mod styles;

pub use directory::{Building, BuildingCategory};
pub use editor::{EditorKey, EditorMode, MapEditor};
pub use events::{CampusEvent, EventCategory, EventStore};
pub use favorites::FavoritesStore;
pub use geometry::GeoPoint;

/// Initializes `env_logger` once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().format_timestamp(None).try_init();
}
