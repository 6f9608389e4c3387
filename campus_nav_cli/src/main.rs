use std::path::PathBuf;

use campus_nav::{
    admin::AdminSession,
    config::AppConfig,
    directory::{campus_buildings, Building, BuildingCatalog, BuildingCategory},
    editor::{estimate_minutes, format_distance, format_time, Committed},
    events::{CampusEvent, EventCategory, EventStore},
    favorites::{FavoritesStore, FileStore},
    geometry::{path_length, GeoPoint},
    io::{
        geojson::{annotations_to_geojson, buildings_to_geojson, write_geojson},
        project::{write_project_json, AnnotationProject},
        read_buildings_json, read_events_json, write_buildings_json, write_events_json,
    },
    map::{backend_for, MapLoadState, MapType, MapView},
    search::{filter_buildings, find_building_for_venue, CategoryFilter},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod script;

/// Command line front-end for the campus navigation library.
#[derive(Parser)]
#[command(name = "campus_nav_cli", version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding persisted favorites (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// JSON building catalogue to use instead of the built-in one
    #[arg(long, global = true)]
    buildings: Option<String>,
    /// JSON events list to use instead of the built-in one
    #[arg(long, global = true)]
    events: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the building directory.
    Buildings {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        category: CategoryFilter<BuildingCategory>,
        /// Write the matching buildings as GeoJSON instead of printing them.
        #[arg(long)]
        geojson: Option<String>,
        /// Write the matching buildings as a JSON catalogue.
        #[arg(long)]
        json: Option<String>,
    },
    /// Search the events catalogue.
    Events {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value = "all")]
        category: CategoryFilter<EventCategory>,
        /// Only list events on or after this date (YYYY-MM-DD).
        #[arg(long)]
        upcoming: Option<NaiveDate>,
    },
    /// Toggle a building in the favorites list.
    Favorite { id: String },
    /// List favorite buildings.
    Favorites,
    /// Distance and estimated time along lat,lng waypoints.
    RouteDistance {
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true)]
        points: Vec<GeoPoint>,
    },
    /// Replay a map editor script.
    Edit {
        script: String,
        /// Export the resulting annotations as GeoJSON.
        #[arg(long)]
        geojson: Option<String>,
        /// Save the resulting annotations as a JSON project.
        #[arg(long)]
        save: Option<String>,
    },
    /// Load the map and list the building markers.
    Map {
        #[arg(long)]
        map_type: Option<MapType>,
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Find the building for an event venue.
    Directions { venue: String },
    /// Edit the building catalogue or the events list.
    Admin {
        /// Admin passcode, checked against the configured one.
        #[arg(long)]
        passcode: String,
        /// File receiving the edited catalogue or events list.
        #[arg(long)]
        output: String,
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Add a building to the catalogue.
    AddBuilding {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        category: BuildingCategory,
        /// Position as lat,lng
        #[arg(long, allow_hyphen_values = true)]
        position: GeoPoint,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        hours: String,
    },
    /// Change fields of an existing building.
    UpdateBuilding {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        hours: Option<String>,
    },
    /// Remove a building from the catalogue.
    DeleteBuilding { id: String },
    /// Remove an event from the events list.
    DeleteEvent { id: String },
}

fn fail(msg: String) -> ! {
    eprintln!("{}", msg);
    std::process::exit(1);
}

fn run_admin(
    session: &AdminSession,
    action: AdminAction,
    output: &str,
    catalog: Vec<Building>,
    events: Vec<CampusEvent>,
) {
    let mut catalog = BuildingCatalog::from_buildings(catalog);
    match action {
        AdminAction::AddBuilding {
            id,
            name,
            code,
            category,
            position,
            description,
            hours,
        } => {
            let building = Building::new(&id, &name, &code, category, position)
                .with_description(&description)
                .with_hours(&hours);
            if !catalog.add(session, building) {
                fail(format!("Building {} already exists", id));
            }
            println!("Added building {} ({})", name, code);
        }
        AdminAction::UpdateBuilding {
            id,
            name,
            description,
            hours,
        } => {
            let Some(mut building) = catalog.get(&id).cloned() else {
                fail(format!("Unknown building {}", id));
            };
            if let Some(name) = name {
                building.name = name;
            }
            if let Some(description) = description {
                building.description = description;
            }
            if let Some(hours) = hours {
                building.hours = hours;
            }
            let name = building.name.clone();
            catalog.update(session, building);
            println!("Updated building {} ({})", id, name);
        }
        AdminAction::DeleteBuilding { id } => match catalog.delete(session, &id) {
            Some(b) => println!("Deleted building {}", b.name),
            None => fail(format!("Unknown building {}", id)),
        },
        AdminAction::DeleteEvent { id } => {
            let mut store = EventStore::from_events(events);
            match store.delete(session, &id) {
                Some(e) => println!("Deleted event {}", e.name),
                None => fail(format!("Unknown event {}", id)),
            }
            match write_events_json(output, store.events()) {
                Ok(()) => println!("Wrote {}", output),
                Err(e) => fail(format!("Error writing {}: {}", output, e)),
            }
            return;
        }
    }
    match write_buildings_json(output, catalog.buildings()) {
        Ok(()) => println!("Wrote {}", output),
        Err(e) => fail(format!("Error writing {}: {}", output, e)),
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, String> {
    let base = match &cli.config {
        Some(path) => AppConfig::from_json(path).map_err(|e| e.to_string())?,
        None => AppConfig::default(),
    };
    let mut cfg = base.with_env().map_err(|e| e.to_string())?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }
    Ok(cfg)
}

fn main() {
    campus_nav::init_logging();
    let cli = Cli::parse();
    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(2);
        }
    };
    log::debug!("using data dir {}", cfg.data_dir.display());
    let catalog: Vec<Building> = match &cli.buildings {
        Some(path) => read_buildings_json(path)
            .unwrap_or_else(|e| fail(format!("Error reading {}: {}", path, e))),
        None => campus_buildings().to_vec(),
    };
    let events: Vec<CampusEvent> = match &cli.events {
        Some(path) => {
            read_events_json(path).unwrap_or_else(|e| fail(format!("Error reading {}: {}", path, e)))
        }
        None => EventStore::sample().events().to_vec(),
    };

    match cli.command {
        Commands::Buildings {
            query,
            category,
            geojson,
            json,
        } => {
            let hits = filter_buildings(&catalog, &query, category);
            if geojson.is_some() || json.is_some() {
                let owned: Vec<_> = hits.into_iter().cloned().collect();
                if let Some(output) = geojson {
                    match write_geojson(&output, &buildings_to_geojson(&owned)) {
                        Ok(()) => println!("Wrote {}", output),
                        Err(e) => eprintln!("Error writing {}: {}", output, e),
                    }
                }
                if let Some(output) = json {
                    match write_buildings_json(&output, &owned) {
                        Ok(()) => println!("Wrote {}", output),
                        Err(e) => eprintln!("Error writing {}: {}", output, e),
                    }
                }
                return;
            }
            for b in &hits {
                println!("{}\t{}\t{}", b.code, b.name, b.category);
            }
            println!("{} results", hits.len());
        }
        Commands::Events {
            query,
            category,
            upcoming,
        } => {
            let store = EventStore::from_events(events);
            let hits = store.search(&query, category);
            let mut shown = 0;
            for e in hits
                .into_iter()
                .filter(|e| upcoming.map_or(true, |d| e.is_upcoming(d)))
            {
                println!(
                    "{} | {} @ {} [{}]",
                    e.date,
                    e.name,
                    e.venue,
                    e.registration_status()
                );
                shown += 1;
            }
            println!("{} events", shown);
        }
        Commands::Favorite { id } => {
            let Some(building) = catalog.iter().find(|b| b.id == id) else {
                eprintln!("Unknown building {}", id);
                std::process::exit(1);
            };
            let mut favs = FavoritesStore::load(FileStore::in_dir(&cfg.data_dir));
            match favs.toggle(&id) {
                Ok(true) => println!("Added {} to favorites", building.name),
                Ok(false) => println!("Removed {} from favorites", building.name),
                Err(e) => {
                    eprintln!("Error saving favorites: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Favorites => {
            let favs = FavoritesStore::load(FileStore::in_dir(&cfg.data_dir));
            let buildings = favs.favorite_buildings(&catalog);
            if buildings.is_empty() {
                println!("No favorites yet");
            }
            for b in buildings {
                println!("{}\t{}", b.code, b.name);
            }
        }
        Commands::RouteDistance { points } => {
            let meters = path_length(&points);
            println!("Distance: {} ({:.1} m)", format_distance(meters), meters);
            println!("Estimated time: {}", format_time(estimate_minutes(meters)));
        }
        Commands::Edit {
            script,
            geojson,
            save,
        } => {
            let contents = match std::fs::read_to_string(&script) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error reading {}: {}", script, e);
                    std::process::exit(1);
                }
            };
            let editor = match script::run(&contents, |committed| match committed {
                Committed::Road(r) => {
                    println!(
                        "Created {} with {} points, {}",
                        r.name,
                        r.coordinates.len(),
                        format_distance(r.length())
                    )
                }
                Committed::Route(r) => println!(
                    "Created {}: {} in {}",
                    r.name,
                    format_distance(r.distance),
                    format_time(r.estimated_time)
                ),
            }) {
                Ok(editor) => editor,
                Err(e) => {
                    eprintln!("Error in {}: {}", script, e);
                    std::process::exit(1);
                }
            };
            println!(
                "Locations: {}, Roads: {}, Routes: {}",
                editor.locations().len(),
                editor.roads().len(),
                editor.routes().len()
            );
            if let Some(output) = geojson {
                match write_geojson(&output, &annotations_to_geojson(&editor)) {
                    Ok(()) => println!("Wrote {}", output),
                    Err(e) => eprintln!("Error writing {}: {}", output, e),
                }
            }
            if let Some(output) = save {
                match write_project_json(&output, &AnnotationProject::from_editor(&editor)) {
                    Ok(()) => println!("Wrote {}", output),
                    Err(e) => eprintln!("Error writing {}: {}", output, e),
                }
            }
        }
        Commands::Map { map_type, api_key } => {
            let mut map_config = cfg.map_config();
            if api_key.is_some() {
                map_config.api_key = api_key;
            }
            let map_type = map_type.unwrap_or(cfg.map_type);
            let mut view = MapView::new(backend_for(map_type), map_config);
            view.load();
            if let MapLoadState::Failed(e) = view.state() {
                log::debug!("map load failed: {}", e);
                eprintln!("{}", view.error_panel().unwrap_or_default());
                std::process::exit(1);
            }
            view.render(&catalog);
            for m in view.markers(&catalog) {
                println!("{}\t{}\t{}\t{}", m.id, m.title, m.position, m.color);
            }
            println!("{} map ready with {} markers", map_type, catalog.len());
        }
        Commands::Admin {
            passcode,
            output,
            action,
        } => {
            let session = match cfg.admin_gate().login(&passcode) {
                Ok(session) => session,
                Err(e) => fail(format!("Admin access refused: {}", e)),
            };
            run_admin(&session, action, &output, catalog, events);
        }
        Commands::Directions { venue } => {
            match find_building_for_venue(&catalog, &venue) {
                Some(b) => println!("{} ({}) at {}", b.name, b.code, b.position),
                None => println!("No campus building matches {:?}", venue),
            }
        }
    }
}
