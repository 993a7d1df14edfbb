//! Application runner logic
//!
//! Loads a sprite, drives the viewport controller with the operations given
//! on the command line and writes the result back.

use crate::core::cli::CliArgs;
use crate::core::config::{ConfigFile, EditorSettings};
use crate::data::{Sprite, SpriteStore};
use crate::editing::{EditorMode, SpriteEditorViewport};
use crate::logging;
use crate::rendering::stats;
use anyhow::{Context, Result};
use bevy::log::{info, warn};
use std::path::Path;

/// What a batch run did to the sprite
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    /// Labels of the committed transactions, oldest first
    pub edits: Vec<String>,
    /// Canvas text, filled in when `--stats` is set
    pub stats: Vec<String>,
    pub saved: bool,
}

/// Create and run the application with the given CLI arguments.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    let _guard = logging::init_logging(cli_args.verbose, cli_args.log_file)?;

    let config = ConfigFile::load();
    let settings = cli_args.settings(config.as_ref());
    let mode = cli_args.resolve_mode(config.as_ref());

    let report = run_batch(&cli_args, settings, mode)?;
    for line in &report.stats {
        println!("{line}");
    }
    if report.edits.is_empty() {
        info!("No edits made");
    }
    Ok(())
}

/// Apply the requested operations to the sprite file
#[tracing::instrument(skip_all, fields(mode = %mode))]
pub fn run_batch(cli_args: &CliArgs, settings: EditorSettings, mode: EditorMode) -> Result<RunReport> {
    cli_args.check_edit_mode(mode).map_err(anyhow::Error::msg)?;
    let path = cli_args
        .sprite
        .as_deref()
        .context("No sprite file given")?;
    let sprite = Sprite::load(path)?;
    info!("Loaded sprite '{}' from {:?}", sprite.name, path);

    let mut store = SpriteStore::new();
    let handle = store.insert(sprite);
    let mut viewport = SpriteEditorViewport::new(handle, settings);
    viewport.set_mode(&mut store, mode);

    if cli_args.add_polygon && viewport.add_polygon(&mut store).is_none() {
        warn!("Could not add a polygon in {} mode", mode);
    }
    if cli_args.snap && !viewport.snap_all_vertices_to_pixel_grid(&mut store) {
        info!("No vertices to snap in {} mode", mode);
    }

    let mut report = RunReport {
        edits: viewport.history().labels().map(str::to_string).collect(),
        ..Default::default()
    };

    let sprite = store.get(handle).context("Sprite vanished from the store")?;
    if cli_args.stats {
        if let Some(help) = stats::help_text(mode) {
            report.stats.extend(help.lines().map(str::to_string));
        }
        report
            .stats
            .extend(stats::canvas_lines(sprite, mode, viewport.axes()));
    }

    // Overwrite the input only when something changed
    let target = match (&cli_args.output, report.edits.is_empty()) {
        (Some(output), _) => Some(output.as_path()),
        (None, false) => Some(path),
        (None, true) => None,
    };
    if let Some(target) = target {
        save(sprite, target)?;
        report.saved = true;
    }

    Ok(report)
}

fn save(sprite: &Sprite, path: &Path) -> Result<()> {
    sprite.save(path)?;
    info!("Wrote sprite '{}' to {:?}", sprite.name, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Polygon, PolygonCollection};
    use kurbo::{Point, Size};
    use std::path::PathBuf;

    fn write_sprite(dir: &Path) -> PathBuf {
        let mut sprite = Sprite::new("crate", Point::new(0.0, 0.0), Size::new(16.0, 16.0));
        sprite.collision_geometry = PolygonCollection::custom(vec![Polygon::new(vec![
            Point::new(1.4, 1.6),
            Point::new(8.0, 1.0),
            Point::new(4.2, 7.7),
        ])]);
        let path = dir.join("crate.json");
        sprite.save(&path).unwrap();
        path
    }

    #[test]
    fn test_snap_writes_back_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sprite(dir.path());
        let args = CliArgs {
            sprite: Some(path.clone()),
            snap: true,
            ..Default::default()
        };

        // No --mode given, the collision mode comes from the config file
        let report = run_batch(&args, EditorSettings::default(), EditorMode::EditCollision).unwrap();
        assert_eq!(report.edits, vec!["Snap All Verts to Pixel Grid".to_string()]);
        assert!(report.saved);

        let saved = Sprite::load(&path).unwrap();
        assert_eq!(
            saved.collision_geometry.polygons[0].vertices,
            vec![Point::new(1.0, 2.0), Point::new(8.0, 1.0), Point::new(4.0, 8.0)]
        );
    }

    #[test]
    fn test_stats_only_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sprite(dir.path());
        let before = std::fs::read_to_string(&path).unwrap();
        let args = CliArgs {
            sprite: Some(path.clone()),
            stats: true,
            ..Default::default()
        };

        let report = run_batch(&args, EditorSettings::default(), EditorMode::EditCollision).unwrap();
        assert!(report.edits.is_empty());
        assert!(!report.saved);
        assert!(report.stats.iter().any(|line| line == "Polys: 1"));
        assert!(report.stats.iter().any(|line| line == "Verts: 3"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_add_polygon_to_separate_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sprite(dir.path());
        let output = dir.path().join("out").join("crate.json");
        let args = CliArgs {
            sprite: Some(path),
            add_polygon: true,
            output: Some(output.clone()),
            ..Default::default()
        };

        let report =
            run_batch(&args, EditorSettings::default(), EditorMode::EditRenderGeometry).unwrap();
        assert_eq!(report.edits.len(), 1);
        let saved = Sprite::load(&output).unwrap();
        // The generated bounding box stays, the seed triangle is appended
        assert!(saved.render_geometry.is_custom());
        assert_eq!(saved.render_geometry.polygons.len(), 2);
    }

    #[test]
    fn test_geometry_edit_in_view_mode_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sprite(dir.path());
        let before = std::fs::read_to_string(&path).unwrap();
        let args = CliArgs {
            sprite: Some(path.clone()),
            add_polygon: true,
            ..Default::default()
        };
        let error = run_batch(&args, EditorSettings::default(), EditorMode::View).unwrap_err();
        assert!(error.to_string().contains("--add-polygon"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_missing_sprite_is_an_error() {
        let args = CliArgs {
            sprite: Some(PathBuf::from("/no/such/sprite.json")),
            ..Default::default()
        };
        let error = run_batch(&args, EditorSettings::default(), EditorMode::View).unwrap_err();
        assert!(format!("{error:#}").contains("Failed to read sprite file"));
    }
}
