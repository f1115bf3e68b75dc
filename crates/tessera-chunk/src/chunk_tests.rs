//! Tests for the chunk lifecycle state machine.

use std::sync::Arc;

use tessera_mesh::{HeightCurve, TerrainMesh};
use tessera_terrain::{FieldError, Grid, Rgba, SampledFields, TileCoord, classify_tile};

use super::*;
use crate::broadcast::GridEvents;
use crate::testing::{HIGHLAND, LOWLAND, RecordingCoordinator, chunk_at, placement, ramp_fields};

const COORD: TileCoord = TileCoord::new(2, 3);

// ---------------------------------------------------------------------------
// Initialization
// ---------------------------------------------------------------------------

#[test]
fn test_mismatched_fields_fail_with_configuration_error() {
    let mut coordinator = RecordingCoordinator::new();
    let result = Chunk::new(
        &mut coordinator,
        COORD,
        Grid::filled(4, 4, 0.5),
        Grid::filled(3, 4, 0.5),
        Grid::filled(4, 4, 0.5),
    );

    let err = result.unwrap_err();
    assert_eq!(
        err,
        ChunkError::Configuration(FieldError::DimensionMismatch {
            field: "temperature",
            expected: (4, 4),
            actual: (3, 4),
        })
    );
    assert!(coordinator.water_checks.is_empty(), "no chunk, no water check");
}

#[test]
fn test_biome_grid_matches_classifier() {
    let mut coordinator = RecordingCoordinator::new();
    let (h, t, m) = ramp_fields(6);
    let reference = SampledFields::new(h.clone(), t.clone(), m.clone()).unwrap();
    let chunk = Chunk::new(&mut coordinator, COORD, h, t, m).unwrap();

    assert_eq!(chunk.biomes().dimensions(), chunk.fields().dimensions());
    for (tile, _) in reference.height().iter() {
        let expected = classify_tile(&reference, &coordinator.rules, tile).unwrap();
        assert_eq!(chunk.biome_at(tile), Ok(expected), "tile {tile}");
    }
    assert_eq!(chunk.biome_at(TileCoord::new(0, 0)), Ok(LOWLAND));
    assert_eq!(chunk.biome_at(TileCoord::new(4, 0)), Ok(HIGHLAND));
}

#[test]
fn test_out_of_bounds_lookups_fail() {
    let mut coordinator = RecordingCoordinator::new();
    let chunk = chunk_at(&mut coordinator, COORD);

    assert_eq!(
        chunk.height_at(TileCoord::new(4, 0)),
        Err(ChunkError::OutOfBounds {
            coord: TileCoord::new(4, 0),
            width: 4,
            height: 4,
        })
    );
    assert!(matches!(
        chunk.biome_at(TileCoord::new(-1, 2)),
        Err(ChunkError::OutOfBounds { .. })
    ));
    assert!((chunk.height_at(TileCoord::new(3, 0)).unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn test_new_chunk_starts_empty_and_inactive() {
    let mut coordinator = RecordingCoordinator::new();
    let chunk = chunk_at(&mut coordinator, COORD);

    assert_eq!(chunk.coord(), COORD);
    assert!(!chunk.is_active());
    assert!(!chunk.has_mesh());
    assert!(!chunk.has_biome_texture());
    assert!(!chunk.has_vegetation());
    assert!(!chunk.has_water_layer());
    assert!(!chunk.surface().is_visible());
    assert!(chunk.surface().texture().is_none());
    assert_eq!(chunk.surface().glossiness(), 0.0);
    assert_eq!(chunk.surface().displayed(), DrawMode::Biome);
}

// ---------------------------------------------------------------------------
// Water
// ---------------------------------------------------------------------------

#[test]
fn test_init_issues_one_water_check() {
    let mut coordinator = RecordingCoordinator::new();
    let _chunk = chunk_at(&mut coordinator, COORD);
    assert_eq!(coordinator.water_checks, vec![COORD]);
}

#[test]
fn test_water_updates_once_per_tick_while_active() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_water_layer(TerrainMesh::flat(4, 1.0)).unwrap();
    assert!(chunk.has_water_layer());

    assert!(!chunk.tick(&mut coordinator), "inactive chunks skip water");
    assert!(coordinator.water_updates.is_empty());

    chunk.set_active(true, &mut events);
    for _ in 0..3 {
        assert!(chunk.tick(&mut coordinator));
    }
    assert_eq!(coordinator.water_updates, vec![COORD; 3]);
    let (lo, _) = chunk.water_layer().unwrap().mesh().height_range().unwrap();
    assert!((lo - 0.75).abs() < 1e-6, "coordinator animated the owned mesh");

    chunk.set_active(false, &mut events);
    assert!(!chunk.tick(&mut coordinator));
    assert_eq!(coordinator.water_updates.len(), 3);
}

#[test]
fn test_tick_without_water_does_nothing() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);
    chunk.set_active(true, &mut events);

    assert!(!chunk.tick(&mut coordinator));
    assert!(coordinator.water_updates.is_empty());
    chunk.release(&mut events);
}

#[test]
fn test_second_water_layer_rejected() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_water_layer(TerrainMesh::flat(4, 1.0)).unwrap();
    let err = chunk.set_water_layer(TerrainMesh::flat(2, 1.0)).unwrap_err();

    assert_eq!(err, ChunkError::AlreadyBuilt(Artifact::WaterLayer));
    assert_eq!(chunk.water_layer().unwrap().mesh().grid_size(), (5, 5));
}

#[test]
fn test_water_visibility_follows_activation() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_water_layer(TerrainMesh::flat(4, 1.0)).unwrap();
    assert!(!chunk.water_layer().unwrap().is_visible());

    chunk.set_active(true, &mut events);
    assert!(chunk.water_layer().unwrap().is_visible());

    chunk.set_active(false, &mut events);
    assert!(!chunk.water_layer().unwrap().is_visible());
}

#[test]
fn test_water_attached_while_active_is_visible() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_active(true, &mut events);
    chunk.set_water_layer(TerrainMesh::flat(4, 1.0)).unwrap();
    assert!(chunk.water_layer().unwrap().is_visible());
    chunk.release(&mut events);
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

#[test]
fn test_double_activation_subscribes_once() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    assert!(chunk.set_active(true, &mut events));
    assert!(!chunk.set_active(true, &mut events));

    assert!(chunk.is_active());
    assert!(chunk.surface().is_visible());
    assert_eq!(events.draw_mode_changed.count_of(&COORD), 1);
    assert_eq!(events.visible_set_changed.count_of(&COORD), 1);
    chunk.release(&mut events);
}

#[test]
fn test_deactivation_releases_subscriptions() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    assert!(!chunk.set_active(false, &mut events), "already inactive");
    chunk.set_active(true, &mut events);
    assert!(chunk.set_active(false, &mut events));
    assert!(!chunk.set_active(false, &mut events));

    assert!(!chunk.is_active());
    assert!(!chunk.surface().is_visible());
    assert!(events.draw_mode_changed.is_empty());
    assert!(events.visible_set_changed.is_empty());
}

#[test]
fn test_reactivation_subscribes_again() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    for _ in 0..3 {
        chunk.set_active(true, &mut events);
        chunk.set_active(false, &mut events);
    }
    chunk.set_active(true, &mut events);
    assert_eq!(events.draw_mode_changed.len(), 1);
    assert_eq!(events.visible_set_changed.len(), 1);
    chunk.release(&mut events);
}

#[test]
fn test_release_unsubscribes() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);
    chunk.set_active(true, &mut events);

    chunk.release(&mut events);
    assert!(events.draw_mode_changed.is_empty());
    assert!(events.visible_set_changed.is_empty());
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[test]
fn test_flat_mesh_is_replaceable_and_not_collidable() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.create_flat_mesh(4, 1.0);
    assert!(chunk.has_mesh());
    assert!(chunk.surface().collider().is_none());

    chunk.create_flat_mesh(8, 0.5);
    assert_eq!(chunk.surface().mesh().unwrap().vertices.len(), 81);
}

#[test]
fn test_terrain_mesh_is_also_the_collider() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);
    chunk.create_flat_mesh(4, 1.0);

    chunk.create_mesh(1.0, 10.0, &HeightCurve::linear());

    let surface = chunk.surface();
    let mesh = surface.mesh().unwrap();
    assert!(Arc::ptr_eq(mesh, surface.collider().unwrap()));
    let (lo, hi) = mesh.height_range().unwrap();
    assert!(lo.abs() < 1e-6);
    assert!((hi - 10.0).abs() < 1e-4);
}

// ---------------------------------------------------------------------------
// Biome texture and draw modes
// ---------------------------------------------------------------------------

#[test]
fn test_closed_gate_defers_biome_texture() {
    let mut coordinator = RecordingCoordinator::new();
    coordinator.ready = false;
    let mut chunk = chunk_at(&mut coordinator, COORD);

    assert!(!chunk.try_create_biome_texture(&coordinator));
    assert!(!chunk.has_biome_texture());
    assert!(chunk.surface().texture().is_none());
    assert_eq!(coordinator.ground_color_calls.get(), 0);

    coordinator.ready = true;
    assert!(chunk.try_create_biome_texture(&coordinator));
    assert!(chunk.has_biome_texture());
    let bound = chunk.surface().texture().unwrap();
    assert!(Arc::ptr_eq(bound, chunk.biome_texture().unwrap()));
    assert_eq!(bound.get_pixel(1, 1), coordinator.ground_color);

    assert!(!chunk.try_create_biome_texture(&coordinator));
    assert_eq!(coordinator.ground_color_calls.get(), 1);
}

#[test]
fn test_mismatched_ground_colors_leave_texture_pending() {
    let mut coordinator = RecordingCoordinator::new();
    coordinator.ground_color_size = Some((3, 4));
    let mut chunk = chunk_at(&mut coordinator, COORD);

    assert!(!chunk.try_create_biome_texture(&coordinator));
    assert!(!chunk.has_biome_texture());

    coordinator.ground_color_size = None;
    assert!(chunk.try_create_biome_texture(&coordinator));
}

#[test]
fn test_biome_draw_before_texture_keeps_binding() {
    let mut coordinator = RecordingCoordinator::new();
    coordinator.ready = false;
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    assert!(chunk.surface().texture().is_none());

    chunk.on_draw_map(DrawMode::Height, &coordinator);
    let height_view = Arc::clone(chunk.surface().texture().unwrap());

    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    assert!(Arc::ptr_eq(chunk.surface().texture().unwrap(), &height_view));
    assert_eq!(chunk.surface().displayed(), DrawMode::Height);
}

#[test]
fn test_biome_draw_after_set_terrain_binds_texture() {
    let mut coordinator = RecordingCoordinator::new();
    coordinator.ready = false;
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_terrain(&Grid::filled(4, 4, Rgba::RED)).unwrap();
    assert!(chunk.has_biome_texture());
    assert!(chunk.surface().texture().is_none(), "set_terrain does not bind");

    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    let bound = chunk.surface().texture().unwrap();
    assert!(Arc::ptr_eq(bound, chunk.biome_texture().unwrap()));
    assert_eq!(bound.get_pixel(0, 0), Rgba::RED);
    assert_eq!(coordinator.ground_color_calls.get(), 0);
}

#[test]
fn test_set_terrain_validates_and_builds_once() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    assert_eq!(
        chunk.set_terrain(&Grid::filled(2, 4, Rgba::RED)),
        Err(ChunkError::GroundColorMismatch {
            expected: (4, 4),
            actual: (2, 4),
        })
    );
    assert!(!chunk.has_biome_texture());

    chunk.set_terrain(&Grid::filled(4, 4, Rgba::RED)).unwrap();
    assert_eq!(
        chunk.set_terrain(&Grid::filled(4, 4, Rgba::BLUE)),
        Err(ChunkError::AlreadyBuilt(Artifact::BiomeTexture))
    );
    assert_eq!(chunk.biome_texture().unwrap().get_pixel(0, 0), Rgba::RED);
}

#[test]
fn test_biome_draw_creates_texture_lazily() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    assert!(chunk.has_biome_texture());
    assert_eq!(chunk.surface().displayed(), DrawMode::Biome);

    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    assert_eq!(coordinator.ground_color_calls.get(), 1);
}

#[test]
fn test_field_views_are_rebuilt_each_draw() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.on_draw_map(DrawMode::Temperature, &coordinator);
    let first = Arc::clone(chunk.surface().texture().unwrap());
    chunk.on_draw_map(DrawMode::Temperature, &coordinator);
    let second = chunk.surface().texture().unwrap();

    assert!(!Arc::ptr_eq(&first, second));
    assert_eq!(*first, **second);
    assert_eq!(chunk.surface().displayed(), DrawMode::Temperature);
}

#[test]
fn test_field_view_gradients() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.on_draw_map(DrawMode::Height, &coordinator);
    let height = chunk.surface().texture().unwrap();
    assert_eq!(height.get_pixel(0, 0), Rgba::BLACK);
    assert_eq!(height.get_pixel(3, 0), Rgba::WHITE);

    chunk.on_draw_map(DrawMode::Temperature, &coordinator);
    let temperature = chunk.surface().texture().unwrap();
    assert_eq!(temperature.get_pixel(0, 0), Rgba::BLUE.lerp(Rgba::RED, 0.25));

    chunk.on_draw_map(DrawMode::Humidity, &coordinator);
    let humidity = chunk.surface().texture().unwrap();
    assert_eq!(humidity.get_pixel(0, 0), Rgba::WHITE.lerp(Rgba::BLUE, 0.75));
}

#[test]
fn test_texture_built_under_field_view_is_not_bound() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.on_draw_map(DrawMode::Humidity, &coordinator);
    assert!(chunk.try_create_biome_texture(&coordinator));

    assert_eq!(chunk.surface().displayed(), DrawMode::Humidity);
    assert!(!Arc::ptr_eq(
        chunk.surface().texture().unwrap(),
        chunk.biome_texture().unwrap()
    ));

    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    assert!(Arc::ptr_eq(
        chunk.surface().texture().unwrap(),
        chunk.biome_texture().unwrap()
    ));
}

#[test]
fn test_visible_set_change_retries_pending_texture() {
    let mut coordinator = RecordingCoordinator::new();
    coordinator.ready = false;
    let mut chunk = chunk_at(&mut coordinator, COORD);

    assert!(!chunk.on_visible_set_changed(&coordinator));
    assert!(!chunk.has_biome_texture());

    coordinator.ready = true;
    assert!(chunk.on_visible_set_changed(&coordinator));
    assert!(!chunk.on_visible_set_changed(&coordinator));
    assert_eq!(coordinator.ground_color_calls.get(), 1);
}

#[test]
fn test_deferred_biome_draw_binds_when_gate_opens() {
    let mut coordinator = RecordingCoordinator::new();
    coordinator.ready = false;
    let mut chunk = chunk_at(&mut coordinator, COORD);
    let mut events = GridEvents::new();
    chunk.set_active(true, &mut events);

    chunk.on_draw_map(DrawMode::Height, &coordinator);
    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    assert_eq!(chunk.surface().displayed(), DrawMode::Height);
    assert_eq!(chunk.surface().requested(), DrawMode::Biome);

    coordinator.ready = true;
    assert!(chunk.on_visible_set_changed(&coordinator));
    assert_eq!(chunk.surface().displayed(), DrawMode::Biome);
    assert!(Arc::ptr_eq(
        chunk.surface().texture().unwrap(),
        chunk.biome_texture().unwrap()
    ));
    chunk.release(&mut events);
}

#[test]
fn test_later_field_draw_cancels_deferred_biome() {
    let mut coordinator = RecordingCoordinator::new();
    coordinator.ready = false;
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    chunk.on_draw_map(DrawMode::Temperature, &coordinator);

    coordinator.ready = true;
    assert!(chunk.on_visible_set_changed(&coordinator));
    assert_eq!(chunk.surface().displayed(), DrawMode::Temperature);
    assert!(!Arc::ptr_eq(
        chunk.surface().texture().unwrap(),
        chunk.biome_texture().unwrap()
    ));
}

// ---------------------------------------------------------------------------
// Vegetation
// ---------------------------------------------------------------------------

#[test]
fn test_showing_vegetation_generates_once() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_vegetation_active(true, &mut coordinator);
    assert_eq!(coordinator.vegetation_requests, vec![COORD]);
    assert!(chunk.has_vegetation());
    assert!(chunk.props_visible());

    chunk.set_vegetation_active(false, &mut coordinator);
    assert!(!chunk.props_visible());
    assert_eq!(chunk.vegetation().unwrap().len(), 2, "hiding keeps props");

    chunk.set_vegetation_active(true, &mut coordinator);
    assert_eq!(coordinator.vegetation_requests.len(), 1);
}

#[test]
fn test_hiding_hidden_vegetation_is_a_no_op() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_vegetation_active(false, &mut coordinator);
    assert!(coordinator.vegetation_requests.is_empty());
    assert!(!chunk.has_vegetation());
}

#[test]
fn test_preset_vegetation_skips_generation() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_vegetation(vec![placement(3, 3)]).unwrap();
    chunk.set_vegetation_active(true, &mut coordinator);

    assert!(coordinator.vegetation_requests.is_empty());
    assert_eq!(chunk.vegetation(), Some(&[placement(3, 3)][..]));
}

#[test]
fn test_second_vegetation_rejected() {
    let mut coordinator = RecordingCoordinator::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_vegetation(vec![placement(0, 0)]).unwrap();
    assert_eq!(
        chunk.set_vegetation(vec![placement(1, 1), placement(2, 2)]),
        Err(ChunkError::AlreadyBuilt(Artifact::Vegetation))
    );
    assert_eq!(chunk.vegetation().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Monotonic flags
// ---------------------------------------------------------------------------

#[test]
fn test_has_flags_never_reset() {
    let mut coordinator = RecordingCoordinator::new();
    let mut events = GridEvents::new();
    let mut chunk = chunk_at(&mut coordinator, COORD);

    chunk.set_active(true, &mut events);
    chunk.on_draw_map(DrawMode::Biome, &coordinator);
    chunk.set_vegetation_active(true, &mut coordinator);
    chunk.set_water_layer(TerrainMesh::flat(4, 1.0)).unwrap();

    for round in 0..3 {
        chunk.set_active(round % 2 == 0, &mut events);
        chunk.set_vegetation_active(round % 2 == 1, &mut coordinator);
        chunk.on_draw_map(DrawMode::ALL[round % 4], &coordinator);
        let _ = chunk.set_terrain(&Grid::filled(4, 4, Rgba::WHITE));
        let _ = chunk.set_vegetation(Vec::new());
        let _ = chunk.set_water_layer(TerrainMesh::flat(1, 1.0));
        chunk.tick(&mut coordinator);

        assert!(chunk.has_biome_texture());
        assert!(chunk.has_vegetation());
        assert!(chunk.has_water_layer());
    }
    assert_eq!(coordinator.ground_color_calls.get(), 1);
    assert_eq!(coordinator.vegetation_requests.len(), 1);
    chunk.release(&mut events);
}
