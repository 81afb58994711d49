//! End-to-end interaction flow against the built-in test scene: place a
//! decal, move it, exercise the idle guard, remove it, and survive a texture
//! load failure with a placeholder.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use emblem_core::{Camera, TextureRef};
use emblem_engine::{
    test_scene, DecalEngine, InteractionMode, MemoryTextureSource, PlacementOutcome,
};
use emblem_geometry::overlay::PlaceholderStatus;
use glam::{Vec2, Vec3};

fn tiny_png() -> Vec<u8> {
    let mut bytes = Vec::new();
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 128, 255, 255]));
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

fn front_camera() -> Camera {
    let mut camera = Camera::new_perspective(50f32.to_radians(), 1.0, 0.1, 1000.0);
    camera.position = Vec3::new(0.0, 0.0, 3.0);
    camera.look_at(Vec3::ZERO, Vec3::Y);
    camera
}

fn settle_textures(engine: &mut DecalEngine) -> (usize, usize) {
    let mut ready = 0;
    let mut failed = 0;
    for _ in 0..200 {
        let report = engine.frame_tick();
        ready += report.textures_ready;
        failed += report.textures_failed;
        if ready + failed > 0 {
            return (ready, failed);
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("texture load never settled");
}

#[test]
fn place_move_guard_remove_and_placeholder() {
    let source = MemoryTextureSource::new();
    source.insert("memory://logo-a.png", tiny_png());
    let mut engine = DecalEngine::with_source(Arc::new(source));

    let model = test_scene();
    let camera = front_camera();

    // select image A, double-click the cube's front face
    engine.select_image(TextureRef::new("memory://logo-a.png"));
    let outcome = engine.double_click(Vec2::ZERO, &camera, &model);
    let PlacementOutcome::Placed(id) = outcome else {
        panic!("expected placement, got {outcome:?}");
    };

    assert_eq!(engine.registry().len(), 1);
    assert_eq!(engine.mode(), &InteractionMode::Idle);
    {
        let decal = engine.registry().find(id).unwrap();
        assert!((decal.normal - Vec3::Z).length() < 1e-3);
        assert!((decal.anchor.z - 0.5).abs() < 1e-2);
        assert!((decal.patch.transform.position - decal.anchor).length() < 1e-6);
    }

    // texture resolves; placeholder goes away
    let (ready, failed) = settle_textures(&mut engine);
    assert_eq!((ready, failed), (1, 0));
    assert!(engine.registry().find(id).unwrap().placeholder().is_none());

    // select the decal and move it: same id, same count, new anchor
    assert!(engine.select_decal(id));
    let p1 = engine.registry().find(id).unwrap().anchor;
    let outcome = engine.double_click(Vec2::new(0.2, 0.1), &camera, &model);
    assert_eq!(outcome, PlacementOutcome::Moved(id));
    assert_eq!(engine.registry().len(), 1);
    assert_eq!(engine.mode(), &InteractionMode::Idle);

    let p2 = engine.registry().find(id).unwrap().anchor;
    assert!((p2 - p1).length() > 0.05, "anchor did not move: {p1} -> {p2}");
    assert!((engine.registry().find(id).unwrap().normal - Vec3::Z).length() < 1e-3);

    // idle double-click: guidance notice, nothing changes, no panic
    let outcome = engine.double_click(Vec2::ZERO, &camera, &model);
    assert_eq!(outcome, PlacementOutcome::NothingSelected);
    assert_eq!(engine.registry().len(), 1);
    let notices = engine.drain_notices();
    assert!(!notices.is_empty());

    // remove the decal
    assert!(engine.remove(id));
    assert_eq!(engine.registry().len(), 0);

    // image B is not resolvable: placement still succeeds, marker stays
    engine.select_image(TextureRef::new("memory://logo-b.png"));
    let PlacementOutcome::Placed(orphan) = engine.double_click(Vec2::ZERO, &camera, &model) else {
        panic!("placement with a failing texture must still succeed");
    };
    let (ready, failed) = settle_textures(&mut engine);
    assert_eq!((ready, failed), (0, 1));
    assert_eq!(
        engine.registry().find(orphan).unwrap().placeholder(),
        Some(PlaceholderStatus::Failed)
    );
    assert!(engine
        .drain_notices()
        .iter()
        .any(|n| n.contains("could not be loaded")));
}

#[test]
fn pick_miss_keeps_armed_state() {
    let source = MemoryTextureSource::new();
    source.insert("memory://logo-a.png", tiny_png());
    let mut engine = DecalEngine::with_source(Arc::new(source));

    let model = test_scene();
    let camera = front_camera();

    engine.select_image(TextureRef::new("memory://logo-a.png"));
    // top-left corner of the viewport: empty space
    let outcome = engine.double_click(Vec2::new(-0.98, 0.98), &camera, &model);
    assert_eq!(outcome, PlacementOutcome::Miss);
    assert!(matches!(engine.mode(), InteractionMode::ImageSelected(_)));
    assert_eq!(engine.registry().len(), 0);

    // a later valid click still places
    let outcome = engine.double_click(Vec2::ZERO, &camera, &model);
    assert!(matches!(outcome, PlacementOutcome::Placed(_)));
}

#[test]
fn export_round_trips_through_json() {
    let source = MemoryTextureSource::new();
    source.insert("memory://logo-a.png", tiny_png());
    let mut engine = DecalEngine::with_source(Arc::new(source));

    let model = test_scene();
    let camera = front_camera();

    engine.select_image(TextureRef::new("memory://logo-a.png"));
    engine.double_click(Vec2::ZERO, &camera, &model);

    let exported = engine.export();
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0].texture_url, "memory://logo-a.png");

    let json = serde_json::to_string(&exported).unwrap();
    let back: Vec<emblem_engine::PlacedDecal> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, exported);
}

#[test]
fn clear_cancels_inflight_loads_and_empties_registry() {
    // source with no entries: loads would eventually fail, but clear()
    // cancels them first
    let mut engine = DecalEngine::with_source(Arc::new(MemoryTextureSource::new()));
    let model = test_scene();
    let camera = front_camera();

    engine.select_image(TextureRef::new("memory://gone.png"));
    engine.double_click(Vec2::ZERO, &camera, &model);
    assert_eq!(engine.registry().len(), 1);

    engine.clear();
    assert!(engine.registry().is_empty());
    assert_eq!(engine.mode(), &InteractionMode::Idle);
}
