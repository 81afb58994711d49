//! Headless walkthrough of the decal lifecycle against the built-in test
//! scene: place a decal on the cube, move it, then print the list a cart
//! consumer would receive.
//!
//! Run with RUST_LOG=debug for the full degradation/placement trace.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use emblem::prelude::*;
use glam::{Vec2, Vec3};

fn tiny_png() -> Vec<u8> {
    let mut bytes = Vec::new();
    let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([220, 40, 40, 255]));
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encode");
    bytes
}

fn main() {
    env_logger::init();

    let source = MemoryTextureSource::new();
    source.insert("memory://logo.png", tiny_png());
    let mut engine = DecalEngine::with_source(Arc::new(source));

    let model = test_scene();
    let mut camera = Camera::new_perspective(50f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
    camera.position = Vec3::new(0.0, 0.0, 3.0);
    camera.look_at(Vec3::ZERO, Vec3::Y);

    println!("model '{}' with {} submeshes", model.name, model.submesh_count());

    // double-click with nothing selected: the guard answers with guidance
    engine.double_click(Vec2::ZERO, &camera, &model);
    for notice in engine.drain_notices() {
        println!("notice: {notice}");
    }

    // arm an image and place it on the cube's front face
    engine.select_image(TextureRef::new("memory://logo.png"));
    let outcome = engine.double_click(Vec2::ZERO, &camera, &model);
    println!("placement: {outcome:?}");

    let PlacementOutcome::Placed(id) = outcome else {
        eprintln!("placement failed unexpectedly");
        return;
    };

    // run frames until the texture resolves
    loop {
        let report = engine.frame_tick();
        if report.textures_ready + report.textures_failed > 0 {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    let decal = engine.registry().find(id).expect("decal exists");
    println!(
        "decal {id}: anchor {:?}, normal {:?}, fidelity {:?}, texture ready: {}",
        decal.anchor,
        decal.normal,
        decal.patch.fidelity,
        decal.texture_ready()
    );

    // move it: select, then double-click the new spot
    engine.select_decal(id);
    let outcome = engine.double_click(Vec2::new(0.15, 0.1), &camera, &model);
    println!("move: {outcome:?}");
    let decal = engine.registry().find(id).expect("decal exists");
    println!("decal {id} now anchored at {:?}", decal.anchor);

    engine.frame_tick();

    // hand the decal list to the commerce layer
    for placed in engine.export() {
        println!(
            "cart line: decal {} from {} at {:?}",
            placed.id, placed.texture_url, placed.anchor
        );
    }
}
