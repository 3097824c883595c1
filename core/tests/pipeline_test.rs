use std::io::Cursor;

use heightmap::recording::{Call, CountingScheduler, RecordingBackend};
use heightmap::{
    DecodeError, InputEvent, PointerButton, ProjectionMode, SurfaceSize, Viewport, ViewerConfig,
    initialize_session, load_terrain,
};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

// 7 wide, 4 tall; left column black, right column white
fn encoded_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(7, 4, |x, _| {
        let v = (x * 255 / 6) as u8;
        Rgba([v, v, v, 255])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

#[test]
fn test_image_to_draw_call() {
    // Decode and build the terrain off the "UI thread"
    let terrain = load_terrain(&encoded_png()).expect("load");
    let hf = &terrain.heightfield;
    assert_eq!((hf.width(), hf.height()), (7, 4));
    assert_eq!(hf.get(0, 2), 0.0);
    assert!((hf.get(6, 2) - 1.0).abs() < 1e-6);
    assert_eq!(terrain.mesh.triangle_count(), 2 * 6 * 3);

    // Bring up a session on the headless backend
    let backend = RecordingBackend::new();
    let handle = initialize_session(&backend, SurfaceSize::new(800.0, 600.0), ViewerConfig::default())
        .expect("init");
    let (mut session, mut renderer) = (handle.session, handle.renderer);

    // No image yet: the placeholder box is drawn
    let viewport = Viewport {
        x: 0,
        y: 0,
        width: 800,
        height: 600,
    };
    let scheduler = CountingScheduler::default();
    let frame = session.render_frame(&scheduler);
    renderer.draw(&backend, &frame, viewport);
    assert_eq!(backend.draw_calls(), vec![36]);
    assert!(session.terrain().is_none());

    // Install, interact, draw
    let vertices = terrain.mesh.vertex_count();
    session
        .install_terrain(&backend, &mut renderer, terrain)
        .expect("install");
    session.handle(InputEvent::PointerDown {
        x: 100.0,
        y: 100.0,
        button: PointerButton::Primary,
    });
    session.handle(InputEvent::PointerMove { x: 150.0, y: 80.0 });
    session.handle(InputEvent::PointerUp);
    session.handle(InputEvent::Projection(ProjectionMode::Orthographic));

    backend.clear_calls();
    let frame = session.render_frame(&scheduler);
    renderer.draw(&backend, &frame, viewport);
    assert_eq!(backend.draw_calls(), vec![vertices]);
    assert_eq!(scheduler.requests(), 2);

    let calls = backend.calls();
    assert_eq!(calls.first(), Some(&Call::BeginFrame(viewport)));
    assert_eq!(calls.last(), Some(&Call::EndFrame));
    assert!(calls.contains(&Call::SetUniform {
        name: "projection".into(),
        matrix: session.projection_matrix(),
    }));

    // Teardown frees every GPU handle
    renderer.destroy(&backend);
    assert_eq!(backend.live_handles(), 0);
}

#[test]
fn test_corrupt_bytes_leave_previous_terrain() {
    let backend = RecordingBackend::new();
    let handle = initialize_session(&backend, SurfaceSize::new(320.0, 240.0), ViewerConfig::default())
        .expect("init");
    let (mut session, mut renderer) = (handle.session, handle.renderer);

    let good = load_terrain(&encoded_png()).expect("load");
    session
        .install_terrain(&backend, &mut renderer, good.clone())
        .expect("install");

    // Truncated PNG: the decode fails before anything touches the session
    let mut bytes = encoded_png();
    bytes.truncate(20);
    let err = load_terrain(&bytes).unwrap_err();
    assert!(matches!(err, DecodeError::Image(_)));

    assert_eq!(session.terrain(), Some(&good));
    assert_eq!(renderer.vertex_count(), good.mesh.vertex_count());
}
