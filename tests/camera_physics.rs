// Per-frame camera integration: momentum, auto-rotate, pole clamp, reset.

use pano_sphere::camera::{CameraState, CameraVelocity};
use pano_sphere::panorama::PanoramaViewer;
use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

#[test]
fn pitch_never_passes_pole_margin() {
    let mut cam = CameraState::default();
    let limit = FRAC_PI_2 - 0.1;

    cam.velocity = CameraVelocity { x: 0.0, y: 5.0 };
    for _ in 0..500 {
        cam.step(false, false);
        assert!(cam.orientation.pitch <= limit);
        assert!(cam.orientation.pitch < FRAC_PI_2);
    }

    cam.velocity = CameraVelocity { x: 0.0, y: -5.0 };
    for _ in 0..500 {
        cam.step(false, true);
        assert!(cam.orientation.pitch >= -limit);
    }
}

#[test]
fn sustained_drag_cannot_reach_pole() {
    let mut viewer = PanoramaViewer::default();
    viewer.input.pointer_down(&mut viewer.camera, Vec2::ZERO);
    let mut y = 0.0;
    for _ in 0..200 {
        y += 400.0;
        viewer.input.pointer_move(&mut viewer.camera, Vec2::new(0.0, y));
        viewer.tick(1.0);
        assert!(viewer.camera.orientation.pitch.abs() <= viewer.camera.pitch_limit());
    }
}

#[test]
fn momentum_decays_geometrically_then_stops() {
    let mut cam = CameraState::default();
    let v0 = 0.5f32;
    cam.velocity.x = v0;

    for n in 1..=20 {
        cam.step(false, false);
        let expected = v0 * 0.95f32.powi(n);
        assert!((cam.velocity.x - expected).abs() < 1e-5, "tick {n}");
    }

    for _ in 0..1000 {
        cam.step(false, false);
    }
    assert_eq!(cam.velocity.x, 0.0);
}

#[test]
fn velocity_reaches_exact_zero_below_epsilon() {
    let mut cam = CameraState::default();
    cam.velocity.x = 1.04e-4;
    cam.step(false, false);
    // 1.04e-4 * 0.95 < 1e-4
    assert_eq!(cam.velocity.x, 0.0);
}

#[test]
fn dragging_blocks_momentum_and_auto_rotate() {
    let mut viewer = PanoramaViewer::default();
    viewer.auto_rotate = true;
    viewer.input.pointer_down(&mut viewer.camera, Vec2::ZERO);
    viewer.input.pointer_move(&mut viewer.camera, Vec2::new(-10.0, 0.0));

    let before = viewer.camera.orientation;
    for _ in 0..30 {
        viewer.tick(1.0);
        assert_eq!(viewer.camera.orientation, before);
    }
}

#[test]
fn auto_rotate_hundred_ticks() {
    let mut viewer = PanoramaViewer::default();
    viewer.auto_rotate = true;
    for _ in 0..100 {
        viewer.tick(1.0);
    }
    assert!((viewer.camera.orientation.yaw - 0.3).abs() < 1e-4);
}

#[test]
fn reset_from_any_state_restores_defaults() {
    let mut viewer = PanoramaViewer::default();
    viewer.auto_rotate = true;
    viewer.input.pointer_down(&mut viewer.camera, Vec2::ZERO);
    viewer.input.pointer_move(&mut viewer.camera, Vec2::new(-80.0, 35.0));
    viewer.input.wheel(&mut viewer.camera, 1.0);
    for _ in 0..5 {
        viewer.tick(1.0);
    }

    viewer.reset_view();
    let cam = &viewer.camera;
    assert_eq!((cam.orientation.yaw, cam.orientation.pitch), (0.0, 0.0));
    assert_eq!(cam.fov, 90.0);
    assert!(cam.velocity.is_zero());

    viewer.reset_view();
    assert_eq!(viewer.camera.fov, 90.0);
    assert!(viewer.camera.velocity.is_zero());
}

#[test]
fn elapsed_time_stepping_preserves_speed_at_120hz() {
    let config = pano_sphere::ViewerConfig {
        frame_rate_independent: true,
        auto_rotate: true,
        ..Default::default()
    };
    let mut viewer = PanoramaViewer::new(&config);
    for _ in 0..200 {
        viewer.tick(0.5);
    }
    assert!((viewer.camera.orientation.yaw - 0.3).abs() < 1e-4);
}
