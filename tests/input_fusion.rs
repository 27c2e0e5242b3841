// Mouse, touch and wheel gestures driving the camera.

use glam::Vec2;
use pano_sphere::input::Gesture;
use pano_sphere::panorama::PanoramaViewer;

#[test]
fn wheel_zoom_out_saturates_at_max() {
    let mut viewer = PanoramaViewer::default();
    for i in 1..=18 {
        viewer.input.wheel(&mut viewer.camera, 1.0);
        if i <= 6 {
            assert_eq!(viewer.camera.fov, 90.0 + 5.0 * i as f32);
        } else {
            assert_eq!(viewer.camera.fov, 120.0);
        }
    }
}

#[test]
fn wheel_zoom_in_saturates_at_min() {
    let mut viewer = PanoramaViewer::default();
    for _ in 0..40 {
        viewer.input.wheel(&mut viewer.camera, -3.0);
        assert!(viewer.camera.fov >= 30.0);
    }
    assert_eq!(viewer.camera.fov, 30.0);
}

#[test]
fn drag_sets_velocity_and_moves_immediately() {
    let mut viewer = PanoramaViewer::default();
    viewer.input.pointer_down(&mut viewer.camera, Vec2::new(300.0, 200.0));
    viewer.input.pointer_move(&mut viewer.camera, Vec2::new(200.0, 200.0));

    assert!((viewer.camera.velocity.x - 0.4).abs() < 1e-6);
    assert!((viewer.camera.orientation.yaw - 0.4).abs() < 1e-6);

    viewer.input.pointer_up();
    viewer.tick(1.0);
    assert!((viewer.camera.orientation.yaw - 0.8).abs() < 1e-6);
    assert!((viewer.camera.velocity.x - 0.38).abs() < 1e-6);
}

#[test]
fn new_drag_cancels_previous_momentum() {
    let mut viewer = PanoramaViewer::default();
    viewer.input.pointer_down(&mut viewer.camera, Vec2::ZERO);
    viewer.input.pointer_move(&mut viewer.camera, Vec2::new(50.0, 0.0));
    viewer.input.pointer_up();
    assert!(!viewer.camera.velocity.is_zero());

    viewer.input.pointer_down(&mut viewer.camera, Vec2::new(50.0, 0.0));
    assert!(viewer.camera.velocity.is_zero());
}

#[test]
fn pinch_closing_widens_view() {
    let mut viewer = PanoramaViewer::default();
    let a = Vec2::new(100.0, 300.0);
    viewer
        .input
        .touch_start(&mut viewer.camera, &[a, a + Vec2::new(200.0, 0.0)]);
    viewer
        .input
        .touch_move(&mut viewer.camera, &[a, a + Vec2::new(150.0, 0.0)]);
    assert!((viewer.camera.fov - 105.0).abs() < 1e-4);

    viewer
        .input
        .touch_move(&mut viewer.camera, &[a, a + Vec2::new(50.0, 0.0)]);
    assert_eq!(viewer.camera.fov, 120.0);
}

#[test]
fn pinch_and_drag_are_exclusive() {
    let mut viewer = PanoramaViewer::default();
    let p = Vec2::new(10.0, 10.0);
    viewer.input.touch_start(&mut viewer.camera, &[p]);
    assert!(viewer.input.is_dragging());

    viewer
        .input
        .touch_start(&mut viewer.camera, &[p, Vec2::new(110.0, 10.0)]);
    assert!(!viewer.input.is_dragging());
    assert!(viewer.input.is_pinching());

    // leaving the pinch drops its baseline before anything else can start
    viewer.input.touch_end(&[p]);
    assert_eq!(viewer.input.gesture(), Gesture::Idle);

    viewer
        .input
        .touch_start(&mut viewer.camera, &[p, Vec2::new(60.0, 10.0)]);
    assert_eq!(
        viewer.input.gesture(),
        Gesture::Pinching { last_distance: 50.0 }
    );
}

#[test]
fn lifting_last_finger_keeps_momentum() {
    let mut viewer = PanoramaViewer::default();
    viewer.input.touch_start(&mut viewer.camera, &[Vec2::ZERO]);
    viewer
        .input
        .touch_move(&mut viewer.camera, &[Vec2::new(-20.0, 0.0)]);
    viewer.input.touch_end(&[]);

    assert_eq!(viewer.input.gesture(), Gesture::Idle);
    let v = viewer.camera.velocity.x;
    assert!(v > 0.0);
    viewer.tick(1.0);
    assert!((viewer.camera.velocity.x - v * 0.95).abs() < 1e-6);
}

#[test]
fn mouse_release_does_not_end_touch_drag() {
    let mut viewer = PanoramaViewer::default();
    viewer.input.touch_start(&mut viewer.camera, &[Vec2::ZERO]);
    viewer.input.pointer_up();
    assert!(viewer.input.is_dragging());
}
