// input.rs — mouse, touch and wheel events fused into velocity impulses and FOV edits

use crate::camera::CameraState;
use glam::Vec2;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputParams {
    /// Radians per pixel of mouse drag at 90° FOV.
    pub mouse_sensitivity: f32,
    /// Radians per pixel of one-finger drag at 90° FOV.
    pub touch_sensitivity: f32,
    /// Degrees of FOV per pixel of pinch distance change.
    pub pinch_sensitivity: f32,
    /// Degrees of FOV per wheel event.
    pub wheel_step: f32,
}

impl Default for InputParams {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.004,
            touch_sensitivity: 0.006,
            pinch_sensitivity: 0.3,
            wheel_step: 5.0,
        }
    }
}

impl InputParams {
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            self.mouse_sensitivity,
            self.touch_sensitivity,
            self.pinch_sensitivity,
            self.wheel_step,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(format!("input values must be finite and non-negative: {:?}", self));
        }
        Ok(())
    }
}

/// Which gesture currently owns the camera.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging { last: Vec2 },
    Pinching { last_distance: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone)]
pub struct InputFusion {
    gesture: Gesture,
    source: DragSource,
    params: InputParams,
}

impl Default for InputFusion {
    fn default() -> Self {
        Self::new(InputParams::default())
    }
}

impl InputFusion {
    pub fn new(params: InputParams) -> Self {
        Self {
            gesture: Gesture::Idle,
            source: DragSource::Mouse,
            params,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_pinching(&self) -> bool {
        matches!(self.gesture, Gesture::Pinching { .. })
    }

    /// Drops whatever gesture is active. Velocity is left to decay.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
    }

    // ---------------- Mouse ----------------

    pub fn pointer_down(&mut self, camera: &mut CameraState, pos: Vec2) {
        self.begin_drag(camera, pos, DragSource::Mouse);
    }

    pub fn pointer_move(&mut self, camera: &mut CameraState, pos: Vec2) {
        if self.source == DragSource::Mouse {
            self.drag_to(camera, pos);
        }
    }

    pub fn pointer_up(&mut self) {
        if self.is_dragging() && self.source == DragSource::Mouse {
            self.gesture = Gesture::Idle;
        }
    }

    // ---------------- Touch ----------------

    /// `points` are all fingers currently down, including the new one.
    pub fn touch_start(&mut self, camera: &mut CameraState, points: &[Vec2]) {
        match points {
            [] => self.gesture = Gesture::Idle,
            [p] => self.begin_drag(camera, *p, DragSource::Touch),
            [a, b, ..] => {
                self.gesture = Gesture::Pinching {
                    last_distance: a.distance(*b),
                };
            }
        }
    }

    pub fn touch_move(&mut self, camera: &mut CameraState, points: &[Vec2]) {
        match (self.gesture, points) {
            (Gesture::Dragging { .. }, [p]) if self.source == DragSource::Touch => {
                self.drag_to(camera, *p);
            }
            (Gesture::Pinching { last_distance }, [a, b, ..]) => {
                let distance = a.distance(*b);
                camera.zoom_by((last_distance - distance) * self.params.pinch_sensitivity);
                self.gesture = Gesture::Pinching {
                    last_distance: distance,
                };
            }
            _ => {}
        }
    }

    /// `remaining` are the fingers still down after the lift.
    pub fn touch_end(&mut self, remaining: &[Vec2]) {
        match (self.gesture, remaining) {
            (Gesture::Pinching { .. }, [a, b, ..]) => {
                // A third finger lifted: re-baseline on the pair that is left.
                self.gesture = Gesture::Pinching {
                    last_distance: a.distance(*b),
                };
            }
            (Gesture::Pinching { .. }, _) => self.gesture = Gesture::Idle,
            (Gesture::Dragging { .. }, []) if self.source == DragSource::Touch => {
                self.gesture = Gesture::Idle;
            }
            _ => {}
        }
    }

    // ---------------- Wheel ----------------

    /// Positive `delta` scrolls away from the user and widens the view.
    pub fn wheel(&mut self, camera: &mut CameraState, delta: f32) {
        if self.is_pinching() || delta == 0.0 || !delta.is_finite() {
            return;
        }
        camera.zoom_by(self.params.wheel_step * delta.signum());
    }

    fn begin_drag(&mut self, camera: &mut CameraState, pos: Vec2, source: DragSource) {
        camera.velocity.x = 0.0;
        camera.velocity.y = 0.0;
        self.source = source;
        self.gesture = Gesture::Dragging { last: pos };
    }

    fn drag_to(&mut self, camera: &mut CameraState, pos: Vec2) {
        let Gesture::Dragging { last } = self.gesture else {
            return;
        };
        let k = match self.source {
            DragSource::Mouse => self.params.mouse_sensitivity,
            DragSource::Touch => self.params.touch_sensitivity,
        };
        let sensitivity = (camera.fov / 90.0) * k;
        let d = pos - last;

        camera.velocity.x = -d.x * sensitivity;
        camera.velocity.y = d.y * sensitivity;
        camera.nudge(camera.velocity.x, camera.velocity.y);

        self.gesture = Gesture::Dragging { last: pos };
    }
}

/// Active touch points keyed by platform finger id, in id order.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    points: BTreeMap<u64, Vec2>,
}

impl TouchTracker {
    pub fn begin(&mut self, id: u64, pos: Vec2) {
        self.points.insert(id, pos);
    }

    pub fn update(&mut self, id: u64, pos: Vec2) {
        if let Some(p) = self.points.get_mut(&id) {
            *p = pos;
        }
    }

    pub fn end(&mut self, id: u64) {
        self.points.remove(&id);
    }

    pub fn points(&self) -> Vec<Vec2> {
        self.points.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
