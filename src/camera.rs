// camera.rs — orientation, angular velocity and field of view, advanced once per frame

use serde::Deserialize;
use std::f32::consts::FRAC_PI_2;

/// Tuning for the per-frame integrator. Steps are calibrated for a ~60 Hz cadence.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Velocity multiplier applied each frame once the drag is released.
    pub damping: f32,
    /// Velocities below this magnitude snap to zero.
    pub stop_epsilon: f32,
    /// Yaw added per frame while auto-rotate is on (radians).
    pub auto_rotate_step: f32,
    /// Distance kept from the poles (radians).
    pub pitch_margin: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            damping: 0.95,
            stop_epsilon: 1e-4,
            auto_rotate_step: 0.003,
            pitch_margin: 0.1,
        }
    }
}

/// Field-of-view range and reset value, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FovLimits {
    pub default: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for FovLimits {
    fn default() -> Self {
        Self {
            default: 90.0,
            min: 30.0,
            max: 120.0,
        }
    }
}

impl PhysicsParams {
    /// Rejects tunings the integrator cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        let finite = [
            self.damping,
            self.stop_epsilon,
            self.auto_rotate_step,
            self.pitch_margin,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err("physics values must be finite".into());
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(format!("physics.damping {} must be in [0, 1)", self.damping));
        }
        if self.stop_epsilon < 0.0 {
            return Err(format!(
                "physics.stop_epsilon {} must not be negative",
                self.stop_epsilon
            ));
        }
        if !(self.pitch_margin > 0.0 && self.pitch_margin < FRAC_PI_2) {
            return Err(format!(
                "physics.pitch_margin {} must be in (0, pi/2)",
                self.pitch_margin
            ));
        }
        Ok(())
    }
}

impl FovLimits {
    /// Never panics, even on limits that fail [`validate`](Self::validate).
    pub fn clamp(&self, fov: f32) -> f32 {
        fov.max(self.min).min(self.max)
    }

    /// Requires `0 < min <= default <= max < 180`.
    pub fn validate(&self) -> Result<(), String> {
        if ![self.default, self.min, self.max].iter().all(|v| v.is_finite()) {
            return Err("fov values must be finite".into());
        }
        if !(self.min > 0.0 && self.min <= self.default && self.default <= self.max && self.max < 180.0) {
            return Err(format!(
                "fov needs 0 < min <= default <= max < 180, got min {} default {} max {}",
                self.min, self.default, self.max
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraOrientation {
    /// Radians, unbounded; trig makes it periodic.
    pub yaw: f32,
    /// Radians, kept inside the pole margin.
    pub pitch: f32,
}

/// Per-frame yaw/pitch increments.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraVelocity {
    pub x: f32,
    pub y: f32,
}

impl CameraVelocity {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    pub orientation: CameraOrientation,
    pub velocity: CameraVelocity,
    /// Degrees.
    pub fov: f32,
    physics: PhysicsParams,
    limits: FovLimits,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(PhysicsParams::default(), FovLimits::default())
    }
}

impl CameraState {
    pub fn new(physics: PhysicsParams, limits: FovLimits) -> Self {
        Self {
            orientation: CameraOrientation::default(),
            velocity: CameraVelocity::ZERO,
            fov: limits.clamp(limits.default),
            physics,
            limits,
        }
    }

    pub fn physics(&self) -> &PhysicsParams {
        &self.physics
    }

    pub fn limits(&self) -> &FovLimits {
        &self.limits
    }

    /// Largest |pitch| the camera may hold.
    pub fn pitch_limit(&self) -> f32 {
        (FRAC_PI_2 - self.physics.pitch_margin).max(0.0)
    }

    /// Back to the mount-time defaults, momentum included.
    pub fn reset(&mut self) {
        self.orientation = CameraOrientation::default();
        self.velocity = CameraVelocity::ZERO;
        self.fov = self.limits.clamp(self.limits.default);
    }

    pub fn clamp_pitch(&mut self) {
        let limit = self.pitch_limit();
        self.orientation.pitch = self.orientation.pitch.max(-limit).min(limit);
    }

    /// Applies a drag increment to the orientation immediately.
    pub fn nudge(&mut self, d_yaw: f32, d_pitch: f32) {
        self.orientation.yaw += d_yaw;
        self.orientation.pitch += d_pitch;
        self.clamp_pitch();
    }

    /// Clamped FOV edit. Returns the delta actually applied.
    pub fn zoom_by(&mut self, delta_deg: f32) -> f32 {
        let before = self.fov;
        self.fov = self.limits.clamp(self.fov + delta_deg);
        self.fov - before
    }

    /// Advances one display frame.
    pub fn step(&mut self, dragging: bool, auto_rotate: bool) {
        if !dragging {
            self.orientation.yaw += self.velocity.x;
            self.orientation.pitch += self.velocity.y;

            self.velocity.x *= self.physics.damping;
            self.velocity.y *= self.physics.damping;
            self.snap_velocity();

            if auto_rotate {
                self.orientation.yaw += self.physics.auto_rotate_step;
            }
        }
        self.clamp_pitch();
    }

    /// Like [`step`](Self::step) but for `frames` worth of 60 Hz time, so momentum
    /// and auto-rotation keep their perceived speed on other refresh rates.
    pub fn step_frames(&mut self, frames: f32, dragging: bool, auto_rotate: bool) {
        if frames <= 0.0 {
            self.clamp_pitch();
            return;
        }
        if !dragging {
            self.orientation.yaw += self.velocity.x * frames;
            self.orientation.pitch += self.velocity.y * frames;

            let decay = self.physics.damping.powf(frames);
            self.velocity.x *= decay;
            self.velocity.y *= decay;
            self.snap_velocity();

            if auto_rotate {
                self.orientation.yaw += self.physics.auto_rotate_step * frames;
            }
        }
        self.clamp_pitch();
    }

    fn snap_velocity(&mut self) {
        let eps = self.physics.stop_epsilon;
        if self.velocity.x.abs() < eps {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < eps {
            self.velocity.y = 0.0;
        }
    }
}
