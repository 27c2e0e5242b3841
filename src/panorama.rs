// panorama.rs — the viewer component: camera, gestures, toggles and host callbacks

use crate::camera::CameraState;
use crate::config::ViewerConfig;
use crate::input::InputFusion;
use crate::projection::ViewUniform;

type Callback = Box<dyn FnMut()>;

pub struct PanoramaViewer {
    pub camera: CameraState,
    pub input: InputFusion,
    pub auto_rotate: bool,
    pub is_fullscreen: bool,
    frame_rate_independent: bool,
    on_download: Option<Callback>,
    on_close: Option<Callback>,
}

impl Default for PanoramaViewer {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl PanoramaViewer {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            camera: CameraState::new(config.physics, config.fov),
            input: InputFusion::new(config.input),
            auto_rotate: config.auto_rotate,
            is_fullscreen: false,
            frame_rate_independent: config.frame_rate_independent,
            on_download: None,
            on_close: None,
        }
    }

    pub fn set_on_download(&mut self, f: impl FnMut() + 'static) {
        self.on_download = Some(Box::new(f));
    }

    pub fn set_on_close(&mut self, f: impl FnMut() + 'static) {
        self.on_close = Some(Box::new(f));
    }

    /// One frame of physics. `frames` is elapsed time in 60 Hz frames and is
    /// only honoured when frame-rate independence is configured.
    pub fn tick(&mut self, frames: f32) {
        let dragging = self.input.is_dragging();
        if self.frame_rate_independent {
            self.camera.step_frames(frames, dragging, self.auto_rotate);
        } else {
            self.camera.step(dragging, self.auto_rotate);
        }
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
    }

    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    /// Flips the presentation flag; the host applies it to its window.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.is_fullscreen = !self.is_fullscreen;
        self.is_fullscreen
    }

    pub fn fov_degrees(&self) -> f32 {
        self.camera.fov
    }

    pub fn fov_label(&self) -> String {
        format!("{:.0}°", self.camera.fov)
    }

    pub fn request_download(&mut self) {
        if let Some(f) = self.on_download.as_mut() {
            f();
        }
    }

    pub fn request_close(&mut self) {
        if let Some(f) = self.on_close.as_mut() {
            f();
        }
    }

    pub fn view_uniform(&self, aspect: f32) -> ViewUniform {
        let o = self.camera.orientation;
        ViewUniform::new(o.yaw, o.pitch, self.camera.fov, aspect)
    }
}
