// frame.rs — per-frame timing and device-pixel-ratio aware backing size

use std::time::{Duration, Instant};

/// Reference cadence the physics constants were tuned for.
pub const REFERENCE_HZ: f32 = 60.0;

/// Longest gap credited to a single frame; larger stalls are truncated.
const MAX_FRAMES_PER_TICK: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `round(display × dpr)` per axis.
    pub fn from_display(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width: (width * device_pixel_ratio).round().max(0.0) as u32,
            height: (height * device_pixel_ratio).round().max(0.0) as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Remembers the last backing size so the surface is reallocated only on change.
#[derive(Debug, Default)]
pub struct SurfaceSizer {
    current: Option<SurfaceSize>,
}

impl SurfaceSizer {
    pub fn current(&self) -> Option<SurfaceSize> {
        self.current
    }

    /// Returns the new size when it differs from the cached one; empty sizes are skipped.
    pub fn update(&mut self, size: SurfaceSize) -> Option<SurfaceSize> {
        if size.is_empty() || self.current == Some(size) {
            return None;
        }
        self.current = Some(size);
        Some(size)
    }

    /// Forget the cache so the next update reconfigures (e.g. after surface loss).
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}

/// Elapsed real time expressed in reference frames.
#[derive(Debug)]
pub struct FrameClock {
    last: Option<Instant>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let frames = match self.last {
            Some(prev) => frames_for(now.saturating_duration_since(prev)),
            None => 1.0,
        };
        self.last = Some(now);
        frames
    }
}

pub fn frames_for(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() * REFERENCE_HZ).min(MAX_FRAMES_PER_TICK)
}

/// Frames-per-second counter for the status bar, refreshed once a second.
#[derive(Debug)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }
}

impl FpsCounter {
    pub fn frame(&mut self) -> f32 {
        self.frames += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.window_start).as_secs_f32();
        if elapsed >= 1.0 {
            self.fps = self.frames as f32 / elapsed;
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }
}
