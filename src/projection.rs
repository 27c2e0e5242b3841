// projection.rs — equirectangular projection math (CPU mirror of shader.wgsl) and texture preparation
//
// A view ray is built in camera space, pitched about X, then yawed about Y, and the
// resulting direction is mapped to longitude/latitude texture coordinates:
//   theta = atan2(x, -z), phi = asin(y)
//   u = (theta / PI + 1) * 0.5, v = phi / PI + 0.5

use glam::{Vec2, Vec3};
use image::{GenericImage, Rgba, RgbaImage};
use std::f32::consts::PI;

/// Uniform block read by the fragment stage. Layout matches `ViewUniform` in shader.wgsl.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewUniform {
    pub yaw: f32,
    pub pitch: f32,
    /// Full vertical angle, radians.
    pub fov: f32,
    /// Viewport width / height.
    pub aspect: f32,
}

impl ViewUniform {
    pub fn new(yaw: f32, pitch: f32, fov_deg: f32, aspect: f32) -> Self {
        Self {
            yaw,
            pitch,
            fov: fov_deg.to_radians(),
            aspect,
        }
    }
}

/// Camera-space ray through a point in normalized device coordinates (y up).
pub fn camera_ray(ndc: Vec2, fov: f32, aspect: f32) -> Vec3 {
    let half = (fov * 0.5).tan();
    Vec3::new(ndc.x * half * aspect, ndc.y * half, -1.0).normalize()
}

/// Pitch about the horizontal axis first, then yaw about the vertical axis.
pub fn rotate_pitch_yaw(ray: Vec3, yaw: f32, pitch: f32) -> Vec3 {
    let (sp, cp) = pitch.sin_cos();
    let pitched = Vec3::new(ray.x, ray.y * cp - ray.z * sp, ray.y * sp + ray.z * cp);

    let (sy, cy) = yaw.sin_cos();
    Vec3::new(
        pitched.x * cy - pitched.z * sy,
        pitched.y,
        pitched.x * sy + pitched.z * cy,
    )
}

pub fn ray_to_uv(dir: Vec3) -> Vec2 {
    let theta = dir.x.atan2(-dir.z);
    let phi = dir.y.clamp(-1.0, 1.0).asin();
    Vec2::new((theta / PI + 1.0) * 0.5, phi / PI + 0.5)
}

/// Texture coordinate sampled for one screen point.
pub fn project_ndc(view: &ViewUniform, ndc: Vec2) -> Vec2 {
    let ray = camera_ray(ndc, view.fov, view.aspect);
    ray_to_uv(rotate_pitch_yaw(ray, view.yaw, view.pitch))
}

/// Horizontal addressing: repeat.
pub fn wrap_u(x: i64, width: u32) -> u32 {
    x.rem_euclid(width as i64) as u32
}

/// Vertical addressing: clamp to edge.
pub fn clamp_v(y: i64, height: u32) -> u32 {
    y.clamp(0, height as i64 - 1) as u32
}

/// An equirectangular image laid out the way the GPU samples it: 2:1 or taller,
/// within the device texture limit, rows bottom-up so v grows toward the sky.
#[derive(Debug, Clone)]
pub struct EquirectTexture {
    pixels: RgbaImage,
}

impl EquirectTexture {
    pub fn prepare(img: RgbaImage, max_dimension: u32) -> Self {
        let (src_w, src_h) = img.dimensions();

        let img = if src_w > max_dimension || src_h > max_dimension {
            let scale = (max_dimension as f32 / src_w.max(src_h) as f32).min(1.0);
            let new_w = ((src_w as f32 * scale) as u32).max(1);
            let new_h = ((src_h as f32 * scale) as u32).max(1);
            log::info!(
                "panorama {}x{} exceeds GPU limit {}, scaled to {}x{}",
                src_w,
                src_h,
                max_dimension,
                new_w,
                new_h
            );
            image::imageops::resize(&img, new_w, new_h, image::imageops::FilterType::Lanczos3)
        } else {
            img
        };

        // Shorter than 2:1: black sky above, source pinned to the bottom.
        let (w, h) = img.dimensions();
        let target_h = w / 2;
        let mut img = if target_h > 0 && h < target_h {
            let mut canvas = RgbaImage::from_pixel(w, target_h, Rgba([0, 0, 0, 255]));
            if let Err(e) = canvas.copy_from(&img, 0, target_h - h) {
                log::warn!("padding panorama failed: {}", e);
            }
            canvas
        } else {
            img
        };

        image::imageops::flip_vertical_in_place(&mut img);
        Self { pixels: img }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Bilinear lookup with repeat-U / clamp-V addressing, like the GPU sampler.
    pub fn sample(&self, uv: Vec2) -> [f32; 4] {
        let (w, h) = self.pixels.dimensions();
        if w == 0 || h == 0 {
            return [0.0; 4];
        }
        let x = uv.x * w as f32 - 0.5;
        let y = uv.y * h as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let (x0, y0) = (x0 as i64, y0 as i64);
        let xs = [wrap_u(x0, w), wrap_u(x0 + 1, w)];
        let ys = [clamp_v(y0, h), clamp_v(y0 + 1, h)];

        let texel = |x: u32, y: u32| self.pixels.get_pixel(x, y).0.map(|c| c as f32);
        let lerp = |a: [f32; 4], b: [f32; 4], t: f32| {
            [0usize, 1, 2, 3].map(|i| a[i] + (b[i] - a[i]) * t)
        };

        let top = lerp(texel(xs[0], ys[0]), texel(xs[1], ys[0]), fx);
        let bottom = lerp(texel(xs[0], ys[1]), texel(xs[1], ys[1]), fx);
        lerp(top, bottom, fy)
    }

    /// Software rendition of the view, top row first.
    pub fn render_view(&self, view: &ViewUniform, width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |col, row| {
            let ndc = Vec2::new(
                (col as f32 + 0.5) / width as f32 * 2.0 - 1.0,
                1.0 - (row as f32 + 0.5) / height as f32 * 2.0,
            );
            let c = self.sample(project_ndc(view, ndc));
            Rgba(c.map(|v| v.round().clamp(0.0, 255.0) as u8))
        })
    }
}
