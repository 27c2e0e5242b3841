// main.rs — windowed host: event loop, gesture routing, file dialogs, per-frame schedule

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use pano_sphere::config::{self, LaunchOptions, ViewerConfig};
use pano_sphere::frame::{FpsCounter, FrameClock, SurfaceSize};
use pano_sphere::input::TouchTracker;
use pano_sphere::lifecycle::PanoramaSource;
use pano_sphere::loader::{self, LoadEvent};
use pano_sphere::panorama::PanoramaViewer;
use pano_sphere::projection::{EquirectTexture, ViewUniform};
use pano_sphere::renderer::Renderer;
use pano_sphere::ui::{self, OverlayState, UiAction};

use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

const APP_TITLE: &str = "Panorama Viewer";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = LaunchOptions::from_args(std::env::args());
    let config = config::load_config(&opts).unwrap_or_else(|e| {
        log::error!("{}; falling back to defaults", e);
        ViewerConfig {
            auto_rotate: opts.auto_rotate,
            ..ViewerConfig::default()
        }
    });

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(APP_TITLE)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)?,
    );

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), config.vsync))?;
    let mut viewer = PanoramaViewer::new(&config);

    let current_source: Rc<RefCell<Option<PathBuf>>> = Rc::new(RefCell::new(None));
    let close_requested = Rc::new(Cell::new(false));
    {
        let flag = close_requested.clone();
        viewer.set_on_close(move || flag.set(true));

        let source = current_source.clone();
        viewer.set_on_download(move || {
            if let Some(path) = source.borrow().as_ref() {
                save_copy(path);
            }
        });
    }

    let (tx, rx): (Sender<LoadEvent>, Receiver<LoadEvent>) = channel();
    if let Some(path) = opts.panorama.clone() {
        open_source(&mut renderer, &window, path, &tx, &current_source);
    }

    let mut cursor = Vec2::ZERO;
    let mut touches = TouchTracker::default();
    let mut clock = FrameClock::new();
    let mut fps = FpsCounter::default();
    let mut show_fps = false;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        while let Ok(loaded) = rx.try_recv() {
            renderer.panorama.finish_load(loaded);
        }

        if close_requested.get() {
            renderer.panorama.unmount();
            *control_flow = ControlFlow::Exit;
            return;
        }

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                // releases always reach the gesture layer so a drag cannot get stuck
                if response.consumed && !is_release(&event) {
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => viewer.request_close(),

                    WindowEvent::Focused(false) => {
                        viewer.input.cancel();
                        touches = TouchTracker::default();
                    }

                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        renderer.egui_state.set_pixels_per_point(scale_factor as f32);
                    }

                    WindowEvent::KeyboardInput { input, .. } => {
                        if input.state == ElementState::Pressed {
                            match input.virtual_keycode {
                                Some(VirtualKeyCode::O) => {
                                    if let Some(path) = pick_image() {
                                        open_source(&mut renderer, &window, path, &tx, &current_source);
                                    }
                                }
                                Some(VirtualKeyCode::F11) => toggle_fullscreen(&mut viewer, &window),
                                Some(VirtualKeyCode::R) => viewer.reset_view(),
                                Some(VirtualKeyCode::Space) => {
                                    viewer.toggle_auto_rotate();
                                }
                                Some(VirtualKeyCode::Escape) => {
                                    if viewer.is_fullscreen {
                                        toggle_fullscreen(&mut viewer, &window);
                                    } else {
                                        viewer.request_close();
                                    }
                                }
                                _ => {}
                            }
                        }
                    }

                    WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                        match state {
                            ElementState::Pressed => viewer.input.pointer_down(&mut viewer.camera, cursor),
                            ElementState::Released => viewer.input.pointer_up(),
                        }
                    }

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = Vec2::new(position.x as f32, position.y as f32);
                        viewer.input.pointer_move(&mut viewer.camera, cursor);
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        // winit reports scroll-up as positive; the gesture layer wants "away = wider"
                        let away = match delta {
                            MouseScrollDelta::LineDelta(_, y) => -y,
                            MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32),
                        };
                        viewer.input.wheel(&mut viewer.camera, away);
                    }

                    WindowEvent::Touch(touch) => {
                        let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                        match touch.phase {
                            TouchPhase::Started => {
                                touches.begin(touch.id, pos);
                                viewer.input.touch_start(&mut viewer.camera, &touches.points());
                            }
                            TouchPhase::Moved => {
                                touches.update(touch.id, pos);
                                viewer.input.touch_move(&mut viewer.camera, &touches.points());
                            }
                            TouchPhase::Ended | TouchPhase::Cancelled => {
                                touches.end(touch.id);
                                viewer.input.touch_end(&touches.points());
                            }
                        }
                    }

                    WindowEvent::DroppedFile(path) => {
                        open_source(&mut renderer, &window, path, &tx, &current_source);
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let frames = clock.tick();
                let fps_now = fps.frame();

                if renderer.panorama.is_scheduled() {
                    viewer.tick(frames);
                }

                let scale = window.scale_factor();
                let logical = window.inner_size().to_logical::<f64>(scale);
                renderer.resize(SurfaceSize::from_display(logical.width, logical.height, scale));

                let view = viewer.view_uniform(renderer.size().aspect());
                let status = renderer.panorama.status().clone();
                let last_error = renderer.panorama.last_error().map(str::to_owned);

                let mut actions = Vec::new();
                let render_result = renderer.render(&window, &view, |ctx| {
                    ui::draw_ui(
                        ctx,
                        &viewer,
                        OverlayState {
                            status: &status,
                            last_error: last_error.as_deref(),
                            show_fps: &mut show_fps,
                            fps: fps_now,
                        },
                        &mut actions,
                    );
                });

                for action in actions {
                    match action {
                        UiAction::Open => {
                            if let Some(path) = pick_image() {
                                open_source(&mut renderer, &window, path, &tx, &current_source);
                            }
                        }
                        UiAction::ToggleAutoRotate => {
                            viewer.toggle_auto_rotate();
                        }
                        UiAction::ResetView => viewer.reset_view(),
                        UiAction::ToggleFullscreen => toggle_fullscreen(&mut viewer, &window),
                        UiAction::Download => viewer.request_download(),
                        UiAction::Snapshot => {
                            if let Some(source) = current_source.borrow().clone() {
                                save_snapshot(source, view, renderer.size());
                            }
                        }
                        UiAction::Close => viewer.request_close(),
                    }
                }

                match render_result {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        log::warn!("surface lost, reconfiguring");
                        renderer.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory");
                        renderer.panorama.unmount();
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}

fn is_release(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::MouseInput { state, .. } => *state == ElementState::Released,
        WindowEvent::Touch(t) => matches!(t.phase, TouchPhase::Ended | TouchPhase::Cancelled),
        _ => false,
    }
}

fn open_source(
    renderer: &mut Renderer,
    window: &Window,
    path: PathBuf,
    tx: &Sender<LoadEvent>,
    current: &Rc<RefCell<Option<PathBuf>>>,
) {
    if let Some(request) = renderer.panorama.change_source(PanoramaSource::new(&path)) {
        loader::spawn_load(request, tx.clone());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    window.set_title(&format!("{} — {}", APP_TITLE, name));
    *current.borrow_mut() = Some(path);
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
}

fn toggle_fullscreen(viewer: &mut PanoramaViewer, window: &Window) {
    if viewer.toggle_fullscreen() {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    } else {
        window.set_fullscreen(None);
    }
}

/// Download: copy the source panorama wherever the user picks.
fn save_copy(source: &Path) {
    let mut dialog = rfd::FileDialog::new();
    if let Some(name) = source.file_name() {
        let name = name.to_string_lossy().into_owned();
        dialog = dialog.set_file_name(name.as_str());
    }
    let Some(dest) = dialog.save_file() else {
        return;
    };
    match std::fs::copy(source, &dest) {
        Ok(_) => log::info!("saved panorama to {:?}", dest),
        Err(e) => log::error!("saving panorama to {:?} failed: {}", dest, e),
    }
}

/// Renders the current view in software from the source file and writes a PNG.
fn save_snapshot(source: PathBuf, view: ViewUniform, size: SurfaceSize) {
    let Some(dest) = rfd::FileDialog::new()
        .add_filter("PNG", &["png"])
        .set_file_name("view.png")
        .save_file()
    else {
        return;
    };

    thread::spawn(move || {
        let result = loader::decode_file(&source).and_then(|img| {
            let texture = EquirectTexture::prepare(img, u32::MAX);
            texture
                .render_view(&view, size.width, size.height)
                .save(&dest)
                .map_err(Into::into)
        });
        match result {
            Ok(()) => log::info!("snapshot written to {:?}", dest),
            Err(e) => log::error!("snapshot failed: {}", e),
        }
    });
}
