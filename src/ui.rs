// ui.rs — egui overlay: toolbar, status bar, loading/failure overlay

use crate::lifecycle::LoadStatus;
use crate::panorama::PanoramaViewer;

/// User intents collected during one overlay pass; the host applies them afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Open,
    ToggleAutoRotate,
    ResetView,
    ToggleFullscreen,
    Download,
    Snapshot,
    Close,
}

pub struct OverlayState<'a> {
    pub status: &'a LoadStatus,
    pub last_error: Option<&'a str>,
    pub show_fps: &'a mut bool,
    pub fps: f32,
}

pub fn draw_ui(
    ctx: &egui::Context,
    viewer: &PanoramaViewer,
    overlay: OverlayState<'_>,
    actions: &mut Vec<UiAction>,
) {
    let ready = *overlay.status == LoadStatus::Ready;

    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Open…").clicked() {
                actions.push(UiAction::Open);
            }
            ui.separator();

            if ui
                .selectable_label(viewer.auto_rotate, "Auto-rotate")
                .clicked()
            {
                actions.push(UiAction::ToggleAutoRotate);
            }
            if ui.button("Reset View").clicked() {
                actions.push(UiAction::ResetView);
            }
            let fullscreen_label = if viewer.is_fullscreen {
                "Exit Fullscreen"
            } else {
                "Fullscreen"
            };
            if ui.button(fullscreen_label).clicked() {
                actions.push(UiAction::ToggleFullscreen);
            }
            ui.separator();

            if ui.add_enabled(ready, egui::Button::new("Download")).clicked() {
                actions.push(UiAction::Download);
            }
            if ui.add_enabled(ready, egui::Button::new("Snapshot")).clicked() {
                actions.push(UiAction::Snapshot);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close").clicked() {
                    actions.push(UiAction::Close);
                }
                ui.checkbox(overlay.show_fps, "FPS");
            });
        });
    });

    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let o = viewer.camera.orientation;
            ui.label(format!("FOV: {}", viewer.fov_label()));
            ui.label("|");
            ui.label(format!("Yaw: {:.1}°", o.yaw.to_degrees().rem_euclid(360.0)));
            ui.label("|");
            ui.label(format!("Pitch: {:.1}°", o.pitch.to_degrees()));
            if viewer.auto_rotate {
                ui.label("|");
                ui.label("Auto-rotate");
            }
            if *overlay.show_fps {
                ui.label("|");
                ui.label(
                    egui::RichText::new(format!("FPS: {:.1}", overlay.fps))
                        .color(egui::Color32::GREEN),
                );
            }
        });
    });

    let message = match overlay.status {
        LoadStatus::Ready => None,
        LoadStatus::Detached => Some(("Open a panorama (O) or drop an image here".to_owned(), None)),
        LoadStatus::Loading => Some((
            "Loading panorama…".to_owned(),
            overlay.last_error.map(str::to_owned),
        )),
        LoadStatus::Unavailable(reason) => Some((
            "Panorama rendering is not supported on this device".to_owned(),
            Some(reason.clone()),
        )),
    };

    if let Some((headline, detail)) = message {
        egui::Area::new("status_overlay")
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(egui::RichText::new(headline).color(egui::Color32::YELLOW));
                        if let Some(detail) = detail {
                            ui.label(egui::RichText::new(detail).small());
                        }
                    });
                });
            });
    }
}
