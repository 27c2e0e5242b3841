// loader.rs — background image decode delivering results to the render thread

use crate::error::ViewerError;
use crate::lifecycle::LoadRequest;
use image::io::Reader as ImageReader;
use image::{GenericImageView, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::thread;

/// Result of one load attempt, tagged with the mount generation that asked for it.
#[derive(Debug)]
pub struct LoadEvent {
    pub generation: u64,
    pub result: Result<RgbaImage, ViewerError>,
}

/// Decodes on a worker thread; the event loop polls the receiver each frame.
pub fn spawn_load(request: LoadRequest, tx: Sender<LoadEvent>) {
    thread::spawn(move || {
        log::info!("loading panorama {:?} in background", request.source.path());
        let result = decode_file(request.source.path());
        let event = LoadEvent {
            generation: request.generation,
            result,
        };
        if tx.send(event).is_err() {
            log::warn!("viewer went away before panorama finished loading");
        }
    });
}

pub fn decode_file(path: &Path) -> Result<RgbaImage, ViewerError> {
    let file = File::open(path).map_err(|source| ViewerError::ImageOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = ImageReader::new(BufReader::new(file))
        .with_guessed_format()
        .map_err(|source| ViewerError::ImageOpen {
            path: path.to_path_buf(),
            source,
        })?;
    reader.no_limits();
    let img = reader.decode()?;

    let (w, h) = img.dimensions();
    log::info!("panorama decoded: {}x{}", w, h);
    Ok(img.to_rgba8())
}
