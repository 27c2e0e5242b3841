// lifecycle.rs — mount / load / teardown ordering for the panorama graphics resources

use crate::error::ViewerError;
use crate::loader::LoadEvent;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// A loadable panorama reference. Identity is the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanoramaSource {
    path: PathBuf,
}

impl PanoramaSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Ask the loader for `source` on behalf of mount `generation`.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub generation: u64,
    pub source: PanoramaSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// Nothing attached.
    Detached,
    /// Program built, waiting on the image. Stays here if decoding fails.
    Loading,
    Ready,
    /// The platform cannot run the program; nothing will be drawn for this mount.
    Unavailable(String),
}

/// What the mount needs from a graphics API.
pub trait PanoramaBackend {
    type Resources;

    /// Compile/link the program and create the full-screen quad.
    fn create_resources(&mut self) -> Result<Self::Resources, ViewerError>;

    /// Upload (or replace) the panorama texture.
    fn upload_texture(&mut self, resources: &mut Self::Resources, image: RgbaImage);

    /// Release every handle owned by `resources` and let the device reclaim them.
    fn release_resources(&mut self, resources: Self::Resources);
}

pub struct PanoramaMount<B: PanoramaBackend> {
    backend: B,
    resources: Option<B::Resources>,
    source: Option<PanoramaSource>,
    generation: u64,
    scheduled: bool,
    status: LoadStatus,
    last_error: Option<String>,
}

impl<B: PanoramaBackend> PanoramaMount<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            resources: None,
            source: None,
            generation: 0,
            scheduled: false,
            status: LoadStatus::Detached,
            last_error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Backend and live resources together, for drawing.
    pub fn parts(&self) -> (&B, Option<&B::Resources>) {
        (&self.backend, self.resources.as_ref())
    }

    pub fn source(&self) -> Option<&PanoramaSource> {
        self.source.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    /// Builds the program, starts the frame schedule and returns the image request.
    /// A program failure is final for this mount and yields no request.
    pub fn mount(&mut self, source: PanoramaSource) -> Option<LoadRequest> {
        if self.source.is_some() {
            self.unmount();
        }
        self.generation += 1;
        self.source = Some(source.clone());
        self.last_error = None;
        self.scheduled = true;

        match self.backend.create_resources() {
            Ok(resources) => {
                self.resources = Some(resources);
                self.status = LoadStatus::Loading;
                log::info!("mounted {:?} (generation {})", source.path(), self.generation);
                Some(LoadRequest {
                    generation: self.generation,
                    source,
                })
            }
            Err(e) => {
                log::error!("panorama pipeline unavailable: {}", e);
                self.status = LoadStatus::Unavailable(e.to_string());
                None
            }
        }
    }

    /// Applies a finished load. Results for an earlier generation are dropped.
    pub fn finish_load(&mut self, event: LoadEvent) {
        if event.generation != self.generation {
            log::debug!(
                "discarding load for generation {} (current {})",
                event.generation,
                self.generation
            );
            return;
        }
        let Some(resources) = self.resources.as_mut() else {
            return;
        };
        match event.result {
            Ok(image) => {
                self.backend.upload_texture(resources, image);
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                log::warn!("panorama failed to load: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Stops the schedule, then releases resources.
    pub fn unmount(&mut self) {
        self.scheduled = false;
        if let Some(resources) = self.resources.take() {
            self.backend.release_resources(resources);
        }
        if let Some(source) = self.source.take() {
            log::info!("unmounted {:?}", source.path());
        }
        self.status = LoadStatus::Detached;
        self.last_error = None;
    }

    /// A new source tears everything down and rebuilds. Same source is a no-op.
    pub fn change_source(&mut self, source: PanoramaSource) -> Option<LoadRequest> {
        if self.source.as_ref() == Some(&source) {
            return None;
        }
        self.mount(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingBackend {
        live_programs: usize,
        live_textures: usize,
        fail_program: bool,
        log: Vec<&'static str>,
    }

    struct Handles {
        texture: bool,
    }

    impl PanoramaBackend for CountingBackend {
        type Resources = Handles;

        fn create_resources(&mut self) -> Result<Handles, ViewerError> {
            if self.fail_program {
                return Err(ViewerError::ShaderCompilation("link failed".into()));
            }
            self.live_programs += 1;
            self.log.push("create");
            Ok(Handles { texture: false })
        }

        fn upload_texture(&mut self, resources: &mut Handles, _image: RgbaImage) {
            if !resources.texture {
                self.live_textures += 1;
            }
            resources.texture = true;
            self.log.push("upload");
        }

        fn release_resources(&mut self, resources: Handles) {
            self.live_programs -= 1;
            if resources.texture {
                self.live_textures -= 1;
            }
            self.log.push("release");
        }
    }

    fn loaded(generation: u64) -> LoadEvent {
        LoadEvent {
            generation,
            result: Ok(RgbaImage::new(2, 1)),
        }
    }

    #[test]
    fn mount_then_load_becomes_ready() {
        let mut mount = PanoramaMount::new(CountingBackend::default());
        let req = mount.mount(PanoramaSource::new("a.jpg")).unwrap();
        assert!(mount.is_scheduled());
        assert_eq!(mount.status(), &LoadStatus::Loading);

        mount.finish_load(loaded(req.generation));
        assert!(mount.is_ready());
        assert_eq!(mount.backend().live_textures, 1);
    }

    #[test]
    fn load_failure_stays_loading() {
        let mut mount = PanoramaMount::new(CountingBackend::default());
        let req = mount.mount(PanoramaSource::new("a.jpg")).unwrap();
        mount.finish_load(LoadEvent {
            generation: req.generation,
            result: Err(ViewerError::ImageOpen {
                path: "a.jpg".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        });
        assert_eq!(mount.status(), &LoadStatus::Loading);
        assert!(mount.last_error().is_some());
    }

    #[test]
    fn program_failure_is_final() {
        let backend = CountingBackend {
            fail_program: true,
            ..Default::default()
        };
        let mut mount = PanoramaMount::new(backend);
        assert!(mount.mount(PanoramaSource::new("a.jpg")).is_none());
        assert!(matches!(mount.status(), LoadStatus::Unavailable(_)));
        assert!(!mount.is_ready());
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut mount = PanoramaMount::new(CountingBackend::default());
        let first = mount.mount(PanoramaSource::new("a.jpg")).unwrap();
        let second = mount.change_source(PanoramaSource::new("b.jpg")).unwrap();
        mount.finish_load(loaded(first.generation));
        assert!(!mount.is_ready());
        mount.finish_load(loaded(second.generation));
        assert!(mount.is_ready());
    }

    #[test]
    fn unmount_stops_schedule_and_frees_everything() {
        let mut mount = PanoramaMount::new(CountingBackend::default());
        let req = mount.mount(PanoramaSource::new("a.jpg")).unwrap();
        mount.finish_load(loaded(req.generation));
        mount.unmount();
        assert!(!mount.is_scheduled());
        assert_eq!(mount.status(), &LoadStatus::Detached);
        assert_eq!(mount.backend().live_programs, 0);
        assert_eq!(mount.backend().live_textures, 0);
    }

    #[test]
    fn same_source_does_not_rebuild() {
        let mut mount = PanoramaMount::new(CountingBackend::default());
        mount.mount(PanoramaSource::new("a.jpg"));
        assert!(mount.change_source(PanoramaSource::new("a.jpg")).is_none());
        assert_eq!(mount.backend().log, vec!["create"]);
    }
}
