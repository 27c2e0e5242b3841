// Mount / source change / unmount ordering against a recording backend.

use image::RgbaImage;
use pano_sphere::lifecycle::{LoadStatus, PanoramaBackend, PanoramaMount, PanoramaSource};
use pano_sphere::loader::LoadEvent;
use pano_sphere::ViewerError;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Create(u32),
    Upload(u32),
    Release(u32),
}

#[derive(Default)]
struct RecordingBackend {
    next_id: u32,
    live: Rc<RefCell<Vec<u32>>>,
    ops: Rc<RefCell<Vec<Op>>>,
}

struct Res {
    id: u32,
}

impl PanoramaBackend for RecordingBackend {
    type Resources = Res;

    fn create_resources(&mut self) -> Result<Res, ViewerError> {
        self.next_id += 1;
        self.live.borrow_mut().push(self.next_id);
        self.ops.borrow_mut().push(Op::Create(self.next_id));
        Ok(Res { id: self.next_id })
    }

    fn upload_texture(&mut self, resources: &mut Res, _image: RgbaImage) {
        self.ops.borrow_mut().push(Op::Upload(resources.id));
    }

    fn release_resources(&mut self, resources: Res) {
        self.live.borrow_mut().retain(|&id| id != resources.id);
        self.ops.borrow_mut().push(Op::Release(resources.id));
    }
}

fn image_for(generation: u64) -> LoadEvent {
    LoadEvent {
        generation,
        result: Ok(RgbaImage::new(4, 2)),
    }
}

#[test]
fn source_change_tears_down_before_new_load() {
    let backend = RecordingBackend::default();
    let live = backend.live.clone();
    let ops = backend.ops.clone();
    let mut mount = PanoramaMount::new(backend);

    let first = mount.mount(PanoramaSource::new("first.jpg")).unwrap();
    mount.finish_load(image_for(first.generation));
    assert!(mount.is_ready());

    let second = mount
        .change_source(PanoramaSource::new("second.jpg"))
        .unwrap();
    // the old program and texture are gone before the new request is handed out
    assert_eq!(*live.borrow(), vec![2]);
    assert_eq!(mount.status(), &LoadStatus::Loading);
    assert!(mount.is_scheduled());

    mount.finish_load(image_for(second.generation));
    assert_eq!(
        *ops.borrow(),
        vec![Op::Create(1), Op::Upload(1), Op::Release(1), Op::Create(2), Op::Upload(2)]
    );

    mount.unmount();
    assert!(live.borrow().is_empty());
    assert!(!mount.is_scheduled());
}

#[test]
fn late_result_after_unmount_is_ignored() {
    let backend = RecordingBackend::default();
    let ops = backend.ops.clone();
    let mut mount = PanoramaMount::new(backend);

    let req = mount.mount(PanoramaSource::new("a.jpg")).unwrap();
    mount.unmount();
    mount.finish_load(image_for(req.generation));

    assert_eq!(mount.status(), &LoadStatus::Detached);
    assert!(!ops.borrow().contains(&Op::Upload(1)));
}
