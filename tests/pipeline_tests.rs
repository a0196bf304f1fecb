// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the photo capture pipeline and the host loop

use futures::channel::mpsc;
use futures::{StreamExt, stream};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use viewfinder::backends::camera::{
    CaptureBackend, CaptureSettings, PixelFormat, RawPhotoBuffer, StillImageBackend,
};
use viewfinder::errors::{CameraError, PhotoError, StorageError};
use viewfinder::frame_processor::{Detection, FrameContext, MetadataBatch, SymbolKind};
use viewfinder::orientation::Rotation;
use viewfinder::pipelines::photo::{
    CaptureOutcome, CaptureRequest, CaptureState, FinishedImage, PhotoCapturePipeline,
};
use viewfinder::storage::{MemorySink, StorageSink};
use viewfinder::{Config, Message, Rect, Size, Viewfinder};

/// Capture backend fake that records every start call
#[derive(Clone, Default)]
struct RecordingBackend {
    calls: Arc<Mutex<Vec<(Uuid, CaptureSettings)>>>,
}

impl RecordingBackend {
    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl CaptureBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn start_capture(
        &mut self,
        request: &CaptureRequest,
        settings: &CaptureSettings,
    ) -> Result<(), CameraError> {
        self.calls.lock().unwrap().push((request.id, *settings));
        Ok(())
    }
}

struct BrokenSink;

impl StorageSink for BrokenSink {
    fn store(&mut self, _image: FinishedImage) -> Result<(), StorageError> {
        Err(StorageError::Io("read-only filesystem".into()))
    }
}

fn png(width: u32, height: u32) -> RawPhotoBuffer {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([90, 120, 150]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    RawPhotoBuffer::encoded(bytes)
}

fn pipeline_with(backend: &RecordingBackend, sink: &MemorySink) -> PhotoCapturePipeline {
    PhotoCapturePipeline::new(Box::new(backend.clone()), Box::new(sink.clone()))
}

#[test]
fn test_double_trigger_issues_one_capture() {
    let backend = RecordingBackend::default();
    let sink = MemorySink::new();
    let mut pipeline = pipeline_with(&backend, &sink);

    let first = pipeline.trigger();
    let second = pipeline.trigger();

    assert!(first.is_some());
    assert!(second.is_none());
    assert_eq!(backend.call_count(), 1);
}

#[test]
fn test_capture_uses_configured_settings() {
    let backend = RecordingBackend::default();
    let sink = MemorySink::new();
    let mut pipeline = pipeline_with(&backend, &sink);

    pipeline.trigger().unwrap();
    let (_, settings) = backend.calls.lock().unwrap()[0];
    assert_eq!(settings, CaptureSettings::default());
}

#[test]
fn test_portrait_photo_is_cropped_and_stored() {
    let backend = RecordingBackend::default();
    let sink = MemorySink::new();
    let mut pipeline = pipeline_with(&backend, &sink);

    let id = pipeline.trigger().unwrap();
    pipeline.on_capture_started(id);
    let outcome = pipeline.on_capture_finished(id, Ok(&png(1200, 1600))).cloned();

    assert_eq!(
        outcome,
        Some(CaptureOutcome::Persisted {
            request: id,
            side: 1200,
            rotation: Rotation::Rotate90,
        })
    );
    assert_eq!(pipeline.state(), CaptureState::Idle);

    let stored = sink.images();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].side(), 1200);
    assert_eq!(stored[0].pixels().dimensions(), (1200, 1200));
}

#[test]
fn test_capture_error_returns_to_idle_and_allows_retry() {
    let backend = RecordingBackend::default();
    let sink = MemorySink::new();
    let mut pipeline = pipeline_with(&backend, &sink);

    let id = pipeline.trigger().unwrap();
    let outcome = pipeline
        .on_capture_finished(id, Err(CameraError::CaptureFailed("sensor timeout".into())))
        .cloned()
        .unwrap();

    assert!(outcome.is_failure());
    assert_eq!(pipeline.state(), CaptureState::Idle);
    assert_eq!(sink.len(), 0);

    assert!(pipeline.trigger().is_some());
    assert_eq!(backend.call_count(), 2);
}

#[test]
fn test_undecodable_photo_fails_and_allows_retry() {
    let backend = RecordingBackend::default();
    let sink = MemorySink::new();
    let mut pipeline = pipeline_with(&backend, &sink);

    let id = pipeline.trigger().unwrap();
    let buffer = RawPhotoBuffer::encoded(b"junk".to_vec());
    let outcome = pipeline.on_capture_finished(id, Ok(&buffer)).cloned();

    assert!(matches!(
        outcome,
        Some(CaptureOutcome::Failed {
            request,
            error: PhotoError::ImageDecode(_),
        }) if request == id
    ));
    assert_eq!(sink.len(), 0);
    assert_eq!(pipeline.state(), CaptureState::Idle);

    assert!(pipeline.trigger().is_some());
    assert_eq!(backend.call_count(), 2);
}

#[test]
fn test_zero_width_photo_never_reaches_sink() {
    let backend = RecordingBackend::default();
    let sink = MemorySink::new();
    let mut pipeline = pipeline_with(&backend, &sink);

    let id = pipeline.trigger().unwrap();
    let buffer = RawPhotoBuffer::pixels(Vec::new(), 0, 1600, PixelFormat::RGB24);
    let outcome = pipeline.on_capture_finished(id, Ok(&buffer)).cloned();

    assert_eq!(
        outcome,
        Some(CaptureOutcome::Failed {
            request: id,
            error: PhotoError::InvalidImageGeometry {
                width: 0,
                height: 1600
            },
        })
    );
    assert_eq!(sink.len(), 0);
    assert_eq!(pipeline.state(), CaptureState::Idle);
}

#[test]
fn test_strict_storage_fails_request() {
    let backend = RecordingBackend::default();
    let mut pipeline = PhotoCapturePipeline::new(Box::new(backend), Box::new(BrokenSink))
        .with_strict_storage(true);

    let id = pipeline.trigger().unwrap();
    pipeline.on_capture_finished(id, Ok(&png(8, 8)));

    match pipeline.last_outcome() {
        Some(CaptureOutcome::Failed {
            error: PhotoError::Storage(StorageError::Io(_)),
            ..
        }) => {}
        other => panic!("Expected storage failure, got {:?}", other),
    }
    assert_eq!(pipeline.state(), CaptureState::Idle);
}

#[test]
fn test_late_result_after_completion_is_ignored() {
    let backend = RecordingBackend::default();
    let sink = MemorySink::new();
    let mut pipeline = pipeline_with(&backend, &sink);

    let id = pipeline.trigger().unwrap();
    pipeline.on_capture_finished(id, Ok(&png(4, 4)));
    assert!(pipeline.on_capture_finished(id, Ok(&png(4, 4))).is_none());
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_viewfinder_run_drives_overlay_and_capture() {
    let path = std::env::temp_dir().join(format!("viewfinder-run-{}.png", Uuid::new_v4()));
    image::RgbImage::from_pixel(30, 20, image::Rgb([1, 2, 3]))
        .save(&path)
        .unwrap();

    let (sender, receiver) = mpsc::unbounded();
    let backend = StillImageBackend::open(&path, sender).unwrap();
    let sink = MemorySink::new();
    let config = Config::default();
    let pipeline =
        PhotoCapturePipeline::from_config(Box::new(backend), Box::new(sink.clone()), &config);
    let mut viewfinder = Viewfinder::new(&config, pipeline);

    let context = FrameContext::new(Size::new(1000.0, 1000.0), Size::new(500.0, 500.0));
    let batches = stream::iter(vec![MetadataBatch::new(
        1,
        vec![Detection::new(
            SymbolKind::Qr,
            Rect::new(100.0, 100.0, 200.0, 200.0),
            Some("ABC".into()),
        )],
        context,
    )]);

    // The still backend reports Started and Finished for the one trigger
    let messages = stream::iter(vec![Message::TriggerCapture])
        .chain(receiver.map(Message::from).take(2));

    futures::executor::block_on(viewfinder.run(batches, messages));
    std::fs::remove_file(&path).ok();

    assert_eq!(viewfinder.overlay().label(), Some("ABC"));
    assert_eq!(viewfinder.overlay().bounding_box(), Rect::new(50.0, 50.0, 100.0, 100.0));
    assert_eq!(viewfinder.capture_state(), CaptureState::Idle);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.images()[0].side(), 20);
}
