//! Integration tests for the galaxy cursor
//!
//! These tests verify that:
//! - A configured and started cursor blits a frame and keeps running
//! - Stopping cancels the scheduled frame immediately
//! - Repeating a property value regenerates nothing
//! - The host bridge and JSON channel drive the cursor end to end

use galaxy_core::{
    Command, CursorHost, FieldConfig, GalaxyCursor, Message, ParticleField, Property,
};
use galaxy_paint::{CanvasOp, Pixmap, RecordingCanvas};
use std::sync::{Arc, Mutex};

fn reference_batch(canvas: Arc<Mutex<RecordingCanvas>>) -> Message {
    Message::Set(vec![
        Property::Canvas(Box::new(canvas)),
        Property::Width(800.0),
        Property::Height(600.0),
        Property::Density(5),
        Property::Links(3),
        Property::Radius(100.0),
        Property::Distance(20.0),
        Property::Speed(1000.0),
        Property::Accuracy(10.0),
    ])
}

/// Configure, start, render one frame, stop
#[test]
fn test_start_renders_and_stop_cancels() {
    let canvas = Arc::new(Mutex::new(RecordingCanvas::new(0, 0)));
    let mut cursor = GalaxyCursor::with_seed(42);
    cursor.handle(reference_batch(canvas.clone()), 0.0);
    cursor.handle(Message::Call(Command::Start), 0.0);

    assert!(cursor.frame_pending());
    assert!(cursor.on_animation_frame(16.0));
    assert!(cursor.is_active());
    assert_eq!(canvas.lock().unwrap().blit_count(), 1);

    cursor.handle(Message::Call(Command::Stop), 20.0);
    assert!(!cursor.frame_pending());
    assert!(!cursor.on_animation_frame(32.0));
    assert_eq!(canvas.lock().unwrap().blit_count(), 1);
    assert_eq!(cursor.field().stats().frames, 1);
}

/// Each frame clears the rectangle the previous one drew into
#[test]
fn test_frames_clear_previous_dirty_rect() {
    let canvas = Arc::new(Mutex::new(RecordingCanvas::new(0, 0)));
    let mut cursor = GalaxyCursor::with_seed(42);
    cursor.handle(reference_batch(canvas.clone()), 0.0);
    cursor.start();
    cursor.on_animation_frame(16.0);
    cursor.set_property(Property::X(100.0), 20.0);
    cursor.set_property(Property::Y(150.0), 20.0);
    cursor.on_animation_frame(32.0);

    let ops = canvas.lock().unwrap().take_ops();
    let blits: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            CanvasOp::DrawLayer { dst, .. } => Some(*dst),
            _ => None,
        })
        .collect();
    let clears: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            CanvasOp::ClearRect(rect) => Some(*rect),
            _ => None,
        })
        .collect();

    assert_eq!(blits.len(), 2);
    assert_eq!(clears.len(), 2);
    // The second frame erases exactly where the first one blitted
    assert_eq!(clears[1], blits[0]);
    assert_eq!(blits[1].x, 100.0 - 124.0);
    assert_eq!(blits[1].y, 150.0 - 124.0);
}

#[test]
fn test_repeated_value_does_not_regenerate() {
    let canvas = Arc::new(Mutex::new(RecordingCanvas::new(0, 0)));
    let mut cursor = GalaxyCursor::with_seed(1);
    cursor.handle(reference_batch(canvas), 0.0);

    let before = cursor.field().stats();
    cursor.set_property(Property::Density(5), 0.0);
    cursor.set_property(Property::Links(3), 0.0);
    cursor.set_property(Property::Width(800.0), 0.0);
    assert_eq!(cursor.field().stats(), before);

    cursor.set_property(Property::Links(2), 0.0);
    cursor.set_property(Property::Links(2), 0.0);
    assert_eq!(
        cursor.field().stats().neighbor_regenerations,
        before.neighbor_regenerations + 1
    );
}

#[test]
fn test_dense_grid_points_stay_in_cells() {
    let mut field = ParticleField::with_seed(
        FieldConfig {
            width: 1000.0,
            height: 500.0,
            density: 10,
            ..Default::default()
        },
        5,
    );
    field.resize().unwrap();

    assert_eq!(field.points().len(), 100);
    for point in field.points() {
        let col = (point.id / 10) as f32;
        let row = (point.id % 10) as f32;
        assert!(point.x >= col * 100.0 && point.x <= (col + 1.0) * 100.0);
        assert!(point.y >= row * 50.0 && point.y <= (row + 1.0) * 50.0);
    }
}

#[test]
fn test_neighbors_stay_inside_search_window() {
    let mut field = ParticleField::with_seed(
        FieldConfig {
            width: 900.0,
            height: 900.0,
            density: 12,
            links: 4,
            accuracy: 5.0,
            ..Default::default()
        },
        8,
    );
    field.resize().unwrap();

    let buffer = field.config().search_buffer();
    assert_eq!(buffer, 7);
    for point in field.points() {
        assert!(point.closest.len() <= 4);
        let mut seen = point.closest.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), point.closest.len(), "duplicate neighbor");
        for near in &point.closest {
            assert_ne!(*near, point.id);
            assert!(*near + buffer >= point.id && *near < point.id + buffer);
        }
    }
}

#[test]
fn test_json_channel_drives_cursor() {
    let canvas = Arc::new(Mutex::new(RecordingCanvas::new(0, 0)));
    let mut cursor = GalaxyCursor::with_seed(3);
    cursor.set_property(Property::Canvas(Box::new(canvas.clone())), 0.0);

    let payloads = [
        r#"{"set": {"width": 800, "height": 600, "density": "5", "links": 3}}"#,
        r#"{"set": {"unknown": 1}, "call": "start"}"#,
        r#"{"call": "dance"}"#,
    ];
    for payload in payloads {
        for message in Message::from_json(payload).unwrap() {
            cursor.handle(message, 0.0);
        }
    }

    assert_eq!(cursor.field().points().len(), 25);
    assert!(cursor.on_animation_frame(16.0));
    assert_eq!(canvas.lock().unwrap().blit_count(), 1);
}

#[test]
fn test_host_bridge_feeds_cursor() {
    let pixmap = Arc::new(Mutex::new(Pixmap::new(1, 1).unwrap()));
    let mut host = CursorHost::new(Vec::new(), true);
    host.connect(Some(Box::new(pixmap.clone())), 320.0, 240.0);
    host.attribute_changed("density", None, Some("4"));
    host.attribute_changed("radius", None, Some("400"));
    host.pointer_moved(160.0, 120.0);
    host.visibility_changed(true);

    let mut cursor = GalaxyCursor::with_seed(11);
    for message in std::mem::take(host.sink_mut()) {
        cursor.handle(message, 0.0);
    }
    for frame in 1..=3 {
        cursor.on_animation_frame(frame as f64 * 16.0);
    }

    let pixmap = pixmap.lock().unwrap();
    assert_eq!((pixmap.width(), pixmap.height()), (320, 240));
    assert!(pixmap.painted_pixels() > 0);
    assert_eq!(cursor.field().stats().frames, 3);
}
