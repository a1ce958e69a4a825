//! Integration tests for the device session and display controller.
//!
//! # Purpose
//!
//! These tests exercise the session and controller through their *public*
//! API exactly the way the binary does, with the recording mock standing in
//! for the SSH link. They verify:
//!
//! - The happy path: painting a mask, uploading it under the remote image
//!   directory, and launching the viewer on the uploaded path.
//! - The reconnect policy: a healthy link is reused, an inactive one is
//!   replaced, and every fresh connect fires exactly one cursor warp.
//! - The error paths: dimension mismatches fail before any network traffic,
//!   a failing remote flush surfaces its stderr, and an empty remote
//!   directory turns "show newest" into a distinct not-found error.
//! - The safe-state contract: `stop()` issues exactly one display command
//!   and it targets a freshly uploaded all-black frame.
//!
//! # How the mock observes traffic
//!
//! The [`MockConnector`] shares one [`LinkState`] with every link it hands
//! out. Each test keeps a handle to that state and asserts on the recorded
//! command/upload history after driving the controller:
//!
//! ```text
//! Test                         Controller                  LinkState
//! ────                         ──────────                  ─────────
//! preset_mask(White)  ──────▶  paint + send_frame  ──────▶ uploads: [dmd_frame_*.bmp]
//!                              show(uploaded path) ──────▶ execs:   [feh -F ...]
//! assert on state  ◀────────────────────────────────────── (shared Arc<Mutex<_>>)
//! ```

use std::sync::{Arc, Mutex};

use dmd_client::application::display::{DisplayController, DisplayError};
use dmd_client::application::session::{DeviceSession, SessionConfig, UploadError};
use dmd_client::infrastructure::link::mock::{LinkState, MockConnector};
use dmd_client::infrastructure::link::ExecOutput;
use dmd_core::{encode_frame, generate_mask, Frame, MaskKind, PanelGeometry};

/// Test panel: small enough that encoded frames stay tiny, with the same
/// aspect ratio class as the real 640x360 part.
fn test_geometry() -> PanelGeometry {
    PanelGeometry {
        width: 64,
        height: 36,
        pitch_um: 7.56,
    }
}

fn make_controller() -> (DisplayController, Arc<Mutex<LinkState>>) {
    let connector = MockConnector::new();
    let state = connector.state();
    let config = SessionConfig::new("debian", "/home/debian/temp_images/", test_geometry());
    let session = DeviceSession::new(config, Box::new(connector));
    (DisplayController::new(session), state)
}

fn script(state: &Arc<Mutex<LinkState>>, prefix: &str, exit_status: i32, stdout: &str, stderr: &str) {
    state.lock().unwrap().exec_script.push((
        prefix.to_string(),
        ExecOutput {
            exit_status,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        },
    ));
}

// ── Upload and display lifecycle ──────────────────────────────────────────────

/// Tests the complete happy path: paint a white mask, upload it, display it.
///
/// The uploaded bytes must be the BMP encoding of the painted mask, the
/// remote path must live under the configured image directory, and the
/// viewer must be launched on that exact path.
#[test]
fn test_preset_mask_uploads_and_displays_the_painted_frame() {
    // Arrange
    let (mut controller, state) = make_controller();

    // Act
    let remote_path = controller.preset_mask(MaskKind::White).expect("preset");

    // Assert: path convention.
    assert!(remote_path.starts_with("/home/debian/temp_images/dmd_frame_"));
    assert!(remote_path.ends_with(".bmp"));

    let state = state.lock().unwrap();

    // The transferred bytes are exactly the encoded white mask.
    let expected = encode_frame(&generate_mask(MaskKind::White, &test_geometry())).expect("encode");
    assert_eq!(state.uploads.len(), 1);
    assert_eq!(state.uploads[0].remote_path, remote_path);
    assert_eq!(state.uploads[0].bytes, expected);

    // The viewer was launched on the uploaded path, not on a listing.
    assert_eq!(state.execs.len(), 1);
    assert_eq!(
        state.execs[0],
        format!("export DISPLAY=:0; feh -F {remote_path} &")
    );
}

/// Tests that a frame of the wrong shape is rejected before the connector
/// is ever asked for a link.
///
/// This is the "no partial upload" guarantee: validation happens strictly
/// before any network activity, so a bad frame cannot leave debris on the
/// board or half-open channels on the client.
#[test]
fn test_wrong_shape_fails_before_any_network_traffic() {
    let (mut controller, state) = make_controller();

    // A transposed frame: 36x64 against a 64x36 panel.
    let frame = Frame::filled(36, 64, 255);
    let result = controller.session_mut().send_frame(&frame);

    assert!(matches!(result, Err(UploadError::DimensionMismatch { .. })));

    let state = state.lock().unwrap();
    assert_eq!(state.connect_count, 0, "no connection may be opened");
    assert!(state.uploads.is_empty(), "nothing may be transferred");
    assert!(state.execs.is_empty(), "no command may be issued");
}

/// Tests that a 3-channel frame of the right width and height uploads fine;
/// the trailing channel axis does not participate in the size check.
#[test]
fn test_rgb_frame_with_matching_dimensions_uploads() {
    let (mut controller, _state) = make_controller();

    let geometry = test_geometry();
    let data = vec![0u8; geometry.pixel_count() * 3];
    let frame = Frame::from_raw(
        geometry.width,
        geometry.height,
        dmd_core::PixelFormat::Rgb,
        data,
    )
    .expect("from_raw");

    let remote_path = controller.session_mut().send_frame(&frame).expect("send");
    assert!(remote_path.ends_with(".bmp"));
}

// ── Reconnect policy ──────────────────────────────────────────────────────────

/// Tests that consecutive operations share one link, and that a link which
/// stops answering is transparently replaced before the next operation.
///
/// The cursor warp is the observable side effect of a fresh connect: one
/// warp per connect, parked at the origin, backgrounded on the board.
#[test]
fn test_session_reuses_then_replaces_the_link() {
    // Arrange
    let (mut controller, state) = make_controller();

    // Act 1: two operations on a healthy link.
    controller.list_remote_images().expect("list");
    controller.list_remote_images().expect("list again");
    assert_eq!(state.lock().unwrap().connect_count, 1);

    // Act 2: the board "reboots".
    state.lock().unwrap().active = false;
    controller.list_remote_images().expect("list after reboot");

    // Assert
    let state = state.lock().unwrap();
    assert_eq!(state.connect_count, 2, "the stale link must be replaced");
    assert_eq!(
        state.spawns,
        vec![
            "DISPLAY=:0 /home/debian/move_cursor 0 0 &".to_string(),
            "DISPLAY=:0 /home/debian/move_cursor 0 0 &".to_string(),
        ],
        "each fresh connect fires exactly one cursor warp"
    );
}

/// Tests that a failing connect propagates to the caller unchanged, with no
/// retry attempt.
#[test]
fn test_connect_failure_propagates_uncaught() {
    let (mut controller, state) = make_controller();
    state.lock().unwrap().fail_next_connect = Some("authentication failed".to_string());

    let result = controller.list_remote_images();
    assert!(matches!(result, Err(DisplayError::Link(_))));
    assert_eq!(state.lock().unwrap().connect_count, 0);
}

// ── Remote image housekeeping ─────────────────────────────────────────────────

/// Tests the listing contract on the two interesting outputs: empty stdout
/// (empty directory, or glob matched nothing) and a two-file listing.
#[test]
fn test_list_remote_images_parses_the_remote_listing() {
    let (mut controller, state) = make_controller();

    // Empty output, nonzero status (unmatched glob): empty list, no error.
    script(&state, "ls -t", 2, "", "ls: cannot access '*.bmp'");
    assert!(controller.list_remote_images().expect("list").is_empty());

    // Replace the script with a real listing.
    state.lock().unwrap().exec_script.clear();
    script(&state, "ls -t", 0, "a.bmp b.bmp", "");
    assert_eq!(
        controller.list_remote_images().expect("list"),
        vec!["a.bmp".to_string(), "b.bmp".to_string()]
    );
}

/// Tests that a failing flush surfaces the remote stderr in the error.
#[test]
fn test_flush_failure_carries_the_simulated_stderr() {
    let (mut controller, state) = make_controller();
    script(&state, "rm -f", 1, "", "rm: cannot remove 'a.bmp': Permission denied\n");

    let result = controller.flush_remote_images();
    match result {
        Err(DisplayError::FlushFailed { stderr }) => {
            assert!(stderr.contains("Permission denied"));
        }
        other => panic!("expected FlushFailed, got {other:?}"),
    }
}

/// Tests that showing with no argument and no remote images is the distinct
/// not-found error, not a transport error.
#[test]
fn test_show_newest_on_empty_directory_is_not_found() {
    let (mut controller, _state) = make_controller();
    let result = controller.show(None);
    assert!(matches!(result, Err(DisplayError::NoRemoteImages)));
}

// ── Safe state ────────────────────────────────────────────────────────────────

/// Tests the `stop()` contract end to end.
///
/// Stopping must: kill the viewer, upload exactly one frame (the all-black
/// mask), and issue exactly one display command targeting that fresh
/// upload. A second display command, or one aimed at a stale "newest"
/// image, would defeat the point of parking the panel.
#[test]
fn test_stop_parks_the_panel_on_one_fresh_black_frame() {
    // Arrange
    let (mut controller, state) = make_controller();

    // Act
    let remote_path = controller.stop().expect("stop");

    // Assert
    let state = state.lock().unwrap();

    // Exactly one upload, and it is the encoded black mask.
    let black = encode_frame(&generate_mask(MaskKind::Black, &test_geometry())).expect("encode");
    assert_eq!(state.uploads.len(), 1);
    assert_eq!(state.uploads[0].bytes, black);
    assert_eq!(state.uploads[0].remote_path, remote_path);

    // Exactly one display command, aimed at the fresh upload.
    let displays: Vec<&String> = state
        .execs
        .iter()
        .filter(|c| c.starts_with("export DISPLAY=:0; feh"))
        .collect();
    assert_eq!(displays.len(), 1, "stop must issue exactly one display command");
    assert!(displays[0].contains(&remote_path));

    // The viewer kill was issued (fire-and-forget).
    assert!(state.spawns.iter().any(|c| c == "pkill feh"));
}

/// Tests that `close()` releases the link and that a later operation simply
/// reconnects, mirroring a full bench teardown/setup cycle.
#[test]
fn test_close_then_reuse_reconnects_cleanly() {
    let (mut controller, state) = make_controller();

    controller.list_remote_images().expect("list");
    controller.session_mut().close();
    controller.session_mut().close(); // idempotent

    controller.list_remote_images().expect("list after close");
    assert_eq!(state.lock().unwrap().connect_count, 2);
}
