//! JSON-RPC 2.0 channel between the viewer and the page embedding it.
//!
//! Messages travel over `postMessage`; on native builds the outgoing queue is
//! drained without being sent anywhere.
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Viewer (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │ <───────────────── Response (with ID) ─┤
//!        │ <────────── Notification (no ID) ──────┤
//! ```
//!
//! ## Methods
//!
//! - `get_snapshots`: `{count, current_index, snapshots: [{index, file, label}]}`
//! - `set_snapshot {index}`: select a snapshot; goes through the slider like
//!   any other input, so it is clamped and ignored until loading finishes
//! - `get_viewer_state`: `{state, current_index, count, slider}`
//! - `get_fps`: `{fps}`
//!
//! ## Notifications
//!
//! - `snapshots_ready {count, current_index, label}`
//! - `snapshot_changed {index, label}`
//! - `loading_failed {message, kind, reason}`
//! - `fps_update {fps}`
//!
//! ## Error codes
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Snapshots not loaded yet

/// Request handling, notification queue and the postMessage transport.
pub mod web_rpc;
