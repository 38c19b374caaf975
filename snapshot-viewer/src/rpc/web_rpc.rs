use bevy::diagnostic::DiagnosticsStore;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::manifest::SnapshotManifest;
use crate::engine::core::app_state::AppState;
use crate::engine::scene::registry::SnapshotRegistry;
use crate::engine::systems::fps_tracking::smoothed_fps;
use crate::ui::slider::{SliderInput, SliderInputSource, SnapshotSlider};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing queue to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

/// Plugin establishing the postMessage channel to the embedding page.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::{Arc, Mutex};

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let registered = window().map(|window| {
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    });
    match registered {
        Some(Ok(())) => {}
        Some(Err(error)) => error!("Failed to register message listener: {:?}", error),
        None => error!("Window object not available"),
    }

    // The listener lives for the whole page.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw RPC message from the host page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only view of the viewer that request handlers answer from.
pub struct RpcContext<'a> {
    pub state: AppState,
    pub manifest: Option<&'a SnapshotManifest>,
    pub registry: Option<&'a SnapshotRegistry>,
    pub slider: &'a SnapshotSlider,
    pub fps: f32,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    state: Option<Res<State<AppState>>>,
    manifest: Option<Res<SnapshotManifest>>,
    registry: Option<Res<SnapshotRegistry>>,
    slider: Res<SnapshotSlider>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut slider_inputs: EventWriter<SliderInput>,
) {
    if events.is_empty() {
        return;
    }

    let context = RpcContext {
        state: state.map(|state| *state.get()).unwrap_or_default(),
        manifest: manifest.as_deref(),
        registry: registry.as_deref(),
        slider: &slider,
        fps: smoothed_fps(&diagnostics),
    };

    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                let mut inputs = Vec::new();
                if let Some(response) = handle_rpc_request(&request, &context, &mut inputs) {
                    rpc_interface.queue_response(response);
                }
                slider_inputs.write_batch(inputs);
            }
            Err(parse_error) => warn!("Ignoring malformed RPC message: {}", parse_error),
        }
    }
}

/// Answer one request. `set_snapshot` is turned into a slider input so the
/// host goes through the same path as the page slider.
pub fn handle_rpc_request(
    request: &RpcRequest,
    context: &RpcContext,
    slider_inputs: &mut Vec<SliderInput>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "get_snapshots" => handle_get_snapshots(context),
        "set_snapshot" => handle_set_snapshot(&request.params, context, slider_inputs),
        "get_viewer_state" => handle_get_viewer_state(context),
        "get_fps" => Ok(serde_json::json!({ "fps": context.fps })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    // Notifications carry no ID and get no response.
    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    })
}

fn handle_get_snapshots(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let snapshots: Vec<serde_json::Value> = context
        .manifest
        .map(|manifest| {
            manifest
                .entries()
                .iter()
                .enumerate()
                .map(|(index, entry)| {
                    serde_json::json!({
                        "index": index,
                        "file": entry.file,
                        "label": entry.label(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(serde_json::json!({
        "count": snapshots.len(),
        "current_index": context.registry.map(SnapshotRegistry::current_index),
        "snapshots": snapshots,
    }))
}

fn handle_set_snapshot(
    params: &serde_json::Value,
    context: &RpcContext,
    slider_inputs: &mut Vec<SliderInput>,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SetSnapshotParams {
        index: i64,
    }

    let params = serde_json::from_value::<SetSnapshotParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected integer 'index' parameter"))?;

    let index = context
        .slider
        .accept(params.index)
        .ok_or_else(|| RpcError::internal_error("Snapshots are not loaded yet"))?;

    slider_inputs.push(SliderInput::new(params.index, SliderInputSource::Rpc));
    Ok(serde_json::json!({
        "success": true,
        "index": index,
    }))
}

fn handle_get_viewer_state(context: &RpcContext) -> Result<serde_json::Value, RpcError> {
    Ok(serde_json::json!({
        "state": context.state.as_str(),
        "current_index": context.registry.map(SnapshotRegistry::current_index),
        "count": context.registry.map(SnapshotRegistry::len).unwrap_or(0),
        "slider": {
            "min": context.slider.min,
            "max": context.slider.max,
            "value": context.slider.value,
            "configured": context.slider.configured,
        },
    }))
}

fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Notifications first, then responses.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Post a serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::manifest::ManifestEntry;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".into(),
            method: method.into(),
            params,
            id: Some(serde_json::json!(7)),
        }
    }

    fn manifest() -> SnapshotManifest {
        SnapshotManifest::from_entries(vec![
            ManifestEntry::new("2021_06.glb"),
            ManifestEntry::new("2022_06.glb"),
        ])
        .unwrap()
    }

    fn running_slider() -> SnapshotSlider {
        let mut slider = SnapshotSlider::default();
        slider.configure(2);
        slider
    }

    #[test]
    fn set_snapshot_becomes_a_slider_input() {
        let manifest = manifest();
        let slider = running_slider();
        let context = RpcContext {
            state: AppState::Running,
            manifest: Some(&manifest),
            registry: None,
            slider: &slider,
            fps: 60.0,
        };

        let mut inputs = Vec::new();
        let response = handle_rpc_request(
            &request("set_snapshot", serde_json::json!({"index": 1})),
            &context,
            &mut inputs,
        )
        .unwrap();

        assert!(response.error.is_none());
        assert_eq!(inputs, [SliderInput::new(1, SliderInputSource::Rpc)]);
        assert_eq!(response.id, Some(serde_json::json!(7)));
    }

    #[test]
    fn set_snapshot_before_loading_is_an_internal_error() {
        let slider = SnapshotSlider::default();
        let context = RpcContext {
            state: AppState::Loading,
            manifest: None,
            registry: None,
            slider: &slider,
            fps: 0.0,
        };

        let mut inputs = Vec::new();
        let response = handle_rpc_request(
            &request("set_snapshot", serde_json::json!({"index": 0})),
            &context,
            &mut inputs,
        )
        .unwrap();

        assert_eq!(response.error.map(|error| error.code), Some(-32603));
        assert!(inputs.is_empty());
    }

    #[test]
    fn bad_params_and_unknown_methods_are_rejected() {
        let slider = running_slider();
        let context = RpcContext {
            state: AppState::Running,
            manifest: None,
            registry: None,
            slider: &slider,
            fps: 0.0,
        };
        let mut inputs = Vec::new();

        let response = handle_rpc_request(
            &request("set_snapshot", serde_json::json!({"index": "first"})),
            &context,
            &mut inputs,
        )
        .unwrap();
        assert_eq!(response.error.map(|error| error.code), Some(-32602));

        let response = handle_rpc_request(
            &request("reload_models", serde_json::Value::Null),
            &context,
            &mut inputs,
        )
        .unwrap();
        assert_eq!(response.error.map(|error| error.code), Some(-32601));
        assert!(inputs.is_empty());
    }

    #[test]
    fn snapshot_listing_uses_manifest_order_and_labels() {
        let manifest = manifest();
        let registry = SnapshotRegistry::populate([Entity::from_raw(1), Entity::from_raw(2)]);
        let slider = running_slider();
        let context = RpcContext {
            state: AppState::Running,
            manifest: Some(&manifest),
            registry: Some(&registry),
            slider: &slider,
            fps: 0.0,
        };

        let response = handle_rpc_request(
            &request("get_snapshots", serde_json::Value::Null),
            &context,
            &mut Vec::new(),
        )
        .unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["count"], 2);
        assert_eq!(result["current_index"], 0);
        assert_eq!(result["snapshots"][1]["file"], "2022_06.glb");
        assert_eq!(result["snapshots"][1]["label"], "2022_06");
    }

    #[test]
    fn viewer_state_reports_slider_and_state() {
        let slider = running_slider();
        let context = RpcContext {
            state: AppState::WarmingUp,
            manifest: None,
            registry: None,
            slider: &slider,
            fps: 0.0,
        };

        let response = handle_rpc_request(
            &request("get_viewer_state", serde_json::Value::Null),
            &context,
            &mut Vec::new(),
        )
        .unwrap();
        let result = response.result.unwrap();

        assert_eq!(result["state"], "warming_up");
        assert_eq!(result["slider"]["max"], 1);
        assert_eq!(result["slider"]["configured"], true);
    }

    #[test]
    fn notifications_get_no_response() {
        let slider = running_slider();
        let context = RpcContext {
            state: AppState::Running,
            manifest: None,
            registry: None,
            slider: &slider,
            fps: 0.0,
        };
        let mut notification = request("set_snapshot", serde_json::json!({"index": 1}));
        notification.id = None;

        let mut inputs = Vec::new();
        assert!(handle_rpc_request(&notification, &context, &mut inputs).is_none());
        assert_eq!(inputs.len(), 1);
    }
}
