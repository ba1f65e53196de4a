use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use sphere_cloud_core::{ColorMode, GenerationParams, Rgb};

use crate::engine::point_cloud::{CloudSettings, RegenerateCloud};

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

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Partial update for [`GenerationParams`]: the control panel only sends the
/// field it changed. Colour arrives as the picker's hex string and recovers
/// to the default on malformed input.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationParamsPatch {
    pub seed: Option<u32>,
    pub count: Option<usize>,
    pub radius: Option<f32>,
    pub noise: Option<f32>,
    pub color_mode: Option<ColorMode>,
    pub color: Option<String>,
}

impl GenerationParamsPatch {
    pub fn apply(&self, params: &mut GenerationParams) {
        if let Some(seed) = self.seed {
            params.seed = seed;
        }
        if let Some(count) = self.count {
            params.count = count;
        }
        if let Some(radius) = self.radius {
            params.radius = radius;
        }
        if let Some(noise) = self.noise {
            params.noise = noise;
        }
        if let Some(color_mode) = self.color_mode {
            params.color_mode = color_mode;
        }
        if let Some(ref hex) = self.color {
            params.color = Some(Rgb::from_hex(hex));
        }
    }
}

/// Resource managing bidirectional RPC communication with the parent page.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send a notification to the parent page without expecting a response.
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
}

/// Plugin establishing the postMessage RPC layer for iframe deployment.
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
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Validate the RPC shape cheaply before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        window
            .add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
            .expect("Failed to register message listener");
    }

    // Transfer closure ownership to JS so the listener outlives this system.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping the thread-safe message queue filled by the listener.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the parent page.
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

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut settings: ResMut<CloudSettings>,
    mut regenerate: EventWriter<RegenerateCloud>,
) {
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                let is_param_change = request.method == "set_generation_params";
                if let Some(response) = handle_rpc_request(
                    &request,
                    &diagnostics,
                    &mut settings,
                    &mut regenerate,
                ) {
                    let accepted = response.error.is_none();
                    rpc_interface.queue_response(response);

                    // Broadcast the merged parameter set so every control in
                    // the panel can sync, not just the one that changed.
                    if is_param_change && accepted {
                        rpc_interface.send_notification(
                            "generation_params_changed",
                            serde_json::to_value(&settings.params).unwrap_or_default(),
                        );
                    }
                }
            }
            Err(parse_error) => {
                warn!("Discarding unparseable RPC message: {}", parse_error);
            }
        }
    }
}

/// Handle an individual RPC request and build the response for its method.
fn handle_rpc_request(
    request: &RpcRequest,
    diagnostics: &DiagnosticsStore,
    settings: &mut CloudSettings,
    regenerate: &mut EventWriter<RegenerateCloud>,
) -> Option<RpcResponse> {
    // Only requests with ids get responses; notifications have none.
    let id = request.id.clone()?;

    let result = match request.method.as_str() {
        "set_generation_params" => {
            handle_set_generation_params(&request.params, settings, regenerate)
        }
        "set_auto_rotate" => handle_set_auto_rotate(&request.params, settings),
        "get_generation_params" => handle_get_generation_params(settings),
        "get_fps" => handle_get_fps(diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return Some(create_error_response(
                id,
                -32601,
                "Method not found",
                Some(serde_json::json!({"method": request.method})),
            ));
        }
    };

    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Merge a partial parameter patch into the current settings and queue a
/// rebuild.
fn handle_set_generation_params(
    params: &serde_json::Value,
    settings: &mut CloudSettings,
    regenerate: &mut EventWriter<RegenerateCloud>,
) -> Result<serde_json::Value, RpcError> {
    let patch = serde_json::from_value::<GenerationParamsPatch>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected generation parameter fields"))?;

    patch.apply(&mut settings.params);
    regenerate.write(RegenerateCloud);

    info!("Generation parameters updated via RPC");

    serde_json::to_value(&settings.params)
        .map_err(|e| RpcError::invalid_params(&format!("Serialisation failed: {e}")))
}

fn handle_set_auto_rotate(
    params: &serde_json::Value,
    settings: &mut CloudSettings,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct AutoRotateParams {
        enabled: bool,
    }

    let parsed = serde_json::from_value::<AutoRotateParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'enabled' parameter"))?;

    settings.auto_rotate = parsed.enabled;

    Ok(serde_json::json!({ "auto_rotate": settings.auto_rotate }))
}

fn handle_get_generation_params(
    settings: &CloudSettings,
) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(&settings.params)
        .map_err(|e| RpcError::invalid_params(&format!("Serialisation failed: {e}")))
}

/// FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({ "fps": fps }))
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

/// Flush queued notifications and responses to the parent page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send one serialised message to the parent window.
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
        // No-op off the web; keyboard shortcuts drive the native build.
        let _ = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_only_the_supplied_fields() {
        let mut params = GenerationParams::default();
        let patch: GenerationParamsPatch =
            serde_json::from_str(r#"{"count": 2048, "noise": 0.1}"#).unwrap();
        patch.apply(&mut params);

        assert_eq!(params.count, 2048);
        assert_eq!(params.noise, 0.1);
        assert_eq!(params.seed, GenerationParams::default().seed);
        assert_eq!(params.radius, GenerationParams::default().radius);
    }

    #[test]
    fn patch_accepts_a_hex_colour_string() {
        let mut params = GenerationParams::default();
        let patch: GenerationParamsPatch =
            serde_json::from_str(r##"{"color": "#2266ff", "color_mode": "single"}"##).unwrap();
        patch.apply(&mut params);

        let colour = params.color.expect("colour should be set");
        assert!((colour.r - 34.0 / 255.0).abs() < 1e-6);
        assert!((colour.b - 1.0).abs() < 1e-6);
    }

    #[test]
    fn malformed_colour_recovers_to_the_default() {
        let mut params = GenerationParams::default();
        let patch: GenerationParamsPatch =
            serde_json::from_str(r#"{"color": "chartreuse"}"#).unwrap();
        patch.apply(&mut params);

        assert_eq!(params.color, Some(sphere_cloud_core::DEFAULT_SINGLE_COLOR));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let patch: GenerationParamsPatch =
            serde_json::from_str(r#"{"seed": 7, "legacy_field": true}"#).unwrap();
        assert_eq!(patch.seed, Some(7));
    }

    #[test]
    fn requests_parse_with_and_without_ids() {
        let with_id: RpcRequest = serde_json::from_str(
            r#"{"jsonrpc": "2.0", "method": "get_fps", "params": {}, "id": 3}"#,
        )
        .unwrap();
        assert_eq!(with_id.method, "get_fps");
        assert!(with_id.id.is_some());

        let notification: RpcRequest = serde_json::from_str(
            r#"{"jsonrpc": "2.0", "method": "set_auto_rotate", "params": {"enabled": false}, "id": null}"#,
        )
        .unwrap();
        assert!(notification.id.as_ref().is_none_or(|id| id.is_null()));
    }
}
