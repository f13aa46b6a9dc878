//! In-process stand-in for the controller's REST API.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use hc2_client::{Hc2Client, Hc2Config};

pub const USER: &str = "admin";
pub const PASSWORD: &str = "secret";

/// `Basic base64("admin:secret")`
const EXPECTED_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

/// Scene id whose actions are answered with an error message.
pub const REJECTING_SCENE: i64 = 666;

#[derive(Default)]
pub struct MockState {
    pub scenes: BTreeMap<i64, Value>,
    pub debug: BTreeMap<i64, Value>,
    pub actions: Vec<(i64, String)>,
    pub next_id: i64,
}

pub type Shared = Arc<Mutex<MockState>>;

/// A running mock controller plus a client pointed at it.
pub struct MockController {
    pub state: Shared,
    pub client: Hc2Client,
    pub base_url: String,
}

impl MockController {
    /// Bind to an ephemeral port and start serving in the background.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState {
            next_id: 100,
            ..MockState::default()
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock controller");
        let addr = listener.local_addr().expect("local addr");
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock controller");
        });

        let base_url = format!("http://{addr}");
        let client = Hc2Client::new(&config(&base_url, PASSWORD)).expect("build client");
        Self {
            state,
            client,
            base_url,
        }
    }

    pub fn seed_scene(&self, id: i64, scene: Value) {
        self.state.lock().unwrap().scenes.insert(id, scene);
    }

    pub fn seed_debug(&self, id: i64, messages: Value) {
        self.state.lock().unwrap().debug.insert(id, messages);
    }

    pub fn stored_scene(&self, id: i64) -> Option<Value> {
        self.state.lock().unwrap().scenes.get(&id).cloned()
    }
}

pub fn config(base_url: &str, password: &str) -> Hc2Config {
    Hc2Config {
        base_url: base_url.to_string(),
        username: USER.to_string(),
        password: password.to_string(),
        create_header: true,
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/scenes", get(list_scenes).post(create_scene))
        .route("/scenes/{id}", get(get_scene).put(put_scene))
        .route("/scenes/{id}/action/{action}", post(scene_action))
        .route("/scenes/{id}/debugMessages", get(debug_messages))
        .route("/rooms/{id}", get(get_room))
        .route("/sections/{id}", get(get_section))
        .route("/devices", get(list_devices))
        .route("/globalVariables", get(list_globals))
        .route("/globalVariables/{name}", get(get_global))
        .route("/settings/info", get(settings_info))
        .route("/settings/network", get(settings_network))
        .route_layer(middleware::from_fn(require_basic_auth))
        .with_state(state);

    // Login status answers without auth so a refused login can be shown.
    Router::new()
        .route("/api/loginStatus", get(login_status))
        .nest("/api", api)
}

async fn require_basic_auth(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == EXPECTED_AUTH);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "wrong credentials").into_response();
    }
    next.run(request).await
}

async fn list_scenes(State(state): State<Shared>) -> Json<Value> {
    let scenes: Vec<Value> = state
        .lock()
        .unwrap()
        .scenes
        .values()
        .map(|s| {
            let mut s = s.clone();
            if let Some(obj) = s.as_object_mut() {
                obj.remove("lua");
            }
            s
        })
        .collect();
    Json(Value::Array(scenes))
}

async fn get_scene(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    match state.lock().unwrap().scenes.get(&id) {
        Some(scene) => Json(scene.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn put_scene(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> StatusCode {
    let mut state = state.lock().unwrap();
    match state.scenes.get_mut(&id) {
        Some(slot) => {
            *slot = body;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn create_scene(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["type"] != "com.fibaro.luaScene" {
        return (StatusCode::BAD_REQUEST, "unsupported scene type").into_response();
    }
    let mut state = state.lock().unwrap();
    state.next_id += 1;
    let id = state.next_id;
    state.scenes.insert(
        id,
        json!({"id": id, "name": body["name"], "type": "com.fibaro.luaScene"}),
    );
    (
        StatusCode::CREATED,
        Json(json!({"id": id, "type": "com.fibaro.luaScene"})),
    )
        .into_response()
}

async fn scene_action(
    State(state): State<Shared>,
    Path((id, action)): Path<(i64, String)>,
) -> Response {
    if id == REJECTING_SCENE {
        return (StatusCode::OK, "scene is disabled").into_response();
    }
    state.lock().unwrap().actions.push((id, action));
    StatusCode::ACCEPTED.into_response()
}

async fn debug_messages(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    match state.lock().unwrap().debug.get(&id) {
        Some(messages) => Json(messages.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_room(Path(id): Path<i64>) -> Response {
    match id {
        3 => Json(json!({"id": 3, "name": "Kitchen", "sectionID": 1})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_section(Path(id): Path<i64>) -> Response {
    match id {
        1 => Json(json!({"id": 1, "name": "Ground floor"})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn list_devices() -> Json<Value> {
    Json(json!([
        {"id": 5, "name": "Remote", "type": "com.fibaro.remoteController", "roomID": 3,
         "interfaces": ["zwaveCentralScene"], "properties": {}},
        {"id": 6, "name": "Lamp", "type": "com.fibaro.binarySwitch", "roomID": 3,
         "interfaces": [], "properties": {"value": "false"}}
    ]))
}

async fn list_globals() -> Json<Value> {
    Json(json!([
        {"name": "Mode", "value": "Away", "isEnum": true, "enumValues": ["Home", "Away"]},
        {"name": "Counter", "value": "3"}
    ]))
}

async fn get_global(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "Mode" => Json(json!({"name": "Mode", "value": "Away"})).into_response(),
        "Night Mode" | "Day/Night" => Json(json!({"name": name, "value": "1"})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn settings_info() -> Json<Value> {
    Json(json!({
        "serialNumber": "HC2-012345",
        "hcName": "HC2-012345",
        "softVersion": "4.560",
        "zwaveVersion": "3.67"
    }))
}

async fn settings_network() -> Json<Value> {
    Json(json!({"dhcp": true, "ip": "10.0.0.2", "mask": "255.255.255.0"}))
}

async fn login_status(request: Request) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == EXPECTED_AUTH);
    if authorized {
        Json(json!({"status": true, "userID": 2, "username": USER, "type": "superuser"}))
            .into_response()
    } else {
        Json(json!({"status": false})).into_response()
    }
}
