//! Idempotent CRUD Walkthrough
//!
//! Drives the engine end to end against an in-memory fake device that behaves
//! like a model-driven REST backend: duplicate names are rejected with a 422,
//! deleting an unknown id is rejected with a 422, and the host list endpoint
//! pages by limit/offset. Run with `RUST_LOG=debug` to watch the engine work.

use declarest::{
    ApiConnection, ConfigResource, HttpMethod, OperationOutcome, OperationSpec, RequestParams,
    ResponseEnvelope,
};
use serde_json::{Map, Value, json};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory "device" serving a single Host model.
struct FakeDevice {
    hosts: RefCell<Vec<Value>>,
    next_id: Cell<u64>,
}

impl FakeDevice {
    fn new() -> Self {
        Self {
            hosts: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    fn specs() -> Vec<OperationSpec> {
        vec![
            OperationSpec::new("addHost", "/object/hosts", HttpMethod::Post).for_model("Host"),
            OperationSpec::new("editHost", "/object/hosts/{objId}", HttpMethod::Put)
                .for_model("Host"),
            OperationSpec::new("deleteHost", "/object/hosts/{objId}", HttpMethod::Delete)
                .for_model("Host"),
            OperationSpec::new("getHost", "/object/hosts/{objId}", HttpMethod::Get)
                .for_model("Host"),
            OperationSpec::new("getHostList", "/object/hosts", HttpMethod::Get).for_model("Host"),
        ]
    }

    fn create(&self, body: &Map<String, Value>) -> ResponseEnvelope {
        let name = body.get("name").cloned().unwrap_or(Value::Null);
        if self.hosts.borrow().iter().any(|host| host["name"] == name) {
            return ResponseEnvelope::error(
                422,
                json!({"error": "Validation failed due to a duplicate name"}),
            );
        }

        let mut stored = body.clone();
        stored.insert("id".to_string(), json!(format!("host-{}", self.next_id.get())));
        self.next_id.set(self.next_id.get() + 1);
        let stored = Value::Object(stored);
        self.hosts.borrow_mut().push(stored.clone());
        ResponseEnvelope::ok(stored)
    }

    fn replace(&self, id: Option<&str>, body: &Map<String, Value>) -> ResponseEnvelope {
        let mut hosts = self.hosts.borrow_mut();
        let Some(host) = hosts
            .iter_mut()
            .find(|host| host["id"].as_str() == id && id.is_some())
        else {
            return Self::unknown_id();
        };

        let mut replaced = body.clone();
        replaced.insert("id".to_string(), host["id"].clone());
        *host = Value::Object(replaced);
        ResponseEnvelope::ok(host.clone())
    }

    fn remove(&self, id: Option<&str>) -> ResponseEnvelope {
        let mut hosts = self.hosts.borrow_mut();
        let Some(position) = hosts
            .iter()
            .position(|host| host["id"].as_str() == id && id.is_some())
        else {
            return Self::unknown_id();
        };
        let removed = hosts.remove(position);
        ResponseEnvelope::ok(removed)
    }

    fn fetch(&self, id: Option<&str>) -> ResponseEnvelope {
        let host = self
            .hosts
            .borrow()
            .iter()
            .find(|host| host["id"].as_str() == id && id.is_some())
            .cloned()
            .unwrap_or(Value::Null);
        ResponseEnvelope::ok(host)
    }

    fn list(&self, query: &Map<String, Value>) -> ResponseEnvelope {
        let limit = query.get("limit").and_then(Value::as_u64).unwrap_or(10) as usize;
        let offset = query.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
        let page: Vec<Value> = self
            .hosts
            .borrow()
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        ResponseEnvelope::ok(json!({ "items": page }))
    }

    fn unknown_id() -> ResponseEnvelope {
        ResponseEnvelope::error(
            422,
            json!({"error": "Validation failed due to an invalid UUID"}),
        )
    }
}

impl ApiConnection for FakeDevice {
    fn get_operation_spec(&self, operation_name: &str) -> Option<OperationSpec> {
        Self::specs()
            .into_iter()
            .find(|spec| spec.name == operation_name)
    }

    fn get_operation_specs_by_model_name(
        &self,
        model_name: &str,
    ) -> HashMap<String, OperationSpec> {
        Self::specs()
            .into_iter()
            .filter(|spec| spec.model_name.as_deref() == Some(model_name))
            .map(|spec| (spec.name.clone(), spec))
            .collect()
    }

    fn send_request(
        &self,
        url_path: &str,
        http_method: HttpMethod,
        body_params: Option<&Map<String, Value>>,
        path_params: Option<&Map<String, Value>>,
        query_params: Option<&Map<String, Value>>,
    ) -> ResponseEnvelope {
        let empty = Map::new();
        let body = body_params.unwrap_or(&empty);
        let query = query_params.unwrap_or(&empty);
        let id = path_params
            .and_then(|params| params.get("objId"))
            .and_then(Value::as_str);

        match (http_method, url_path) {
            (HttpMethod::Post, "/object/hosts") => self.create(body),
            (HttpMethod::Put, "/object/hosts/{objId}") => self.replace(id, body),
            (HttpMethod::Delete, "/object/hosts/{objId}") => self.remove(id),
            (HttpMethod::Get, "/object/hosts/{objId}") => self.fetch(id),
            (HttpMethod::Get, "/object/hosts") => self.list(query),
            _ => ResponseEnvelope::error(404, json!({"error": "no such route"})),
        }
    }

    fn validate_query_params(
        &self,
        _operation_name: &str,
        _params: &Map<String, Value>,
    ) -> Result<(), Value> {
        Ok(())
    }

    fn validate_path_params(
        &self,
        _operation_name: &str,
        _params: &Map<String, Value>,
    ) -> Result<(), Value> {
        Ok(())
    }

    fn validate_data(
        &self,
        operation_name: &str,
        params: &Map<String, Value>,
    ) -> Result<(), Value> {
        // The Host model requires a name on create and replace.
        if (operation_name.starts_with("add") || operation_name.starts_with("edit"))
            && !params.contains_key("name")
        {
            return Err(json!({"name": "a host requires a name"}));
        }
        Ok(())
    }
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("literal must be an object")
}

fn describe(outcome: &OperationOutcome) -> String {
    match outcome {
        OperationOutcome::Success(body) => format!("✅ success: {body}"),
        OperationOutcome::UnknownOperation(name) => format!("❓ unknown operation '{name}'"),
        OperationOutcome::ValidationFailed(report) => format!("🚫 invalid parameters: {report}"),
        OperationOutcome::DryRunAborted => "🌵 dry run, nothing sent".to_string(),
        OperationOutcome::ServerFailed { status_code, body } => {
            format!("💥 server failure {status_code}: {body}")
        }
        OperationOutcome::ConfigConflict { message, existing } => format!(
            "⚠️  conflict: {message} existing: {}",
            existing.clone().unwrap_or(Value::Null)
        ),
    }
}

fn main() {
    env_logger::init();

    println!("🚀 Idempotent CRUD against a fake device");
    println!("========================================\n");

    let resource = ConfigResource::new(FakeDevice::new());
    let dmz = RequestParams::new()
        .with_data(object(json!({"name": "dmz-host", "value": "10.1.1.1"})));

    // 1. Create, then retry the identical create. The retry hits the device's
    //    duplicate-name rejection and reconciles to the existing object.
    println!("📦 CREATE");
    let created = resource.perform("addHost", &dmz);
    println!("   first:  {}", describe(&created));
    println!("   retry:  {}", describe(&resource.perform("addHost", &dmz)));

    // 2. Same name, different fields: a real conflict.
    println!("\n📦 CONFLICTING CREATE");
    let other = RequestParams::new()
        .with_data(object(json!({"name": "dmz-host", "value": "10.9.9.9"})));
    println!("   {}", describe(&resource.perform("addHost", &other)));

    // 3. Edit to the state the object already has (no write goes out), then
    //    edit to a new value.
    let id = created
        .into_success()
        .and_then(|body| body["id"].as_str().map(str::to_string))
        .expect("create succeeded above");
    println!("\n✏️  EDIT host {id}");
    let same = dmz.clone().with_path_params(object(json!({"objId": id})));
    println!("   no-op:  {}", describe(&resource.perform("editHost", &same)));
    let changed = RequestParams::new()
        .with_data(object(json!({"name": "dmz-host", "value": "10.1.1.2"})))
        .with_path_params(object(json!({"objId": id})));
    println!("   write:  {}", describe(&resource.perform("editHost", &changed)));

    // 4. Grow the collection past one page, then filter it client-side.
    println!("\n🔍 FIND BY FILTER");
    for index in 0..12 {
        let host = RequestParams::new().with_data(object(json!({
            "name": format!("lan-host-{index}"),
            "value": format!("10.2.0.{index}")
        })));
        resource.perform("addHost", &host);
    }
    let filter = RequestParams::new()
        .with_filters(object(json!({"name": "lan-host-7"})));
    println!("   {}", describe(&resource.perform("getHostList", &filter)));

    // 5. Delete, then delete again. The second call is already satisfied.
    println!("\n🗑️  DELETE host {id}");
    let by_id = RequestParams::new().with_path_params(object(json!({"objId": id})));
    println!("   first:  {}", describe(&resource.perform("deleteHost", &by_id)));
    println!("   retry:  {}", describe(&resource.perform("deleteHost", &by_id)));

    // 6. Parameter validation happens before anything is sent.
    println!("\n🚫 VALIDATION");
    let nameless = RequestParams::new().with_data(object(json!({"value": "10.3.0.1"})));
    println!("   {}", describe(&resource.perform("addHost", &nameless)));

    println!("\n🧾 session changed the device: {}", resource.config_changed());

    // 7. Check mode: mutations are validated and skipped, reads still run.
    println!("\n🌵 CHECK MODE");
    let dry = ConfigResource::new(FakeDevice::new()).check_mode(true);
    println!("   add:    {}", describe(&dry.perform("addHost", &dmz)));
    let list_all = RequestParams::new()
        .with_filters(object(json!({"name": "dmz-host"})));
    println!("   find:   {}", describe(&dry.perform("getHostList", &list_all)));
    println!("   dry run changed the device: {}", dry.config_changed());
}
