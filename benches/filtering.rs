//! Filtering Benchmarks
//!
//! Measures the client-side work the engine layers on top of the wire calls:
//! desired-state comparison and paged filter scans. The connection here serves
//! pages straight out of a Vec, so the numbers isolate the engine's own cost.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use declarest::{
    ApiConnection, ConfigResource, HttpMethod, OperationSpec, RequestParams, ResponseEnvelope,
    objects_equal,
};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Connection that answers `getItemList` by slicing an in-memory Vec.
struct SlabConnection {
    items: Vec<Value>,
}

impl SlabConnection {
    fn with_items(count: usize) -> Self {
        Self {
            items: (0..count).map(make_item).collect(),
        }
    }

    fn list_spec() -> OperationSpec {
        OperationSpec::new("getItemList", "/object/items", HttpMethod::Get).for_model("Item")
    }
}

impl ApiConnection for SlabConnection {
    fn get_operation_spec(&self, operation_name: &str) -> Option<OperationSpec> {
        (operation_name == "getItemList").then(Self::list_spec)
    }

    fn get_operation_specs_by_model_name(
        &self,
        model_name: &str,
    ) -> HashMap<String, OperationSpec> {
        if model_name == "Item" {
            HashMap::from([("getItemList".to_string(), Self::list_spec())])
        } else {
            HashMap::new()
        }
    }

    fn send_request(
        &self,
        _url_path: &str,
        _http_method: HttpMethod,
        _body_params: Option<&Map<String, Value>>,
        _path_params: Option<&Map<String, Value>>,
        query_params: Option<&Map<String, Value>>,
    ) -> ResponseEnvelope {
        let query = query_params.cloned().unwrap_or_default();
        let limit = query.get("limit").and_then(Value::as_u64).unwrap_or(10) as usize;
        let offset = query.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
        let page: Vec<Value> = self.items.iter().skip(offset).take(limit).cloned().collect();
        ResponseEnvelope::ok(json!({ "items": page }))
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
        _operation_name: &str,
        _params: &Map<String, Value>,
    ) -> Result<(), Value> {
        Ok(())
    }
}

fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("literal must be an object")
}

fn make_item(id: usize) -> Value {
    json!({
        "id": format!("item-{id}"),
        "name": format!("disk-{id}"),
        "type": if id % 2 == 0 { "disk" } else { "volume" },
        "size": 40 + (id % 10),
        "tags": { "tier": "hot", "zone": format!("z{}", id % 3) }
    })
}

/// Wide server object plus a desired subset of the given width.
fn comparison_pair(desired_fields: usize) -> (Value, Map<String, Value>) {
    let mut existing = Map::new();
    for index in 0..32 {
        existing.insert(format!("field{index}"), json!(format!("value{index}")));
    }
    let desired: Map<String, Value> = existing
        .iter()
        .take(desired_fields)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    (Value::Object(existing), desired)
}

fn bench_desired_state_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("desired_state_comparison");

    for fields in [1usize, 8, 32].iter() {
        group.throughput(Throughput::Elements(*fields as u64));
        group.bench_with_input(BenchmarkId::new("flat_subset", fields), fields, |b, &fields| {
            let (existing, desired) = comparison_pair(fields);
            b.iter(|| black_box(objects_equal(black_box(&existing), black_box(&desired))));
        });
    }

    group.bench_function("nested_subset", |b| {
        let existing = make_item(7);
        let desired = object(json!({
            "name": "disk-7",
            "size": 47,
            "tags": { "zone": "z1" }
        }));
        b.iter(|| black_box(objects_equal(black_box(&existing), black_box(&desired))));
    });

    group.finish();
}

fn bench_filtered_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_scan");

    for count in [10usize, 100, 1000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("full_scan", count), count, |b, &count| {
            let resource = ConfigResource::new(SlabConnection::with_items(count));
            let params = RequestParams::new().with_filters(object(json!({"type": "disk"})));

            b.iter(|| {
                let found = resource.find_objects_by_filter("getItemList", black_box(&params));
                black_box(found)
            });
        });
    }

    group.finish();
}

fn bench_single_item_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_item_lookup");
    let resource = ConfigResource::new(SlabConnection::with_items(1000));

    // The scan stops at the first hit, so where the target sits decides
    // how many pages get fetched.
    for (label, target) in [("front", "item-3"), ("back", "item-997")] {
        group.bench_function(label, |b| {
            let params = RequestParams::new().with_filters(object(json!({"id": target})));

            b.iter(|| {
                let found = resource.find_object_by_filter("getItemList", black_box(&params));
                black_box(found)
            });
        });
    }

    group.finish();
}

criterion_group!(
    filtering_benches,
    bench_desired_state_comparison,
    bench_filtered_scan,
    bench_single_item_lookup
);

criterion_main!(filtering_benches);
