#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::shop_manifest;
use postman_gen::collection::serialize_collection;
use postman_gen::config::GeneratorConfig;
use postman_gen::framework::manifest::Manifest;
use postman_gen::generator::{Generation, Generator};
use serde_json::{json, Value};

fn generate(config: &GeneratorConfig) -> Generation {
    Generator::without_transport(config)
        .generate(&shop_manifest())
        .expect("shop manifest has api routes")
}

fn document(config: &GeneratorConfig) -> Value {
    let generation = generate(config);
    serde_json::from_str(&serialize_collection(&generation.collection).unwrap()).unwrap()
}

fn find_item<'a>(doc: &'a Value, folder: &str, name: &str) -> &'a Value {
    doc["item"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == folder)
        .unwrap_or_else(|| panic!("folder {folder} missing"))["item"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["name"] == name)
        .unwrap_or_else(|| panic!("item {name} missing in {folder}"))
}

#[test]
fn test_folders_in_first_seen_order() {
    let doc = document(&GeneratorConfig::default());
    let folders: Vec<&str> = doc["item"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(folders, vec!["Users", "Orders", "Uploads", "Reports", "Internals"]);
    assert_eq!(
        doc["info"],
        json!({
            "name": "Laravel API",
            "schema": "https://schema.getpostman.com/json/collection/v2.1.0/collection.json"
        })
    );
}

#[test]
fn test_raw_body_for_simple_rules() {
    let doc = document(&GeneratorConfig::default());
    let item = find_item(&doc, "Users", "Create User");
    let body = &item["request"]["body"];
    assert_eq!(body["mode"], "raw");
    assert_eq!(body["options"]["raw"]["language"], "json");
    let raw: Value = serde_json::from_str(body["raw"].as_str().unwrap()).unwrap();
    assert_eq!(raw, json!({ "name": "example_string", "age": 1 }));
    assert_eq!(
        body["raw"].as_str().unwrap(),
        "{\n    \"name\": \"example_string\",\n    \"age\": 1\n}"
    );
    assert_eq!(item["request"]["auth"]["type"], "bearer");
}

#[test]
fn test_path_parameters_become_variables() {
    let doc = document(&GeneratorConfig::default());
    let item = find_item(&doc, "Orders", "GET {Order_Id}");
    let url = &item["request"]["url"];
    assert_eq!(url["raw"], "{{base_url}}/api/orders/:order_id");
    assert_eq!(url["host"], json!(["{{base_url}}"]));
    assert_eq!(url["path"], json!(["api", "orders", ":order_id"]));
    assert_eq!(url["variable"], json!([{ "key": "order_id", "value": "" }]));
    assert!(item["request"].get("body").is_none());
}

#[test]
fn test_union_parameter_and_method_specific_rules() {
    let doc = document(&GeneratorConfig::default());
    let item = find_item(&doc, "Orders", "PATCH {Order_Id}");
    let raw: Value =
        serde_json::from_str(item["request"]["body"]["raw"].as_str().unwrap()).unwrap();
    assert_eq!(raw, json!({ "status": "shipped" }));
    assert_eq!(item["request"]["auth"]["bearer"][0]["value"], "{{token}}");
}

#[test]
fn test_nested_wildcard_rules() {
    let doc = document(&GeneratorConfig::default());
    let item = find_item(&doc, "Orders", "Add Items");
    let raw: Value =
        serde_json::from_str(item["request"]["body"]["raw"].as_str().unwrap()).unwrap();
    assert_eq!(raw, json!({ "items": [{ "id": 1, "qty": 1 }] }));
}

#[test]
fn test_file_rules_produce_form_data() {
    let doc = document(&GeneratorConfig::default());
    let item = find_item(&doc, "Uploads", "POST Uploads");
    assert_eq!(
        item["request"]["body"],
        json!({
            "mode": "formdata",
            "formdata": [
                { "key": "title", "value": "example_string", "type": "text" },
                { "key": "avatar", "value": null, "type": "file" },
                { "key": "public", "value": "1", "type": "text" }
            ]
        })
    );
    let headers: Vec<&str> = item["request"]["header"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["key"].as_str().unwrap())
        .collect();
    assert_eq!(headers, vec!["Accept"]);
}

#[test]
fn test_failing_rules_leave_body_out() {
    let doc = document(&GeneratorConfig::default());
    let item = find_item(&doc, "Reports", "POST Reports");
    assert!(item["request"].get("body").is_none());
}

#[test]
fn test_doc_block_description() {
    let doc = document(&GeneratorConfig::default());
    let item = find_item(&doc, "Users", "Users Index");
    assert_eq!(item["description"], "Lists every user");
    assert!(item["request"].get("auth").is_none());
}

#[test]
fn test_summary_counts() {
    let generation = generate(&GeneratorConfig::default());
    assert_eq!(generation.summary.total_routes, 8);
    assert_eq!(generation.summary.with_body, 4);
    assert_eq!(generation.summary.without_body(), 4);
}

#[test]
fn test_exclusions() {
    let config = GeneratorConfig {
        exclude_routes: vec!["api/internal/*".into(), "api/[".into()],
        ..Default::default()
    };
    let generation = generate(&config);
    assert_eq!(generation.summary.total_routes, 7);
    assert!(generation
        .collection
        .requests()
        .all(|item| !item.request.url.raw.contains("internal")));
}

#[test]
fn test_auto_examples_off() {
    let config = GeneratorConfig {
        auto_examples: false,
        ..Default::default()
    };
    let generation = generate(&config);
    assert_eq!(generation.summary.with_body, 0);
    assert!(generation.collection.requests().all(|item| item.request.body.is_none()));
}

#[test]
fn test_variables() {
    let config = GeneratorConfig {
        include_tenant_id: true,
        base_url: "https://shop.test".into(),
        collection_name: "Shop".into(),
        ..Default::default()
    };
    let doc = document(&config);
    assert_eq!(
        doc["variable"],
        json!([
            { "key": "base_url", "value": "https://shop.test", "type": "string" },
            { "key": "token", "value": "", "type": "string" },
            { "key": "tenant_id", "value": "", "type": "string" }
        ])
    );
    assert_eq!(doc["info"]["name"], "Shop");
    // request URLs always reference the variable
    assert_eq!(
        find_item(&doc, "Users", "Create User")["request"]["url"]["raw"],
        "{{base_url}}/api/users"
    );
}

#[test]
fn test_output_is_idempotent() {
    let config = GeneratorConfig::default();
    let first = serialize_collection(&generate(&config).collection).unwrap();
    let second = serialize_collection(&generate(&config).collection).unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("{\n    \"info\": {"));
}

#[test]
fn test_name_collisions_are_numbered() {
    let manifest = Manifest::from_value(json!({
        "routes": [
            { "methods": ["GET"], "uri": "api/items", "middleware": ["api"], "name": "items.list" },
            { "methods": ["GET"], "uri": "api/items/all", "middleware": ["api"], "name": "items.list" },
            { "methods": ["GET"], "uri": "api/items/recent", "middleware": ["api"], "name": "items.list" }
        ]
    }))
    .unwrap();
    let generation = Generator::without_transport(&GeneratorConfig::default())
        .generate(&manifest)
        .unwrap();
    let names: Vec<&str> = generation.collection.requests().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Items List", "Items List (2)", "Items List (3)"]);
}

#[test]
fn test_non_ascii_is_written_unescaped() {
    let manifest = Manifest::from_value(json!({
        "routes": [{ "methods": ["GET"], "uri": "api/cafés", "middleware": ["api"], "name": "cafés.index" }]
    }))
    .unwrap();
    let generation = Generator::without_transport(&GeneratorConfig::default())
        .generate(&manifest)
        .unwrap();
    let json = serialize_collection(&generation.collection).unwrap();
    assert!(json.contains("api/cafés"));
    assert!(!json.contains("\\u00e9"));
}
