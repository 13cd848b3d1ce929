#![allow(dead_code)]

use postman_gen::framework::manifest::Manifest;
use std::path::{Path, PathBuf};

/// A small shop application: users, orders, uploads and an internal route.
pub const SHOP_MANIFEST: &str = r#"
routes:
  - methods: GET|HEAD
    uri: api/users
    action: App\Http\Controllers\UserController@index
    middleware: [api]
    name: users.index
  - methods: [POST]
    uri: api/users
    action: App\Http\Controllers\UserController@store
    middleware: [api, auth:sanctum]
  - methods: [GET]
    uri: api/orders/{order_id}
    action: App\Http\Controllers\OrderController@show
    middleware: [api]
    parameters: [order_id]
  - methods: [PATCH]
    uri: api/orders/{order_id}
    action: App\Http\Controllers\OrderController@update
    middleware: [api, auth:api]
    parameters: [order_id]
  - methods: [POST]
    uri: api/orders/{order_id}/items
    action: App\Http\Controllers\OrderController@addItems
    middleware: [api]
    parameters: [order_id]
  - methods: [POST]
    uri: api/uploads
    action: App\Http\Controllers\UploadController@store
    middleware: [api]
  - methods: [POST]
    uri: api/reports
    action: App\Http\Controllers\ReportController@store
    middleware: [api]
  - methods: [GET]
    uri: api/internal/health
    middleware: [api]
  - methods: [OPTIONS]
    uri: api/users
    middleware: [api]
  - methods: [GET]
    uri: dashboard
    middleware: [web]
classes:
  App\Http\Controllers\UserController:
    methods:
      index:
        doc: "/** @postman-description Lists every user */"
      store:
        attribute: { name: Create User, description: "", folder: "" }
        parameters: [App\Http\Requests\StoreUserRequest]
  App\Http\Controllers\OrderController:
    methods:
      show:
        parameters: [int]
      update:
        parameters: [[App\Http\Requests\UpdateOrderRequest, string]]
      addItems:
        doc: "/**\n * @postman-name Add Items\n */"
        parameters: [App\Http\Requests\AddItemsRequest]
  App\Http\Controllers\UploadController:
    methods:
      store:
        parameters: [App\Http\Requests\UploadRequest]
  App\Http\Controllers\ReportController:
    methods:
      store:
        parameters: [App\Http\Requests\ReportRequest]
  App\Http\Requests\StoreUserRequest:
    parent: Illuminate\Foundation\Http\FormRequest
    rules:
      name: required|string
      age: required|integer
  App\Http\Requests\UpdateOrderRequest:
    parent: Illuminate\Foundation\Http\FormRequest
    rules:
      status: required|in:pending,shipped
    method_rules:
      patch:
        status: sometimes|in:shipped,delivered
  App\Http\Requests\AddItemsRequest:
    parent: Illuminate\Foundation\Http\FormRequest
    rules:
      items: required|array
      items.*.id: required|integer
      items.*.qty: [required, integer]
  App\Http\Requests\UploadRequest:
    parent: Illuminate\Foundation\Http\FormRequest
    rules:
      title: required|string
      avatar: required|image
      public: boolean
  App\Http\Requests\ReportRequest:
    parent: Illuminate\Foundation\Http\FormRequest
    rules_error: Call to a member function id() on null
"#;

pub fn shop_manifest() -> Manifest {
    let value: serde_json::Value = serde_yaml::from_str(SHOP_MANIFEST).unwrap();
    Manifest::from_value(value).unwrap()
}

/// Write `content` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
