//! Rule-token to example-value mapping.
//!
//! The table is evaluated top to bottom and the first rule that matches the
//! field's token set supplies the example.

use serde_json::{json, Value};

/// Fallback when no rule in [`EXAMPLE_RULES`] matches.
pub const DEFAULT_EXAMPLE: &str = "example_string";

/// One row of the lookup table.
pub struct ExampleRule {
    pub name: &'static str,
    pub example: fn(&[String]) -> Option<Value>,
}

pub static EXAMPLE_RULES: &[ExampleRule] = &[
    ExampleRule {
        name: "numeric",
        example: |t| (has(t, "numeric") || has(t, "integer")).then(|| json!(1)),
    },
    ExampleRule {
        name: "boolean",
        example: |t| has(t, "boolean").then(|| json!(true)),
    },
    ExampleRule {
        name: "email",
        example: |t| has(t, "email").then(|| json!("user@example.com")),
    },
    ExampleRule {
        name: "date",
        example: |t| (has(t, "date") || has_prefix(t, "date_format:")).then(|| json!("2024-01-01")),
    },
    ExampleRule {
        name: "uuid",
        example: |t| has(t, "uuid").then(|| json!("00000000-0000-0000-0000-000000000000")),
    },
    ExampleRule {
        name: "url",
        example: |t| has(t, "url").then(|| json!("https://example.com")),
    },
    ExampleRule {
        name: "ip",
        example: |t| has(t, "ip").then(|| json!("127.0.0.1")),
    },
    ExampleRule {
        name: "in",
        example: |t| {
            t.iter()
                .find_map(|r| r.strip_prefix("in:"))
                .map(|options| json!(options.split(',').next().unwrap_or_default().trim()))
        },
    },
    ExampleRule {
        name: "array",
        example: |t| has(t, "array").then(|| json!([])),
    },
    ExampleRule {
        name: "nullable",
        example: |t| (t.len() == 1 && t[0] == "nullable").then_some(Value::Null),
    },
];

fn has(tokens: &[String], rule: &str) -> bool {
    tokens.iter().any(|t| t == rule)
}

fn has_prefix(tokens: &[String], prefix: &str) -> bool {
    tokens.iter().any(|t| t.starts_with(prefix))
}

/// Example value for a field, given its trimmed rule tokens.
pub fn example_value(tokens: &[String]) -> Value {
    EXAMPLE_RULES
        .iter()
        .find_map(|rule| (rule.example)(tokens))
        .unwrap_or_else(|| json!(DEFAULT_EXAMPLE))
}

/// `true` when the field expects an uploaded file.
pub fn is_file_type(tokens: &[String]) -> bool {
    tokens.iter().any(|t| {
        let t = t.trim();
        t == "file" || t == "image" || t.starts_with("mimes:") || t.starts_with("mimetypes:")
    })
}
