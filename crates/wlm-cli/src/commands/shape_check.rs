use crate::support::{load_shape_or_exit, render_json_or_exit};
use serde_json::json;
use wlm_fold::{FieldPath, Shape};

pub fn run(shape_path: String, json_output: bool) {
    let shape = load_shape_or_exit(&shape_path);
    let mode = if shape.group_key.is_some() {
        "group"
    } else {
        "map"
    };
    let error = check(&shape).err();
    let result = if error.is_none() {
        "accepted"
    } else {
        "rejected"
    };

    let prefixes: Vec<String> = shape
        .fields
        .placeholder_prefixes()
        .into_iter()
        .map(|prefix| FieldPath::new(prefix.to_vec()).to_string())
        .collect();

    if json_output {
        let fields: serde_json::Map<String, serde_json::Value> = shape
            .fields
            .iter()
            .map(|(field, path)| (field.to_string(), json!(path.to_string())))
            .collect();
        let payload = json!({
            "shape": shape_path,
            "mode": mode,
            "group_key": shape.group_key,
            "result": result,
            "error": error,
            "field_count": shape.fields.len(),
            "fields": fields,
            "placeholder_prefixes": prefixes,
        });
        println!("{}", render_json_or_exit(&payload));
    } else {
        println!("wlm shape-check {shape_path}");
        println!("  Mode: {mode}");
        if let Some(key) = &shape.group_key {
            println!("  Group key: {key}");
        }
        println!("  Fields: {}", shape.fields.len());
        for (field, path) in shape.fields.iter() {
            println!("    {field} -> {path}");
        }
        if !prefixes.is_empty() {
            println!("  Placeholder prefixes: {}", prefixes.join(", "));
        }
        println!("  Result: {result}");
        if let Some(error) = &error {
            println!("  Error: {error}");
        }
    }

    if error.is_some() {
        std::process::exit(1);
    }
}

/// A grouping shape must build a grouper; a mapping shape must build a
/// mapper, so it cannot use placeholders.
fn check(shape: &Shape) -> Result<(), String> {
    if shape.group_key.is_some() {
        shape.grouper().map(|_| ()).map_err(|e| e.to_string())
    } else {
        shape.mapper().map(|_| ()).map_err(|e| e.to_string())
    }
}
