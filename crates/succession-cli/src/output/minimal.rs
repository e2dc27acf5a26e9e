use serde_json::Value;

use super::cell;

/// Paths tried in order; the first non-null hit is printed.
const PRIORITY_PATHS: &[&[&str]] = &[
    &["summary"],
    &["totals", "total_tax"],
    &["tax"],
    &["path"],
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Nudge lists: one line per nudge.
    if let Value::Array(items) = result {
        for item in items {
            println!("{}", nudge_line(item));
        }
        return;
    }

    // Dossier payloads carry the report under "outputs".
    let target = result.get("outputs").unwrap_or(result);

    if let Some(hit) = PRIORITY_PATHS.iter().find_map(|path| lookup(target, path)) {
        println!("{}", cell(hit));
        return;
    }

    if let Some((key, val)) = target.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, cell(val));
        return;
    }

    println!("{}", cell(target));
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .filter(|v| !v.is_null())
}

fn nudge_line(item: &Value) -> String {
    match (item.get("severity"), item.get("title")) {
        (Some(sev), Some(title)) => {
            format!("[{}] {}", cell(sev).to_uppercase(), cell(title))
        }
        _ => cell(item),
    }
}
