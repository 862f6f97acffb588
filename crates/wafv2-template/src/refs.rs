//! Intrinsic-function reference scanning.
//!
//! Walks a rendered JSON fragment and collects every logical id it points
//! at through `Ref`, `Fn::GetAtt` or a `${...}` variable of `Fn::Sub`.
//! Pseudo parameters (`AWS::Region`, `AWS::AccountId`, ...) are skipped.

use serde_json::Value;

/// One logical id reference found in a template fragment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reference {
    pub target: String,
    /// Set for `Fn::GetAtt` and dotted `Fn::Sub` variables.
    pub attribute: Option<String>,
}

impl Reference {
    fn new(target: &str, attribute: Option<&str>) -> Self {
        Self {
            target: target.to_string(),
            attribute: attribute.map(str::to_string),
        }
    }
}

/// Collects the references in `value`, in document order.
pub fn collect(value: &Value) -> Vec<Reference> {
    let mut found = Vec::new();
    scan(value, &mut found);
    found
}

fn is_pseudo(name: &str) -> bool {
    name.starts_with("AWS::")
}

fn scan(value: &Value, found: &mut Vec<Reference>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| scan(item, found)),
        Value::Object(map) if map.len() == 1 => {
            for (key, inner) in map {
                scan_intrinsic(key, inner, found);
            }
        }
        Value::Object(map) => map.values().for_each(|v| scan(v, found)),
        _ => {}
    }
}

fn scan_intrinsic(key: &str, inner: &Value, found: &mut Vec<Reference>) {
    match (key, inner) {
        ("Ref", Value::String(target)) => {
            if !is_pseudo(target) {
                found.push(Reference::new(target, None));
            }
        }
        ("Fn::GetAtt", Value::Array(parts)) => {
            if let [Value::String(target), Value::String(attr)] = parts.as_slice() {
                found.push(Reference::new(target, Some(attr)));
            }
        }
        ("Fn::GetAtt", Value::String(dotted)) => {
            if let Some((target, attr)) = dotted.split_once('.') {
                found.push(Reference::new(target, Some(attr)));
            }
        }
        ("Fn::Sub", Value::String(template)) => scan_sub(template, &[], found),
        ("Fn::Sub", Value::Array(parts)) => {
            if let [Value::String(template), Value::Object(vars)] = parts.as_slice() {
                let local: Vec<&str> = vars.keys().map(String::as_str).collect();
                scan_sub(template, &local, found);
                vars.values().for_each(|v| scan(v, found));
            }
        }
        _ => scan(inner, found),
    }
}

/// `${Name}` and `${Name.Attr}` variables; `${!Literal}` is an escape.
fn scan_sub(template: &str, local: &[&str], found: &mut Vec<Reference>) {
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        rest = &rest[start + 2..];
        let Some(end) = rest.find('}') else {
            break;
        };
        let var = &rest[..end];
        rest = &rest[end + 1..];

        if var.starts_with('!') || is_pseudo(var) || local.contains(&var) {
            continue;
        }
        match var.split_once('.') {
            Some((target, attr)) => found.push(Reference::new(target, Some(attr))),
            None => found.push(Reference::new(var, None)),
        }
    }
}
