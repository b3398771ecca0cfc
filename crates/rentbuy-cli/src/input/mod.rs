pub mod file;
pub mod stdin;

use rentbuy_core::params::RawInput;
use serde_json::Value;

/// Load the raw parameter map from `--input`, else piped stdin, else an
/// empty map (every key has a default).
pub fn load_raw(path: Option<&str>) -> Result<RawInput, Box<dyn std::error::Error>> {
    let value = match path {
        Some(p) => Some(file::read_value(p)?),
        None => stdin::read_stdin()?,
    };
    match value {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Null) | None => Ok(RawInput::new()),
        Some(other) => Err(format!(
            "Input must be a key/value object, got {}",
            type_name(&other)
        )
        .into()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
