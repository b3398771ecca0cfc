use serde_json::Value;
use std::io::{self, Read};

/// Read a parameter map piped into stdin, as JSON or, failing that, YAML.
/// Returns None for an interactive terminal or empty input.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped(buffer: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => serde_yaml::from_str::<Value>(trimmed)
            .map(Some)
            .map_err(|_| format!("Failed to parse stdin: {json_err}").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_and_yaml() {
        let json = parse_piped(r#"{ "P": 600 }"#).unwrap().unwrap();
        assert_eq!(json["P"], 600);
        let yaml = parse_piped("P: 600\ntarget_city: 北京\n").unwrap().unwrap();
        assert_eq!(yaml["target_city"], "北京");
        assert!(parse_piped("   ").unwrap().is_none());
    }
}
