//! Common types used across CLI modules

/// Parse a `key=value` service parameter
///
/// Splits on the first `=`, so values may themselves contain `=`.
pub fn parse_param(input: &str) -> Result<(String, String), String> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", input))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", input));
    }

    Ok((key.to_string(), value.to_string()))
}
