use serde::de::DeserializeOwned;

/// Parse an enum value through its serde spelling. Hyphens and spaces are
/// read as underscores so `in-progress` and `"in progress"` both work.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}
