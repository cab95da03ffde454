use anyhow::Context;
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid {field} '{raw}': expected YYYY-MM-DD"))
}

/// Parse an optional date argument.
pub fn parse_optional_date(raw: Option<&str>, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    raw.map(|raw| parse_date(raw, field)).transpose()
}

/// Parse a deadline argument. `none` (or an empty value) clears it.
pub fn parse_deadline(raw: &str) -> anyhow::Result<Option<NaiveDate>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_date(trimmed, "deadline").map(Some)
}
