use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Accepts RFC 3339 (`2020-06-05T00:00:00Z`), a bare UTC date
/// (`2020-06-05`), or whole Unix seconds.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(timestamp) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(timestamp);
    }
    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }
    if let Ok(seconds) = raw.parse::<i64>() {
        return OffsetDateTime::from_unix_timestamp(seconds)
            .with_context(|| format!("{seconds} is outside the supported range"));
    }
    bail!("invalid timestamp {raw:?}: expected RFC 3339, YYYY-MM-DD or Unix seconds")
}

pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String> {
    Ok(timestamp.format(&Rfc3339)?)
}
