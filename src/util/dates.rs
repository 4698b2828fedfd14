use time::format_description::well_known::Rfc3339;
use time::formatting::Formattable;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// `Thu, February 29, 2024 at 3:04 PM`
pub fn long_date(raw: &str) -> String {
    format_with(
        raw,
        format_description!(
            "[weekday repr:short], [month repr:long] [day padding:none], [year] at [hour repr:12 padding:none]:[minute] [period]"
        ),
    )
}

/// `Feb 29, 2024`
pub fn medium_date(raw: &str) -> String {
    format_with(
        raw,
        format_description!("[month repr:short] [day padding:none], [year]"),
    )
}

/// `2/29/2024`
pub fn short_date(raw: &str) -> String {
    format_with(
        raw,
        format_description!("[month padding:none]/[day padding:none]/[year]"),
    )
}

pub fn parse(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }
    // Some endpoints send naive `YYYY-MM-DD HH:MM:SS`; treat it as UTC.
    PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

// Unparseable values are shown as given.
fn format_with(raw: &str, fmt: &(impl Formattable + ?Sized)) -> String {
    parse(raw)
        .and_then(|dt| dt.format(fmt).ok())
        .unwrap_or_else(|| raw.trim().to_string())
}
