use chrono::{DateTime, Utc};

/// Format how long ago `created` was, relative to `now`.
///
/// Under a minute (including timestamps in the future) reads "just now";
/// then minutes, hours, and whole days.
pub fn relative_time(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(created);
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();

    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", diff.num_days())
}

/// [`relative_time`] for an RFC 3339 string, measured against the current
/// time. Returns `None` for unparseable input.
pub fn time_since(created_at: &str) -> Option<String> {
    let created = DateTime::parse_from_rfc3339(created_at)
        .ok()?
        .with_timezone(&Utc);
    Some(relative_time(created, Utc::now()))
}
