//! CSV export of RSVPs for the admin download.

#[cfg(test)]
#[path = "csv_test.rs"]
mod csv_test;

use time::format_description::well_known::Rfc3339;

use crate::records::RsvpRecord;

pub const RSVP_CSV_HEADER: &str = "name,favoriteSong,isAttending,createdAt";

/// Render `rsvps` as CSV. Every value is quoted; an empty slice yields an
/// empty string so the download is an empty file rather than a bare header.
#[must_use]
pub fn rsvps_to_csv(rsvps: &[RsvpRecord]) -> String {
    if rsvps.is_empty() {
        return String::new();
    }
    let mut rows = Vec::with_capacity(rsvps.len() + 1);
    rows.push(RSVP_CSV_HEADER.to_owned());
    for r in rsvps {
        let created_at = r.created_at.format(&Rfc3339).unwrap_or_default();
        let attending = if r.is_attending { "true" } else { "false" };
        rows.push(
            [r.name.as_str(), r.favorite_song.as_str(), attending, created_at.as_str()]
                .map(quote)
                .join(","),
        );
    }
    rows.join("\n")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
