use super::*;
use time::macros::datetime;
use uuid::Uuid;

fn rsvp(name: &str, song: &str, attending: bool) -> RsvpRecord {
    RsvpRecord {
        id: Uuid::new_v4(),
        name: name.into(),
        favorite_song: song.into(),
        is_attending: attending,
        message_image_ref: None,
        created_at: datetime!(2026-06-14 18:30:00 UTC),
    }
}

#[test]
fn empty_listing_is_empty_body() {
    assert_eq!(rsvps_to_csv(&[]), "");
}

#[test]
fn rows_follow_header_and_are_quoted() {
    let csv = rsvps_to_csv(&[rsvp("Amal", "Perfect", true), rsvp("Sami", "", false)]);
    assert_eq!(
        csv,
        "name,favoriteSong,isAttending,createdAt\n\
         \"Amal\",\"Perfect\",\"true\",\"2026-06-14T18:30:00Z\"\n\
         \"Sami\",\"\",\"false\",\"2026-06-14T18:30:00Z\""
    );
}

#[test]
fn embedded_quotes_are_doubled() {
    let csv = rsvps_to_csv(&[rsvp("Amal \"the guest\"", "Don't Stop, Believin'", true)]);
    let row = csv.lines().nth(1).unwrap();
    assert!(row.starts_with("\"Amal \"\"the guest\"\"\",\"Don't Stop, Believin'\","));
}

#[test]
fn no_trailing_newline() {
    let csv = rsvps_to_csv(&[rsvp("Amal", "Perfect", true)]);
    assert!(!csv.ends_with('\n'));
    assert_eq!(csv.lines().count(), 2);
}
