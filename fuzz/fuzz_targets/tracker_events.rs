//! Fuzz target for the tracker's ISUPPORT and NAMES handling
//!
//! Feeds arbitrary capability tokens followed by an arbitrary name list and
//! checks the queries stay consistent with the roster.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_chanmodes::{ChanModeTracker, Connection, ConnectionId, TrackerEvent};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = str::from_utf8(data) else {
        return;
    };
    let (caps, names) = input.split_once('\n').unwrap_or((input, ""));
    let tokens: Vec<&str> = caps.split(' ').collect();

    let id = ConnectionId(1);
    let conn = Connection::new(id, "bot");
    let mut tracker = ChanModeTracker::new();
    let _ = tracker.feed(&conn, &TrackerEvent::CapabilityAnnounced { tokens: &tokens });
    let _ = tracker.feed(
        &conn,
        &TrackerEvent::NameListLoaded {
            channel: "#fuzz",
            names: &[names],
        },
    );

    let prefixes = tracker.prefix_map(id);
    for nick in tracker.channel_users(id, "#fuzz") {
        assert!(!nick.is_empty());
        assert!(!nick.chars().any(|c| prefixes.is_prefix(c)));
        assert!(tracker.is_user_in_channel(id, "#fuzz", nick));
    }
});
