//! Channel mode tracking example
//!
//! Replays a short scripted session against a tracker and prints what it
//! knows after each event. Requests the tracker wants sent back to the
//! server are printed as raw lines.
//!
//! Run with `RUST_LOG=debug` to see the tracker's own diagnostics.

use slirc_chanmodes::{ChanModeTracker, Connection, ConnectionId, TrackerEvent};
use tracing_subscriber::EnvFilter;

const CHANNEL: &str = "#slirc";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let id = ConnectionId(1);
    let conn = Connection::new(id, "slircbot");
    let mut tracker = ChanModeTracker::new();

    let script = [
        (
            ":irc.example.net 005 slircbot CHANMODES=beI,k,l,imnpst PREFIX=(qaohv)~&@%+ NAMESX",
            TrackerEvent::CapabilityAnnounced {
                tokens: &["CHANMODES=beI,k,l,imnpst", "PREFIX=(qaohv)~&@%+", "NAMESX"],
            },
        ),
        (
            ":slircbot!bot@host JOIN #slirc",
            TrackerEvent::UserJoined {
                nick: "slircbot",
                channels: CHANNEL,
            },
        ),
        (
            ":irc.example.net 353 slircbot = #slirc :slircbot ~@founder %+helper visitor",
            TrackerEvent::NameListLoaded {
                channel: CHANNEL,
                names: &["slircbot ~@founder %+helper visitor"],
            },
        ),
        (
            ":founder!f@host MODE #slirc +v-h visitor helper",
            TrackerEvent::ModeChangeObserved {
                channel: Some(CHANNEL),
                modes: "+v-h",
                params: Some("visitor helper"),
            },
        ),
        (
            ":visitor!v@host NICK regular",
            TrackerEvent::NickChanged {
                old_nick: "visitor",
                new_nick: "regular",
            },
        ),
        (
            ":founder!f@host MODE #slirc +X regular",
            TrackerEvent::ModeChangeObserved {
                channel: Some(CHANNEL),
                modes: "+X",
                params: Some("regular"),
            },
        ),
        (
            ":irc.example.net 353 slircbot = #slirc :slircbot ~@founder +helper +regular",
            TrackerEvent::NameListLoaded {
                channel: CHANNEL,
                names: &["slircbot ~@founder +helper +regular"],
            },
        ),
        (
            ":helper!h@host PART #slirc",
            TrackerEvent::UserParted {
                nick: "helper",
                channels: CHANNEL,
            },
        ),
    ];

    for (line, event) in &script {
        println!("<< {}", line);
        for action in tracker.feed(&conn, event) {
            println!(">> {}", action.to_line());
        }
        print_roster(&tracker, id);
    }
}

fn print_roster(tracker: &ChanModeTracker, id: ConnectionId) {
    let prefixes = tracker.prefix_map(id);
    let users = tracker.channel_users(id, CHANNEL);
    let decorated: Vec<String> = users
        .iter()
        .map(|nick| {
            let marks: String = tracker
                .user_prefix_modes(id, CHANNEL, nick)
                .into_iter()
                .filter_map(|mode| prefixes.prefix_for_mode(mode))
                .collect();
            format!("{}{}", marks, nick)
        })
        .collect();
    println!("   {} [{}]", CHANNEL, decorated.join(" "));
}
