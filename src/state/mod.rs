//! Sans-IO channel mode tracker.
//!
//! The tracker does not perform any I/O. The host decodes IRC messages into
//! [`TrackerEvent`]s, feeds them in arrival order together with the
//! [`Connection`] they arrived on, and sends any returned [`TrackerAction`]s
//! back to the server.
//!
//! # Example
//!
//! ```
//! use slirc_chanmodes::state::{
//!     ChanModeTracker, Connection, ConnectionId, TrackerAction, TrackerEvent,
//! };
//!
//! let mut tracker = ChanModeTracker::new();
//! let conn = Connection::new(ConnectionId(1), "bot");
//!
//! let actions = tracker.feed(&conn, &TrackerEvent::CapabilityAnnounced {
//!     tokens: &["CHANMODES=beI,k,l,imnpst", "PREFIX=(ov)@+", "NAMESX"],
//! });
//! assert_eq!(actions, vec![TrackerAction::RequestProtocolExtension("NAMESX".to_string())]);
//!
//! let _ = tracker.feed(&conn, &TrackerEvent::NameListLoaded {
//!     channel: "#rust",
//!     names: &["@+alice bob"],
//! });
//! assert!(tracker.user_has_prefix_mode(ConnectionId(1), "#rust", "alice", 'o'));
//! assert_eq!(tracker.channel_users(ConnectionId(1), "#rust"), vec!["alice", "bob"]);
//! ```

mod events;
mod tracker;

use std::fmt;

pub use tracker::ChanModeTracker;

/// Identifies one IRC connection within a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The connection an event arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection<'a> {
    /// The connection's id.
    pub id: ConnectionId,
    /// Our own current nickname on that connection.
    pub nickname: &'a str,
}

impl<'a> Connection<'a> {
    /// Create a connection handle.
    pub fn new(id: ConnectionId, nickname: &'a str) -> Self {
        Self { id, nickname }
    }

    /// Returns true if `nick` is our own nickname.
    pub fn is_own_nick(&self, nick: &str) -> bool {
        self.nickname == nick
    }
}

/// Decoded IRC events the tracker reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerEvent<'a> {
    /// `RPL_ISUPPORT` (005) tokens, without the target nick and trailing text.
    CapabilityAnnounced {
        /// `KEY` or `KEY=VALUE` tokens.
        tokens: &'a [&'a str],
    },
    /// A `MODE` change.
    ModeChangeObserved {
        /// Target channel; `None` for user mode changes.
        channel: Option<&'a str>,
        /// The mode string, e.g. `+ov-k`.
        modes: &'a str,
        /// Space-separated mode parameters, if any.
        params: Option<&'a str>,
    },
    /// A `JOIN`.
    UserJoined {
        /// The joining nick.
        nick: &'a str,
        /// Comma-separated channel list.
        channels: &'a str,
    },
    /// A `PART`.
    UserParted {
        /// The parting nick.
        nick: &'a str,
        /// Comma-separated channel list.
        channels: &'a str,
    },
    /// A `KICK`.
    UserKicked {
        /// The channel.
        channel: &'a str,
        /// The kicked nick.
        nick: &'a str,
    },
    /// A `QUIT`.
    UserQuit {
        /// The quitting nick.
        nick: &'a str,
    },
    /// A `NICK` change.
    NickChanged {
        /// Nick before the change.
        old_nick: &'a str,
        /// Nick after the change.
        new_nick: &'a str,
    },
    /// `RPL_NAMREPLY` (353) for one channel.
    NameListLoaded {
        /// The channel.
        channel: &'a str,
        /// Decorated names, one per entry or packed in a single entry.
        names: &'a [&'a str],
    },
}

/// Requests the host should send to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackerAction {
    /// Re-request the channel's name list to resynchronize prefix modes.
    RequestNames(String),
    /// Enable a protocol extension, e.g. `NAMESX`.
    RequestProtocolExtension(String),
}

impl TrackerAction {
    /// Render the request as a raw IRC line, without the trailing CRLF.
    pub fn to_line(&self) -> String {
        match self {
            Self::RequestNames(channel) => format!("NAMES {}", channel),
            Self::RequestProtocolExtension(name) => format!("PROTOCTL {}", name),
        }
    }
}

impl fmt::Display for TrackerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
