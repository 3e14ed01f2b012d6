//! # slirc-chanmodes
//!
//! Sans-IO tracking of IRC channel modes and member prefix modes.
//!
//! ## Features
//!
//! - Learning channel mode kinds from `CHANMODES` and prefix modes from
//!   `PREFIX` (RPL_ISUPPORT), per connection, with configurable defaults
//! - Mode change parsing (`+ov-k nick1 nick2 key`) into per-letter operations
//! - Per-channel membership with prefix modes, kept current from JOIN, PART,
//!   KICK, QUIT, NICK, MODE and NAMES
//! - `NAMESX` detection and NAMES resynchronization on unparsable changes

#![deny(clippy::all)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! ## Quick Start
//!
//! ```rust
//! use slirc_chanmodes::{ChanModeTracker, Connection, ConnectionId, TrackerAction, TrackerEvent};
//!
//! let mut tracker = ChanModeTracker::new();
//! let conn = Connection::new(ConnectionId(1), "bot");
//!
//! let _ = tracker.feed(&conn, &TrackerEvent::CapabilityAnnounced {
//!     tokens: &["CHANMODES=beI,k,l,imnpst", "PREFIX=(qov)~@+"],
//! });
//! let _ = tracker.feed(&conn, &TrackerEvent::UserJoined { nick: "alice", channels: "#rust" });
//! let _ = tracker.feed(&conn, &TrackerEvent::ModeChangeObserved {
//!     channel: Some("#rust"),
//!     modes: "+q",
//!     params: Some("alice"),
//! });
//! assert!(tracker.user_has_prefix_mode(ConnectionId(1), "#rust", "alice", 'q'));
//!
//! // Unparsable changes drop the channel and ask for a fresh name list.
//! let actions = tracker.feed(&conn, &TrackerEvent::ModeChangeObserved {
//!     channel: Some("#rust"),
//!     modes: "+Z",
//!     params: Some("alice"),
//! });
//! assert_eq!(actions, vec![TrackerAction::RequestNames("#rust".to_string())]);
//! assert_eq!(actions[0].to_line(), "NAMES #rust");
//! ```

pub mod config;
pub mod error;
pub mod isupport;
pub mod membership;
pub mod mode;
pub mod resolver;
pub mod state;

pub use self::config::TrackerConfig;
pub use self::error::{ConfigError, ModeChangeError};
pub use self::isupport::{CapabilityToken, ChanModes, Isupport, PrefixSpec};
pub use self::membership::{Membership, PrefixModes};
pub use self::mode::{
    parse_mode_change, ModeKind, ModeLookup, ModeMaps, ModeOperation, ModeSign, ModeTypeMap,
    PrefixMap,
};
pub use self::resolver::{ModeChar, ModeResolver};
pub use self::state::{ChanModeTracker, Connection, ConnectionId, TrackerAction, TrackerEvent};
