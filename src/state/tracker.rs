//! Channel mode tracker core and query API.

use std::collections::HashMap;

use tracing::warn;

use crate::config::TrackerConfig;
use crate::error::{ConfigError, Result};
use crate::membership::Membership;
use crate::mode::{parse_mode_change, ModeKind, ModeMaps, ModeOperation, PrefixMap};
use crate::resolver::{checked_char, ModeChar, ModeResolver};

use super::{Connection, ConnectionId, TrackerAction, TrackerEvent};

/// Sans-IO tracker of channel mode maps and member prefix modes.
///
/// State is kept per [`ConnectionId`]. Queries never fail: unknown
/// connections, channels and nicks read as empty.
#[derive(Clone, Debug, Default)]
pub struct ChanModeTracker {
    pub(super) resolver: ModeResolver,
    pub(super) membership: HashMap<ConnectionId, Membership>,
}

impl ChanModeTracker {
    /// Create a tracker with the built-in default maps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker falling back to the given default maps.
    #[must_use]
    pub fn with_defaults(defaults: ModeMaps) -> Self {
        Self {
            resolver: ModeResolver::new(defaults),
            membership: HashMap::new(),
        }
    }

    /// Create a tracker from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured default maps are invalid.
    pub fn with_config(config: &TrackerConfig) -> Result<Self, ConfigError> {
        ModeMaps::from_config(config).map(Self::with_defaults)
    }

    /// Feed a decoded event received on `conn`.
    ///
    /// Returns requests to send back on the same connection.
    #[must_use]
    pub fn feed(&mut self, conn: &Connection<'_>, event: &TrackerEvent<'_>) -> Vec<TrackerAction> {
        match *event {
            TrackerEvent::CapabilityAnnounced { tokens } => self.on_capabilities(conn, tokens),
            TrackerEvent::ModeChangeObserved {
                channel,
                modes,
                params,
            } => self
                .on_mode_change(conn, channel, modes, params)
                .into_iter()
                .collect(),
            TrackerEvent::UserJoined { nick, channels } => {
                self.on_join(conn, nick, channels);
                vec![]
            }
            TrackerEvent::UserParted { nick, channels } => {
                self.on_part(conn, nick, channels);
                vec![]
            }
            TrackerEvent::UserKicked { channel, nick } => {
                self.on_kick(conn, channel, nick);
                vec![]
            }
            TrackerEvent::UserQuit { nick } => {
                self.on_quit(conn, nick);
                vec![]
            }
            TrackerEvent::NickChanged { old_nick, new_nick } => {
                self.on_nick_change(conn, old_nick, new_nick);
                vec![]
            }
            TrackerEvent::NameListLoaded { channel, names } => {
                self.on_names(conn, channel, names);
                vec![]
            }
        }
    }

    /// Drop all state for a connection that has gone away.
    pub fn remove_connection(&mut self, conn: ConnectionId) {
        self.resolver.forget(conn);
        self.membership.remove(&conn);
    }

    /// The per-connection map resolver.
    pub fn resolver(&self) -> &ModeResolver {
        &self.resolver
    }

    /// Membership state for a connection, if any event created it.
    pub fn membership(&self, conn: ConnectionId) -> Option<&Membership> {
        self.membership.get(&conn)
    }

    /// Parse a channel mode change against the connection's maps.
    ///
    /// Failures are logged along with the input before being returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModeChangeError`](crate::error::ModeChangeError)
    /// the parser hit.
    pub fn parse_channel_mode_change<'p>(
        &self,
        conn: ConnectionId,
        modes: &str,
        params: Option<&'p str>,
    ) -> Result<Vec<ModeOperation<'p>>> {
        let maps = self.resolver.maps_for(conn);
        parse_mode_change(&maps, modes, params).map_err(|error| {
            warn!(%conn, modes, params, %error, "failed to parse channel mode change");
            error
        })
    }

    /// Kind of a mode letter on a connection.
    pub fn mode_kind<C: ModeChar>(&self, conn: ConnectionId, mode: C) -> Option<ModeKind> {
        self.resolver.mode_kind(conn, mode)
    }

    /// Prefix character backing a mode letter on a connection.
    pub fn prefix_for_mode<C: ModeChar>(&self, conn: ConnectionId, mode: C) -> Option<char> {
        self.resolver.prefix_for_mode(conn, mode)
    }

    /// Mode letter behind a prefix character on a connection.
    pub fn mode_for_prefix<C: ModeChar>(&self, conn: ConnectionId, prefix: C) -> Option<char> {
        self.resolver.mode_for_prefix(conn, prefix)
    }

    /// The prefix map in effect for a connection.
    pub fn prefix_map(&self, conn: ConnectionId) -> &PrefixMap {
        self.resolver.prefix_map(conn)
    }

    /// Returns true if the user holds the prefix mode in the channel.
    pub fn user_has_prefix_mode<C: ModeChar>(
        &self,
        conn: ConnectionId,
        channel: &str,
        nick: &str,
        mode: C,
    ) -> bool {
        let Some(mode) = checked_char("user_has_prefix_mode", mode) else {
            return false;
        };
        self.membership(conn)
            .and_then(|m| m.member_modes(channel, nick))
            .is_some_and(|modes| modes.contains(mode))
    }

    /// The prefix modes the user holds in the channel.
    pub fn user_prefix_modes(&self, conn: ConnectionId, channel: &str, nick: &str) -> Vec<char> {
        self.membership(conn)
            .and_then(|m| m.member_modes(channel, nick))
            .map(|modes| modes.iter().collect())
            .unwrap_or_default()
    }

    /// Returns true if the user is known to be in the channel.
    pub fn is_user_in_channel(&self, conn: ConnectionId, channel: &str, nick: &str) -> bool {
        self.membership(conn)
            .and_then(|m| m.channel(channel))
            .is_some_and(|roster| roster.contains(nick))
    }

    /// Nicknames known in the channel, in the order they were added.
    pub fn channel_users(&self, conn: ConnectionId, channel: &str) -> Vec<&str> {
        self.membership(conn)
            .and_then(|m| m.channel(channel))
            .map(|roster| roster.nicks().collect())
            .unwrap_or_default()
    }

    /// Channels the user is known to be in.
    pub fn user_channels(&self, conn: ConnectionId, nick: &str) -> Vec<&str> {
        self.membership(conn)
            .map(|m| m.channels_of(nick))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModeChangeError;

    const CONN: ConnectionId = ConnectionId(1);

    #[test]
    fn test_queries_on_unknown_connection() {
        let tracker = ChanModeTracker::new();
        assert!(!tracker.user_has_prefix_mode(CONN, "#chan", "alice", 'o'));
        assert!(tracker.user_prefix_modes(CONN, "#chan", "alice").is_empty());
        assert!(!tracker.is_user_in_channel(CONN, "#chan", "alice"));
        assert!(tracker.channel_users(CONN, "#chan").is_empty());
        assert!(tracker.user_channels(CONN, "alice").is_empty());
        assert_eq!(tracker.prefix_map(CONN), ModeMaps::default().prefixes());
    }

    #[test]
    fn test_has_prefix_mode_rejects_multichar() {
        let mut tracker = ChanModeTracker::new();
        let conn = Connection::new(CONN, "bot");
        let _ = tracker.feed(
            &conn,
            &TrackerEvent::NameListLoaded {
                channel: "#chan",
                names: &["@alice"],
            },
        );
        assert!(tracker.user_has_prefix_mode(CONN, "#chan", "alice", "o"));
        assert!(!tracker.user_has_prefix_mode(CONN, "#chan", "alice", "ov"));
    }

    #[test]
    fn test_with_config_rejects_invalid() {
        let config = TrackerConfig {
            default_prefixes: Some([("@".to_string(), "op".to_string())].into_iter().collect()),
            ..TrackerConfig::default()
        };
        assert!(ChanModeTracker::with_config(&config).is_err());
    }

    #[test]
    fn test_parse_channel_mode_change_uses_connection_maps() {
        let mut tracker = ChanModeTracker::new();
        let conn = Connection::new(CONN, "bot");
        let _ = tracker.feed(
            &conn,
            &TrackerEvent::CapabilityAnnounced {
                tokens: &["CHANMODES=b,k,l,z"],
            },
        );

        let ops = tracker.parse_channel_mode_change(CONN, "+z", None).unwrap();
        assert_eq!(ops, vec![ModeOperation::plus('z')]);

        let err = tracker
            .parse_channel_mode_change(ConnectionId(2), "+z", None)
            .unwrap_err();
        assert_eq!(err, ModeChangeError::UnknownMode { mode: 'z' });
    }

    #[test]
    fn test_remove_connection() {
        let mut tracker = ChanModeTracker::new();
        let conn = Connection::new(CONN, "bot");
        let _ = tracker.feed(
            &conn,
            &TrackerEvent::CapabilityAnnounced {
                tokens: &["PREFIX=(q)~"],
            },
        );
        let _ = tracker.feed(
            &conn,
            &TrackerEvent::UserJoined {
                nick: "alice",
                channels: "#chan",
            },
        );

        tracker.remove_connection(CONN);
        assert!(tracker.membership(CONN).is_none());
        assert_eq!(tracker.mode_for_prefix(CONN, '~'), None);
        assert_eq!(tracker.mode_for_prefix(CONN, '@'), Some('o'));
    }
}
