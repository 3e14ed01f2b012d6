//! Event handlers for the channel mode tracker.

use tracing::debug;

use crate::isupport::{parse_params, CapabilityToken, NAMESX};
use crate::membership::{names_entries, split_decorated_name};
use crate::mode::ModeSign;

use super::tracker::ChanModeTracker;
use super::{Connection, TrackerAction};

impl ChanModeTracker {
    pub(super) fn on_capabilities(
        &mut self,
        conn: &Connection<'_>,
        tokens: &[&str],
    ) -> Vec<TrackerAction> {
        let mut actions = Vec::new();
        let maps = self.resolver.connection_maps_mut(conn.id);

        for token in parse_params(tokens).tokens() {
            match token {
                CapabilityToken::NamesX => {
                    debug!(conn = %conn.id, "enabling NAMESX");
                    actions.push(TrackerAction::RequestProtocolExtension(NAMESX.to_string()));
                }
                CapabilityToken::ChanModes(chanmodes) => maps.learn_chanmodes(&chanmodes),
                CapabilityToken::Prefix(spec) => maps.learn_prefix(&spec),
                CapabilityToken::Other(entry) => {
                    if matches!(entry.key, "CHANMODES" | "PREFIX") {
                        debug!(key = entry.key, value = entry.value, "ignoring malformed token");
                    }
                }
            }
        }

        actions
    }

    pub(super) fn on_mode_change(
        &mut self,
        conn: &Connection<'_>,
        channel: Option<&str>,
        modes: &str,
        params: Option<&str>,
    ) -> Option<TrackerAction> {
        let Some(channel) = channel else {
            debug!("not a channel mode change, skipping");
            return None;
        };
        let Some(params) = params else {
            debug!("no mode parameters, skipping");
            return None;
        };

        let ops = match self.parse_channel_mode_change(conn.id, modes, Some(params)) {
            Ok(ops) => ops,
            Err(_) => {
                debug!(channel, "could not parse mode change, refreshing prefixes");
                if let Some(membership) = self.membership.get_mut(&conn.id) {
                    membership.remove_channel(channel);
                }
                return Some(TrackerAction::RequestNames(channel.to_owned()));
            }
        };

        let membership = self.membership.entry(conn.id).or_default();
        for op in ops {
            let (Some(sign), Some(prefix), Some(nick)) = (op.sign, op.prefix, op.param) else {
                continue;
            };
            match sign {
                ModeSign::Plus => {
                    debug!(channel, nick, mode = %op.mode, %prefix, "adding user mode");
                    membership.set_mode(channel, nick, op.mode);
                }
                ModeSign::Minus => {
                    debug!(channel, nick, mode = %op.mode, %prefix, "removing user mode");
                    membership.unset_mode(channel, nick, op.mode);
                }
            }
        }

        None
    }

    pub(super) fn on_join(&mut self, conn: &Connection<'_>, nick: &str, channels: &str) {
        let membership = self.membership.entry(conn.id).or_default();
        for channel in channels.split(',').filter(|c| !c.is_empty()) {
            if membership.add_member(channel, nick) {
                debug!(channel, nick, "adding user to channel");
            }
        }
    }

    pub(super) fn on_part(&mut self, conn: &Connection<'_>, nick: &str, channels: &str) {
        let Some(membership) = self.membership.get_mut(&conn.id) else {
            return;
        };

        let own = conn.is_own_nick(nick);
        for channel in channels.split(',').filter(|c| !c.is_empty()) {
            if own {
                debug!(channel, "deleting all modes for channel");
                membership.remove_channel(channel);
            } else if membership.remove_member(channel, nick).is_some() {
                debug!(channel, nick, "removing user mode data");
            }
        }
    }

    pub(super) fn on_kick(&mut self, conn: &Connection<'_>, channel: &str, nick: &str) {
        let Some(membership) = self.membership.get_mut(&conn.id) else {
            return;
        };

        if conn.is_own_nick(nick) {
            debug!(channel, "deleting all modes for channel");
            membership.remove_channel(channel);
        } else if membership.remove_member(channel, nick).is_some() {
            debug!(channel, nick, "removing user mode data");
        }
    }

    pub(super) fn on_quit(&mut self, conn: &Connection<'_>, nick: &str) {
        if conn.is_own_nick(nick) {
            debug!(conn = %conn.id, "deleting all modes for connection");
            self.membership.remove(&conn.id);
            return;
        }

        if let Some(membership) = self.membership.get_mut(&conn.id) {
            let removed = membership.remove_everywhere(nick);
            debug!(nick, channels = removed, "removing user mode data");
        }
    }

    pub(super) fn on_nick_change(&mut self, conn: &Connection<'_>, old_nick: &str, new_nick: &str) {
        let Some(membership) = self.membership.get_mut(&conn.id) else {
            return;
        };

        let moved = membership.rename(old_nick, new_nick);
        if moved > 0 {
            debug!(old_nick, new_nick, channels = moved, "moving user mode data");
        }
    }

    pub(super) fn on_names(&mut self, conn: &Connection<'_>, channel: &str, names: &[&str]) {
        let prefixes = self.resolver.maps_for(conn.id).prefixes();
        let membership = self.membership.entry(conn.id).or_default();

        for entry in names_entries(names) {
            let Some((decorations, nick)) = split_decorated_name(entry, prefixes) else {
                debug!(channel, entry, "skipping malformed name");
                continue;
            };

            debug!(channel, nick, "adding user to channel");
            membership.reset_member(
                channel,
                nick,
                decorations.chars().filter_map(|p| prefixes.mode_for_prefix(p)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ConnectionId, TrackerEvent};

    const CONN: ConnectionId = ConnectionId(1);

    fn conn() -> Connection<'static> {
        Connection::new(CONN, "bot")
    }

    fn tracker_with_names(channel: &str, names: &[&str]) -> ChanModeTracker {
        let mut tracker = ChanModeTracker::new();
        let _ = tracker.feed(&conn(), &TrackerEvent::NameListLoaded { channel, names });
        tracker
    }

    #[test]
    fn test_malformed_capability_tokens_ignored() {
        let mut tracker = ChanModeTracker::new();
        let actions = tracker.feed(
            &conn(),
            &TrackerEvent::CapabilityAnnounced {
                tokens: &["CHANMODES=a,b,c", "PREFIX=(ov)@", "NAMESX=1"],
            },
        );
        assert!(actions.is_empty());
        let maps = tracker.resolver().connection_maps(CONN).unwrap();
        assert!(maps.mode_types().is_none());
        assert!(maps.prefixes().is_none());
    }

    #[test]
    fn test_mode_change_without_channel_or_params() {
        let mut tracker = tracker_with_names("#chan", &["alice"]);
        let user_mode = TrackerEvent::ModeChangeObserved {
            channel: None,
            modes: "+o",
            params: Some("alice"),
        };
        let bare = TrackerEvent::ModeChangeObserved {
            channel: Some("#chan"),
            modes: "+zzz",
            params: None,
        };
        assert!(tracker.feed(&conn(), &user_mode).is_empty());
        assert!(tracker.feed(&conn(), &bare).is_empty());
        assert!(!tracker.user_has_prefix_mode(CONN, "#chan", "alice", 'o'));
    }

    #[test]
    fn test_minus_on_unknown_member_does_not_create() {
        let mut tracker = tracker_with_names("#chan", &["alice"]);
        let event = TrackerEvent::ModeChangeObserved {
            channel: Some("#chan"),
            modes: "-o",
            params: Some("ghost"),
        };
        assert!(tracker.feed(&conn(), &event).is_empty());
        assert!(!tracker.is_user_in_channel(CONN, "#chan", "ghost"));
    }

    #[test]
    fn test_plus_creates_member() {
        let mut tracker = ChanModeTracker::new();
        let event = TrackerEvent::ModeChangeObserved {
            channel: Some("#chan"),
            modes: "+v",
            params: Some("newcomer"),
        };
        assert!(tracker.feed(&conn(), &event).is_empty());
        assert_eq!(tracker.user_prefix_modes(CONN, "#chan", "newcomer"), vec!['v']);
    }

    #[test]
    fn test_non_prefix_modes_leave_members_alone() {
        let mut tracker = tracker_with_names("#chan", &["alice"]);
        let event = TrackerEvent::ModeChangeObserved {
            channel: Some("#chan"),
            modes: "+bk",
            params: Some("alice!*@* secret"),
        };
        assert!(tracker.feed(&conn(), &event).is_empty());
        assert!(tracker.user_prefix_modes(CONN, "#chan", "alice").is_empty());
        assert_eq!(tracker.channel_users(CONN, "#chan"), vec!["alice"]);
    }

    #[test]
    fn test_part_without_store_is_noop() {
        let mut tracker = ChanModeTracker::new();
        let event = TrackerEvent::UserParted {
            nick: "alice",
            channels: "#chan",
        };
        assert!(tracker.feed(&conn(), &event).is_empty());
        assert!(tracker.membership(CONN).is_none());
    }

    #[test]
    fn test_own_part_drops_channels() {
        let mut tracker = tracker_with_names("#a", &["bot alice"]);
        let _ = tracker.feed(
            &conn(),
            &TrackerEvent::NameListLoaded {
                channel: "#b",
                names: &["bot"],
            },
        );
        let _ = tracker.feed(
            &conn(),
            &TrackerEvent::NameListLoaded {
                channel: "#c",
                names: &["bot"],
            },
        );

        let _ = tracker.feed(
            &conn(),
            &TrackerEvent::UserParted {
                nick: "bot",
                channels: "#a,#b",
            },
        );
        assert_eq!(tracker.user_channels(CONN, "bot"), vec!["#c"]);
        assert!(tracker.channel_users(CONN, "#a").is_empty());
    }

    #[test]
    fn test_kick() {
        let mut tracker = tracker_with_names("#chan", &["bot @alice bob"]);
        let _ = tracker.feed(
            &conn(),
            &TrackerEvent::UserKicked {
                channel: "#chan",
                nick: "alice",
            },
        );
        assert_eq!(tracker.channel_users(CONN, "#chan"), vec!["bot", "bob"]);

        let _ = tracker.feed(
            &conn(),
            &TrackerEvent::UserKicked {
                channel: "#chan",
                nick: "bot",
            },
        );
        assert!(tracker.membership(CONN).unwrap().channel("#chan").is_none());
    }

    #[test]
    fn test_quit_of_other_user() {
        let mut tracker = tracker_with_names("#a", &["alice bob"]);
        let _ = tracker.feed(
            &conn(),
            &TrackerEvent::NameListLoaded {
                channel: "#b",
                names: &["@alice"],
            },
        );

        let _ = tracker.feed(&conn(), &TrackerEvent::UserQuit { nick: "alice" });
        assert!(tracker.user_channels(CONN, "alice").is_empty());
        assert_eq!(tracker.channel_users(CONN, "#a"), vec!["bob"]);
    }

    #[test]
    fn test_names_reload_resets_modes() {
        let mut tracker = tracker_with_names("#chan", &["@+alice"]);
        let _ = tracker.feed(
            &conn(),
            &TrackerEvent::NameListLoaded {
                channel: "#chan",
                names: &["%alice"],
            },
        );
        assert_eq!(tracker.user_prefix_modes(CONN, "#chan", "alice"), vec!['h']);
    }

    #[test]
    fn test_names_skip_malformed() {
        let tracker = tracker_with_names("#chan", &["@", "ali@ce", "+bob", ""]);
        assert_eq!(tracker.channel_users(CONN, "#chan"), vec!["bob"]);
    }
}
