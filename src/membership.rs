//! Channel membership and prefix modes for one connection.
//!
//! Channels keep the order they were first seen in, and each channel keeps
//! its members in the order they were added. A member's prefix modes are a
//! small set of mode letters.

use nom::bytes::complete::{take_while, take_while1};
use nom::combinator::all_consuming;
use nom::sequence::pair;
use nom::IResult;
use smallvec::SmallVec;

use crate::mode::PrefixMap;

/// The prefix modes a member holds in one channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixModes(SmallVec<[char; 4]>);

impl PrefixModes {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mode. Returns false if it was already present.
    pub fn insert(&mut self, mode: char) -> bool {
        if self.contains(mode) {
            return false;
        }
        self.0.push(mode);
        true
    }

    /// Remove a mode. Returns false if it was not present.
    pub fn remove(&mut self, mode: char) -> bool {
        match self.0.iter().position(|&m| m == mode) {
            Some(idx) => {
                self.0.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Returns true if the mode is held.
    pub fn contains(&self, mode: char) -> bool {
        self.0.contains(&mode)
    }

    /// Remove every mode.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate over the modes in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }

    /// Number of modes held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no mode is held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<char> for PrefixModes {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut modes = Self::new();
        for mode in iter {
            modes.insert(mode);
        }
        modes
    }
}

/// A nickname and its prefix modes in one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    nick: String,
    modes: PrefixModes,
}

impl Member {
    /// The member's nickname.
    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// The member's prefix modes.
    pub fn modes(&self) -> &PrefixModes {
        &self.modes
    }
}

/// The known members of one channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelRoster {
    name: String,
    members: Vec<Member>,
}

impl ChannelRoster {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            members: Vec::new(),
        }
    }

    /// The channel name as first seen.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate over members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Iterate over member nicknames in insertion order.
    pub fn nicks(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(Member::nick)
    }

    /// Look up a member.
    pub fn member(&self, nick: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.nick == nick)
    }

    /// Returns true if the nick is a member.
    pub fn contains(&self, nick: &str) -> bool {
        self.member(nick).is_some()
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the roster has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    fn member_mut(&mut self, nick: &str) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| m.nick == nick)
    }

    /// The member's modes, adding the member with no modes if absent.
    fn entry(&mut self, nick: &str) -> &mut PrefixModes {
        let idx = match self.members.iter().position(|m| m.nick == nick) {
            Some(idx) => idx,
            None => {
                self.members.push(Member {
                    nick: nick.to_owned(),
                    modes: PrefixModes::new(),
                });
                self.members.len() - 1
            }
        };
        &mut self.members[idx].modes
    }

    fn remove(&mut self, nick: &str) -> Option<Member> {
        let idx = self.members.iter().position(|m| m.nick == nick)?;
        Some(self.members.remove(idx))
    }
}

/// Membership state for one connection.
///
/// # Performance
///
/// Channels and members are kept in insertion order in plain vectors and
/// looked up by linear scan. Loading a NAMES reply is therefore quadratic in
/// the size of the channel. This is fine for the rosters a client usually
/// sees; hosts tracking channels with many thousands of members should
/// expect reloads to cost accordingly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Membership {
    channels: Vec<ChannelRoster>,
}

impl Membership {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a channel.
    pub fn channel(&self, name: &str) -> Option<&ChannelRoster> {
        self.channels.iter().find(|c| c.name == name)
    }

    /// Iterate over channels in the order they were first seen.
    pub fn channels(&self) -> impl Iterator<Item = &ChannelRoster> {
        self.channels.iter()
    }

    /// Channels the nick is a member of, in channel order.
    pub fn channels_of(&self, nick: &str) -> Vec<&str> {
        self.channels
            .iter()
            .filter(|c| c.contains(nick))
            .map(ChannelRoster::name)
            .collect()
    }

    /// The member's prefix modes, if the nick is in the channel.
    pub fn member_modes(&self, channel: &str, nick: &str) -> Option<&PrefixModes> {
        self.channel(channel)?.member(nick).map(Member::modes)
    }

    fn channel_mut(&mut self, name: &str) -> Option<&mut ChannelRoster> {
        self.channels.iter_mut().find(|c| c.name == name)
    }

    fn channel_entry(&mut self, name: &str) -> &mut ChannelRoster {
        let idx = match self.channels.iter().position(|c| c.name == name) {
            Some(idx) => idx,
            None => {
                self.channels.push(ChannelRoster::new(name));
                self.channels.len() - 1
            }
        };
        &mut self.channels[idx]
    }

    /// Add a member with no modes. Returns false if already a member, in
    /// which case its modes are left untouched.
    pub fn add_member(&mut self, channel: &str, nick: &str) -> bool {
        let roster = self.channel_entry(channel);
        if roster.contains(nick) {
            return false;
        }
        roster.entry(nick);
        true
    }

    /// Set a member's modes, replacing any it held. The member keeps its
    /// position if already present.
    pub fn reset_member<I: IntoIterator<Item = char>>(
        &mut self,
        channel: &str,
        nick: &str,
        modes: I,
    ) {
        let entry = self.channel_entry(channel).entry(nick);
        entry.clear();
        for mode in modes {
            entry.insert(mode);
        }
    }

    /// Grant a mode, creating the channel and member as needed.
    pub fn set_mode(&mut self, channel: &str, nick: &str, mode: char) -> bool {
        self.channel_entry(channel).entry(nick).insert(mode)
    }

    /// Revoke a mode. Absent channels and members are not created.
    pub fn unset_mode(&mut self, channel: &str, nick: &str, mode: char) -> bool {
        self.channel_mut(channel)
            .and_then(|c| c.member_mut(nick))
            .is_some_and(|m| m.modes.remove(mode))
    }

    /// Forget a channel entirely.
    pub fn remove_channel(&mut self, channel: &str) -> Option<ChannelRoster> {
        let idx = self.channels.iter().position(|c| c.name == channel)?;
        Some(self.channels.remove(idx))
    }

    /// Remove a member from one channel.
    pub fn remove_member(&mut self, channel: &str, nick: &str) -> Option<Member> {
        self.channel_mut(channel)?.remove(nick)
    }

    /// Remove a nick from every channel. Returns the number of channels it
    /// was removed from.
    pub fn remove_everywhere(&mut self, nick: &str) -> usize {
        self.channels
            .iter_mut()
            .filter_map(|c| c.remove(nick))
            .count()
    }

    /// Move a nick's modes to a new nick in every channel holding it.
    ///
    /// The renamed member moves to the end of the roster, unless the new nick
    /// is already present, in which case that entry takes over the modes in
    /// place. Returns the number of channels touched.
    pub fn rename(&mut self, old: &str, new: &str) -> usize {
        if old == new {
            return 0;
        }

        let mut moved = 0;
        for roster in &mut self.channels {
            let Some(member) = roster.remove(old) else {
                continue;
            };
            *roster.entry(new) = member.modes;
            moved += 1;
        }
        moved
    }

    /// Returns true if no channel is tracked.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Split a `NAMES` reply into individual entries.
///
/// Replies normally carry every name in one space-separated parameter; a
/// single parameter is split on spaces, several are taken as one name each.
/// Empty entries are dropped.
pub fn names_entries<'a>(names: &[&'a str]) -> Vec<&'a str> {
    match names {
        [packed] => packed.split(' ').filter(|n| !n.is_empty()).collect(),
        _ => names.iter().copied().filter(|n| !n.is_empty()).collect(),
    }
}

/// Split a decorated name such as `@+nick` into its prefixes and nickname.
///
/// The leading run of known prefix characters is stripped. Returns `None` if
/// nothing remains or the remainder still contains a prefix character.
///
/// ```
/// use slirc_chanmodes::membership::split_decorated_name;
/// use slirc_chanmodes::mode::ModeMaps;
///
/// let maps = ModeMaps::default();
/// assert_eq!(split_decorated_name("@+nick", maps.prefixes()), Some(("@+", "nick")));
/// assert_eq!(split_decorated_name("nick", maps.prefixes()), Some(("", "nick")));
/// assert_eq!(split_decorated_name("@", maps.prefixes()), None);
/// ```
pub fn split_decorated_name<'a>(
    entry: &'a str,
    prefixes: &PrefixMap,
) -> Option<(&'a str, &'a str)> {
    let parsed: IResult<&str, (&str, &str)> = all_consuming(pair(
        take_while(|c: char| prefixes.is_prefix(c)),
        take_while1(|c: char| !prefixes.is_prefix(c)),
    ))(entry);
    parsed.ok().map(|(_, split)| split)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nicks(membership: &Membership, channel: &str) -> Vec<String> {
        membership
            .channel(channel)
            .map(|c| c.nicks().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_prefix_modes_set_semantics() {
        let mut modes = PrefixModes::new();
        assert!(modes.insert('o'));
        assert!(!modes.insert('o'));
        assert!(modes.insert('v'));
        assert_eq!(modes.iter().collect::<Vec<_>>(), vec!['o', 'v']);
        assert!(modes.remove('o'));
        assert!(!modes.remove('o'));
        assert_eq!(modes.len(), 1);
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let mut m = Membership::new();
        assert!(m.add_member("#chan", "alice"));
        m.set_mode("#chan", "alice", 'o');
        assert!(!m.add_member("#chan", "alice"));

        assert_eq!(nicks(&m, "#chan"), vec!["alice"]);
        assert!(m.member_modes("#chan", "alice").unwrap().contains('o'));
    }

    #[test]
    fn test_set_mode_creates_entries() {
        let mut m = Membership::new();
        assert!(m.set_mode("#new", "bob", 'v'));
        assert!(m.member_modes("#new", "bob").unwrap().contains('v'));
    }

    #[test]
    fn test_unset_mode_does_not_create() {
        let mut m = Membership::new();
        assert!(!m.unset_mode("#none", "bob", 'v'));
        assert!(m.is_empty());

        m.add_member("#chan", "bob");
        assert!(!m.unset_mode("#chan", "carol", 'v'));
        assert!(!m.channel("#chan").unwrap().contains("carol"));
    }

    #[test]
    fn test_reset_member_keeps_position() {
        let mut m = Membership::new();
        m.add_member("#chan", "alice");
        m.add_member("#chan", "bob");
        m.set_mode("#chan", "alice", 'o');

        m.reset_member("#chan", "alice", ['v']);
        assert_eq!(nicks(&m, "#chan"), vec!["alice", "bob"]);
        let modes: Vec<char> = m.member_modes("#chan", "alice").unwrap().iter().collect();
        assert_eq!(modes, vec!['v']);
    }

    #[test]
    fn test_large_roster_keeps_order_and_modes() {
        let mut m = Membership::new();
        let all: Vec<String> = (0..500).map(|i| format!("user{}", i)).collect();
        for (i, nick) in all.iter().enumerate() {
            let modes = if i % 3 == 0 { vec!['o'] } else { vec![] };
            m.reset_member("#big", nick, modes);
        }

        assert_eq!(nicks(&m, "#big"), all);
        assert!(m.member_modes("#big", "user0").unwrap().contains('o'));
        assert!(m.member_modes("#big", "user499").unwrap().is_empty());
        assert!(m.member_modes("#big", "user498").unwrap().contains('o'));
    }

    #[test]
    fn test_remove_everywhere() {
        let mut m = Membership::new();
        m.add_member("#a", "alice");
        m.add_member("#b", "alice");
        m.add_member("#b", "bob");

        assert_eq!(m.remove_everywhere("alice"), 2);
        assert!(m.channel("#a").unwrap().is_empty());
        assert_eq!(nicks(&m, "#b"), vec!["bob"]);
    }

    #[test]
    fn test_rename_moves_to_end() {
        let mut m = Membership::new();
        m.add_member("#chan", "alice");
        m.add_member("#chan", "bob");
        m.set_mode("#chan", "alice", 'o');

        assert_eq!(m.rename("alice", "alicia"), 1);
        assert_eq!(nicks(&m, "#chan"), vec!["bob", "alicia"]);
        assert!(m.member_modes("#chan", "alicia").unwrap().contains('o'));
        assert!(m.member_modes("#chan", "alice").is_none());
    }

    #[test]
    fn test_rename_onto_existing_replaces_in_place() {
        let mut m = Membership::new();
        m.add_member("#chan", "carol");
        m.add_member("#chan", "alice");
        m.set_mode("#chan", "alice", 'h');
        m.set_mode("#chan", "carol", 'v');

        m.rename("alice", "carol");
        assert_eq!(nicks(&m, "#chan"), vec!["carol"]);
        let modes: Vec<char> = m.member_modes("#chan", "carol").unwrap().iter().collect();
        assert_eq!(modes, vec!['h']);
    }

    #[test]
    fn test_rename_same_nick_is_noop() {
        let mut m = Membership::new();
        m.add_member("#chan", "alice");
        m.add_member("#chan", "bob");
        assert_eq!(m.rename("alice", "alice"), 0);
        assert_eq!(nicks(&m, "#chan"), vec!["alice", "bob"]);
    }

    #[test]
    fn test_channels_of_in_channel_order() {
        let mut m = Membership::new();
        m.add_member("#b", "alice");
        m.add_member("#a", "bob");
        m.add_member("#a", "alice");
        assert_eq!(m.channels_of("alice"), vec!["#b", "#a"]);
        assert!(m.channels_of("nobody").is_empty());
    }

    #[test]
    fn test_names_entries() {
        assert_eq!(names_entries(&["@a +b  c"]), vec!["@a", "+b", "c"]);
        assert_eq!(names_entries(&["@a", "b"]), vec!["@a", "b"]);
        assert!(names_entries(&[]).is_empty());
    }

    #[test]
    fn test_split_decorated_name() {
        let prefixes: PrefixMap = [('%', 'e'), ('&', 'f')].into_iter().collect();
        assert_eq!(split_decorated_name("%&user", &prefixes), Some(("%&", "user")));
        assert_eq!(split_decorated_name("user", &prefixes), Some(("", "user")));
        // `@` is not a known prefix here, so it stays in the nick
        assert_eq!(split_decorated_name("@user", &prefixes), Some(("", "@user")));
        assert_eq!(split_decorated_name("%us&er", &prefixes), None);
        assert_eq!(split_decorated_name("%&", &prefixes), None);
        assert_eq!(split_decorated_name("", &prefixes), None);
    }
}
