//! Per-connection mode maps with fallback to defaults.
//!
//! A connection starts out resolving every lookup against the default maps.
//! Once the server announces `CHANMODES` or `PREFIX`, the learned map for
//! that half takes over; the other half keeps falling back independently.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::isupport::{ChanModes, PrefixSpec};
use crate::mode::{ModeKind, ModeLookup, ModeMaps, ModeTypeMap, PrefixMap};
use crate::state::ConnectionId;

/// A value that should name exactly one mode or prefix character.
///
/// `char` always does. Strings are accepted for callers holding raw protocol
/// text; anything other than a single character is rejected.
pub trait ModeChar: fmt::Debug {
    /// The single character, or `None` if the value is not one character.
    fn mode_char(&self) -> Option<char>;
}

impl ModeChar for char {
    fn mode_char(&self) -> Option<char> {
        Some(*self)
    }
}

impl ModeChar for str {
    fn mode_char(&self) -> Option<char> {
        let mut chars = self.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl ModeChar for String {
    fn mode_char(&self) -> Option<char> {
        self.as_str().mode_char()
    }
}

impl<T: ModeChar + ?Sized> ModeChar for &T {
    fn mode_char(&self) -> Option<char> {
        (**self).mode_char()
    }
}

/// Validate a caller-supplied character, reporting misuse.
pub(crate) fn checked_char<C: ModeChar>(lookup: &'static str, input: C) -> Option<char> {
    let c = input.mode_char();
    if c.is_none() {
        warn!(lookup, input = ?input, "invalid argument: expected a single character");
    }
    c
}

/// Maps learned from one connection's ISUPPORT announcements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionMaps {
    mode_types: Option<ModeTypeMap>,
    prefixes: Option<PrefixMap>,
}

impl ConnectionMaps {
    /// The learned mode type map, if any.
    pub fn mode_types(&self) -> Option<&ModeTypeMap> {
        self.mode_types.as_ref()
    }

    /// The learned prefix map, if any.
    pub fn prefixes(&self) -> Option<&PrefixMap> {
        self.prefixes.as_ref()
    }

    /// Fold newly discovered mode kinds into the learned map.
    ///
    /// Letters already learned keep their kind; see [`ModeTypeMap::merge`].
    pub fn learn_mode_types(&mut self, discovered: &ModeTypeMap) {
        let merged = match &self.mode_types {
            Some(known) => ModeTypeMap::merge(known, discovered),
            None => discovered.clone(),
        };
        self.mode_types = Some(merged);
    }

    /// Learn from a `CHANMODES` token.
    pub fn learn_chanmodes(&mut self, chanmodes: &ChanModes<'_>) {
        debug!("parsing chanmode types from RPL_ISUPPORT");
        self.learn_mode_types(&chanmodes.mode_types());
    }

    /// Learn from a `PREFIX` token.
    ///
    /// Replaces the learned prefix map and folds every prefix mode into the
    /// mode type map as [`ModeKind::ParamAlways`].
    pub fn learn_prefix(&mut self, spec: &PrefixSpec<'_>) {
        debug!("parsing prefixes from RPL_ISUPPORT");
        self.prefixes = Some(spec.prefix_map());
        self.learn_mode_types(&spec.mode_types());
    }
}

/// The maps in effect for one connection.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedMaps<'a> {
    mode_types: &'a ModeTypeMap,
    prefixes: &'a PrefixMap,
}

impl<'a> ResolvedMaps<'a> {
    /// The mode type map in effect.
    pub fn mode_types(&self) -> &'a ModeTypeMap {
        self.mode_types
    }

    /// The prefix map in effect.
    pub fn prefixes(&self) -> &'a PrefixMap {
        self.prefixes
    }

    /// Mode letter for a prefix character.
    pub fn mode_for_prefix(&self, prefix: char) -> Option<char> {
        self.prefixes.mode_for_prefix(prefix)
    }
}

impl ModeLookup for ResolvedMaps<'_> {
    fn mode_kind(&self, mode: char) -> Option<ModeKind> {
        self.mode_types.get(mode)
    }

    fn prefix_for_mode(&self, mode: char) -> Option<char> {
        self.prefixes.prefix_for_mode(mode)
    }
}

/// Resolves mode lookups per connection.
#[derive(Clone, Debug, Default)]
pub struct ModeResolver {
    defaults: ModeMaps,
    learned: HashMap<ConnectionId, ConnectionMaps>,
}

impl ModeResolver {
    /// Create a resolver falling back to the given defaults.
    pub fn new(defaults: ModeMaps) -> Self {
        Self {
            defaults,
            learned: HashMap::new(),
        }
    }

    /// The default maps.
    pub fn defaults(&self) -> &ModeMaps {
        &self.defaults
    }

    /// The maps learned for a connection, if any announcement was seen.
    pub fn connection_maps(&self, conn: ConnectionId) -> Option<&ConnectionMaps> {
        self.learned.get(&conn)
    }

    /// The learned maps for a connection, created empty if absent.
    pub fn connection_maps_mut(&mut self, conn: ConnectionId) -> &mut ConnectionMaps {
        self.learned.entry(conn).or_default()
    }

    /// Drop everything learned for a connection.
    pub fn forget(&mut self, conn: ConnectionId) -> Option<ConnectionMaps> {
        self.learned.remove(&conn)
    }

    /// The maps in effect for a connection.
    pub fn maps_for(&self, conn: ConnectionId) -> ResolvedMaps<'_> {
        let learned = self.learned.get(&conn);

        let mode_types = match learned.and_then(ConnectionMaps::mode_types) {
            Some(map) => map,
            None => {
                trace!(%conn, "no mode map learned, using default");
                self.defaults.mode_types()
            }
        };
        let prefixes = match learned.and_then(ConnectionMaps::prefixes) {
            Some(map) => map,
            None => {
                trace!(%conn, "no prefix map learned, using default");
                self.defaults.prefixes()
            }
        };

        ResolvedMaps {
            mode_types,
            prefixes,
        }
    }

    /// Kind of a mode letter on a connection.
    pub fn mode_kind<C: ModeChar>(&self, conn: ConnectionId, mode: C) -> Option<ModeKind> {
        let mode = checked_char("mode_kind", mode)?;
        self.maps_for(conn).mode_kind(mode)
    }

    /// Prefix character backing a mode letter on a connection.
    pub fn prefix_for_mode<C: ModeChar>(&self, conn: ConnectionId, mode: C) -> Option<char> {
        let mode = checked_char("prefix_for_mode", mode)?;
        self.maps_for(conn).prefix_for_mode(mode)
    }

    /// Mode letter behind a prefix character on a connection.
    pub fn mode_for_prefix<C: ModeChar>(&self, conn: ConnectionId, prefix: C) -> Option<char> {
        let prefix = checked_char("mode_for_prefix", prefix)?;
        self.maps_for(conn).mode_for_prefix(prefix)
    }

    /// The prefix map in effect for a connection.
    pub fn prefix_map(&self, conn: ConnectionId) -> &PrefixMap {
        self.maps_for(conn).prefixes()
    }
}
