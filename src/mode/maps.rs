//! Mode type and prefix maps.

use std::collections::BTreeMap;

use super::types::ModeKind;

/// Mapping from channel mode letter to its [`ModeKind`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeTypeMap {
    kinds: BTreeMap<char, ModeKind>,
}

impl ModeTypeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from the four `CHANMODES` groups.
    ///
    /// A letter listed in more than one group keeps its first classification.
    pub fn from_groups(groups: [&str; 4]) -> Self {
        let mut map = Self::new();
        for (letters, kind) in groups.iter().zip(ModeKind::GROUPS) {
            for mode in letters.chars() {
                map.kinds.entry(mode).or_insert(kind);
            }
        }
        map
    }

    /// Build a map classifying every letter as [`ModeKind::ParamAlways`].
    pub fn param_always<I: IntoIterator<Item = char>>(modes: I) -> Self {
        modes
            .into_iter()
            .map(|mode| (mode, ModeKind::ParamAlways))
            .collect()
    }

    /// Merge a freshly discovered map into an already known one.
    ///
    /// Letters present in `known` keep their kind. Letters only present in
    /// `discovered` are added.
    pub fn merge(known: &ModeTypeMap, discovered: &ModeTypeMap) -> ModeTypeMap {
        let mut merged = known.clone();
        for (&mode, &kind) in &discovered.kinds {
            merged.kinds.entry(mode).or_insert(kind);
        }
        merged
    }

    /// Look up the kind of a mode letter.
    pub fn get(&self, mode: char) -> Option<ModeKind> {
        self.kinds.get(&mode).copied()
    }

    /// Set the kind of a mode letter, replacing any previous kind.
    pub fn insert(&mut self, mode: char, kind: ModeKind) {
        self.kinds.insert(mode, kind);
    }

    /// Returns true if the letter is classified.
    pub fn contains(&self, mode: char) -> bool {
        self.kinds.contains_key(&mode)
    }

    /// Iterate over all letters and their kinds, ordered by letter.
    pub fn iter(&self) -> impl Iterator<Item = (char, ModeKind)> + '_ {
        self.kinds.iter().map(|(&c, &k)| (c, k))
    }

    /// Number of classified letters.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if no letter is classified.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl FromIterator<(char, ModeKind)> for ModeTypeMap {
    fn from_iter<I: IntoIterator<Item = (char, ModeKind)>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

/// Ordered mapping from prefix character (e.g. `@`) to mode letter (e.g. `o`).
///
/// Servers announce this positionally in the `PREFIX` token, so the order is
/// kept. Distinct prefixes normally map to distinct modes; this is not
/// enforced, and reverse lookups return the first match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixMap {
    pairs: Vec<(char, char)>,
}

impl PrefixMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pairing, replacing the mode of an existing prefix in place.
    pub fn insert(&mut self, prefix: char, mode: char) {
        match self.pairs.iter_mut().find(|(p, _)| *p == prefix) {
            Some(pair) => pair.1 = mode,
            None => self.pairs.push((prefix, mode)),
        }
    }

    /// Mode letter for a prefix character.
    pub fn mode_for_prefix(&self, prefix: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, m)| *m)
    }

    /// Prefix character for a mode letter.
    pub fn prefix_for_mode(&self, mode: char) -> Option<char> {
        self.pairs
            .iter()
            .find(|(_, m)| *m == mode)
            .map(|(p, _)| *p)
    }

    /// Returns true if the character is a known prefix.
    pub fn is_prefix(&self, c: char) -> bool {
        self.pairs.iter().any(|(p, _)| *p == c)
    }

    /// Iterate over `(prefix, mode)` pairs in announcement order.
    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.pairs.iter().copied()
    }

    /// Iterate over the mode letters in announcement order.
    pub fn modes(&self) -> impl Iterator<Item = char> + '_ {
        self.pairs.iter().map(|(_, m)| *m)
    }

    /// Number of prefixes.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if there are no prefixes.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl FromIterator<(char, char)> for PrefixMap {
    fn from_iter<I: IntoIterator<Item = (char, char)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (prefix, mode) in iter {
            map.insert(prefix, mode);
        }
        map
    }
}

/// A mode type map together with its prefix map.
///
/// Used for the defaults a tracker falls back to before a connection has
/// learned the server's own maps. Every prefix target is classified
/// [`ModeKind::ParamAlways`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeMaps {
    mode_types: ModeTypeMap,
    prefixes: PrefixMap,
}

impl ModeMaps {
    /// Combine the maps, forcing every prefix target to `ParamAlways`.
    pub fn new(mut mode_types: ModeTypeMap, prefixes: PrefixMap) -> Self {
        for mode in prefixes.modes() {
            mode_types.insert(mode, ModeKind::ParamAlways);
        }
        Self {
            mode_types,
            prefixes,
        }
    }

    /// The mode type map.
    pub fn mode_types(&self) -> &ModeTypeMap {
        &self.mode_types
    }

    /// The prefix map.
    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }
}

impl Default for ModeMaps {
    /// RFC 1459 channel modes with the `@`, `%` and `+` prefixes.
    fn default() -> Self {
        let mode_types = [
            ('b', ModeKind::List),         // ban
            ('e', ModeKind::List),         // exempt
            ('I', ModeKind::List),         // invex
            ('k', ModeKind::ParamAlways),  // channel key
            ('l', ModeKind::ParamSetOnly), // channel limit
            ('i', ModeKind::NoParam),      // invite-only
            ('m', ModeKind::NoParam),      // moderated
            ('n', ModeKind::NoParam),      // no external messages
            ('p', ModeKind::NoParam),      // private
            ('s', ModeKind::NoParam),      // secret
            ('t', ModeKind::NoParam),      // topic lock
        ]
        .into_iter()
        .collect();

        let prefixes = [('@', 'o'), ('%', 'h'), ('+', 'v')].into_iter().collect();

        Self::new(mode_types, prefixes)
    }
}
