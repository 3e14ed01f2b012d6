//! Channel mode classifications and parsed mode operations.
//!
//! Servers announce how each channel mode letter consumes parameters via the
//! `CHANMODES` ISUPPORT token. The four groups map onto [`ModeKind`].
//!
//! # Reference
//! - Modern IRC documentation: <https://modern.ircdocs.horse/#chanmodes-parameter>

use std::fmt;

/// How a channel mode letter consumes parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModeKind {
    /// Type A: a list of entries, e.g. bans. Always takes a parameter when
    /// changed and may be queried bare.
    List,
    /// Type B: always takes a parameter, e.g. the channel key. Prefix modes
    /// are classified here too.
    ParamAlways,
    /// Type C: takes a parameter only when set, e.g. the user limit.
    ParamSetOnly,
    /// Type D: never takes a parameter, e.g. moderated.
    NoParam,
}

impl ModeKind {
    /// Kinds in `CHANMODES` group order.
    pub const GROUPS: [ModeKind; 4] = [
        ModeKind::List,
        ModeKind::ParamAlways,
        ModeKind::ParamSetOnly,
        ModeKind::NoParam,
    ];

    /// Returns true if a change with the given sign consumes a parameter.
    pub fn takes_param(self, sign: ModeSign) -> bool {
        match self {
            Self::List | Self::ParamAlways => true,
            Self::ParamSetOnly => sign == ModeSign::Plus,
            Self::NoParam => false,
        }
    }
}

/// Direction of a mode change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeSign {
    /// Mode is being added (`+`)
    Plus,
    /// Mode is being removed (`-`)
    Minus,
}

impl ModeSign {
    /// Parse a sign marker.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Plus),
            '-' => Some(Self::Minus),
            _ => None,
        }
    }

    /// The sign marker character.
    pub fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
        }
    }
}

impl fmt::Display for ModeSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One mode letter occurrence from a parsed mode change.
///
/// The parameter borrows from the parameter string it was split from.
/// A bare list query (e.g. `MODE #chan b`) carries neither sign nor parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeOperation<'a> {
    /// `None` for list queries.
    pub sign: Option<ModeSign>,
    /// The mode letter.
    pub mode: char,
    /// Prefix character, present only for prefix-backed modes.
    pub prefix: Option<char>,
    /// The parameter token consumed by this mode, if any.
    pub param: Option<&'a str>,
}

impl<'a> ModeOperation<'a> {
    /// Create a signed operation without prefix or parameter.
    pub fn new(sign: ModeSign, mode: char) -> Self {
        Self {
            sign: Some(sign),
            mode,
            prefix: None,
            param: None,
        }
    }

    /// Create a mode addition.
    pub fn plus(mode: char) -> Self {
        Self::new(ModeSign::Plus, mode)
    }

    /// Create a mode removal.
    pub fn minus(mode: char) -> Self {
        Self::new(ModeSign::Minus, mode)
    }

    /// Create a bare list query.
    pub fn list_query(mode: char) -> Self {
        Self {
            sign: None,
            mode,
            prefix: None,
            param: None,
        }
    }

    /// Attach a prefix character.
    #[must_use]
    pub fn with_prefix(mut self, prefix: char) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Attach a parameter.
    #[must_use]
    pub fn with_param(mut self, param: &'a str) -> Self {
        self.param = Some(param);
        self
    }

    /// Returns true if this is a bare list query.
    pub fn is_list_query(&self) -> bool {
        self.sign.is_none()
    }
}

impl fmt::Display for ModeOperation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sign) = self.sign {
            write!(f, "{}", sign)?;
        }
        write!(f, "{}", self.mode)?;
        if let Some(param) = self.param {
            write!(f, " {}", param)?;
        }
        Ok(())
    }
}
