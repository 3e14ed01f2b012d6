//! Channel mode types, maps, and mode change parsing.

mod maps;
mod parse;
mod types;

pub use self::maps::{ModeMaps, ModeTypeMap, PrefixMap};
pub use self::parse::{parse_mode_change, ModeLookup};
pub use self::types::{ModeKind, ModeOperation, ModeSign};
