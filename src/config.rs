//! Construction-time configuration for the default mode maps.
//!
//! A host may replace either default map. Keys and values are strings so the
//! configuration can come straight from a config file; each must be exactly
//! one character.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use slirc_chanmodes::config::TrackerConfig;
//! use slirc_chanmodes::mode::ModeMaps;
//!
//! let config = TrackerConfig {
//!     default_prefixes: Some(BTreeMap::from([
//!         ("~".to_string(), "q".to_string()),
//!         ("@".to_string(), "o".to_string()),
//!     ])),
//!     ..TrackerConfig::default()
//! };
//!
//! let maps = ModeMaps::from_config(&config).unwrap();
//! assert_eq!(maps.prefixes().mode_for_prefix('~'), Some('q'));
//! assert_eq!(maps.prefixes().mode_for_prefix('+'), None);
//! ```

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::mode::{ModeKind, ModeMaps, ModeTypeMap, PrefixMap};
use crate::resolver::ModeChar;

/// Replacement defaults for a tracker.
///
/// `None` keeps the built-in default for that map.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrackerConfig {
    /// Mode letter to kind.
    pub default_mode_types: Option<BTreeMap<String, ModeKind>>,
    /// Prefix character to mode letter.
    pub default_prefixes: Option<BTreeMap<String, String>>,
}

impl TrackerConfig {
    /// Validate the configured mode type map.
    fn mode_types(&self) -> Result<Option<ModeTypeMap>, ConfigError> {
        let Some(types) = &self.default_mode_types else {
            return Ok(None);
        };

        types
            .iter()
            .map(|(key, &kind)| {
                key.mode_char()
                    .map(|mode| (mode, kind))
                    .ok_or_else(|| ConfigError::InvalidModeTypes { key: key.clone() })
            })
            .collect::<Result<ModeTypeMap, _>>()
            .map(Some)
    }

    /// Validate the configured prefix map.
    fn prefixes(&self) -> Result<Option<PrefixMap>, ConfigError> {
        let Some(prefixes) = &self.default_prefixes else {
            return Ok(None);
        };

        prefixes
            .iter()
            .map(|(prefix, mode)| match (prefix.mode_char(), mode.mode_char()) {
                (Some(p), Some(m)) => Ok((p, m)),
                _ => Err(ConfigError::InvalidPrefixes {
                    prefix: prefix.clone(),
                    mode: mode.clone(),
                }),
            })
            .collect::<Result<PrefixMap, _>>()
            .map(Some)
    }
}

impl ModeMaps {
    /// Build the default maps from a configuration.
    ///
    /// Maps left unset fall back to [`ModeMaps::default`]. Every prefix
    /// target ends up classified [`ModeKind::ParamAlways`], including when
    /// only the prefixes were replaced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any key or prefix value is not exactly one
    /// character.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, ConfigError> {
        let builtin = ModeMaps::default();
        let mode_types = config
            .mode_types()?
            .unwrap_or_else(|| builtin.mode_types().clone());
        let prefixes = config
            .prefixes()?
            .unwrap_or_else(|| builtin.prefixes().clone());
        Ok(ModeMaps::new(mode_types, prefixes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let maps = ModeMaps::from_config(&TrackerConfig::default()).unwrap();
        assert_eq!(maps, ModeMaps::default());
    }

    #[test]
    fn test_replaced_mode_types_keep_default_prefix_targets() {
        let config = TrackerConfig {
            default_mode_types: Some(BTreeMap::from([
                ("a".to_string(), ModeKind::List),
                ("z".to_string(), ModeKind::NoParam),
            ])),
            ..TrackerConfig::default()
        };
        let maps = ModeMaps::from_config(&config).unwrap();

        assert_eq!(maps.mode_types().get('a'), Some(ModeKind::List));
        assert_eq!(maps.mode_types().get('b'), None);
        // o, h and v come back through the default prefixes
        assert_eq!(maps.mode_types().get('o'), Some(ModeKind::ParamAlways));
        assert_eq!(maps.mode_types().len(), 5);
    }

    #[test]
    fn test_replaced_prefixes_forced_param_always() {
        let config = TrackerConfig {
            default_prefixes: Some(BTreeMap::from([("%".to_string(), "l".to_string())])),
            ..TrackerConfig::default()
        };
        let maps = ModeMaps::from_config(&config).unwrap();
        assert_eq!(maps.mode_types().get('l'), Some(ModeKind::ParamAlways));
        assert_eq!(maps.prefixes().len(), 1);
    }

    #[test]
    fn test_invalid_mode_type_key() {
        let config = TrackerConfig {
            default_mode_types: Some(BTreeMap::from([("ab".to_string(), ModeKind::List)])),
            ..TrackerConfig::default()
        };
        assert_eq!(
            ModeMaps::from_config(&config),
            Err(ConfigError::InvalidModeTypes {
                key: "ab".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_prefix_entries() {
        for (prefix, mode) in [("@@", "o"), ("@", "ov"), ("", "o"), ("@", "")] {
            let config = TrackerConfig {
                default_prefixes: Some(BTreeMap::from([(prefix.to_string(), mode.to_string())])),
                ..TrackerConfig::default()
            };
            assert_eq!(
                ModeMaps::from_config(&config),
                Err(ConfigError::InvalidPrefixes {
                    prefix: prefix.to_string(),
                    mode: mode.to_string(),
                })
            );
        }
    }

    #[cfg(feature = "serde")]
    mod serde_config {
        use super::*;

        #[test]
        fn test_deserialize_config() {
            let json = r#"{
                "default_mode_types": {
                    "b": "list",
                    "k": "param_always",
                    "l": "param_set_only",
                    "n": "no_param"
                },
                "default_prefixes": { "@": "o" }
            }"#;
            let config: TrackerConfig = serde_json::from_str(json).unwrap();
            let maps = ModeMaps::from_config(&config).unwrap();

            assert_eq!(maps.mode_types().get('l'), Some(ModeKind::ParamSetOnly));
            assert_eq!(maps.mode_types().get('o'), Some(ModeKind::ParamAlways));
            assert_eq!(maps.prefixes().prefix_for_mode('o'), Some('@'));
        }

        #[test]
        fn test_missing_fields_default() {
            let config: TrackerConfig = serde_json::from_str("{}").unwrap();
            assert_eq!(config, TrackerConfig::default());
        }

        #[test]
        fn test_unknown_kind_rejected() {
            let json = r#"{ "default_mode_types": { "b": "banlist" } }"#;
            assert!(serde_json::from_str::<TrackerConfig>(json).is_err());
        }

        #[test]
        fn test_kind_round_trip_names() {
            let json = serde_json::to_string(&ModeKind::ParamSetOnly).unwrap();
            assert_eq!(json, r#""param_set_only""#);
        }
    }
}
