//! Fuzz target for mode change parsing
//!
//! Splits the input into a mode string and a parameter string and checks the
//! parser never panics and never leaves parameters unaccounted for.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_chanmodes::{parse_mode_change, ModeMaps};
use std::str;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = str::from_utf8(data) else {
        return;
    };
    if input.len() > 512 {
        return;
    }

    let maps = ModeMaps::default();
    let (modes, params) = match input.split_once(' ') {
        Some((modes, params)) => (modes, Some(params)),
        None => (input, None),
    };

    if let Ok(ops) = parse_mode_change(&maps, modes, params) {
        let given = params
            .unwrap_or("")
            .split(' ')
            .filter(|p| !p.is_empty())
            .count();
        let consumed = ops.iter().filter(|op| op.param.is_some()).count();
        assert_eq!(given, consumed);
    }
});
