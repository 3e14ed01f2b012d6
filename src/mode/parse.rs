//! Channel mode change parsing.
//!
//! Splits a compact mode change such as `+mv-k` with parameters
//! `voiced oldkey` into one [`ModeOperation`] per mode letter, pairing
//! parameters with letters according to the mode kinds in effect.

use tracing::debug;

use crate::error::{ModeChangeError, Result};

use super::maps::ModeMaps;
use super::types::{ModeKind, ModeOperation, ModeSign};

/// Read access to the mode maps a parse runs against.
///
/// Implemented by [`ModeMaps`] and by the per-connection view handed out by
/// [`ModeResolver`](crate::resolver::ModeResolver).
pub trait ModeLookup {
    /// Kind of a mode letter, or `None` if the letter is unknown.
    fn mode_kind(&self, mode: char) -> Option<ModeKind>;

    /// Prefix character backing a mode letter, if any.
    fn prefix_for_mode(&self, mode: char) -> Option<char>;
}

impl ModeLookup for ModeMaps {
    fn mode_kind(&self, mode: char) -> Option<ModeKind> {
        self.mode_types().get(mode)
    }

    fn prefix_for_mode(&self, mode: char) -> Option<char> {
        self.prefixes().prefix_for_mode(mode)
    }
}

/// Parse a channel mode change into individual operations.
///
/// `params` is split on spaces; empty tokens are discarded. The n-th letter
/// that consumes a parameter takes the n-th token.
///
/// A string made only of `+`/`-` is a no-op and yields an empty vector.
/// Without parameters and without any `-`, a string whose letters are all
/// list modes is a list request and yields sign-less operations, one per
/// distinct letter.
///
/// # Errors
///
/// Any failure discards the whole parse. See [`ModeChangeError`] for the
/// reasons.
///
/// # Example
///
/// ```
/// use slirc_chanmodes::mode::{parse_mode_change, ModeMaps, ModeOperation};
///
/// let maps = ModeMaps::default();
/// let ops = parse_mode_change(&maps, "+mv-k", Some("voiced oldkey")).unwrap();
///
/// assert_eq!(ops[0], ModeOperation::plus('m'));
/// assert_eq!(ops[1], ModeOperation::plus('v').with_prefix('+').with_param("voiced"));
/// assert_eq!(ops[2], ModeOperation::minus('k').with_param("oldkey"));
/// ```
pub fn parse_mode_change<'a, L>(
    lookup: &L,
    modes: &str,
    params: Option<&'a str>,
) -> Result<Vec<ModeOperation<'a>>>
where
    L: ModeLookup + ?Sized,
{
    if modes.chars().all(|c| ModeSign::from_char(c).is_some()) {
        return Ok(Vec::new());
    }

    let mut args = params
        .unwrap_or("")
        .split(' ')
        .filter(|p| !p.is_empty())
        .peekable();

    if args.peek().is_none() && !modes.contains('-') {
        if let Some(ops) = parse_list_request(lookup, modes) {
            debug!(modes, "mode change is a list request");
            return Ok(ops);
        }
    }

    let mut res = Vec::new();
    let mut cur_sign = None;

    for c in modes.chars() {
        if let Some(sign) = ModeSign::from_char(c) {
            cur_sign = Some(sign);
            continue;
        }

        let sign = cur_sign.ok_or(ModeChangeError::MissingSign { mode: c })?;
        let kind = lookup
            .mode_kind(c)
            .ok_or(ModeChangeError::UnknownMode { mode: c })?;

        let mut op = ModeOperation::new(sign, c);
        if kind.takes_param(sign) {
            let param = args
                .next()
                .ok_or(ModeChangeError::NotEnoughParams { mode: c })?;
            op = op.with_param(param);
        }
        if matches!(kind, ModeKind::List | ModeKind::ParamAlways) {
            if let Some(prefix) = lookup.prefix_for_mode(c) {
                op = op.with_prefix(prefix);
            }
        }
        res.push(op);
    }

    let unused = args.count();
    if unused > 0 {
        return Err(ModeChangeError::TooManyParams { unused });
    }

    Ok(res)
}

/// Returns list queries if every distinct letter in `modes` is a list mode.
fn parse_list_request<'a, L>(lookup: &L, modes: &str) -> Option<Vec<ModeOperation<'a>>>
where
    L: ModeLookup + ?Sized,
{
    let mut letters: Vec<char> = Vec::new();
    for c in modes.chars().filter(|&c| c != '+') {
        if !letters.contains(&c) {
            letters.push(c);
        }
    }

    if letters
        .iter()
        .all(|&c| lookup.mode_kind(c) == Some(ModeKind::List))
    {
        Some(letters.into_iter().map(ModeOperation::list_query).collect())
    } else {
        None
    }
}
