//! ISUPPORT (RPL_ISUPPORT / 005) token parsing.
//!
//! Only the tokens that shape channel mode handling are interpreted:
//! `CHANMODES`, `PREFIX` and `NAMESX`. Everything else is kept as a raw
//! [`IsupportEntry`] and ignored by the tracker.

use nom::{
    bytes::complete::{take_while, take_while1},
    character::complete::char,
    combinator::all_consuming,
    error::{context, VerboseError},
    sequence::{delimited, pair, tuple},
    IResult,
};

use crate::mode::{ModeTypeMap, PrefixMap};

type ParseResult<I, O> = IResult<I, O, VerboseError<I>>;

/// Token asking the server to list every prefix a user holds in NAMES replies.
pub const NAMESX: &str = "NAMESX";

/// A single ISUPPORT key-value entry.
///
/// Represents a token from an ISUPPORT line, which can be either:
/// - A bare key (e.g., `NAMESX`) indicating a feature is supported
/// - A key=value pair (e.g., `PREFIX=(ov)@+`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsupportEntry<'a> {
    /// The token key (e.g., `CHANMODES`, `PREFIX`).
    pub key: &'a str,
    /// The optional value (e.g., `(ov)@+` for `PREFIX=(ov)@+`).
    pub value: Option<&'a str>,
}

impl<'a> IsupportEntry<'a> {
    /// Split a raw `KEY` or `KEY=VALUE` token.
    pub fn parse(token: &'a str) -> Self {
        match token.split_once('=') {
            Some((key, value)) => Self {
                key,
                value: Some(value),
            },
            None => Self {
                key: token,
                value: None,
            },
        }
    }

    /// Interpret the entry as one of the tokens the tracker acts on.
    ///
    /// Malformed `CHANMODES` and `PREFIX` values fall back to
    /// [`CapabilityToken::Other`].
    pub fn classify(&self) -> CapabilityToken<'a> {
        match (self.key, self.value) {
            (NAMESX, None) => CapabilityToken::NamesX,
            ("CHANMODES", Some(value)) => match ChanModes::parse(value) {
                Some(chanmodes) => CapabilityToken::ChanModes(chanmodes),
                None => CapabilityToken::Other(*self),
            },
            ("PREFIX", Some(value)) => match PrefixSpec::parse(value) {
                Some(spec) => CapabilityToken::Prefix(spec),
                None => CapabilityToken::Other(*self),
            },
            _ => CapabilityToken::Other(*self),
        }
    }
}

/// An ISUPPORT token relevant to channel mode tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityToken<'a> {
    /// The server supports extended NAMES replies.
    NamesX,
    /// Mode letters grouped by how they take parameters.
    ChanModes(ChanModes<'a>),
    /// Prefix symbols and the mode letters behind them.
    Prefix(PrefixSpec<'a>),
    /// Any other or malformed token.
    Other(IsupportEntry<'a>),
}

/// Parsed ISUPPORT (005) server capabilities.
///
/// Entries are kept in announcement order; the order matters because the
/// tracker folds each mode token into its maps as it arrives.
///
/// # Example
///
/// ```
/// use slirc_chanmodes::isupport::{parse_params, CapabilityToken};
///
/// let tokens = ["CHANMODES=beI,k,l,imnpst", "PREFIX=(ov)@+", "NAMESX"];
/// let isupport = parse_params(&tokens);
///
/// let keys: Vec<_> = isupport.iter().map(|entry| entry.key).collect();
/// assert_eq!(keys, ["CHANMODES", "PREFIX", "NAMESX"]);
/// assert!(matches!(isupport.tokens().last(), Some(CapabilityToken::NamesX)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Isupport<'a> {
    entries: Vec<IsupportEntry<'a>>,
}

impl<'a> Isupport<'a> {
    /// Parse ISUPPORT from raw `RPL_ISUPPORT` response arguments.
    ///
    /// Skips the first argument (target nickname) and trailing text.
    pub fn from_response_args(args: &[&'a str]) -> Option<Self> {
        if args.is_empty() {
            return None;
        }

        let mut tokens = &args[1..];

        if let Some(last) = tokens.last() {
            if last.contains(' ') {
                tokens = &tokens[..tokens.len().saturating_sub(1)];
            }
        }
        Some(parse_params(tokens))
    }

    /// Iterate over all parsed ISUPPORT entries.
    pub fn iter(&self) -> impl Iterator<Item = &IsupportEntry<'a>> {
        self.entries.iter()
    }

    /// Classify every entry, in announcement order.
    pub fn tokens(&self) -> Vec<CapabilityToken<'a>> {
        self.entries.iter().map(IsupportEntry::classify).collect()
    }
}

/// Parse ISUPPORT tokens from a slice of string parameters.
///
/// Tokens are parsed as `KEY` or `KEY=VALUE` pairs.
pub fn parse_params<'a>(params: &[&'a str]) -> Isupport<'a> {
    let mut entries = Vec::with_capacity(params.len());
    for &p in params {
        if p.starts_with(':') {
            break;
        }
        if p.is_empty() {
            continue;
        }
        entries.push(IsupportEntry::parse(p));
    }
    Isupport { entries }
}

/// Parsed `PREFIX` ISUPPORT token.
///
/// Maps channel user modes (like `o`, `v`) to their prefix symbols (`@`, `+`).
///
/// # Example
///
/// ```
/// use slirc_chanmodes::isupport::PrefixSpec;
///
/// let spec = PrefixSpec::parse("(ov)@+").unwrap();
/// assert_eq!(spec.modes, "ov");
/// assert_eq!(spec.prefixes, "@+");
///
/// assert!(PrefixSpec::parse("(ohv)@+").is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrefixSpec<'a> {
    /// Mode characters (e.g., `ov` for operator and voice).
    pub modes: &'a str,
    /// Prefix symbols (e.g., `@+` for `@` and `+`).
    pub prefixes: &'a str,
}

impl<'a> PrefixSpec<'a> {
    /// Parse a `PREFIX` value like `(ov)@+`.
    ///
    /// Both halves must be non-empty, free of whitespace, and of equal length.
    pub fn parse(s: &'a str) -> Option<Self> {
        let (_, (modes, prefixes)) = prefix_value(s).ok()?;
        if modes.chars().count() != prefixes.chars().count() {
            return None;
        }
        Some(Self { modes, prefixes })
    }

    /// Pair each prefix symbol with its mode letter.
    pub fn prefix_map(&self) -> PrefixMap {
        self.prefixes.chars().zip(self.modes.chars()).collect()
    }

    /// Every announced mode letter classified as always taking a parameter.
    pub fn mode_types(&self) -> ModeTypeMap {
        ModeTypeMap::param_always(self.modes.chars())
    }
}

/// Parsed `CHANMODES` ISUPPORT token.
///
/// The four groups are type A (list), B (always parameterized),
/// C (parameterized when set) and D (no parameter). Any group may be empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChanModes<'a> {
    /// Type A: list modes.
    pub a: &'a str,
    /// Type B: modes that always take a parameter.
    pub b: &'a str,
    /// Type C: modes that take a parameter only when set.
    pub c: &'a str,
    /// Type D: modes without a parameter.
    pub d: &'a str,
}

impl<'a> ChanModes<'a> {
    /// Parse a `CHANMODES` value like `beI,k,l,imnpst`.
    ///
    /// Exactly four groups are required.
    pub fn parse(s: &'a str) -> Option<Self> {
        let (_, (a, b, c, d)) = chanmodes_value(s).ok()?;
        Some(Self { a, b, c, d })
    }

    /// The groups in `CHANMODES` order.
    pub fn groups(&self) -> [&'a str; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Classify every listed letter by its group.
    pub fn mode_types(&self) -> ModeTypeMap {
        ModeTypeMap::from_groups(self.groups())
    }
}

fn chanmodes_group(input: &str) -> ParseResult<&str, &str> {
    take_while(|c: char| c != ',')(input)
}

fn chanmodes_value(input: &str) -> ParseResult<&str, (&str, &str, &str, &str)> {
    let (rest, (a, _, b, _, c, _, d)) = context(
        "parsing CHANMODES groups",
        all_consuming(tuple((
            chanmodes_group,
            char(','),
            chanmodes_group,
            char(','),
            chanmodes_group,
            char(','),
            chanmodes_group,
        ))),
    )(input)?;
    Ok((rest, (a, b, c, d)))
}

fn prefix_value(input: &str) -> ParseResult<&str, (&str, &str)> {
    context(
        "parsing PREFIX value",
        all_consuming(pair(
            delimited(
                char('('),
                take_while1(|c: char| c != ')' && !c.is_whitespace()),
                char(')'),
            ),
            take_while1(|c: char| !c.is_whitespace()),
        )),
    )(input)
}
