//! Event type/code resolution
//!
//! A token is handed to an ordered list of strategies; the first one that
//! recognises it wins. The standard chain looks the token up by symbolic
//! name and then falls back to reading it as an integer literal.

pub mod names;

use crate::error::{InjectError, Result};

/// One way of turning a token into an event type or code
pub trait ResolveStrategy {
    /// Resolve an event type token (`EV_KEY`, `1`, ...)
    fn event_type(&self, token: &str) -> Option<u16>;

    /// Resolve an event code token, scoped to an already resolved type
    fn event_code(&self, event_type: u16, token: &str) -> Option<u16>;
}

/// Symbolic lookup against the kernel input vocabulary
#[derive(Debug, Default, Clone, Copy)]
pub struct ByName;

impl ResolveStrategy for ByName {
    fn event_type(&self, token: &str) -> Option<u16> {
        names::type_from_name(token)
    }

    fn event_code(&self, event_type: u16, token: &str) -> Option<u16> {
        names::code_from_name(event_type, token)
    }
}

/// Plain integer literal (decimal, `0x` hex or leading-zero octal)
#[derive(Debug, Default, Clone, Copy)]
pub struct Literal;

impl ResolveStrategy for Literal {
    fn event_type(&self, token: &str) -> Option<u16> {
        parse_literal(token).and_then(|v| u16::try_from(v).ok())
    }

    fn event_code(&self, _event_type: u16, token: &str) -> Option<u16> {
        parse_literal(token).and_then(|v| u16::try_from(v).ok())
    }
}

/// Ordered chain of resolution strategies
pub struct Resolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl Resolver {
    pub fn new(strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
        Self { strategies }
    }

    /// Name lookup first, literal parse second
    pub fn standard() -> Self {
        Self::new(vec![Box::new(ByName), Box::new(Literal)])
    }

    pub fn event_type(&self, token: &str) -> Result<u16> {
        self.strategies
            .iter()
            .find_map(|s| s.event_type(token))
            .ok_or_else(|| InjectError::InvalidType(token.to_string()))
    }

    pub fn event_code(&self, event_type: u16, token: &str) -> Result<u16> {
        self.strategies
            .iter()
            .find_map(|s| s.event_code(event_type, token))
            .ok_or_else(|| InjectError::InvalidCode(token.to_string()))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::standard()
    }
}

/// Parse an event value; it must be an integer literal within `i32` range.
pub fn parse_value(token: &str) -> Result<i32> {
    parse_literal(token)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| InjectError::InvalidValue(token.to_string()))
}

/// Parse an integer the way `strtol(.., 0)` does, requiring the whole token
/// to be consumed.
///
/// Accepts leading whitespace, an optional sign, a `0x`/`0X` prefix for hex
/// and a leading `0` for octal. Returns `None` for empty or partial input and
/// for magnitudes that do not fit in an `i64`.
pub fn parse_literal(token: &str) -> Option<i64> {
    let s = token.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, hex)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
