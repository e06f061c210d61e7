//! Sample aspect ratio filter node.
//!
//! `setsar` stamps a configured pixel aspect ratio onto its output pad
//! during negotiation. The argument is either an integer pair (`"4:3"`) or
//! a decimal literal (`"1.333"`); a decimal is converted to the best
//! fraction with a denominator of at most 100. The frame data itself is
//! untouched — only the negotiated pad property changes.

use super::pad::Pad;
use super::FilterNode;
use crate::error::{Error, Result};
use crate::rational::Rational;
use crate::stream::MediaKind;

use winnow::ascii::{digit1, float};
use winnow::combinator::{alt, opt};
use winnow::error::ContextError;
use winnow::Parser;

type WResult<T> = std::result::Result<T, ContextError>;

/// Largest denominator used when approximating a decimal argument.
const MAX_APPROX_DEN: i32 = 100;

/// Sets the sample (pixel) aspect ratio on its output pad.
///
/// Without arguments the ratio stays [`Rational::UNSET`], and negotiation
/// leaves the pad property unset rather than propagating the sentinel as a
/// usable ratio.
pub struct SetSar {
    aspect: Rational,
}

impl SetSar {
    /// Create an unconfigured node (aspect unset).
    pub fn new() -> Self {
        Self {
            aspect: Rational::UNSET,
        }
    }

    /// The configured aspect ratio (unset until `init` parses one).
    pub fn aspect(&self) -> Rational {
        self.aspect
    }
}

impl Default for SetSar {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterNode for SetSar {
    fn name(&self) -> &str {
        "setsar"
    }

    fn init(&mut self, args: Option<&str>) -> Result<()> {
        if let Some(args) = args {
            self.aspect = parse_aspect(args)?;
        }
        tracing::debug!(sar = %self.aspect, "configured setsar");
        Ok(())
    }

    fn media_kind(&self) -> MediaKind {
        MediaKind::Video
    }

    fn negotiate(&self, pad: &mut Pad) -> Result<()> {
        if !self.aspect.is_unset() {
            pad.set_sample_aspect_ratio(self.aspect);
        }
        Ok(())
    }
}

/// Parse an aspect ratio argument.
///
/// Accepts `integer ":" integer` or a single decimal literal; anything
/// else, trailing content after a valid parse, or a non-positive component
/// is a configuration error. The result is reduced by GCD.
fn parse_aspect(args: &str) -> Result<Rational> {
    let ratio = aspect_value
        .parse(args.trim())
        .map_err(|_| Error::Config(format!("invalid aspect ratio '{args}'")))?;
    if ratio.num <= 0 || ratio.den <= 0 {
        return Err(Error::Config(format!(
            "aspect ratio components must be positive: '{args}'"
        )));
    }
    Ok(ratio.reduced())
}

fn aspect_value(input: &mut &str) -> WResult<Rational> {
    alt((ratio_pair, decimal)).parse_next(input)
}

/// Parse `N:D`.
fn ratio_pair(input: &mut &str) -> WResult<Rational> {
    let num = integer.parse_next(input)?;
    let _ = ':'.parse_next(input)?;
    let den = integer.parse_next(input)?;
    Ok(Rational::new(num, den))
}

/// Parse a signed integer.
fn integer(input: &mut &str) -> WResult<i32> {
    let negative = opt('-').parse_next(input)?;
    let digits: &str = digit1.parse_next(input)?;
    let value: i32 = digits.parse().map_err(|_| ContextError::new())?;
    Ok(if negative.is_some() { -value } else { value })
}

/// Parse a decimal literal and approximate it with a bounded denominator.
fn decimal(input: &mut &str) -> WResult<Rational> {
    let value: f64 = float.parse_next(input)?;
    Ok(Rational::approximate(value, MAX_APPROX_DEN))
}
