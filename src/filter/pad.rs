//! Pads: the typed connection points of filter nodes.

use crate::rational::Rational;
use crate::stream::MediaKind;

/// Direction of a pad (input or output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadDirection {
    /// An input pad (receives frames from upstream).
    Input,
    /// An output pad (sends frames downstream).
    Output,
}

/// Negotiated properties of a pad.
///
/// Undefined until negotiation runs for the pad's link; fixed afterwards
/// for that link's lifetime. The sample aspect ratio keeps the
/// [`Rational::UNSET`] sentinel when the owning node has nothing to say
/// about it — consumers must treat that value as "unset", not as a usable
/// ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PadProps {
    /// Sample (pixel) aspect ratio.
    pub sample_aspect_ratio: Rational,
}

/// A pad instance on a filter node.
///
/// Each pad has at most one peer link. Its negotiated properties are
/// written exactly once per negotiation run; re-running negotiation
/// requires an explicit reset (done by the graph on reconfiguration).
#[derive(Debug, Clone)]
pub struct Pad {
    name: String,
    direction: PadDirection,
    kind: MediaKind,
    props: PadProps,
    negotiated: bool,
    linked: bool,
}

impl Pad {
    /// Create a new pad.
    pub fn new(name: impl Into<String>, direction: PadDirection, kind: MediaKind) -> Self {
        Self {
            name: name.into(),
            direction,
            kind,
            props: PadProps::default(),
            negotiated: false,
            linked: false,
        }
    }

    /// Create an input pad.
    pub fn input(name: impl Into<String>, kind: MediaKind) -> Self {
        Self::new(name, PadDirection::Input, kind)
    }

    /// Create an output pad.
    pub fn output(name: impl Into<String>, kind: MediaKind) -> Self {
        Self::new(name, PadDirection::Output, kind)
    }

    /// Get the pad's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the pad's direction.
    pub fn direction(&self) -> PadDirection {
        self.direction
    }

    /// Get the media kind flowing through this pad.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Check if this is an input pad.
    pub fn is_input(&self) -> bool {
        self.direction == PadDirection::Input
    }

    /// Check if this is an output pad.
    pub fn is_output(&self) -> bool {
        self.direction == PadDirection::Output
    }

    /// Check if this pad has a peer link.
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Check if negotiation has run for this pad.
    pub fn is_negotiated(&self) -> bool {
        self.negotiated
    }

    /// The negotiated properties.
    ///
    /// Default (unset) values until negotiation has run; check
    /// [`is_negotiated`](Self::is_negotiated) to distinguish.
    pub fn props(&self) -> &PadProps {
        &self.props
    }

    /// Set the sample aspect ratio during negotiation.
    ///
    /// Intended for [`FilterNode::negotiate`](crate::filter::FilterNode::negotiate)
    /// implementations; properties must not be rewritten outside a
    /// negotiation run.
    pub fn set_sample_aspect_ratio(&mut self, sar: Rational) {
        debug_assert!(!self.negotiated, "pad properties are fixed after negotiation");
        self.props.sample_aspect_ratio = sar;
    }

    pub(crate) fn mark_linked(&mut self) {
        self.linked = true;
    }

    pub(crate) fn mark_negotiated(&mut self) {
        self.negotiated = true;
    }

    pub(crate) fn reset_negotiation(&mut self) {
        self.negotiated = false;
        self.props = PadProps::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_creation() {
        let input = Pad::input("sink", MediaKind::Video);
        assert_eq!(input.name(), "sink");
        assert!(input.is_input());
        assert!(!input.is_output());
        assert!(!input.is_linked());

        let output = Pad::output("src", MediaKind::Audio);
        assert!(output.is_output());
        assert_eq!(output.kind(), MediaKind::Audio);
    }

    #[test]
    fn test_pad_props_start_unset() {
        let pad = Pad::output("src", MediaKind::Video);
        assert!(!pad.is_negotiated());
        assert!(pad.props().sample_aspect_ratio.is_unset());
    }

    #[test]
    fn test_pad_negotiation_cycle() {
        let mut pad = Pad::output("src", MediaKind::Video);
        pad.set_sample_aspect_ratio(Rational::new(4, 3));
        pad.mark_negotiated();
        assert!(pad.is_negotiated());
        assert_eq!(pad.props().sample_aspect_ratio, Rational::new(4, 3));

        pad.reset_negotiation();
        assert!(!pad.is_negotiated());
        assert!(pad.props().sample_aspect_ratio.is_unset());
    }
}
