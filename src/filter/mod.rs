//! Filter nodes, pads, and property negotiation.
//!
//! A [`FilterGraph`] connects [`FilterNode`]s through [`Pad`]s. Each node
//! parses its textual arguments once in [`init`](FilterNode::init); when a
//! link is established, the upstream node's [`negotiate`](FilterNode::negotiate)
//! fixes the derived properties of its output pad. Negotiation is
//! one-directional and runs in graph construction order: a pad's property
//! is computed from its owner's configuration only, never from its peer's.
//!
//! ```rust,ignore
//! let registry = FilterRegistry::with_defaults();
//! let mut graph = FilterGraph::new();
//! let sar = graph.add(&registry, "setsar", Some("16:9"))?;
//! let sink = graph.add(&registry, "passthrough", None)?;
//! let link = graph.link(sar, sink)?;
//! assert_eq!(graph.link_sample_aspect_ratio(link), Some(Rational::new(16, 9)));
//! ```

mod aspect;
mod graph;
mod pad;
mod passthrough;
mod registry;

pub use aspect::SetSar;
pub use graph::{FilterGraph, LinkId, NodeId};
pub use pad::{Pad, PadDirection, PadProps};
pub use passthrough::PassThrough;
pub use registry::{FilterFactory, FilterRegistry, FilterRegistryBuilder};

use crate::error::Result;
use crate::stream::MediaKind;

/// A transform node in a filter graph.
///
/// One implementation exists per transform variant. Nodes are created by a
/// [`FilterRegistry`] factory, configured once via [`init`](Self::init),
/// and asked to fix their output pads' properties when links are
/// established.
pub trait FilterNode: Send {
    /// Filter type name (e.g. `"setsar"`).
    fn name(&self) -> &str;

    /// Parse the textual configuration.
    ///
    /// `None` keeps the node's defaults; malformed arguments are a
    /// [`Config`](crate::Error::Config) error that aborts graph
    /// construction before any frames flow.
    fn init(&mut self, args: Option<&str>) -> Result<()>;

    /// Media kind this node's pads carry.
    fn media_kind(&self) -> MediaKind;

    /// Number of input pads.
    fn num_inputs(&self) -> usize {
        1
    }

    /// Number of output pads.
    fn num_outputs(&self) -> usize {
        1
    }

    /// Fix the negotiated properties of one of this node's output pads.
    ///
    /// Called once per output pad when its link is established, and again
    /// only after an explicit reconfiguration. The computation uses the
    /// node's own configuration only — peer properties are not visible
    /// here, so there is no fixed point to iterate towards.
    fn negotiate(&self, pad: &mut Pad) -> Result<()>;
}
