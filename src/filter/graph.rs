//! Filter graph: a DAG of filter nodes driving pad negotiation.
//!
//! Construction order is negotiation order: when a link is established,
//! the upstream node's configuration is already final (set by `init`), so
//! the link's properties are fixed right there, before the downstream node
//! can consume them. Cycles are rejected at link time.

use super::pad::{Pad, PadDirection};
use super::registry::FilterRegistry;
use super::FilterNode;
use crate::error::{Error, Result};
use crate::rational::Rational;
use daggy::{Dag, EdgeIndex, NodeIndex};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Unique identifier for a node in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) NodeIndex);

/// Unique identifier for a link in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub(crate) EdgeIndex);

/// A filter node together with its pad instances.
struct NodeSlot {
    name: String,
    node: Box<dyn FilterNode>,
    input_pads: SmallVec<[Pad; 2]>,
    output_pads: SmallVec<[Pad; 2]>,
}

impl NodeSlot {
    fn new(name: String, node: Box<dyn FilterNode>) -> Self {
        let kind = node.media_kind();
        let mut input_pads = SmallVec::new();
        for i in 0..node.num_inputs() {
            let pad_name = if node.num_inputs() == 1 {
                "sink".to_string()
            } else {
                format!("sink_{i}")
            };
            input_pads.push(Pad::new(pad_name, PadDirection::Input, kind));
        }
        let mut output_pads = SmallVec::new();
        for i in 0..node.num_outputs() {
            let pad_name = if node.num_outputs() == 1 {
                "src".to_string()
            } else {
                format!("src_{i}")
            };
            output_pads.push(Pad::new(pad_name, PadDirection::Output, kind));
        }
        Self {
            name,
            node,
            input_pads,
            output_pads,
        }
    }

    fn next_free_pad(pads: &[Pad]) -> Option<usize> {
        pads.iter().position(|p| !p.is_linked())
    }
}

/// A link between two pads.
#[derive(Debug, Clone, Copy)]
struct Link {
    src_pad: usize,
    dst_pad: usize,
}

/// A directed acyclic graph of filter nodes.
///
/// Nodes are added fully configured (`init` runs on insertion); links
/// connect the next free output pad of the source to the next free input
/// pad of the destination, one peer per pad, and run negotiation for that
/// link immediately.
pub struct FilterGraph {
    graph: Dag<NodeSlot, Link>,
    nodes_by_name: HashMap<String, NodeId>,
    name_counter: u64,
}

impl FilterGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self {
            graph: Dag::new(),
            nodes_by_name: HashMap::new(),
            name_counter: 0,
        }
    }

    /// Create a node from a registry factory, configure it with `args`,
    /// and insert it under an auto-generated instance name.
    pub fn add(
        &mut self,
        registry: &FilterRegistry,
        filter: &str,
        args: Option<&str>,
    ) -> Result<NodeId> {
        let node = registry.create(filter)?;
        let name = format!("{filter}_{}", self.name_counter);
        self.name_counter += 1;
        self.add_node(name, node, args)
    }

    /// Insert a node under an explicit instance name, configuring it with
    /// `args` first.
    ///
    /// A configuration error aborts before the node joins the graph.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        mut node: Box<dyn FilterNode>,
        args: Option<&str>,
    ) -> Result<NodeId> {
        let name = name.into();
        if self.nodes_by_name.contains_key(&name) {
            return Err(Error::Graph(format!("duplicate node name '{name}'")));
        }
        node.init(args)?;

        let idx = self.graph.add_node(NodeSlot::new(name.clone(), node));
        let id = NodeId(idx);
        self.nodes_by_name.insert(name, id);
        Ok(id)
    }

    /// Link two nodes and negotiate the new link's properties.
    ///
    /// Connects the next free output pad of `src` to the next free input
    /// pad of `dst`. Fails if either node has no free pad, the media kinds
    /// differ, or the edge would create a cycle.
    pub fn link(&mut self, src: NodeId, dst: NodeId) -> Result<LinkId> {
        let (src_pad, src_kind) = {
            let slot = self.slot(src)?;
            let pad = NodeSlot::next_free_pad(&slot.output_pads).ok_or_else(|| {
                Error::Graph(format!("node '{}' has no free output pad", slot.name))
            })?;
            (pad, slot.output_pads[pad].kind())
        };
        let (dst_pad, dst_kind) = {
            let slot = self.slot(dst)?;
            let pad = NodeSlot::next_free_pad(&slot.input_pads).ok_or_else(|| {
                Error::Graph(format!("node '{}' has no free input pad", slot.name))
            })?;
            (pad, slot.input_pads[pad].kind())
        };
        if src_kind != dst_kind {
            return Err(Error::Graph(format!(
                "media kind mismatch: {src_kind:?} -> {dst_kind:?}"
            )));
        }

        let edge = self
            .graph
            .add_edge(src.0, dst.0, Link { src_pad, dst_pad })
            .map_err(|_| Error::Graph("linking would create a cycle".into()))?;

        {
            let slot = self.slot_mut(dst)?;
            slot.input_pads[dst_pad].mark_linked();
        }
        {
            // Negotiate now: the upstream configuration is final, and the
            // downstream node has not consumed the link yet.
            let slot = self.slot_mut(src)?;
            let NodeSlot {
                name,
                node,
                output_pads,
                ..
            } = slot;
            let pad = &mut output_pads[src_pad];
            pad.mark_linked();
            node.negotiate(pad)?;
            pad.mark_negotiated();
            tracing::debug!(
                node = name.as_str(),
                pad = pad.name(),
                sar = %pad.props().sample_aspect_ratio,
                "negotiated link"
            );
        }

        Ok(LinkId(edge))
    }

    /// Re-parse a node's configuration and re-run negotiation for its
    /// linked output pads.
    ///
    /// This is the only path that rewrites already-negotiated properties.
    pub fn reconfigure(&mut self, id: NodeId, args: Option<&str>) -> Result<()> {
        let slot = self.slot_mut(id)?;
        let NodeSlot {
            node, output_pads, ..
        } = slot;
        node.init(args)?;
        for pad in output_pads.iter_mut() {
            if pad.is_linked() {
                pad.reset_negotiation();
                node.negotiate(pad)?;
                pad.mark_negotiated();
            }
        }
        Ok(())
    }

    /// Look up a node by instance name.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.nodes_by_name.get(name).copied()
    }

    /// Instance name of a node.
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        self.graph.node_weight(id.0).map(|s| s.name.as_str())
    }

    /// The negotiated sample aspect ratio of a link's source pad.
    ///
    /// `None` until negotiation has run; the value may be the unset
    /// sentinel when the upstream node does not constrain the ratio.
    pub fn link_sample_aspect_ratio(&self, link: LinkId) -> Option<Rational> {
        let (src, _) = self.graph.graph().edge_endpoints(link.0)?;
        let edge = self.graph.edge_weight(link.0)?;
        let pad = self.graph.node_weight(src)?.output_pads.get(edge.src_pad)?;
        pad.is_negotiated()
            .then(|| pad.props().sample_aspect_ratio)
    }

    /// An output pad of a node.
    pub fn output_pad(&self, id: NodeId, pad: usize) -> Option<&Pad> {
        self.graph.node_weight(id.0)?.output_pads.get(pad)
    }

    /// An input pad of a node.
    pub fn input_pad(&self, id: NodeId, pad: usize) -> Option<&Pad> {
        self.graph.node_weight(id.0)?.input_pads.get(pad)
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of links in the graph.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn slot(&self, id: NodeId) -> Result<&NodeSlot> {
        self.graph
            .node_weight(id.0)
            .ok_or_else(|| Error::Graph("unknown node".into()))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot> {
        self.graph
            .node_weight_mut(id.0)
            .ok_or_else(|| Error::Graph("unknown node".into()))
    }
}

impl Default for FilterGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterGraph")
            .field("nodes", &self.node_count())
            .field("links", &self.link_count())
            .finish()
    }
}
