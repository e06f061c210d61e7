//! # Prism
//!
//! Container format probing, demultiplexing, and filter-pad negotiation.
//!
//! Prism takes an opaque byte stream, identifies which of the registered
//! container formats it is, and splits it into typed elementary streams and
//! timestamped packets. A companion filter graph carries decoded media
//! through transform nodes that negotiate derived stream properties (such
//! as the sample aspect ratio) on their pads.
//!
//! ## Features
//!
//! - **Scored probing**: every registered format rates a byte prefix;
//!   the best score wins, ties go to the first registered format
//! - **Exact timestamps**: stream timebases are chosen so that packet
//!   durations are exact integers for every legal native clock rate
//! - **Build-once registries**: formats and filters are registered at
//!   startup and shared immutably afterwards; no global state
//! - **Pad negotiation**: filter nodes fix their output pads' properties
//!   from their own configuration when links are established
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use prism::prelude::*;
//!
//! // Identify and demultiplex an input file.
//! let registry = FormatRegistry::with_defaults();
//! let file = std::fs::File::open("input.aac")?;
//! let (mut demuxer, mut reader) = prism::demux::open(&registry, file)?;
//!
//! while let Some(packet) = demuxer.read_packet(&mut reader)? {
//!     println!("stream {} packet of {} bytes", packet.stream_index, packet.data.len());
//! }
//! demuxer.close();
//!
//! // Negotiate a sample aspect ratio through a filter graph.
//! let filters = FilterRegistry::with_defaults();
//! let mut graph = FilterGraph::new();
//! let sar = graph.add(&filters, "setsar", Some("4:3"))?;
//! let out = graph.add(&filters, "passthrough", None)?;
//! let link = graph.link(sar, out)?;
//! assert_eq!(graph.link_sample_aspect_ratio(link), Some(Rational::new(4, 3)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod demux;
pub mod error;
pub mod filter;
pub mod rational;
pub mod stream;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::demux::{ContainerFormat, Demuxer, FormatRegistry, ProbeSelector};
    pub use crate::error::{Error, Result};
    pub use crate::filter::{FilterGraph, FilterNode, FilterRegistry};
    pub use crate::rational::Rational;
    pub use crate::stream::{MediaKind, Packet, Stream, StreamTable};
}

pub use error::{Error, Result};
