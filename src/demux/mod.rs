//! Demultiplexing: container formats, probing, and packet extraction.
//!
//! The pieces fit together like this:
//!
//! - A [`FormatRegistry`] holds one [`ContainerFormat`] descriptor per
//!   supported container, registered once at startup.
//! - A [`ProbeSelector`] scores a byte prefix against every descriptor and
//!   picks the winner.
//! - The winning descriptor creates a [`Demuxer`], which reads the
//!   container header (building its [`StreamTable`](crate::stream::StreamTable))
//!   and then yields [`Packet`](crate::stream::Packet)s until end of stream.
//!
//! [`open`] wires all of that up for the common case:
//!
//! ```rust,ignore
//! let registry = FormatRegistry::with_defaults();
//! let (mut demuxer, mut reader) = prism::demux::open(&registry, file)?;
//! while let Some(packet) = demuxer.read_packet(&mut reader)? {
//!     // feed the packet to a decoder
//! }
//! demuxer.close();
//! ```

mod adts;
mod probe;
mod raw;
mod registry;

pub use adts::{AdtsDemuxer, AdtsFormat, ADTS_TIMEBASE_DEN};
pub use probe::{open, ProbeReader, ProbeSelector, PROBE_SIZE, SCORE_MAX};
pub use raw::{RawDemuxer, RawFormat, RAW_PACKET_SIZE};
pub use registry::{ContainerFormat, FormatRegistry, FormatRegistryBuilder};

use crate::error::Result;
use crate::stream::{Packet, StreamTable};
use std::io::Read;

/// Lifecycle state of a demuxer.
///
/// `Unopened → HeaderRead → Streaming → Closed`. Packet reads are only
/// legal in `HeaderRead`/`Streaming`; `close` is legal (and idempotent)
/// in every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DemuxerState {
    /// Created but the header has not been read yet.
    #[default]
    Unopened,
    /// Header consumed, streams allocated, no packet read yet.
    HeaderRead,
    /// At least one packet has been read.
    Streaming,
    /// Closed; all streams released.
    Closed,
}

/// A container demultiplexer.
///
/// One implementation exists per container format, created through that
/// format's [`ContainerFormat::create`]. The demuxer owns the stream table
/// of its open container; the byte source is supplied by the caller on
/// each call, and the only blocking operation is reading from it.
///
/// End of stream is signaled by `Ok(None)` from [`read_packet`]
/// (distinct from an I/O error).
///
/// [`read_packet`]: Demuxer::read_packet
pub trait Demuxer: Send {
    /// Short name of this demuxer (for debugging/logging).
    fn name(&self) -> &str;

    /// Read the container header: allocate streams, assign media kinds and
    /// codec identifiers, and fix each stream's timebase.
    ///
    /// Transitions `Unopened → HeaderRead`. Calling it twice, or on a
    /// closed demuxer, is an error.
    fn read_header(&mut self, src: &mut dyn Read) -> Result<&StreamTable>;

    /// Read the next packet.
    ///
    /// Returns `Ok(None)` at end of stream. Calling before `read_header`
    /// or after `close` returns [`Error::Closed`](crate::Error::Closed),
    /// never stale data.
    fn read_packet(&mut self, src: &mut dyn Read) -> Result<Option<Packet>>;

    /// The streams of the open container (empty before the header is read
    /// and after close).
    fn streams(&self) -> &StreamTable;

    /// Current lifecycle state.
    fn state(&self) -> DemuxerState;

    /// Close the container and release all streams. Idempotent.
    fn close(&mut self);
}
