//! Generic fallback demuxer for opaque byte streams.
//!
//! Some inputs have no container framing at all. The raw demuxer exposes
//! them as a single stream of bounded-size chunks and leaves frame boundary
//! discovery to a downstream parser. It never wins a probe (its score is
//! always zero); callers open it explicitly by name.

use super::registry::ContainerFormat;
use super::{Demuxer, DemuxerState};
use crate::error::{Error, Result};
use crate::rational::Rational;
use crate::stream::{CodecId, MediaKind, Packet, StreamTable};
use std::io::Read;

/// Maximum payload size of one raw packet.
pub const RAW_PACKET_SIZE: usize = 1024;

/// Demuxer that passes the source through as bounded chunks.
///
/// Packets carry no timestamps; the stream timebase is a nominal
/// microsecond clock.
pub struct RawDemuxer {
    state: DemuxerState,
    streams: StreamTable,
}

impl RawDemuxer {
    /// Create an unopened demuxer.
    pub fn new() -> Self {
        Self {
            state: DemuxerState::Unopened,
            streams: StreamTable::new(),
        }
    }
}

impl Default for RawDemuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl Demuxer for RawDemuxer {
    fn name(&self) -> &str {
        "data"
    }

    fn read_header(&mut self, _src: &mut dyn Read) -> Result<&StreamTable> {
        if self.state != DemuxerState::Unopened {
            return Err(Error::Closed);
        }
        let mut streams = StreamTable::new();
        streams.try_add(
            MediaKind::Other,
            CodecId::Unknown,
            Rational::new(1, 1_000_000),
            true,
        )?;
        self.streams = streams;
        self.state = DemuxerState::HeaderRead;
        Ok(&self.streams)
    }

    fn read_packet(&mut self, src: &mut dyn Read) -> Result<Option<Packet>> {
        match self.state {
            DemuxerState::HeaderRead | DemuxerState::Streaming => {}
            _ => return Err(Error::Closed),
        }
        self.state = DemuxerState::Streaming;

        let mut data = vec![0u8; RAW_PACKET_SIZE];
        let n = src.read(&mut data)?;
        if n == 0 {
            return Ok(None);
        }
        data.truncate(n);
        Ok(Some(Packet {
            stream_index: 0,
            data,
            pts: None,
            duration: None,
        }))
    }

    fn streams(&self) -> &StreamTable {
        &self.streams
    }

    fn state(&self) -> DemuxerState {
        self.state
    }

    fn close(&mut self) {
        self.streams.clear();
        self.state = DemuxerState::Closed;
    }
}

/// Descriptor for the raw fallback format.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFormat;

impl ContainerFormat for RawFormat {
    fn name(&self) -> &'static str {
        "data"
    }

    fn description(&self) -> &'static str {
        "raw opaque data"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["bin"]
    }

    fn probe(&self, _prefix: &[u8]) -> u8 {
        0
    }

    fn create(&self) -> Box<dyn Demuxer> {
        Box::new(RawDemuxer::new())
    }
}
