//! Raw ADTS AAC container demuxer.
//!
//! ADTS is a self-framing audio container: every frame starts with a fixed
//! 7-byte header (plus optional CRC) carrying a 12-bit syncword and a
//! 13-bit frame length. That makes both probing and packetizing purely
//! local operations on the byte stream.
//!
//! # Probing
//!
//! The probe scans *every* byte offset of the prefix and counts how many
//! back-to-back frames can be chained from there via the length field.
//! Scanning every offset makes detection resilient to leading garbage or
//! metadata before the first real frame, at the cost of a quadratic worst
//! case; callers bound the prefix length accordingly (see
//! [`PROBE_SIZE`](super::PROBE_SIZE)).
//!
//! # Timebase
//!
//! The stream timebase denominator is `28_224_000` — the least common
//! multiple of all legal ADTS sample rates — rather than the file's own
//! rate. Under that timebase, the duration of a 1024-sample frame is an
//! exact integer for every legal rate, so timestamp arithmetic stays exact
//! across files with different native rates.

use super::registry::ContainerFormat;
use super::{Demuxer, DemuxerState};
use crate::error::{Error, Result};
use crate::rational::Rational;
use crate::stream::{CodecId, MediaKind, Packet, StreamTable};
use std::io::Read;

/// Size of the fixed ADTS frame header in bytes.
const ADTS_HEADER_SIZE: usize = 7;

/// Mask and value for the 16-bit synchronization field: 12-bit syncword,
/// any MPEG version, layer must be zero.
const SYNC_MASK: u16 = 0xFFF6;
const SYNC_VALUE: u16 = 0xFFF0;

/// Samples per AAC frame.
const SAMPLES_PER_FRAME: i64 = 1024;

/// LCM of all legal ADTS sample rates.
pub const ADTS_TIMEBASE_DEN: i32 = 28_224_000;

/// Sample rates addressed by the 4-bit sampling frequency index.
const SAMPLE_RATES: [u32; 16] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350, 0,
    0, 0,
];

/// Score a byte prefix for ADTS content.
///
/// From every start offset, chains frames via the length field and tracks
/// the longest run (`max_frames`) and the run anchored at offset zero
/// (`first_frames`). Consecutive-from-start evidence outranks runs found
/// only mid-buffer.
fn adts_probe(buf: &[u8]) -> u8 {
    if buf.len() < ADTS_HEADER_SIZE {
        return 0;
    }
    let end = buf.len() - ADTS_HEADER_SIZE;

    let mut max_frames = 0u32;
    let mut first_frames = 0u32;
    let mut start = 0usize;
    while start < end {
        let mut pos = start;
        let mut frames = 0u32;
        while pos < end {
            let header = u16::from_be_bytes([buf[pos], buf[pos + 1]]);
            if header & SYNC_MASK != SYNC_VALUE {
                break;
            }
            let word = u32::from_be_bytes([buf[pos + 3], buf[pos + 4], buf[pos + 5], buf[pos + 6]]);
            let fsize = ((word >> 13) & 0x1FFF) as usize;
            if fsize < ADTS_HEADER_SIZE {
                break;
            }
            pos += fsize;
            frames += 1;
        }
        max_frames = max_frames.max(frames);
        if start == 0 {
            first_frames = frames;
        }
        start = pos + 1;
    }

    if first_frames >= 3 {
        super::SCORE_MAX / 2 + 1
    } else if max_frames > 500 {
        super::SCORE_MAX / 2
    } else if max_frames >= 3 {
        super::SCORE_MAX / 4
    } else if max_frames >= 1 {
        1
    } else {
        0
    }
}

/// Parsed fields of one fixed ADTS header.
#[derive(Debug, Clone, Copy)]
struct AdtsHeader {
    sample_rate: u32,
    channels: u8,
    frame_length: usize,
}

impl AdtsHeader {
    /// Parse the 7 fixed header bytes. Returns `None` on a bad syncword,
    /// a reserved sample-rate index, or an impossible frame length.
    fn parse(b: &[u8]) -> Option<Self> {
        let sync = u16::from_be_bytes([b[0], b[1]]);
        if sync & SYNC_MASK != SYNC_VALUE {
            return None;
        }
        let rate_index = (b[2] >> 2) & 0xF;
        let sample_rate = SAMPLE_RATES[rate_index as usize];
        if sample_rate == 0 {
            return None;
        }
        let channels = ((b[2] & 0x1) << 2) | (b[3] >> 6);
        let frame_length =
            ((b[3] as usize & 0x3) << 11) | ((b[4] as usize) << 3) | (b[5] as usize >> 5);
        if frame_length < ADTS_HEADER_SIZE {
            return None;
        }
        Some(Self {
            sample_rate,
            channels,
            frame_length,
        })
    }
}

/// Demuxer for raw ADTS AAC streams.
///
/// Self-framing: each `read_packet` call yields exactly one ADTS frame,
/// header included, with pts/duration stamped in ticks of the fixed LCM
/// timebase. A leading ID3v2 tag block is consumed during the header read.
pub struct AdtsDemuxer {
    state: DemuxerState,
    streams: StreamTable,
    /// Read-ahead buffer; bytes are consumed from the front.
    buf: Vec<u8>,
    next_pts: i64,
    frames_out: u64,
}

impl AdtsDemuxer {
    /// Create an unopened demuxer.
    pub fn new() -> Self {
        Self {
            state: DemuxerState::Unopened,
            streams: StreamTable::new(),
            buf: Vec::new(),
            next_pts: 0,
            frames_out: 0,
        }
    }

    /// Number of frames produced so far.
    pub fn frames_out(&self) -> u64 {
        self.frames_out
    }

    /// Top up the read-ahead buffer to at least `want` bytes, stopping
    /// early at end of stream. Returns the number of buffered bytes.
    fn fill(&mut self, src: &mut dyn Read, want: usize) -> Result<usize> {
        let mut chunk = [0u8; 4096];
        while self.buf.len() < want {
            let n = src.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
        Ok(self.buf.len())
    }

    /// Consume a leading ID3v2 tag block, if present.
    fn skip_id3v2(&mut self, src: &mut dyn Read) -> Result<()> {
        if self.fill(src, 10)? < 10 || &self.buf[..3] != b"ID3" {
            return Ok(());
        }
        let flags = self.buf[5];
        let size = syncsafe_len(&self.buf[6..10]);
        // Header (10) + payload + optional footer (10).
        let mut to_skip = 10 + size + if flags & 0x10 != 0 { 10 } else { 0 };
        tracing::debug!(bytes = to_skip, "skipping leading ID3v2 tag");

        let buffered = self.buf.len().min(to_skip);
        self.buf.drain(..buffered);
        to_skip -= buffered;

        let mut chunk = [0u8; 4096];
        while to_skip > 0 {
            let want = to_skip.min(chunk.len());
            let n = src.read(&mut chunk[..want])?;
            if n == 0 {
                break; // truncated tag; the packet loop will hit EOF next
            }
            to_skip -= n;
        }
        Ok(())
    }
}

impl Default for AdtsDemuxer {
    fn default() -> Self {
        Self::new()
    }
}

impl Demuxer for AdtsDemuxer {
    fn name(&self) -> &str {
        "aac"
    }

    fn read_header(&mut self, src: &mut dyn Read) -> Result<&StreamTable> {
        if self.state != DemuxerState::Unopened {
            return Err(Error::Closed);
        }
        self.skip_id3v2(src)?;

        let mut streams = StreamTable::new();
        streams.try_add(
            MediaKind::Audio,
            CodecId::Aac,
            Rational::new(1, ADTS_TIMEBASE_DEN),
            false,
        )?;
        self.streams = streams;
        self.state = DemuxerState::HeaderRead;
        tracing::debug!("opened ADTS container");
        Ok(&self.streams)
    }

    fn read_packet(&mut self, src: &mut dyn Read) -> Result<Option<Packet>> {
        match self.state {
            DemuxerState::HeaderRead | DemuxerState::Streaming => {}
            _ => return Err(Error::Closed),
        }
        self.state = DemuxerState::Streaming;

        loop {
            let available = self.fill(src, ADTS_HEADER_SIZE)?;
            if available == 0 {
                return Ok(None);
            }
            if available < ADTS_HEADER_SIZE {
                // Trailing bytes too short for a header (e.g. a truncated
                // metadata stub at the end of the file).
                tracing::trace!(bytes = available, "dropping trailing bytes");
                self.buf.clear();
                return Ok(None);
            }

            let header = match AdtsHeader::parse(&self.buf[..ADTS_HEADER_SIZE]) {
                Some(h) => h,
                None => {
                    // Resync byte by byte.
                    self.buf.drain(..1);
                    continue;
                }
            };

            if self.fill(src, header.frame_length)? < header.frame_length {
                tracing::debug!("dropping truncated final frame");
                self.buf.clear();
                return Ok(None);
            }

            let data: Vec<u8> = self.buf.drain(..header.frame_length).collect();
            if self.frames_out == 0 {
                if let Some(stream) = self.streams.get_mut(0) {
                    stream.set_audio_params(header.sample_rate, header.channels);
                }
            }

            // Exact by construction: the timebase denominator is the LCM of
            // every legal sample rate.
            let duration =
                SAMPLES_PER_FRAME * i64::from(ADTS_TIMEBASE_DEN) / i64::from(header.sample_rate);
            let pts = self.next_pts;
            self.next_pts += duration;
            self.frames_out += 1;

            return Ok(Some(Packet {
                stream_index: 0,
                data,
                pts: Some(pts),
                duration: Some(duration),
            }));
        }
    }

    fn streams(&self) -> &StreamTable {
        &self.streams
    }

    fn state(&self) -> DemuxerState {
        self.state
    }

    fn close(&mut self) {
        if self.state != DemuxerState::Closed {
            tracing::debug!(frames = self.frames_out, "closed ADTS demuxer");
        }
        self.streams.clear();
        self.buf.clear();
        self.state = DemuxerState::Closed;
    }
}

/// Decode a 4-byte syncsafe integer (7 bits per byte).
fn syncsafe_len(b: &[u8]) -> usize {
    ((b[0] as usize & 0x7F) << 21)
        | ((b[1] as usize & 0x7F) << 14)
        | ((b[2] as usize & 0x7F) << 7)
        | (b[3] as usize & 0x7F)
}

/// Descriptor for the raw ADTS AAC container format.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdtsFormat;

impl ContainerFormat for AdtsFormat {
    fn name(&self) -> &'static str {
        "aac"
    }

    fn description(&self) -> &'static str {
        "raw ADTS AAC"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["aac"]
    }

    fn probe(&self, prefix: &[u8]) -> u8 {
        adts_probe(prefix)
    }

    fn create(&self) -> Box<dyn Demuxer> {
        Box::new(AdtsDemuxer::new())
    }
}
