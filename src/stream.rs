//! Elementary streams, stream tables, and packets.
//!
//! A [`StreamTable`] is built once during a demuxer's header read and owns
//! the container's [`Stream`] descriptors for the lifetime of the open
//! container. [`Packet`]s are transient values produced by `read_packet`;
//! their payloads are copied out of the source and owned by the packet.

use crate::error::{Error, Result};
use crate::rational::Rational;

/// Broad classification of an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Audio samples.
    Audio,
    /// Video frames.
    Video,
    /// Subtitle or caption data.
    Subtitle,
    /// Anything else (opaque data, metadata side channels).
    Other,
}

impl MediaKind {
    /// Returns true for audio streams.
    pub fn is_audio(&self) -> bool {
        matches!(self, MediaKind::Audio)
    }

    /// Returns true for video streams.
    pub fn is_video(&self) -> bool {
        matches!(self, MediaKind::Video)
    }
}

/// Identifier of the codec carried by a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CodecId {
    /// AAC audio.
    Aac,
    /// MPEG audio (layer 1/2/3).
    Mp3,
    /// Codec not known to the demuxer.
    #[default]
    Unknown,
}

/// An elementary stream inside an open container.
///
/// Streams are created during the header read and live until the container
/// is closed. The timebase is fixed at creation and never changes; codec
/// parameters (sample rate, channels) may be filled in later as packets
/// reveal them.
#[derive(Debug, Clone)]
pub struct Stream {
    index: usize,
    kind: MediaKind,
    codec: CodecId,
    time_base: Rational,
    needs_parsing: bool,
    sample_rate: Option<u32>,
    channels: Option<u8>,
}

impl Stream {
    /// Stable index of this stream (assignment order within the table).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Media kind of this stream.
    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Codec identifier.
    pub fn codec(&self) -> CodecId {
        self.codec
    }

    /// The stream timebase: the real-world duration of one timestamp tick.
    ///
    /// Fixed at header-read time; never changes for the life of the stream.
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /// Whether packets of this stream require further framing downstream.
    pub fn needs_parsing(&self) -> bool {
        self.needs_parsing
    }

    /// Audio sample rate, if discovered.
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Audio channel count, if discovered.
    pub fn channels(&self) -> Option<u8> {
        self.channels
    }

    /// Record audio parameters discovered while reading packets.
    pub fn set_audio_params(&mut self, sample_rate: u32, channels: u8) {
        self.sample_rate = Some(sample_rate);
        self.channels = Some(channels);
    }
}

/// The set of elementary streams of one open container.
///
/// Owned by the demuxer that built it. Grows only during the header read
/// and is released when the container closes.
#[derive(Debug, Clone, Default)]
pub struct StreamTable {
    streams: Vec<Stream>,
}

impl StreamTable {
    /// Create an empty stream table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stream, returning its index.
    ///
    /// Reservation failure is reported as [`Error::Alloc`] rather than
    /// aborting the process.
    pub fn try_add(
        &mut self,
        kind: MediaKind,
        codec: CodecId,
        time_base: Rational,
        needs_parsing: bool,
    ) -> Result<usize> {
        self.streams
            .try_reserve(1)
            .map_err(|e| Error::Alloc(format!("stream table: {e}")))?;
        let index = self.streams.len();
        self.streams.push(Stream {
            index,
            kind,
            codec,
            time_base,
            needs_parsing,
            sample_rate: None,
            channels: None,
        });
        Ok(index)
    }

    /// Get a stream by index.
    pub fn get(&self, index: usize) -> Option<&Stream> {
        self.streams.get(index)
    }

    /// Get a mutable stream by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Stream> {
        self.streams.get_mut(index)
    }

    /// Iterate over all streams in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter()
    }

    /// Number of streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Release all streams (used when the container closes).
    pub fn clear(&mut self) {
        self.streams.clear();
    }
}

/// A demultiplexed data packet.
///
/// Transient: produced by one `read_packet` call and consumed by the next
/// pipeline stage. The payload is owned, copied out of the source.
#[derive(Debug, Clone)]
pub struct Packet {
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    /// The payload bytes.
    pub data: Vec<u8>,
    /// Presentation timestamp in ticks of the stream timebase, if known.
    pub pts: Option<i64>,
    /// Duration in ticks of the stream timebase, if known.
    pub duration: Option<i64>,
}

impl Packet {
    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_classification() {
        assert!(MediaKind::Audio.is_audio());
        assert!(!MediaKind::Audio.is_video());
        assert!(MediaKind::Video.is_video());
        assert!(!MediaKind::Subtitle.is_audio());
    }

    #[test]
    fn test_stream_table_indices() {
        let mut table = StreamTable::new();
        let a = table
            .try_add(MediaKind::Audio, CodecId::Aac, Rational::new(1, 48000), false)
            .unwrap();
        let b = table
            .try_add(MediaKind::Video, CodecId::Unknown, Rational::new(1, 90000), true)
            .unwrap();

        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0).unwrap().kind(), MediaKind::Audio);
        assert_eq!(table.get(1).unwrap().index(), 1);
        assert!(table.get(2).is_none());
    }

    #[test]
    fn test_stream_audio_params() {
        let mut table = StreamTable::new();
        table
            .try_add(MediaKind::Audio, CodecId::Aac, Rational::new(1, 48000), false)
            .unwrap();

        let stream = table.get_mut(0).unwrap();
        assert_eq!(stream.sample_rate(), None);
        stream.set_audio_params(44100, 2);
        assert_eq!(stream.sample_rate(), Some(44100));
        assert_eq!(stream.channels(), Some(2));
    }

    #[test]
    fn test_stream_table_clear() {
        let mut table = StreamTable::new();
        table
            .try_add(MediaKind::Other, CodecId::Unknown, Rational::new(1, 1_000_000), true)
            .unwrap();
        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_packet_len() {
        let packet = Packet {
            stream_index: 0,
            data: vec![1, 2, 3],
            pts: Some(0),
            duration: None,
        };
        assert_eq!(packet.len(), 3);
        assert!(!packet.is_empty());
    }
}
