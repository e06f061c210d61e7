//! Format probing: score a byte prefix against every registered format.

use super::registry::{ContainerFormat, FormatRegistry};
use super::Demuxer;
use crate::error::{Error, Result};
use std::io::Read;

/// Upper bound of the probe score scale.
pub const SCORE_MAX: u8 = 100;

/// Default number of prefix bytes fed to the probes.
///
/// A few KB is enough for several frames of the supported containers while
/// bounding the worst case of scan-every-offset probes, which is quadratic
/// in the prefix length.
pub const PROBE_SIZE: usize = 2048;

/// Picks the best-matching container format for a byte prefix.
///
/// Every registered descriptor's `probe` is invoked in registration order;
/// the highest score wins and ties keep the first-registered format, so
/// selection is deterministic for a given registry and prefix. A format is
/// selected only if its score is above zero.
pub struct ProbeSelector<'a> {
    registry: &'a FormatRegistry,
}

impl<'a> ProbeSelector<'a> {
    /// Create a selector over a registry.
    pub fn new(registry: &'a FormatRegistry) -> Self {
        Self { registry }
    }

    /// Identify the format of `prefix`.
    ///
    /// Fails with [`Error::UnknownFormat`] when no probe scores above zero;
    /// there is no fallback format.
    pub fn identify(&self, prefix: &[u8]) -> Result<&'a dyn ContainerFormat> {
        let mut best: Option<(&'a dyn ContainerFormat, u8)> = None;
        for format in self.registry.iter() {
            let score = format.probe(prefix).min(SCORE_MAX);
            tracing::trace!(format = format.name(), score, "probed prefix");
            // Strictly greater: on a tie the first-registered format stays.
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((format, score));
            }
        }
        match best {
            Some((format, score)) if score > 0 => {
                tracing::debug!(format = format.name(), score, "identified container format");
                Ok(format)
            }
            _ => Err(Error::UnknownFormat),
        }
    }
}

/// A reader that buffers a probe prefix and replays it.
///
/// Probing must not consume the source, but plain `Read` sources cannot
/// seek back. `ProbeReader` keeps the probed bytes and serves them again
/// before continuing with the underlying source, so the demuxer sees the
/// stream from its true beginning.
pub struct ProbeReader<R> {
    inner: R,
    replay: Vec<u8>,
    pos: usize,
}

impl<R: Read> ProbeReader<R> {
    /// Wrap a source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            replay: Vec::new(),
            pos: 0,
        }
    }

    /// Read up to `want` bytes into the replay buffer and return the
    /// buffered prefix (shorter when the source ends early).
    ///
    /// Must be called before any `read`; the buffered bytes are served
    /// again by subsequent reads.
    pub fn fill_prefix(&mut self, want: usize) -> Result<&[u8]> {
        let mut chunk = [0u8; 512];
        while self.replay.len() < want {
            let cap = chunk.len().min(want - self.replay.len());
            let n = self.inner.read(&mut chunk[..cap])?;
            if n == 0 {
                break;
            }
            self.replay.extend_from_slice(&chunk[..n]);
        }
        Ok(&self.replay)
    }
}

impl<R: Read> Read for ProbeReader<R> {
    fn read(&mut self, out: &mut [u8]) -> std::io::Result<usize> {
        if self.pos < self.replay.len() {
            let n = (self.replay.len() - self.pos).min(out.len());
            out[..n].copy_from_slice(&self.replay[self.pos..self.pos + n]);
            self.pos += n;
            return Ok(n);
        }
        self.inner.read(out)
    }
}

/// Probe a source, create the matching demuxer, and read its header.
///
/// Returns the opened demuxer together with the prefix-replaying reader
/// that must be used for all subsequent `read_packet` calls.
pub fn open<R: Read>(
    registry: &FormatRegistry,
    source: R,
) -> Result<(Box<dyn Demuxer>, ProbeReader<R>)> {
    let mut reader = ProbeReader::new(source);
    let prefix = reader.fill_prefix(PROBE_SIZE)?;
    let format = ProbeSelector::new(registry).identify(prefix)?;
    let mut demuxer = format.create();
    demuxer.read_header(&mut reader)?;
    tracing::info!(
        format = format.name(),
        streams = demuxer.streams().len(),
        "opened input"
    );
    Ok((demuxer, reader))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demux::RawDemuxer;
    use std::io::Cursor;

    /// Stub format scoring a fixed value for any prefix.
    struct FixedScore(&'static str, u8);

    impl ContainerFormat for FixedScore {
        fn name(&self) -> &'static str {
            self.0
        }
        fn probe(&self, _prefix: &[u8]) -> u8 {
            self.1
        }
        fn create(&self) -> Box<dyn Demuxer> {
            Box::new(RawDemuxer::new())
        }
    }

    #[test]
    fn test_tie_breaks_to_first_registered() {
        let registry = FormatRegistry::builder()
            .register(Box::new(FixedScore("alpha", 40)))
            .register(Box::new(FixedScore("beta", 40)))
            .register(Box::new(FixedScore("gamma", 10)))
            .build()
            .unwrap();

        let selector = ProbeSelector::new(&registry);
        assert_eq!(selector.identify(b"x").unwrap().name(), "alpha");
    }

    #[test]
    fn test_higher_score_beats_earlier_registration() {
        let registry = FormatRegistry::builder()
            .register(Box::new(FixedScore("alpha", 10)))
            .register(Box::new(FixedScore("beta", 40)))
            .build()
            .unwrap();

        let selector = ProbeSelector::new(&registry);
        assert_eq!(selector.identify(b"x").unwrap().name(), "beta");
    }

    #[test]
    fn test_scores_clamped_to_scale() {
        let registry = FormatRegistry::builder()
            .register(Box::new(FixedScore("loud", u8::MAX)))
            .build()
            .unwrap();

        // Out-of-range scores are clamped rather than trusted.
        let selector = ProbeSelector::new(&registry);
        assert_eq!(selector.identify(b"x").unwrap().name(), "loud");
    }

    #[test]
    fn test_identify_rejects_unknown_data() {
        let registry = FormatRegistry::with_defaults();
        let selector = ProbeSelector::new(&registry);
        let result = selector.identify(&[0u8; 512]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_identify_is_deterministic() {
        let registry = FormatRegistry::with_defaults();
        let selector = ProbeSelector::new(&registry);

        // Three back-to-back ADTS frame headers, 7 bytes each.
        let mut prefix = Vec::new();
        for _ in 0..3 {
            prefix.extend_from_slice(&[0xFF, 0xF1, 0x50, 0x80, 0x00, 0xFF, 0xFC]);
        }
        prefix.extend_from_slice(&[0u8; 64]);

        let first = selector.identify(&prefix).unwrap().name();
        let second = selector.identify(&prefix).unwrap().name();
        assert_eq!(first, second);
        assert_eq!(first, "aac");
    }

    #[test]
    fn test_probe_reader_replays_prefix() {
        let data: Vec<u8> = (0u8..=255).collect();
        let mut reader = ProbeReader::new(Cursor::new(data.clone()));

        let prefix = reader.fill_prefix(16).unwrap();
        assert_eq!(prefix, &data[..16]);

        // The full stream is still readable from the start.
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_probe_reader_short_source() {
        let mut reader = ProbeReader::new(Cursor::new(vec![1u8, 2, 3]));
        let prefix = reader.fill_prefix(1024).unwrap();
        assert_eq!(prefix, &[1, 2, 3]);
    }
}
