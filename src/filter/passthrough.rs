//! Pass-through filter node.

use super::pad::Pad;
use super::FilterNode;
use crate::error::{Error, Result};
use crate::stream::MediaKind;

/// A node that forwards frames unchanged and negotiates nothing.
///
/// Useful as a graph endpoint in tests and as the minimal example of the
/// [`FilterNode`] contract. Carries video by default; use
/// [`with_kind`](Self::with_kind) for other media.
pub struct PassThrough {
    kind: MediaKind,
}

impl PassThrough {
    /// Create a video pass-through node.
    pub fn new() -> Self {
        Self {
            kind: MediaKind::Video,
        }
    }

    /// Create a pass-through node for a specific media kind.
    pub fn with_kind(kind: MediaKind) -> Self {
        Self { kind }
    }
}

impl Default for PassThrough {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterNode for PassThrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn init(&mut self, args: Option<&str>) -> Result<()> {
        if let Some(args) = args {
            return Err(Error::Config(format!(
                "passthrough takes no arguments (got '{args}')"
            )));
        }
        Ok(())
    }

    fn media_kind(&self) -> MediaKind {
        self.kind
    }

    fn negotiate(&self, _pad: &mut Pad) -> Result<()> {
        Ok(())
    }
}
