use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// One discovered lossless file under the source root.
///
/// Produced by the source scanner (`pacflac::scan`); consumed by the
/// planner. `rel_path` always uses forward slashes, regardless of host
/// platform, so it can be compared and hashed consistently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Path relative to the source root, forward-slash separated.
    pub rel_path: String,
    /// Byte length of the source file.
    pub size: u64,
    /// Last-modification timestamp, in nanoseconds since the Unix epoch.
    pub mtime_ns: i128,
    /// FLAC STREAMINFO audio-MD5, as 16 raw bytes. `None` when the block is
    /// missing, truncated, or holds the all-zero "unset" sentinel.
    pub audio_md5: Option<[u8; 16]>,
    /// Set when a per-file I/O error occurred while stat-ing or reading the
    /// header; the entry is still emitted with `audio_md5 = None`.
    pub scan_error: bool,
}

impl SourceEntry {
    /// Hex-encodes [`Self::audio_md5`], lowercase, 32 chars. `None` when the
    /// digest is unavailable.
    pub fn audio_md5_hex(&self) -> Option<String> {
        self.audio_md5.map(|bytes| hex::encode(bytes))
    }

    /// Weak identity used when `audio_md5` is absent: source size and mtime.
    pub fn weak_identity(&self) -> (u64, i128) {
        (self.size, self.mtime_ns)
    }
}

/// One discovered output file under the destination root.
///
/// Produced by the destination index (`pactags::index`); consumed by the
/// planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEntry {
    /// Path relative to the destination root, forward-slash separated.
    pub rel_path: String,
    pub size: u64,
    pub mtime_ns: i128,
    /// `None` means legacy/untagged: the container has no PAC fingerprint,
    /// or it could not be parsed.
    pub fingerprint: Option<Fingerprint>,
    /// Set when the output's tags could not be opened or parsed; the file
    /// is still indexed and treated as legacy.
    pub index_error: bool,
}
