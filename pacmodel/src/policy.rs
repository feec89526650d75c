use serde::{Deserialize, Serialize};

/// Target lossy codec for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Codec {
    /// AAC in an MP4 (`.m4a`) container.
    Aac,
    /// Opus in an Ogg (`.opus`) container.
    Opus,
}

impl Codec {
    /// Destination file extension for this codec, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Codec::Aac => "m4a",
            Codec::Opus => "opus",
        }
    }
}

/// Normalised identifier for a selected encoder backend. Frozen for the
/// duration of a run by the preflight selector (`pacexec::preflight`) and
/// stamped into every [`crate::Fingerprint`] the run writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderId(pub String);

impl EncoderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EncoderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The immutable run configuration. Built once by the caller (CLI/GUI
/// collaborators parse their own config; this core only consumes the
/// resulting value) and passed by reference to the planner and executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub codec: Codec,
    /// Frozen by preflight (`pacexec::preflight::select`); not user input.
    pub encoder_id: EncoderId,
    /// VBR level or target kbps, as used by [`crate::Fingerprint::quality`].
    pub quality: String,
    /// Tool version stamped into every fingerprint written this run.
    pub version: String,
    pub worker_count: usize,
    /// Adopt legacy (unfingerprinted) destination files in place via Retag
    /// instead of overwriting them via Convert.
    pub adopt: bool,
    /// Emit Prune actions for destination files with no corresponding
    /// source, instead of a report-only marker.
    pub prune: bool,
    /// Skip all content/path correlation and Convert every source.
    pub force_reencode: bool,
    /// Refresh the PAC stamp (via Retag) when an otherwise up-to-date
    /// output's fingerprint disagrees on encoder/version/source_rel, even
    /// though src_md5/quality/encoder match.
    pub retag_stale_stamp: bool,
    /// PCM codec used on the intermediate WAV pipe in decode-then-encode
    /// pipelines. Default: 24-bit little-endian signed PCM.
    pub pcm_codec: String,
    /// Longest side, in pixels, cover art is resized down to. `None`
    /// disables resizing.
    pub cover_max_side: Option<u32>,
    /// Re-open each output after encode and compare tags/art against the
    /// source.
    pub verify: bool,
    /// Promote `VerifyMismatch` from a warning to a per-file failure.
    pub strict_verify: bool,
    /// Attempt to discover a `qaac` backend during preflight
    /// (`pacexec::preflight::probe`). `qaac` is Windows-only and on other
    /// hosts runs through a compatibility layer (e.g. a Windows-binary
    /// emulator), whose startup has side effects unrelated to encoding
    /// itself; off by default so a run is never delayed probing for a
    /// backend nobody asked for.
    pub probe_qaac: bool,
}

impl Policy {
    pub fn worker_count_effective(&self) -> usize {
        self.worker_count.max(1)
    }
}
