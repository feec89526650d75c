use serde::{Deserialize, Serialize};

/// The self-describing 5-tuple embedded in every output this system
/// produces. This is the substrate of stateless reconciliation: a run
/// never needs a database, because every output carries enough of its own
/// history to be re-derived from the current source tree.
///
/// Wire format (stable, §6 of the spec):
/// - MP4 `.m4a`: freeform atoms, mean `org.pac`, names matching the field
///   names below.
/// - Opus `.opus`: Vorbis comments `PAC_SRC_MD5`, `PAC_ENCODER`,
///   `PAC_QUALITY`, `PAC_VERSION`, `PAC_SOURCE_REL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Source audio-MD5 at encode time, 32-char lowercase hex.
    pub src_md5: String,
    /// Normalised encoder identifier, e.g. `libfdk_aac`, `qaac`, `fdkaac`,
    /// `libopus`.
    pub encoder: String,
    /// Quality setting (VBR level or target kbps) as a decimal string.
    pub quality: String,
    /// Version of this tool that wrote the output.
    pub version: String,
    /// Source's `rel_path` at encode time, forward-slash separated. Used
    /// to detect moves that changed path but not content.
    pub source_rel: String,
}

impl Fingerprint {
    /// The five field names, in the stable order used for both the MP4
    /// freeform-atom names and the Vorbis comment key suffixes.
    pub const FIELDS: [&'static str; 5] =
        ["src_md5", "encoder", "quality", "version", "source_rel"];

    pub const MP4_MEAN: &'static str = "org.pac";

    /// Vorbis comment key for a given field name, e.g. `src_md5` ->
    /// `PAC_SRC_MD5`.
    pub fn vorbis_key(field: &str) -> String {
        format!("PAC_{}", field.to_ascii_uppercase())
    }

    /// True when `encoder` and `quality` both match the given run policy,
    /// i.e. the bytes are an acceptable encoding under the current policy.
    pub fn matches_policy(&self, encoder_id: &str, quality: &str) -> bool {
        self.encoder == encoder_id && self.quality == quality
    }
}
