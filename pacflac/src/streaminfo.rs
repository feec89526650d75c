use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::ScanError;

const ZERO_MD5: [u8; 16] = [0; 16];

/// Reads the STREAMINFO block's audio-MD5 without touching any audio
/// frame. Returns `Ok(None)` when the digest is the FLAC spec's all-zero
/// "unset" sentinel — treated identically to "absent" by the planner.
///
/// Grounded on `claxon::FlacReader::streaminfo()`, the same entry point
/// the teacher's decoder uses to read sample rate/channels/bit depth; we
/// only read the header, never `.blocks()`.
pub fn read_audio_md5(path: &Path) -> Result<Option<[u8; 16]>, ScanError> {
    let file = File::open(path).map_err(|source| ScanError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let flac_reader = claxon::FlacReader::new(&mut reader).map_err(|source| ScanError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    let md5 = flac_reader.streaminfo().md5sum;
    if md5 == ZERO_MD5 {
        Ok(None)
    } else {
        Ok(Some(md5))
    }
}
