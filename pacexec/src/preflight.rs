//! Encoder backend discovery and selection (§4.1). Probing shells out to
//! `ffmpeg` exactly once per run; the resulting [`Backend`] is frozen into
//! the run's [`pacmodel::Policy::encoder_id`] and never re-probed.

use std::process::Command;

use pacmodel::{Codec, EncoderId};

use crate::error::ExecError;

/// How a [`Backend`] turns a source FLAC into destination bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// `ffmpeg` reads the FLAC and writes the target container directly
    /// (§4.5.1 pipeline A).
    Direct,
    /// `ffmpeg` decodes to a PCM stream that is piped into a second
    /// process implementing the target codec (§4.5.1 pipeline B).
    Piped,
}

/// One usable (codec, encoder, pipeline) combination discovered by
/// [`probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    pub id: EncoderId,
    pub codec: Codec,
    /// Always present: used directly for [`PipelineKind::Direct`], and as
    /// the decoder half of [`PipelineKind::Piped`].
    pub ffmpeg_path: String,
    pub pipeline: PipelineKind,
    /// The external encoder binary, set only when `pipeline` is `Piped`.
    pub external_tool: Option<String>,
}

/// Every backend this host can run, in preference order per codec.
#[derive(Debug, Clone, Default)]
pub struct BackendSet {
    backends: Vec<Backend>,
}

impl BackendSet {
    pub fn for_codec(&self, codec: Codec) -> impl Iterator<Item = &Backend> {
        self.backends.iter().filter(move |b| b.codec == codec)
    }

    pub fn by_id(&self, codec: Codec, id: &str) -> Option<&Backend> {
        self.for_codec(codec).find(|b| b.id.as_str() == id)
    }
}

/// Probes the host for a usable `ffmpeg` and the encoders it was built
/// with. Never fails outright — an empty [`BackendSet`] is a valid
/// result; [`select`] is where the absence of a usable backend becomes
/// an error.
///
/// `probe_qaac` gates discovery of the `qaac` backend (`pacmodel::Policy`
/// field of the same name): `qaac` is Windows-only and typically runs
/// through a compatibility layer on other hosts, so it is only probed
/// when the caller opts in, rather than paying that startup cost on
/// every run.
#[tracing::instrument]
pub fn probe(probe_qaac: bool) -> BackendSet {
    let ffmpeg_path = "ffmpeg".to_string();
    if !ffmpeg_is_available(&ffmpeg_path) {
        tracing::warn!("ffmpeg not found on PATH; no encoder backends available");
        return BackendSet::default();
    }

    let encoders = list_encoders(&ffmpeg_path);
    let mut backends = Vec::new();

    if encoders.iter().any(|e| e == "libfdk_aac") {
        backends.push(Backend {
            id: EncoderId("libfdk_aac".into()),
            codec: Codec::Aac,
            ffmpeg_path: ffmpeg_path.clone(),
            pipeline: PipelineKind::Direct,
            external_tool: None,
        });
    }
    if external_tool_available("fdkaac") {
        backends.push(Backend {
            id: EncoderId("fdkaac".into()),
            codec: Codec::Aac,
            ffmpeg_path: ffmpeg_path.clone(),
            pipeline: PipelineKind::Piped,
            external_tool: Some("fdkaac".into()),
        });
    }
    if encoders.iter().any(|e| e == "aac") {
        backends.push(Backend {
            id: EncoderId("aac".into()),
            codec: Codec::Aac,
            ffmpeg_path: ffmpeg_path.clone(),
            pipeline: PipelineKind::Direct,
            external_tool: None,
        });
    }
    if encoders.iter().any(|e| e == "libopus") {
        backends.push(Backend {
            id: EncoderId("libopus".into()),
            codec: Codec::Opus,
            ffmpeg_path: ffmpeg_path.clone(),
            pipeline: PipelineKind::Direct,
            external_tool: None,
        });
    }
    if probe_qaac && external_tool_available("qaac") {
        backends.push(Backend {
            id: EncoderId("qaac".into()),
            codec: Codec::Aac,
            ffmpeg_path: ffmpeg_path.clone(),
            pipeline: PipelineKind::Piped,
            external_tool: Some("qaac".into()),
        });
    }

    tracing::info!(count = backends.len(), "encoder preflight complete");
    BackendSet { backends }
}

/// Picks the backend for `codec`, preferring `explicit_id` when given.
/// The result is frozen for the remainder of the run (§4.1, §8 invariant
/// that a run never mixes encoder identities for the same codec).
pub fn select(backends: &BackendSet, codec: Codec, explicit_id: Option<&str>) -> Result<Backend, ExecError> {
    if let Some(id) = explicit_id {
        return backends
            .by_id(codec, id)
            .cloned()
            .ok_or(ExecError::NoBackendAvailable { codec });
    }

    backends
        .for_codec(codec)
        .next()
        .cloned()
        .ok_or(ExecError::NoBackendAvailable { codec })
}

fn ffmpeg_is_available(ffmpeg_path: &str) -> bool {
    Command::new(ffmpeg_path)
        .arg("-version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn external_tool_available(tool: &str) -> bool {
    Command::new(tool).arg("--help").output().is_ok()
}

fn list_encoders(ffmpeg_path: &str) -> Vec<String> {
    let output = match Command::new(ffmpeg_path).arg("-hide_banner").arg("-encoders").output() {
        Ok(out) if out.status.success() => out,
        _ => return Vec::new(),
    };

    let text = String::from_utf8_lossy(&output.stdout);
    text.lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_without_available_backends_errors() {
        let backends = BackendSet::default();
        let result = select(&backends, Codec::Aac, None);
        assert!(matches!(result, Err(ExecError::NoBackendAvailable { codec: Codec::Aac })));
    }

    #[test]
    fn select_prefers_explicit_id_when_present() {
        let backends = BackendSet {
            backends: vec![
                Backend {
                    id: EncoderId("libfdk_aac".into()),
                    codec: Codec::Aac,
                    ffmpeg_path: "ffmpeg".into(),
                    pipeline: PipelineKind::Direct,
                    external_tool: None,
                },
                Backend {
                    id: EncoderId("aac".into()),
                    codec: Codec::Aac,
                    ffmpeg_path: "ffmpeg".into(),
                    pipeline: PipelineKind::Direct,
                    external_tool: None,
                },
            ],
        };

        let chosen = select(&backends, Codec::Aac, Some("aac")).unwrap();
        assert_eq!(chosen.id.as_str(), "aac");
    }

    #[test]
    fn select_falls_back_to_first_match_without_explicit_id() {
        let backends = BackendSet {
            backends: vec![Backend {
                id: EncoderId("libopus".into()),
                codec: Codec::Opus,
                ffmpeg_path: "ffmpeg".into(),
                pipeline: PipelineKind::Direct,
                external_tool: None,
            }],
        };

        let chosen = select(&backends, Codec::Opus, None).unwrap();
        assert_eq!(chosen.id.as_str(), "libopus");
    }
}
