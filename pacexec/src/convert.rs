//! Conversion pipelines (§4.5.1): shell out to `ffmpeg` (and, for piped
//! backends, a second encoder process) to turn one source FLAC into raw
//! destination container bytes at a `.part` path. Tags and the PAC
//! fingerprint are stamped afterward by the caller, not here — this
//! module only produces audio + container.

use std::path::Path;
use std::process::{Command, Stdio};

use pacmodel::{Codec, Policy};

use crate::error::ExecError;
use crate::preflight::{Backend, PipelineKind};

/// Encodes `source_abs` into `part_path` using `backend`. `part_path`'s
/// extension determines the container `ffmpeg` is told to write.
pub fn encode(source_abs: &Path, part_path: &Path, backend: &Backend, policy: &Policy) -> Result<(), ExecError> {
    match backend.pipeline {
        PipelineKind::Direct => encode_direct(source_abs, part_path, backend, policy),
        PipelineKind::Piped => encode_piped(source_abs, part_path, backend, policy),
    }
}

fn encode_direct(source_abs: &Path, part_path: &Path, backend: &Backend, policy: &Policy) -> Result<(), ExecError> {
    let mut cmd = Command::new(&backend.ffmpeg_path);
    cmd.arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(source_abs)
        .arg("-map")
        .arg("0:a:0")
        .arg("-vn")
        .arg("-map_metadata")
        .arg("0")
        .arg("-c:a")
        .arg(backend.id.as_str())
        .arg("-b:a")
        .arg(format!("{}k", policy.quality))
        .arg("-threads")
        .arg("1");

    if policy.codec == Codec::Aac {
        cmd.arg("-movflags").arg("+use_metadata_tags+faststart");
    }

    cmd.arg(part_path);
    cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::piped());

    run_to_completion(&backend.ffmpeg_path, cmd)
}

/// Pipeline B: `ffmpeg` decodes to raw PCM on stdout, piped into the
/// external encoder's stdin, which writes `part_path` directly.
/// Grounded on the `Stdio::piped()` child-to-child wiring `songbird`
/// uses for its own ffmpeg subprocess, generalised to a second child.
fn encode_piped(source_abs: &Path, part_path: &Path, backend: &Backend, policy: &Policy) -> Result<(), ExecError> {
    let tool = backend
        .external_tool
        .as_deref()
        .expect("Piped backend always carries an external_tool");

    let mut decoder = Command::new(&backend.ffmpeg_path)
        .arg("-y")
        .arg("-loglevel")
        .arg("error")
        .arg("-i")
        .arg(source_abs)
        .arg("-map")
        .arg("0:a:0")
        .arg("-vn")
        .arg("-sn")
        .arg("-dn")
        .arg("-f")
        .arg("wav")
        .arg("-c:a")
        .arg(&policy.pcm_codec)
        .arg("-")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            tool: backend.ffmpeg_path.clone(),
            source,
        })?;

    let decoder_stdout = decoder.stdout.take().expect("stdout piped");

    let encoder_status = Command::new(tool)
        .arg("-b")
        .arg(&policy.quality)
        .arg("-o")
        .arg(part_path)
        .arg("-")
        .stdin(Stdio::from(decoder_stdout))
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Spawn {
            tool: tool.to_string(),
            source,
        })?
        .wait_with_output();

    let decoder_output = decoder.wait_with_output().map_err(|source| ExecError::Spawn {
        tool: backend.ffmpeg_path.clone(),
        source,
    })?;
    if !decoder_output.status.success() {
        return Err(ExecError::EncodeFailed {
            tool: backend.ffmpeg_path.clone(),
            status: decoder_output.status.to_string(),
            stderr: String::from_utf8_lossy(&decoder_output.stderr).into_owned(),
        });
    }

    let encoder_output = encoder_status.map_err(|source| ExecError::Spawn {
        tool: tool.to_string(),
        source,
    })?;
    if !encoder_output.status.success() {
        return Err(ExecError::EncodeFailed {
            tool: tool.to_string(),
            status: encoder_output.status.to_string(),
            stderr: String::from_utf8_lossy(&encoder_output.stderr).into_owned(),
        });
    }

    Ok(())
}

fn run_to_completion(tool: &str, mut cmd: Command) -> Result<(), ExecError> {
    let output = cmd.output().map_err(|source| ExecError::Spawn {
        tool: tool.to_string(),
        source,
    })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ExecError::EncodeFailed {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
