//! End-to-end scenarios (§8) driven through the `paccore::run` facade.
//! Tests that would need a real encoder to exercise a `Convert` action
//! skip themselves when `ffmpeg` (or a usable AAC backend) isn't
//! available, rather than failing a CI box that doesn't ship one.

use std::fs;
use std::path::Path;
use std::process::Command;

use pacmodel::{Codec, EncoderId, Policy};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn ffmpeg_available() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn aac_backend_available() -> bool {
    let backends = pacexec::probe(false);
    pacexec::select(&backends, Codec::Aac, None).is_ok()
}

/// Skips the calling test (returns `true`) unless both `ffmpeg` and a
/// usable AAC backend are present.
fn skip_without_encoder() -> bool {
    if !ffmpeg_available() || !aac_backend_available() {
        eprintln!("skipping: no ffmpeg/AAC backend on this host");
        return true;
    }
    false
}

fn base_policy() -> Policy {
    Policy {
        codec: Codec::Aac,
        encoder_id: EncoderId(String::new()),
        quality: "5".into(),
        version: "0.1.0-test".into(),
        worker_count: 2,
        adopt: true,
        prune: true,
        force_reencode: false,
        retag_stale_stamp: true,
        pcm_codec: "s24le".into(),
        cover_max_side: None,
        verify: false,
        strict_verify: false,
        probe_qaac: false,
    }
}

/// Synthesizes a tiny FLAC fixture at `path` via `ffmpeg`'s `lavfi` sine
/// source. Distinct `freq` values produce distinct audio content (and
/// therefore distinct STREAMINFO audio-MD5s).
fn write_flac_fixture(path: &Path, freq: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            &format!("sine=frequency={freq}:duration=0.2"),
            "-ar",
            "8000",
            "-ac",
            "1",
        ])
        .arg(path)
        .status()
        .expect("spawn ffmpeg to build FLAC fixture");
    assert!(status.success(), "ffmpeg FLAC fixture generation failed");
}

/// Synthesizes a tiny, legacy (untagged-by-this-system) `.m4a` fixture,
/// for scenarios that need a pre-existing destination file.
fn write_m4a_fixture(path: &Path, freq: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            &format!("sine=frequency={freq}:duration=0.2"),
            "-ar",
            "8000",
            "-ac",
            "1",
            "-c:a",
            "aac",
            "-b:a",
            "64k",
        ])
        .arg(path)
        .status()
        .expect("spawn ffmpeg to build M4A fixture");
    assert!(status.success(), "ffmpeg M4A fixture generation failed");
}

#[test]
fn empty_trees_produce_an_empty_successful_summary() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    let policy = base_policy();

    let summary = paccore::run(src.path(), dst.path(), &policy).unwrap();
    assert_eq!(summary.events.len(), 0);
    assert_eq!(summary.exit_code(), 0);
}

/// Scenario A (§8): a brand-new source with no prior output is converted.
#[test]
fn scenario_a_cold_run_converts_a_new_source() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_flac_fixture(&src.path().join("A/Song.flac"), 440);

    let summary = paccore::run(src.path(), dst.path(), &base_policy()).unwrap();

    assert_eq!(summary.converted, 1);
    assert_eq!(summary.failed, 0);
    assert!(dst.path().join("A/Song.m4a").exists());
}

/// Scenario B (§8): a source that moved (same content, new path) is
/// detected via content match and the existing output is renamed, not
/// re-encoded.
#[test]
fn scenario_b_moved_source_is_renamed_not_reencoded() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_flac_fixture(&src.path().join("A/Song.flac"), 440);

    let policy = base_policy();
    let first = paccore::run(src.path(), dst.path(), &policy).unwrap();
    assert_eq!(first.converted, 1);

    fs::create_dir_all(src.path().join("B")).unwrap();
    fs::rename(src.path().join("A/Song.flac"), src.path().join("B/Song.flac")).unwrap();

    let second = paccore::run(src.path(), dst.path(), &policy).unwrap();
    assert_eq!(second.renamed, 1);
    assert_eq!(second.converted, 0);
    assert!(!dst.path().join("A/Song.m4a").exists());
    assert!(dst.path().join("B/Song.m4a").exists());
}

/// Scenario C (§8): a policy (quality) change forces a re-convert of an
/// otherwise up-to-date output.
#[test]
fn scenario_c_quality_change_forces_reconvert() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_flac_fixture(&src.path().join("A/Song.flac"), 440);

    let mut policy = base_policy();
    policy.quality = "5".into();
    let first = paccore::run(src.path(), dst.path(), &policy).unwrap();
    assert_eq!(first.converted, 1);

    policy.quality = "6".into();
    let second = paccore::run(src.path(), dst.path(), &policy).unwrap();
    assert_eq!(second.converted, 1);
    assert_eq!(second.skipped, 0);
}

/// Scenario D (§8): a legacy (unfingerprinted) destination file is
/// adopted in place via Retag rather than overwritten via Convert.
#[test]
fn scenario_d_legacy_destination_is_adopted_in_place() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_flac_fixture(&src.path().join("A/Song.flac"), 440);
    write_m4a_fixture(&dst.path().join("A/Song.m4a"), 220);

    let policy = base_policy();
    let summary = paccore::run(src.path(), dst.path(), &policy).unwrap();

    assert_eq!(summary.retagged, 1);
    assert_eq!(summary.converted, 0);
    assert!(pactags::read_fingerprint(&dst.path().join("A/Song.m4a")).unwrap().is_some());
}

/// Scenario E (§8): destination files with no corresponding source are
/// pruned when policy allows, or reported only when it doesn't.
#[test]
fn orphaned_destination_file_is_pruned_with_no_source_at_all() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::create_dir_all(dst.path().join("Artist")).unwrap();
    fs::write(dst.path().join("Artist/orphan.m4a"), b"not really mp4, but present").unwrap();

    let policy = base_policy();
    let summary = paccore::run(src.path(), dst.path(), &policy).unwrap();

    assert_eq!(summary.pruned, 1);
    assert!(!dst.path().join("Artist/orphan.m4a").exists());
}

#[test]
fn orphan_is_report_only_when_prune_disabled() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    fs::write(dst.path().join("orphan.m4a"), b"not really mp4, but present").unwrap();

    let mut policy = base_policy();
    policy.prune = false;
    let summary = paccore::run(src.path(), dst.path(), &policy).unwrap();

    assert_eq!(summary.pruned, 0);
    assert_eq!(summary.skipped, 1);
    assert!(dst.path().join("orphan.m4a").exists());
}

/// Scenario F (§8): two sources whose sanitised destination paths
/// collide only by case are both converted, the second suffixed.
#[test]
fn scenario_f_case_colliding_destinations_are_suffixed() {
    init_tracing();
    if skip_without_encoder() {
        return;
    }

    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();
    write_flac_fixture(&src.path().join("A/song.flac"), 440);
    write_flac_fixture(&src.path().join("a/SONG.flac"), 660);

    let summary = paccore::run(src.path(), dst.path(), &base_policy()).unwrap();

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 0);
    assert!(dst.path().join("A/song.m4a").exists());
    assert!(dst.path().join("a/SONG (2).m4a").exists());
}

#[test]
fn unavailable_explicit_encoder_fails_preflight_before_any_scan() {
    init_tracing();
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    let mut policy = base_policy();
    policy.encoder_id = EncoderId("definitely-not-a-real-encoder".into());

    let result = paccore::run(src.path(), dst.path(), &policy);
    assert!(matches!(result, Err(paccore::PacError::Preflight(_))));
}
