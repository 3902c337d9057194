//! Usage: Filesystem helpers for settings persistence and log housekeeping.

use std::path::Path;
use std::time::{Duration, SystemTime};

pub(crate) fn read_optional_to_string(path: &Path) -> Result<Option<String>, String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(format!("failed to read {}: {err}", path.display())),
    }
}

/// Writes through a sibling temp file, then renames over the target.
pub(crate) fn write_file_atomic(path: &Path, bytes: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create dir {}: {e}", parent.display()))?;
    }

    let file_name = path.file_name().and_then(|v| v.to_str()).unwrap_or("file");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    std::fs::write(&tmp_path, bytes)
        .map_err(|e| format!("failed to write temp file {}: {e}", tmp_path.display()))?;

    // Windows rename requires target not to exist.
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(format!("failed to finalize file {}: {e}", path.display()));
    }

    Ok(())
}

/// Removes regular files in `dir` whose name starts with `prefix` and whose mtime is older
/// than `max_age`. Missing directory counts as nothing to do.
pub(crate) fn prune_files_older_than(
    dir: &Path,
    prefix: &str,
    max_age: Duration,
    now: SystemTime,
) -> Result<usize, String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(format!("failed to read dir {}: {err}", dir.display())),
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(prefix) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let Ok(modified) = meta.modified() else {
            continue;
        };
        let age = now.duration_since(modified).unwrap_or_default();
        if age > max_age && std::fs::remove_file(entry.path()).is_ok() {
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TMP_DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    pub(crate) fn unique_tmp_dir(tag: &str) -> PathBuf {
        let seq = TMP_DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!(
            "celyavox_{tag}_test_{nanos}_{}_{}",
            std::process::id(),
            seq
        ));
        std::fs::create_dir_all(&dir).expect("create tmp dir");
        dir
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::unique_tmp_dir;
    use super::*;

    #[test]
    fn read_optional_to_string_missing_is_none() {
        let dir = unique_tmp_dir("fs");
        let out = read_optional_to_string(&dir.join("missing.json")).expect("read");
        assert!(out.is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn write_file_atomic_replaces_content_and_leaves_no_temp() {
        let dir = unique_tmp_dir("fs");
        let path = dir.join("nested").join("settings.json");

        write_file_atomic(&path, b"{\"a\":1}").expect("first write");
        write_file_atomic(&path, b"{\"a\":2}").expect("second write");

        let got = read_optional_to_string(&path)
            .expect("read")
            .expect("file exists");
        assert_eq!(got, "{\"a\":2}");
        assert!(!dir.join("nested").join("settings.json.tmp").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn prune_only_touches_matching_old_files() {
        let dir = unique_tmp_dir("fs");
        std::fs::write(dir.join("celyavox.log.2026-01-01"), "old").expect("write log");
        std::fs::write(dir.join("other.txt"), "keep").expect("write other");

        let later = SystemTime::now() + Duration::from_secs(3 * 24 * 60 * 60);
        let removed = prune_files_older_than(
            &dir,
            "celyavox.log",
            Duration::from_secs(24 * 60 * 60),
            later,
        )
        .expect("prune");

        assert_eq!(removed, 1);
        assert!(!dir.join("celyavox.log.2026-01-01").exists());
        assert!(dir.join("other.txt").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn prune_keeps_recent_files() {
        let dir = unique_tmp_dir("fs");
        std::fs::write(dir.join("celyavox.log.today"), "fresh").expect("write log");

        let removed = prune_files_older_than(
            &dir,
            "celyavox.log",
            Duration::from_secs(24 * 60 * 60),
            SystemTime::now(),
        )
        .expect("prune");

        assert_eq!(removed, 0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn prune_missing_dir_is_noop() {
        let dir = unique_tmp_dir("fs").join("does-not-exist");
        let removed =
            prune_files_older_than(&dir, "x", Duration::ZERO, SystemTime::now()).expect("prune");
        assert_eq!(removed, 0);
    }
}
