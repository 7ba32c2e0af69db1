use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub retention: Duration,
}

/// Append-only log file that is renamed to `<stem>.<timestamp>.<ext>` once
/// the next write would push it past `max_bytes`. Renamed files older than
/// the retention window are removed on open and after every rotation.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    file: File,
    written: u64,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> io::Result<Self> {
        let path = path.into();
        fs::create_dir_all(log_dir(&path))?;

        let file = open_append(&path)?;
        let written = file.metadata()?.len();
        let rotating = Self {
            path,
            policy,
            file,
            written,
        };
        rotating.prune_expired()?;
        Ok(rotating)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let rotated = self.rotated_path();
        fs::rename(&self.path, &rotated)?;
        self.file = open_append(&self.path)?;
        self.written = 0;
        self.prune_expired()
    }

    fn rotated_path(&self) -> PathBuf {
        let (stem, ext) = split_name(&self.path);
        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S_%6f");
        let name = match ext {
            Some(ext) => format!("{}.{}.{}", stem, stamp, ext),
            None => format!("{}.{}", stem, stamp),
        };
        self.path.with_file_name(name)
    }

    /// Removes rotated siblings whose last write is older than the retention window.
    pub fn prune_expired(&self) -> io::Result<()> {
        let (stem, ext) = split_name(&self.path);
        let prefix = format!("{}.", stem);
        let suffix = ext.map(|ext| format!(".{}", ext));
        let current = self.path.file_name();
        let now = SystemTime::now();

        for entry in fs::read_dir(log_dir(&self.path))? {
            let entry = entry?;
            let name = entry.file_name();
            if Some(name.as_os_str()) == current {
                continue;
            }
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(&prefix) {
                continue;
            }
            if let Some(suffix) = &suffix {
                if !name.ends_with(suffix.as_str()) {
                    continue;
                }
            }

            let modified = entry.metadata()?.modified()?;
            let age = now.duration_since(modified).unwrap_or_default();
            if age > self.policy.retention {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.policy.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn log_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn split_name(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "app".to_string());
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned());
    (stem, ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn policy(max_bytes: u64) -> RotationPolicy {
        RotationPolicy {
            max_bytes,
            retention: 7 * DAY,
        }
    }

    fn rotated_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with("app.") && n != "app.log")
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_appends_below_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");

        let mut file = RotatingFile::open(&path, policy(1024)).unwrap();
        file.write_all(b"first\n").unwrap();
        file.write_all(b"second\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        assert!(rotated_files(dir.path()).is_empty());
    }

    #[test]
    fn test_rotates_past_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");

        let mut file = RotatingFile::open(&path, policy(16)).unwrap();
        file.write_all(b"0123456789\n").unwrap();
        file.write_all(b"abcdefghij\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "abcdefghij\n");
        let rotated = rotated_files(dir.path());
        assert_eq!(rotated.len(), 1);
        assert!(rotated[0].ends_with(".log"));
        assert_eq!(
            fs::read_to_string(dir.path().join(&rotated[0])).unwrap(),
            "0123456789\n"
        );
    }

    #[test]
    fn test_reopen_continues_existing_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, b"0123456789\n").unwrap();

        let mut file = RotatingFile::open(&path, policy(16)).unwrap();
        file.write_all(b"abcdefghij\n").unwrap();

        assert_eq!(rotated_files(dir.path()).len(), 1);
    }

    #[test]
    fn test_oversized_record_goes_to_fresh_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");

        let mut file = RotatingFile::open(&path, policy(4)).unwrap();
        file.write_all(b"a much longer line\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a much longer line\n");
        assert!(rotated_files(dir.path()).is_empty());
    }

    #[test]
    fn test_prunes_expired_rotations_only() {
        let dir = TempDir::new().unwrap();
        let old = dir.path().join("app.2020-01-01_00-00-00_000000.log");
        let recent = dir.path().join("app.2026-01-01_00-00-00_000000.log");
        let unrelated = dir.path().join("other.log");
        for p in [&old, &recent, &unrelated] {
            fs::write(p, b"x").unwrap();
        }
        let stale = SystemTime::now() - 8 * DAY;
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(stale)
            .unwrap();
        File::options()
            .write(true)
            .open(&unrelated)
            .unwrap()
            .set_modified(stale)
            .unwrap();

        let file = RotatingFile::open(dir.path().join("app.log"), policy(1024)).unwrap();

        assert!(!old.exists());
        assert!(recent.exists());
        assert!(unrelated.exists());
        assert!(file.path().exists());
    }
}
