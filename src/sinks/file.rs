//! Hourly rotating log file.
//!
//! # Responsibilities
//! - Write records to `<dir>/<base>.%Y%m%d%H` for the current local hour
//! - Keep `<dir>/<base>` pointing at the active file
//! - Purge rotated files older than the configured max age
//!
//! # Design Decisions
//! - Rotation is checked on write, no background timer
//! - One mutex serializes writes and rotation
//! - The alias is a relative symlink on unix; elsewhere it is not created

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDateTime};

use crate::engine::record::LogRecord;
use crate::sinks::format::format_line;
use crate::sinks::Sink;

/// strftime pattern of the rotation suffix.
pub const ROTATION_PATTERN: &str = "%Y%m%d%H";

type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// File currently being written.
struct Active {
    period: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

/// A log file rotated every hour.
pub struct RotatingFile {
    directory: PathBuf,
    base_name: String,
    max_age: Option<Duration>,
    clock: Clock,
    active: Mutex<Active>,
}

impl RotatingFile {
    /// Open the file for the current hour, creating `directory` if needed.
    ///
    /// `max_age` of `None` keeps rotated files forever.
    pub fn open(
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        max_age: Option<Duration>,
    ) -> io::Result<Self> {
        Self::with_clock(directory, base_name, max_age, Local::now)
    }

    /// Like [`RotatingFile::open`], reading the time from `clock`.
    pub fn with_clock(
        directory: impl Into<PathBuf>,
        base_name: impl Into<String>,
        max_age: Option<Duration>,
        clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static,
    ) -> io::Result<Self> {
        let directory = directory.into();
        let base_name = base_name.into();
        if base_name.is_empty() || base_name.contains(['/', '\\']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid log file name {:?}", base_name),
            ));
        }

        fs::create_dir_all(&directory)?;
        let now = clock();
        let active = open_period(&directory, &base_name, &now)?;

        let file = Self {
            directory,
            base_name,
            max_age: max_age.filter(|age| *age > Duration::zero()),
            clock: Box::new(clock),
            active: Mutex::new(active),
        };
        let path = file.current_path();
        file.relink(&path);
        file.purge(&now, &path);
        Ok(file)
    }

    /// Path of the file being written.
    pub fn current_path(&self) -> PathBuf {
        self.active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .path
            .clone()
    }

    /// Path of the stable alias.
    pub fn link_path(&self) -> PathBuf {
        self.directory.join(&self.base_name)
    }

    /// Append one line, rotating first if the hour changed.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let now = (self.clock)();
        let period = now.format(ROTATION_PATTERN).to_string();

        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        if active.period != period {
            active.writer.flush()?;
            *active = open_period(&self.directory, &self.base_name, &now)?;
            self.relink(&active.path);
            self.purge(&now, &active.path);
        }

        writeln!(active.writer, "{}", line)?;
        active.writer.flush()
    }

    fn relink(&self, target: &Path) {
        #[cfg(unix)]
        {
            let link = self.link_path();
            let _ = fs::remove_file(&link);
            if let Some(name) = target.file_name() {
                let _ = std::os::unix::fs::symlink(name, &link);
            }
        }
        #[cfg(not(unix))]
        let _ = target;
    }

    /// Remove rotated files that ended before `now - max_age`.
    ///
    /// `active` is never removed.
    fn purge(&self, now: &DateTime<Local>, active: &Path) {
        let Some(max_age) = self.max_age else {
            return;
        };
        let Some(cutoff) = now.naive_local().checked_sub_signed(max_age) else {
            return;
        };
        let Ok(entries) = fs::read_dir(&self.directory) else {
            return;
        };
        let prefix = format!("{}.", self.base_name);

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(suffix) = name.to_str().and_then(|n| n.strip_prefix(&prefix)) else {
                continue;
            };
            if entry.path() == active {
                continue;
            }
            if let Some(period_start) = parse_period(suffix) {
                if period_start < cutoff {
                    let _ = fs::remove_file(entry.path());
                }
            }
        }
    }
}

fn open_period(directory: &Path, base_name: &str, now: &DateTime<Local>) -> io::Result<Active> {
    let period = now.format(ROTATION_PATTERN).to_string();
    let path = directory.join(format!("{}.{}", base_name, period));
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok(Active {
        period,
        path,
        writer: BufWriter::new(file),
    })
}

/// Start of the hour encoded in a rotation suffix.
fn parse_period(suffix: &str) -> Option<NaiveDateTime> {
    if suffix.len() != 10 || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{}00", suffix), "%Y%m%d%H%M").ok()
}

impl Sink for RotatingFile {
    fn deliver(&self, record: &LogRecord) {
        let _ = self.write_line(&format_line(record));
    }

    fn flush(&self) {
        let _ = self
            .active
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .writer
            .flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Clock that starts at a fixed hour and can be advanced by tests.
    fn manual_clock(start: DateTime<Local>) -> (Arc<AtomicI64>, impl Fn() -> DateTime<Local>) {
        let offset_hours = Arc::new(AtomicI64::new(0));
        let handle = offset_hours.clone();
        let clock = move || start + Duration::hours(handle.load(Ordering::SeqCst));
        (offset_hours, clock)
    }

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 9, 10, 15, 0).unwrap()
    }

    #[test]
    fn test_open_creates_directory_and_period_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");
        let (_, clock) = manual_clock(start());

        let file = RotatingFile::with_clock(&dir, "app.log", None, clock).unwrap();

        assert!(dir.exists());
        assert_eq!(file.current_path(), dir.join("app.log.2026030910"));
        assert!(file.current_path().exists());
    }

    #[test]
    fn test_rejects_bad_base_name() {
        let temp = TempDir::new().unwrap();
        assert!(RotatingFile::open(temp.path(), "", None).is_err());
        assert!(RotatingFile::open(temp.path(), "a/b.log", None).is_err());
    }

    #[test]
    fn test_open_fails_when_directory_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        assert!(RotatingFile::open(blocker.join("logs"), "app.log", None).is_err());
    }

    #[test]
    fn test_rotates_every_hour() {
        let temp = TempDir::new().unwrap();
        let (offset, clock) = manual_clock(start());
        let file = RotatingFile::with_clock(temp.path(), "app.log", None, clock).unwrap();

        file.write_line("first hour").unwrap();
        offset.store(1, Ordering::SeqCst);
        file.write_line("second hour").unwrap();

        let first = fs::read_to_string(temp.path().join("app.log.2026030910")).unwrap();
        let second = fs::read_to_string(temp.path().join("app.log.2026030911")).unwrap();
        assert_eq!(first, "first hour\n");
        assert_eq!(second, "second hour\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_alias_follows_active_file() {
        let temp = TempDir::new().unwrap();
        let (offset, clock) = manual_clock(start());
        let file = RotatingFile::with_clock(temp.path(), "app.log", None, clock).unwrap();
        let link = file.link_path();

        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("app.log.2026030910"));

        offset.store(1, Ordering::SeqCst);
        file.write_line("moved").unwrap();
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("app.log.2026030911"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "moved\n");
    }

    #[test]
    fn test_purges_expired_rotations_only() {
        let temp = TempDir::new().unwrap();
        let stale = temp.path().join("app.log.2026030905");
        let recent = temp.path().join("app.log.2026030909");
        let unrelated = temp.path().join("other.log.2026030901");
        for path in [&stale, &recent, &unrelated] {
            fs::write(path, "old\n").unwrap();
        }

        let (_, clock) = manual_clock(start());
        RotatingFile::with_clock(temp.path(), "app.log", Some(Duration::hours(3)), clock).unwrap();

        assert!(!stale.exists());
        assert!(recent.exists());
        assert!(unrelated.exists());
    }

    #[test]
    fn test_huge_max_age_keeps_everything() {
        let temp = TempDir::new().unwrap();
        let old = temp.path().join("app.log.2000010100");
        fs::write(&old, "old\n").unwrap();

        let (_, clock) = manual_clock(start());
        let file =
            RotatingFile::with_clock(temp.path(), "app.log", Some(Duration::MAX), clock).unwrap();
        file.write_line("kept").unwrap();

        assert!(old.exists());
        assert_eq!(fs::read_to_string(file.current_path()).unwrap(), "kept\n");
    }

    #[test]
    fn test_non_positive_max_age_never_removes_active_file() {
        let temp = TempDir::new().unwrap();
        let (offset, clock) = manual_clock(start());
        let file =
            RotatingFile::with_clock(temp.path(), "app.log", Some(Duration::hours(-1)), clock)
                .unwrap();
        file.write_line("first hour").unwrap();
        offset.store(1, Ordering::SeqCst);
        file.write_line("second hour").unwrap();

        assert!(temp.path().join("app.log.2026030910").exists());
        assert_eq!(
            fs::read_to_string(temp.path().join("app.log.2026030911")).unwrap(),
            "second hour\n"
        );
    }

    #[test]
    fn test_parse_period() {
        let parsed = parse_period("2026030910").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M").to_string(), "2026-03-09 10:00");
        assert!(parse_period("20260309").is_none());
        assert!(parse_period("2026030910.gz").is_none());
    }

    #[test]
    fn test_concurrent_writes_keep_lines_whole() {
        let temp = TempDir::new().unwrap();
        let (_, clock) = manual_clock(start());
        let file = Arc::new(RotatingFile::with_clock(temp.path(), "app.log", None, clock).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let file = file.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        file.write_line(&format!("thread {} line {}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = fs::read_to_string(file.current_path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 400);
        assert!(lines.iter().all(|l| l.starts_with("thread ")));
    }
}
