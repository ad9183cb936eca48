//! Log id generation.
//!
//! # Responsibilities
//! - Generate the 24-character id that tags every record of one flow
//! - Validate ids received from upstream callers
//!
//! # Design Decisions
//! - Layout: `YYYYMMDDHHMMSS` + 6-digit microseconds + 4 lowercase hex
//! - Time-ordered prefix, random suffix for tie-breaking only
//! - Repeats within one microsecond on the same thread step the suffix
//!   instead of re-rolling it, so a thread never produces the same id twice

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use rand::Rng;

/// Length of every log id.
pub const LOG_ID_LEN: usize = 24;

const DIGITS_LEN: usize = 20;

thread_local! {
    /// Last (microsecond tick, suffix) handed out on this thread.
    static LAST_TICK: Cell<(i64, u16)> = const { Cell::new((i64::MIN, 0)) };
}

/// Unique identifier of one logical flow.
///
/// Only obtainable through [`LogId::generate`] or [`LogId::parse`], so a
/// value of this type is always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogId(Arc<str>);

impl LogId {
    /// Generate a new id from the local clock.
    pub fn generate() -> Self {
        Self::generate_at(Local::now())
    }

    pub(crate) fn generate_at(now: DateTime<Local>) -> Self {
        // Leap seconds report up to 1_999_999.
        let micros = now.timestamp_subsec_micros().min(999_999);
        let tick = now.timestamp() * 1_000_000 + i64::from(micros);

        let suffix = LAST_TICK.with(|last| {
            let (prev_tick, prev_suffix) = last.get();
            let suffix = if prev_tick == tick {
                prev_suffix.wrapping_add(1)
            } else {
                rand::thread_rng().gen()
            };
            last.set((tick, suffix));
            suffix
        });

        let id = format!(
            "{}{:06}{:04x}",
            now.format("%Y%m%d%H%M%S"),
            micros,
            suffix
        );
        Self(id.into())
    }

    /// Accept an id produced elsewhere, if it has the expected shape.
    pub fn parse(raw: &str) -> Option<Self> {
        is_well_formed(raw).then(|| Self(raw.into()))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_well_formed(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == LOG_ID_LEN
        && bytes[..DIGITS_LEN].iter().all(u8::is_ascii_digit)
        && bytes[DIGITS_LEN..]
            .iter()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LogId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
