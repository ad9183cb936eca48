//! Process termination after a fatal record.

/// Exit status of a process stopped by a fatal record.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Signal returned once a fatal record has been delivered and flushed.
///
/// Holding one means the process is expected to stop; [`Fatal::exit`]
/// does that.
#[must_use = "a fatal record was logged; call `exit()` to terminate"]
#[derive(Debug, PartialEq, Eq)]
pub struct Fatal {
    code: i32,
}

impl Fatal {
    pub(crate) fn new() -> Self {
        Self {
            code: FATAL_EXIT_CODE,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.code
    }

    /// Terminate the process.
    pub fn exit(self) -> ! {
        std::process::exit(self.code)
    }
}
