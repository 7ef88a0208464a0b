//! Per-invocation result transport
//!
//! Test bodies record assertion failures into a [`RunChannel`]; after every
//! invocation (each loop iteration separately, never batched) the engine
//! flushes the accumulated count and diagnostics as one [`CaseReport`] to the
//! caller-supplied [`ResultSink`], the crate's edge toward the external
//! reporting collaborator. Aggregation and rendering happen on the far side
//! of that boundary.

use alloc::{string::String, vec::Vec};

use bitflags::bitflags;

/// Maximum diagnostics buffered between flushes
///
/// The harness runs inside a host context that may not tolerate unbounded
/// allocation; messages beyond this bound are dropped and the report is
/// marked [`ReportFlags::TRUNCATED`].
pub const MAX_PENDING_DIAGNOSTICS: usize = 64;

bitflags! {
    /// Flags attached to a single invocation report
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ReportFlags: u32 {
        /// Fixture setup declined the iteration; body and teardown never ran
        const SKIPPED = 1 << 0;
        /// Diagnostics beyond the buffer bound were dropped
        const TRUNCATED = 1 << 1;
    }
}

/// One formatted assertion failure with source provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// File that implements the test
    pub file: &'static str,
    pub line: u32,
    pub message: String,
}

/// Outcome of one invocation (one loop iteration) of one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseReport {
    /// Suite (test class) name from the descriptor
    pub suite: &'static str,
    /// Test name from the descriptor
    pub name: &'static str,
    /// Loop iteration index this report covers
    pub iteration: i32,
    /// Assertion failures recorded during the invocation
    pub failures: u32,
    pub flags: ReportFlags,
    pub diagnostics: Vec<Diagnostic>,
}

impl CaseReport {
    /// True when the invocation ran and recorded no failures
    pub fn passed(&self) -> bool {
        self.failures == 0 && !self.flags.contains(ReportFlags::SKIPPED)
    }
}

/// Receiving end of the execution-context boundary
///
/// Implemented by the external reporting collaborator. `deliver` is called
/// once per invocation and must not block; the harness holds no reference to
/// a report after handing it over.
pub trait ResultSink {
    fn deliver(&mut self, report: CaseReport);
}

/// Invocation state for one run of one test case
///
/// Scoped to a single call into the execution engine and never shared across
/// concurrent invocations. The failure counter and pending diagnostics reset
/// on every flush, so each iteration is reported independently.
pub struct RunChannel<'a> {
    sink: &'a mut dyn ResultSink,
    suite: &'static str,
    name: &'static str,
    failures: u32,
    pending: Vec<Diagnostic>,
    truncated: bool,
}

impl<'a> RunChannel<'a> {
    pub fn new(sink: &'a mut dyn ResultSink, suite: &'static str, name: &'static str) -> Self {
        Self {
            sink,
            suite,
            name,
            failures: 0,
            pending: Vec::new(),
            truncated: false,
        }
    }

    /// Count one assertion failure and queue its diagnostic
    pub fn record_failure(&mut self, file: &'static str, line: u32, message: String) {
        self.failures = self.failures.saturating_add(1);
        if self.pending.len() < MAX_PENDING_DIAGNOSTICS {
            self.pending.push(Diagnostic {
                file,
                line,
                message,
            });
        } else {
            self.truncated = true;
        }
    }

    /// Failures recorded since the last flush
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Send the accumulated state across the boundary and reset
    ///
    /// Invoked by the engine after every single invocation so the external
    /// collaborator can attribute failures to the exact iteration that
    /// produced them.
    pub(crate) fn flush(&mut self, iteration: i32, mut flags: ReportFlags) {
        if self.truncated {
            flags |= ReportFlags::TRUNCATED;
        }
        let report = CaseReport {
            suite: self.suite,
            name: self.name,
            iteration,
            failures: self.failures,
            flags,
            diagnostics: core::mem::take(&mut self.pending),
        };
        self.failures = 0;
        self.truncated = false;
        self.sink.deliver(report);
    }
}

/// Sink buffering every report in memory, for tests
#[cfg(test)]
pub(crate) struct CollectingSink {
    pub reports: Vec<CaseReport>,
}

#[cfg(test)]
impl CollectingSink {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }
}

#[cfg(test)]
impl ResultSink for CollectingSink {
    fn deliver(&mut self, report: CaseReport) {
        self.reports.push(report);
    }
}

#[cfg(all(test, not(target_os = "none")))]
mod tests {
    use super::*;

    #[test]
    fn test_flush_resets_counters() {
        let mut sink = CollectingSink::new();
        let mut chan = RunChannel::new(&mut sink, "suite", "case");

        chan.record_failure("a.rs", 10, "first".to_string());
        chan.record_failure("a.rs", 11, "second".to_string());
        assert_eq!(chan.failures(), 2);

        chan.flush(0, ReportFlags::empty());
        assert_eq!(chan.failures(), 0);

        chan.flush(1, ReportFlags::empty());

        assert_eq!(sink.reports.len(), 2);
        assert_eq!(sink.reports[0].failures, 2);
        assert_eq!(sink.reports[0].diagnostics.len(), 2);
        assert_eq!(sink.reports[0].diagnostics[1].line, 11);
        assert_eq!(sink.reports[1].failures, 0);
        assert!(sink.reports[1].diagnostics.is_empty());
        assert!(sink.reports[1].passed());
    }

    #[test]
    fn test_overflow_sets_truncated() {
        let mut sink = CollectingSink::new();
        let mut chan = RunChannel::new(&mut sink, "suite", "case");

        for n in 0..(MAX_PENDING_DIAGNOSTICS + 3) {
            chan.record_failure("a.rs", n as u32, format!("msg {}", n));
        }
        chan.flush(0, ReportFlags::empty());

        // The flag does not stick to the next iteration
        chan.record_failure("a.rs", 1, "one more".to_string());
        chan.flush(1, ReportFlags::empty());
        drop(chan);

        assert_eq!(sink.reports[0].failures, (MAX_PENDING_DIAGNOSTICS + 3) as u32);
        assert_eq!(sink.reports[0].diagnostics.len(), MAX_PENDING_DIAGNOSTICS);
        assert!(sink.reports[0].flags.contains(ReportFlags::TRUNCATED));
        assert!(!sink.reports[1].flags.contains(ReportFlags::TRUNCATED));
    }

    #[test]
    fn test_skipped_report_not_passed() {
        let mut sink = CollectingSink::new();
        let mut chan = RunChannel::new(&mut sink, "suite", "case");
        chan.flush(0, ReportFlags::SKIPPED);
        assert!(!sink.reports[0].passed());
        assert_eq!(sink.reports[0].failures, 0);
    }
}
