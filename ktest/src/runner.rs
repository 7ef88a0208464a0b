//! Execution engine
//!
//! Expands a descriptor's loop range and dispatches each iteration through
//! the [`TestBody`](crate::case::TestBody) trait object, flushing the
//! invocation channel after every single invocation. Iterations run
//! sequentially in ascending order and are independent trials: a failure in
//! iteration `i` never aborts iteration `i + 1`, so a parameter sweep always
//! covers its whole range.

use log::debug;

use crate::{
    case::{CaseDescriptor, IterationStatus},
    report::{ReportFlags, ResultSink, RunChannel},
};

/// Aggregate outcome of a run, for the driving caller
///
/// The per-iteration detail goes to the sink; this is only the tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Invocations dispatched, skipped ones included
    pub iterations: u32,
    /// Assertion failures across all invocations
    pub failures: u32,
    /// Iterations declined by fixture setup
    pub skipped: u32,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.iterations += other.iterations;
        self.failures += other.failures;
        self.skipped += other.skipped;
    }

    pub fn all_passed(&self) -> bool {
        self.failures == 0
    }
}

/// Execute one descriptor against the given sink
///
/// `value` is the opaque per-run word chosen by the driver; it is forwarded
/// verbatim to every iteration. A single logical invocation occupies the
/// host context exclusively, so iterations are never run concurrently.
pub fn run_case(case: &CaseDescriptor, sink: &mut dyn ResultSink, value: u64) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut chan = RunChannel::new(sink, case.suite(), case.name());

    debug!("running {}.{}", case.suite(), case.name());
    for i in case.iterations() {
        let status = case.entry().invoke(&mut chan, i, value);

        let mut flags = ReportFlags::empty();
        if status == IterationStatus::Skipped {
            flags |= ReportFlags::SKIPPED;
            summary.skipped += 1;
        }
        summary.failures += chan.failures();
        summary.iterations += 1;

        // One report per invocation so the collaborator can attribute
        // failures to the exact iteration that produced them
        chan.flush(i, flags);
    }
    summary
}
