//! Setup/teardown fixtures wrapping a test body
//!
//! A fixture value registered with a case is the *template*; the engine
//! clones a fresh context from it for every iteration, runs `setup`, and
//! only executes the body when the context reports itself ready. Setup
//! decides eligibility, not failure: a context left not-ready skips the
//! iteration without recording anything. Teardown runs after the body on
//! every iteration where setup succeeded, failures included.

use alloc::boxed::Box;

use crate::{
    case::{CaseDescriptor, IterationStatus, TestBody},
    report::RunChannel,
};

/// Caller-defined setup/teardown contract
///
/// The readiness flag lives in the implementing type; `setup` must leave
/// `ready()` true for the body to run. Setup holds the channel and may
/// record failures of its own before deciding readiness.
pub trait Fixture: Clone + Send + Sync {
    fn setup(&mut self, chan: &mut RunChannel<'_>);
    /// Runs only if `ready()` was left true by setup
    fn teardown(&mut self, chan: &mut RunChannel<'_>);
    fn ready(&self) -> bool;
}

/// Body signature for fixture tests
pub type FixtureBodyFn<F> = fn(&mut RunChannel<'_>, &mut F, i32, u64);

/// A test entry pairing a fixture template with its body
pub struct FixtureCase<F: Fixture> {
    template: F,
    body: FixtureBodyFn<F>,
}

impl<F: Fixture> FixtureCase<F> {
    pub fn new(template: F, body: FixtureBodyFn<F>) -> Self {
        Self { template, body }
    }
}

/// Descriptor built around a fixture template and body
///
/// Convenience over [`CaseDescriptor::from_entry`] for the common shape.
pub fn fixture_case<F>(
    suite: &'static str,
    name: &'static str,
    template: F,
    body: FixtureBodyFn<F>,
) -> CaseDescriptor
where
    F: Fixture + 'static,
{
    CaseDescriptor::from_entry(suite, name, Box::new(FixtureCase::new(template, body)))
}

impl<F: Fixture> TestBody for FixtureCase<F> {
    fn invoke(&self, chan: &mut RunChannel<'_>, iteration: i32, value: u64) -> IterationStatus {
        let mut ctx = self.template.clone();
        ctx.setup(chan);
        if !ctx.ready() {
            return IterationStatus::Skipped;
        }
        (self.body)(chan, &mut ctx, iteration, value);
        // Body failures are recorded, not thrown, so this runs on every
        // exit path of the body
        ctx.teardown(chan);
        IterationStatus::Completed
    }
}

#[cfg(all(test, not(target_os = "none")))]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;
    use crate::report::CollectingSink;

    #[derive(Clone)]
    struct CountingFixture {
        ready: bool,
        make_ready: bool,
        setups: Arc<AtomicUsize>,
        teardowns: Arc<AtomicUsize>,
    }

    impl CountingFixture {
        fn template(make_ready: bool) -> Self {
            Self {
                ready: false,
                make_ready,
                setups: Arc::new(AtomicUsize::new(0)),
                teardowns: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Fixture for CountingFixture {
        fn setup(&mut self, _chan: &mut RunChannel<'_>) {
            self.setups.fetch_add(1, Ordering::SeqCst);
            self.ready = self.make_ready;
        }

        fn teardown(&mut self, _chan: &mut RunChannel<'_>) {
            self.teardowns.fetch_add(1, Ordering::SeqCst);
        }

        fn ready(&self) -> bool {
            self.ready
        }
    }

    fn failing_body(chan: &mut RunChannel<'_>, _ctx: &mut CountingFixture, _i: i32, _value: u64) {
        ktest_fail!(chan, "forced failure");
    }

    fn quiet_body(_chan: &mut RunChannel<'_>, _ctx: &mut CountingFixture, _i: i32, _value: u64) {}

    #[test]
    fn test_not_ready_skips_body_and_teardown() {
        let template = CountingFixture::template(false);
        let setups = template.setups.clone();
        let teardowns = template.teardowns.clone();
        let case = FixtureCase::new(template, failing_body);

        let mut sink = CollectingSink::new();
        let mut chan = RunChannel::new(&mut sink, "suite", "case");
        let status = case.invoke(&mut chan, 0, 0);

        assert_eq!(status, IterationStatus::Skipped);
        assert_eq!(setups.load(Ordering::SeqCst), 1);
        assert_eq!(teardowns.load(Ordering::SeqCst), 0);
        assert_eq!(chan.failures(), 0);
    }

    #[test]
    fn test_teardown_runs_despite_body_failure() {
        let template = CountingFixture::template(true);
        let teardowns = template.teardowns.clone();
        let case = FixtureCase::new(template, failing_body);

        let mut sink = CollectingSink::new();
        let mut chan = RunChannel::new(&mut sink, "suite", "case");
        let status = case.invoke(&mut chan, 0, 0);

        assert_eq!(status, IterationStatus::Completed);
        assert_eq!(teardowns.load(Ordering::SeqCst), 1);
        assert_eq!(chan.failures(), 1);
    }

    #[test]
    fn test_each_invocation_clones_the_template() {
        let template = CountingFixture::template(true);
        let setups = template.setups.clone();
        let teardowns = template.teardowns.clone();
        let case = FixtureCase::new(template, quiet_body);

        let mut sink = CollectingSink::new();
        let mut chan = RunChannel::new(&mut sink, "suite", "case");
        case.invoke(&mut chan, 0, 0);
        case.invoke(&mut chan, 1, 0);

        assert_eq!(setups.load(Ordering::SeqCst), 2);
        assert_eq!(teardowns.load(Ordering::SeqCst), 2);
    }
}
