//! ktest — in-kernel test harness
//!
//! A minimal test-execution engine for privileged, long-lived host
//! processes where a conventional test runner cannot be linked in.
//! Independently loaded modules register named test cases with a
//! process-wide registry; a driver runs them on demand, looped variants
//! and setup/teardown fixtures included; per-invocation outcomes cross the
//! execution-context boundary through a caller-supplied [`ResultSink`].
//!
//! The host kernel supplies the allocator and, optionally, a `log`
//! implementation; the harness itself never prints, blocks, or panics.
//!
//! ```
//! use ktest::{registry, CaseDescriptor, CaseReport, ResultSink, RunChannel};
//! use ktest::ktest_assert_eq;
//!
//! struct Boundary;
//!
//! impl ResultSink for Boundary {
//!     fn deliver(&mut self, _report: CaseReport) {
//!         // hand the report across the privilege boundary
//!     }
//! }
//!
//! fn parity(chan: &mut RunChannel<'_>, i: i32, _value: u64) {
//!     ktest_assert_eq!(chan, (2 * i) % 2, 0);
//! }
//!
//! let handle = registry::create("demo_module").unwrap();
//! handle
//!     .register(CaseDescriptor::new("math", "parity", parity).with_loop(0, 4))
//!     .unwrap();
//!
//! let mut sink = Boundary;
//! let summary = registry::run("demo_module", None, &mut sink, 0).unwrap();
//! assert_eq!(summary.iterations, 4);
//! assert!(summary.all_passed());
//!
//! handle.cleanup();
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
pub mod assert;

pub mod case;
pub mod error;
pub mod fixture;
pub mod registry;
pub mod report;
pub mod runner;


// Re-export core types
pub use case::{CaseDescriptor, IterationStatus, TestBody, TestFn};
pub use error::{HarnessError, Result};
pub use fixture::{fixture_case, Fixture, FixtureBodyFn, FixtureCase};
pub use registry::{RegistryHandle, RegistryInfo};
pub use report::{
    CaseReport, Diagnostic, ReportFlags, ResultSink, RunChannel, MAX_PENDING_DIAGNOSTICS,
};
pub use runner::{run_case, RunSummary};
