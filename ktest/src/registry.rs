//! Test registries and the process-wide index
//!
//! Each registering module owns one named registry: an ordered collection
//! of descriptors with test names unique within it. Registries
//! live in a single process-wide index so that independently loaded modules
//! can register at arbitrary times and an external driver can find and run
//! them by name. The index is written rarely (module load/unload) and read
//! on every lookup and run, hence the reader-writer lock.
//!
//! Ownership is witnessed by a [`RegistryHandle`]; `cleanup` consumes the
//! handle, so a registry cannot be used after its module released it.

use alloc::{collections::BTreeMap, vec::Vec};
use core::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use spin::RwLock;

use crate::{
    case::CaseDescriptor,
    error::{HarnessError, Result},
    report::ResultSink,
    runner::{self, RunSummary},
};

/// Process-wide index of live registries, keyed by registry name
static REGISTRY_INDEX: RwLock<BTreeMap<&'static str, TestRegistry>> =
    RwLock::new(BTreeMap::new());

/// Index statistics
struct IndexStats {
    registries_created: AtomicU64,
    registries_destroyed: AtomicU64,
    cases_registered: AtomicU64,
    cases_removed: AtomicU64,
    lookups: AtomicU64,
    runs: AtomicU64,
}

static INDEX_STATS: IndexStats = IndexStats {
    registries_created: AtomicU64::new(0),
    registries_destroyed: AtomicU64::new(0),
    cases_registered: AtomicU64::new(0),
    cases_removed: AtomicU64::new(0),
    lookups: AtomicU64::new(0),
    runs: AtomicU64::new(0),
};

/// Index statistics summary
#[derive(Debug, Clone, Copy)]
pub struct IndexStatsSummary {
    pub registries_created: u64,
    pub registries_destroyed: u64,
    pub cases_registered: u64,
    pub cases_removed: u64,
    pub lookups: u64,
    pub runs: u64,
}

/// Ordered collection of descriptors owned by one registering module
struct TestRegistry {
    name: &'static str,
    cases: Vec<CaseDescriptor>,
}

impl TestRegistry {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            cases: Vec::new(),
        }
    }

    fn case(&self, name: &str) -> Option<&CaseDescriptor> {
        self.cases.iter().find(|c| c.name() == name)
    }

    fn insert(&mut self, case: CaseDescriptor) -> Result<()> {
        if self.case(case.name()).is_some() {
            return Err(HarnessError::DuplicateTest);
        }
        self.cases.push(case);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<CaseDescriptor> {
        match self.cases.iter().position(|c| c.name() == name) {
            Some(pos) => Ok(self.cases.remove(pos)),
            None => Err(HarnessError::TestNotFound),
        }
    }
}

/// Lookup result describing a live registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryInfo {
    pub name: &'static str,
    /// Number of descriptors currently registered
    pub cases: usize,
}

/// Proof of ownership of one registry
///
/// Obtained from [`create`] and consumed by [`RegistryHandle::cleanup`],
/// which must run before the owning module unloads: descriptors reference
/// code in that module, and the engine cannot defend against entries left
/// behind past unload. Dropping a handle without cleanup is a caller bug
/// and only gets a log warning.
pub struct RegistryHandle {
    name: &'static str,
    cleaned: bool,
}

impl RegistryHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Insert a descriptor into the owned registry
    ///
    /// Fails with [`HarnessError::DuplicateTest`] when the test name is
    /// taken; the registry is left unchanged.
    pub fn register(&self, case: CaseDescriptor) -> Result<()> {
        let mut index = REGISTRY_INDEX.write();
        let registry = index
            .get_mut(self.name)
            .ok_or(HarnessError::RegistryNotFound)?;
        debug!("registering {}.{} in '{}'", case.suite(), case.name(), self.name);
        registry.insert(case)?;
        INDEX_STATS.cases_registered.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Remove one previously registered test by name
    pub fn remove(&self, test: &str) -> Result<()> {
        let mut index = REGISTRY_INDEX.write();
        let registry = index
            .get_mut(self.name)
            .ok_or(HarnessError::RegistryNotFound)?;
        registry.remove(test)?;
        INDEX_STATS.cases_removed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Release all descriptors and drop the registry from the index
    ///
    /// Consuming `self` makes use-after-cleanup unrepresentable.
    pub fn cleanup(mut self) {
        let mut index = REGISTRY_INDEX.write();
        if let Some(registry) = index.remove(self.name) {
            debug!(
                "registry '{}' released ({} cases)",
                self.name,
                registry.cases.len()
            );
            INDEX_STATS
                .registries_destroyed
                .fetch_add(1, Ordering::Relaxed);
        }
        self.cleaned = true;
    }
}

impl Drop for RegistryHandle {
    fn drop(&mut self) {
        if !self.cleaned {
            warn!("registry handle '{}' dropped without cleanup", self.name);
        }
    }
}

/// Create an empty named registry
///
/// The module lifecycle `init` hook. Fails with
/// [`HarnessError::DuplicateRegistry`] when the name is already in use
/// process-wide.
pub fn create(name: &'static str) -> Result<RegistryHandle> {
    let mut index = REGISTRY_INDEX.write();
    if index.contains_key(name) {
        return Err(HarnessError::DuplicateRegistry);
    }
    index.insert(name, TestRegistry::new(name));
    INDEX_STATS
        .registries_created
        .fetch_add(1, Ordering::Relaxed);
    debug!("registry '{}' created", name);
    Ok(RegistryHandle {
        name,
        cleaned: false,
    })
}

/// Look up a registry by name
pub fn find(name: &str) -> Result<RegistryInfo> {
    INDEX_STATS.lookups.fetch_add(1, Ordering::Relaxed);
    let index = REGISTRY_INDEX.read();
    index
        .get(name)
        .map(|r| RegistryInfo {
            name: r.name,
            cases: r.cases.len(),
        })
        .ok_or(HarnessError::RegistryNotFound)
}

/// Check that a registry holds a test with the given name
pub fn find_test(registry: &str, test: &str) -> Result<()> {
    INDEX_STATS.lookups.fetch_add(1, Ordering::Relaxed);
    let index = REGISTRY_INDEX.read();
    let registry = index.get(registry).ok_or(HarnessError::RegistryNotFound)?;
    registry
        .case(test)
        .map(|_| ())
        .ok_or(HarnessError::TestNotFound)
}

/// (suite, test) pairs of a registry, in registration order
///
/// The external reporting tool enumerates tests through this before
/// deciding what to run.
pub fn case_names(registry: &str) -> Result<Vec<(&'static str, &'static str)>> {
    INDEX_STATS.lookups.fetch_add(1, Ordering::Relaxed);
    let index = REGISTRY_INDEX.read();
    let registry = index.get(registry).ok_or(HarnessError::RegistryNotFound)?;
    Ok(registry
        .cases
        .iter()
        .map(|c| (c.suite(), c.name()))
        .collect())
}

/// Run a registry's tests: all of them, or one selected by name
///
/// Holds the index read-side for the duration of the run, so registration
/// from other modules waits until the run completes; test execution itself
/// is sequential, one invocation at a time.
pub fn run(
    registry: &str,
    filter: Option<&str>,
    sink: &mut dyn ResultSink,
    value: u64,
) -> Result<RunSummary> {
    INDEX_STATS.runs.fetch_add(1, Ordering::Relaxed);
    let index = REGISTRY_INDEX.read();
    let registry = index.get(registry).ok_or(HarnessError::RegistryNotFound)?;

    let mut summary = RunSummary::default();
    match filter {
        Some(test) => {
            let case = registry.case(test).ok_or(HarnessError::TestNotFound)?;
            summary.merge(runner::run_case(case, sink, value));
        }
        None => {
            for case in &registry.cases {
                summary.merge(runner::run_case(case, sink, value));
            }
        }
    }
    Ok(summary)
}

/// Run every test of every live registry
pub fn run_all(sink: &mut dyn ResultSink, value: u64) -> RunSummary {
    INDEX_STATS.runs.fetch_add(1, Ordering::Relaxed);
    let index = REGISTRY_INDEX.read();
    let mut summary = RunSummary::default();
    for registry in index.values() {
        for case in &registry.cases {
            summary.merge(runner::run_case(case, sink, value));
        }
    }
    summary
}

/// Get index statistics
pub fn stats() -> IndexStatsSummary {
    IndexStatsSummary {
        registries_created: INDEX_STATS.registries_created.load(Ordering::Relaxed),
        registries_destroyed: INDEX_STATS.registries_destroyed.load(Ordering::Relaxed),
        cases_registered: INDEX_STATS.cases_registered.load(Ordering::Relaxed),
        cases_removed: INDEX_STATS.cases_removed.load(Ordering::Relaxed),
        lookups: INDEX_STATS.lookups.load(Ordering::Relaxed),
        runs: INDEX_STATS.runs.load(Ordering::Relaxed),
    }
}
