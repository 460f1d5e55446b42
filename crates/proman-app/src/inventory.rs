use proman_core::local_state::{self, LocalState};
use proman_core::remote::{Pages, RemoteError};
use thiserror::Error;

use crate::App;
use crate::record::RepositoryRecord;

/// Receives every record as soon as it has been fetched and its working copy inspected.
pub trait ProgressReporter {
    fn on_record(&mut self, processed: usize, total_hint: Option<usize>, record: &RepositoryRecord);
}

/// Reporter for callers that do not render progress.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn on_record(&mut self, _: usize, _: Option<usize>, _: &RepositoryRecord) {}
}

#[derive(Debug, Error)]
#[error("failed to fetch repositories after {fetched} records: {source}")]
pub struct FetchFailure {
    pub fetched: usize,
    #[source]
    pub source: RemoteError,
}

/// Repository records in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<RepositoryRecord>,
}

impl Inventory {
    pub fn new(records: Vec<RepositoryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[RepositoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RepositoryRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RepositoryRecord> {
        self.records.get_mut(index)
    }

    pub fn position(&self, identity: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.identity() == identity)
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<RepositoryRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }
}

impl<'a> App<'a> {
    /// Pages through the remote inventory, probing each clone as it arrives.
    pub fn fetch_inventory(
        &self,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<Inventory, FetchFailure> {
        let mut pages = Pages::new(self.remote);
        let mut records = Vec::new();

        while let Some(item) = pages.next() {
            let remote = item.map_err(|source| FetchFailure {
                fetched: records.len(),
                source,
            })?;

            let mut record = RepositoryRecord::from_remote(remote, self.settings);
            let state = local_state::inspect(record.local_path(), self.runner);
            record.apply_local_state(state);
            log_comparison(&record, state);

            records.push(record);
            if let Some(record) = records.last() {
                reporter.on_record(records.len(), pages.total_hint(), record);
            }
        }

        tracing::info!(count = records.len(), "repository inventory fetched");
        Ok(Inventory::new(records))
    }

    /// Re-inspects one record's working copy in place.
    pub fn refresh_local_state(&self, inventory: &mut Inventory, index: usize) -> Option<LocalState> {
        let record = inventory.get_mut(index)?;
        let state = local_state::inspect(record.local_path(), self.runner);
        record.apply_local_state(state);
        Some(state)
    }
}

fn log_comparison(record: &RepositoryRecord, state: LocalState) {
    tracing::debug!(
        repo = record.identity(),
        local_path = %record.local_path().display(),
        cloned = state.is_cloned(),
        dirty = ?record.has_uncommitted_changes(),
        ahead = ?record.ahead_count(),
        behind = ?record.behind_count(),
        "compare"
    );
}
