//! FILENAME: core/binding-engine/src/orchestrator.rs
//! Binding Orchestrator - per-widget refetch control.
//!
//! One `BindingOrchestrator` lives next to each data-bound widget. A refresh
//! cycle is split in three steps so callers keep control over the await:
//!
//! 1. `poll` - fingerprint the widget's inputs and, if they changed, build
//!    the query and hand out a sequenced `PendingFetch`.
//! 2. `PendingFetch::execute` - the only async step.
//! 3. `complete` - publish the response unless the widget's inputs changed
//!    in the meantime.
//!
//! Every newly recorded fingerprint starts a new sequence, whether or not it
//! leads to a fetch, so a response is only published for the inputs the
//! widget currently has.
//!
//! Every failure ends up in `BindingStatus`; nothing here returns an error
//! past the widget.

use serde::Serialize;

use data_service::{DataService, DataServiceError};
use report_model::{log_debug, log_enter, log_error, log_exit, log_info, log_warn};
use report_model::{
    ComponentConfig, ComponentId, FieldMapping, QueryRequest, QueryResponse, SourceOrigin,
};

use crate::config::EngineConfig;
use crate::drill_down::DrillDownMachine;
use crate::error::BindingError;
use crate::fingerprint::{compute_fingerprint, should_refetch, Fingerprint};
use crate::source_resolver::resolve_source;
use crate::validation::validate_component;
use crate::value_resolver::ComponentValues;
use crate::view::{BindingStatus, ChartData};

// ============================================================================
// QUERY CONSTRUCTION
// ============================================================================

/// A query plus what is needed to interpret its response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreparedQuery {
    pub request: QueryRequest,
    pub origin: SourceOrigin,
    pub fields: FieldMapping,
    pub display_dimension: Option<String>,
}

/// Builds the query for `widget` against the current peer values.
///
/// Filters are the widget's own filters followed by the cumulative drill
/// filters. Fails with `Unconfigured` when no source applies and with
/// `MissingFieldMapping` when a role required by the widget type is unmapped.
pub fn build_query<P: ComponentValues + ?Sized>(
    widget: &ComponentConfig,
    peers: &P,
    config: &EngineConfig,
) -> Result<PreparedQuery, BindingError> {
    let source = resolve_source(widget, peers).ok_or(BindingError::Unconfigured)?;
    let fields = source.effective_fields(widget).clone();

    let missing: Vec<String> = widget
        .component_type
        .required_fields()
        .iter()
        .filter(|role| fields.get(**role).map_or(true, |column| column.is_empty()))
        .map(|role| role.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(BindingError::MissingFieldMapping { missing });
    }

    let machine = DrillDownMachine::for_component(widget).with_max_depth(config.max_drill_depth);
    let state = widget.drill_state();

    let mut request = QueryRequest::new(source.dataset_id, source.table_name.as_deref())
        .with_page(config.limit, config.offset);
    request.filters.extend(widget.data_source.filters.iter().cloned());
    request.filters.extend(machine.filters(&state));

    let fallback = widget
        .component_type
        .display_field_key()
        .and_then(|role| fields.get(role))
        .map(String::as_str);
    let display_dimension = machine.active_dimension(&state, fallback);

    Ok(PreparedQuery {
        request,
        origin: source.origin,
        fields,
        display_dimension,
    })
}

// ============================================================================
// FETCH LIFECYCLE
// ============================================================================

/// A query handed out by `poll`, tagged with its issue sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingFetch {
    pub seq: u64,
    pub component_id: ComponentId,
    pub query: PreparedQuery,
    /// Inputs the query was built from.
    pub fingerprint: Fingerprint,
}

impl PendingFetch {
    pub async fn execute<S: DataService + ?Sized>(
        &self,
        service: &S,
    ) -> Result<QueryResponse, DataServiceError> {
        log_debug!(
            "FETCH",
            "seq={} widget={} dataset={} table={:?} filters={}",
            self.seq,
            self.component_id,
            self.query.request.dataset_id,
            self.query.request.table_name,
            self.query.request.filters.len()
        );
        service.query(&self.query.request).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefetchDecision {
    /// Inputs unchanged since the last issued fetch.
    Skip,
    /// Inputs changed but no query can be sent; see `status()`.
    Blocked,
    Fetch(PendingFetch),
}

/// A table the data service picked on its own, to be stored on the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableWriteBack {
    pub component_id: ComponentId,
    pub origin: SourceOrigin,
    pub table_name: String,
    /// Fingerprint of the fetch that discovered the table.
    pub issued_with: Fingerprint,
}

impl TableWriteBack {
    pub fn apply(&self, widget: &ComponentConfig) -> ComponentConfig {
        widget.with_table_name(self.origin, &self.table_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Applied { write_back: Option<TableWriteBack> },
    Failed(String),
    /// The widget's inputs changed after the fetch was issued; the response
    /// was dropped.
    Stale { seq: u64 },
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct BindingOrchestrator {
    config: EngineConfig,
    last_fingerprint: Option<Fingerprint>,
    sequence: u64,
    status: BindingStatus,
}

impl BindingOrchestrator {
    pub fn new(config: EngineConfig) -> Self {
        BindingOrchestrator {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn status(&self) -> &BindingStatus {
        &self.status
    }

    pub fn last_fingerprint(&self) -> Option<&Fingerprint> {
        self.last_fingerprint.as_ref()
    }

    /// Sequence of the most recently recorded inputs (0 before the first).
    /// Only a fetch carrying this sequence can be published.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Forgets the last fingerprint so the next `poll` fetches again.
    pub fn invalidate(&mut self) {
        self.last_fingerprint = None;
    }

    /// Checks whether `widget` needs new data and, if so, prepares the fetch.
    pub fn poll<P: ComponentValues + ?Sized>(
        &mut self,
        widget: &ComponentConfig,
        peers: &P,
    ) -> RefetchDecision {
        let fingerprint = match compute_fingerprint(widget, peers) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                log_error!("BINDING", "widget={} fingerprint failed: {}", widget.id, e);
                self.sequence += 1;
                self.status = BindingStatus::Failed(e.to_string());
                return RefetchDecision::Blocked;
            }
        };

        if !should_refetch(self.last_fingerprint.as_ref(), &fingerprint) {
            return RefetchDecision::Skip;
        }
        self.sequence += 1;
        self.last_fingerprint = Some(fingerprint.clone());

        if self.config.validate_on_resolve {
            for issue in validate_component(widget) {
                log_warn!("BINDING", "widget={} config issue: {}", widget.id, issue);
            }
        }

        match build_query(widget, peers, &self.config) {
            Ok(query) => {
                self.status = BindingStatus::Loading;
                log_info!(
                    "BINDING",
                    "widget={} issuing fetch seq={} origin={:?}",
                    widget.id,
                    self.sequence,
                    query.origin
                );
                RefetchDecision::Fetch(PendingFetch {
                    seq: self.sequence,
                    component_id: widget.id.clone(),
                    query,
                    fingerprint,
                })
            }
            Err(e) => {
                log_info!("BINDING", "widget={} not fetched: {}", widget.id, e);
                self.status = match e {
                    BindingError::Unconfigured => BindingStatus::Unconfigured,
                    BindingError::MissingFieldMapping { missing } => {
                        BindingStatus::MissingFieldMapping(missing)
                    }
                    other => BindingStatus::Failed(other.to_string()),
                };
                RefetchDecision::Blocked
            }
        }
    }

    /// Publishes the result of `pending` if it is still the latest fetch.
    pub fn complete(
        &mut self,
        pending: PendingFetch,
        result: Result<QueryResponse, DataServiceError>,
    ) -> FetchOutcome {
        if pending.seq != self.sequence {
            log_info!(
                "FETCH",
                "widget={} discarding stale response seq={} latest={}",
                pending.component_id,
                pending.seq,
                self.sequence
            );
            return FetchOutcome::Stale { seq: pending.seq };
        }

        match result {
            Ok(response) => {
                let write_back = match (&pending.query.request.table_name, &response.table_name) {
                    (None, Some(selected)) if !selected.is_empty() => Some(TableWriteBack {
                        component_id: pending.component_id.clone(),
                        origin: pending.query.origin,
                        table_name: selected.clone(),
                        issued_with: pending.fingerprint.clone(),
                    }),
                    _ => None,
                };

                log_debug!(
                    "FETCH",
                    "widget={} seq={} rows={} total={}",
                    pending.component_id,
                    pending.seq,
                    response.data.len(),
                    response.total
                );

                let query = pending.query;
                self.status = BindingStatus::Ready(ChartData::from_response(
                    query.request.dataset_id,
                    query.origin,
                    query.fields,
                    query.display_dimension,
                    response,
                ));
                FetchOutcome::Applied { write_back }
            }
            Err(e) => {
                let message = BindingError::from(e).to_string();
                log_warn!(
                    "FETCH",
                    "widget={} seq={} failed: {}",
                    pending.component_id,
                    pending.seq,
                    message
                );
                self.status = BindingStatus::Failed(message.clone());
                FetchOutcome::Failed(message)
            }
        }
    }

    /// Applies `write_back` to `widget`. While the inputs recorded last are
    /// still the ones the fetch was issued with, the recorded fingerprint is
    /// moved to the updated data source, so storing the table name does not
    /// by itself trigger another fetch. Inputs that changed in the meantime
    /// are left to the next `poll`.
    pub fn apply_write_back(
        &mut self,
        write_back: &TableWriteBack,
        widget: &ComponentConfig,
    ) -> ComponentConfig {
        let updated = write_back.apply(widget);
        log_info!(
            "BINDING",
            "widget={} stored auto-selected table={} on {:?}",
            widget.id,
            write_back.table_name,
            write_back.origin
        );

        if self.last_fingerprint.as_ref() != Some(&write_back.issued_with) {
            log_debug!(
                "BINDING",
                "widget={} inputs changed since the fetch, fingerprint kept",
                widget.id
            );
            return updated;
        }

        match write_back.issued_with.with_data_source(&updated.data_source) {
            Ok(rebased) => self.last_fingerprint = Some(rebased),
            Err(e) => log_warn!("BINDING", "widget={} fingerprint rebase failed: {}", widget.id, e),
        }
        updated
    }

    /// One full cycle: poll, fetch if needed, publish.
    /// Returns `None` when no fetch was issued.
    pub async fn refresh<P, S>(
        &mut self,
        widget: &ComponentConfig,
        peers: &P,
        service: &S,
    ) -> Option<FetchOutcome>
    where
        P: ComponentValues + ?Sized,
        S: DataService + ?Sized,
    {
        log_enter!("BINDING", "refresh", "widget={}", widget.id);
        let outcome = match self.poll(widget, peers) {
            RefetchDecision::Fetch(pending) => {
                let result = pending.execute(service).await;
                Some(self.complete(pending, result))
            }
            RefetchDecision::Skip | RefetchDecision::Blocked => None,
        };
        log_exit!("BINDING", "refresh", "{:?}", outcome);
        outcome
    }
}
