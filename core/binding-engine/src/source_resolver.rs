//! FILENAME: core/binding-engine/src/source_resolver.rs
//! Source Resolver - which dataset/table a widget reads right now.
//!
//! Conditional sources are tried in declaration order and the first full
//! match wins; later sources are not evaluated. When nothing matches the
//! default source is used, and without one the widget is unconfigured.

use serde::{Deserialize, Serialize};

use report_model::{log_debug, log_info};
use report_model::{
    ComponentConfig, ConditionalDataSource, DatasetId, FieldMapping, SourceKind, SourceOrigin,
};

use crate::condition::{combine, evaluate};
use crate::value_resolver::{resolve_operand, ComponentValues};

/// The concrete source selected for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSource {
    pub dataset_id: DatasetId,
    pub table_name: Option<String>,
    /// Field mapping override carried by a matched conditional source.
    pub fields: Option<FieldMapping>,
    pub origin: SourceOrigin,
}

impl ResolvedSource {
    /// The mapping to use: the override if present, else the widget's own.
    pub fn effective_fields<'a>(&'a self, widget: &'a ComponentConfig) -> &'a FieldMapping {
        self.fields.as_ref().unwrap_or(&widget.data_source.fields)
    }
}

/// Returns true if every condition of `source` (combined by its logic
/// operator) holds against the current peer values.
pub fn source_matches<P: ComponentValues + ?Sized>(
    source: &ConditionalDataSource,
    peers: &P,
) -> bool {
    let results: Vec<bool> = source
        .conditions
        .iter()
        .map(|condition| evaluate(condition, resolve_operand(condition, peers).as_ref()))
        .collect();
    combine(source.logic_operator, &results)
}

/// Resolves the source of `widget`, or `None` if it has none.
pub fn resolve_source<P: ComponentValues + ?Sized>(
    widget: &ComponentConfig,
    peers: &P,
) -> Option<ResolvedSource> {
    match &widget.data_source.kind {
        SourceKind::Table {
            dataset_id,
            table_name,
        } => dataset_id.map(|dataset_id| ResolvedSource {
            dataset_id,
            table_name: table_name.clone(),
            fields: None,
            origin: SourceOrigin::Fixed,
        }),
        SourceKind::Conditional {
            conditional_sources,
            default_source,
        } => {
            let matched = conditional_sources
                .iter()
                .enumerate()
                .find(|(_, source)| source_matches(*source, peers));

            if let Some((index, source)) = matched {
                log_debug!(
                    "SOURCE",
                    "widget={} matched conditional source #{} dataset={}",
                    widget.id,
                    index,
                    source.dataset_id
                );
                return Some(ResolvedSource {
                    dataset_id: source.dataset_id,
                    table_name: source.table_name.clone(),
                    fields: source.fields.clone(),
                    origin: SourceOrigin::Conditional(index),
                });
            }

            match default_source {
                Some(default) => {
                    log_debug!(
                        "SOURCE",
                        "widget={} no conditional match, using default dataset={}",
                        widget.id,
                        default.dataset_id
                    );
                    Some(ResolvedSource {
                        dataset_id: default.dataset_id,
                        table_name: default.table_name.clone(),
                        fields: None,
                        origin: SourceOrigin::Default,
                    })
                }
                None => {
                    log_info!("SOURCE", "widget={} has no matching source and no default", widget.id);
                    None
                }
            }
        }
    }
}
