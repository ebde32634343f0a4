//! FILENAME: tests/test_binding_flow.rs
//! End-to-end binding cycles against the in-memory data service.

mod common;

use binding_engine::{
    build_query, descend_component, resolve_source, validate_report, ascend_component,
    BindingOrchestrator, BindingStatus, ConfigIssue, DrillRejection, EngineConfig, FetchOutcome,
    RefetchDecision, ValueResolver,
};
use common::{component, sample_report, sales_service, REGION_PICKER, REGION_PIE, SALES_CHART};
use report_model::{
    ComponentConfig, ComponentType, ConditionOperator, ConditionalDataSource, DataSourceCondition,
    DataSourceConfig, Filter, ReportConfig, SourceKind, SourceOrigin, SourceRef, MAX_DRILL_DEPTH,
};
use serde_json::json;

// ============================================================================
// SOURCE SWITCHING
// ============================================================================

#[tokio::test]
async fn test_dropdown_switches_between_matched_and_default_source() {
    let service = sales_service();
    let mut orchestrator = BindingOrchestrator::default();

    let asia = sample_report("Asia");
    let chart = component(&asia, SALES_CHART);
    let outcome = orchestrator.refresh(&chart, &asia, &service).await;
    assert_eq!(outcome, Some(FetchOutcome::Applied { write_back: None }));

    let data = orchestrator.status().chart_data().unwrap();
    assert_eq!(data.table_name.as_deref(), Some("asia_sales"));
    assert_eq!(data.origin, SourceOrigin::Conditional(0));
    assert_eq!(data.total, 2);
    assert_eq!(data.categories(), vec![json!("2024-01"), json!("2024-02")]);

    // same inputs: nothing to do
    assert_eq!(orchestrator.refresh(&chart, &asia, &service).await, None);

    let eu = sample_report("EU");
    orchestrator.refresh(&chart, &eu, &service).await;
    let data = orchestrator.status().chart_data().unwrap();
    assert_eq!(data.table_name.as_deref(), Some("global_sales"));
    assert_eq!(data.origin, SourceOrigin::Default);
    assert_eq!(data.total, 5);
    assert_eq!(data.series("y").len(), 5);
}

#[test]
fn test_static_only_condition_falls_back_to_default() {
    let widget = ComponentConfig::new("w", ComponentType::LineChart).with_data_source(
        DataSourceConfig::conditional(
            vec![ConditionalDataSource::new(5, Some("eu_sales")).with_condition(
                DataSourceCondition::static_value(ConditionOperator::Eq, json!("EU"))
                    .with_field("region"),
            )],
            Some(SourceRef::new(5, Some("global_sales"))),
        )
        .with_field("x", "month")
        .with_field("y", "amount"),
    );
    let unrelated = ComponentConfig::new("p", ComponentType::TextInput).with_prop("value", json!("EU"));
    let report = ReportConfig::new(vec![widget.clone(), unrelated]);

    let resolved = resolve_source(&widget, &report).unwrap();
    assert_eq!(resolved.table_name.as_deref(), Some("global_sales"));

    let issues = validate_report(&report);
    assert!(issues.iter().any(|(id, issue)| id == "w"
        && matches!(issue, ConfigIssue::SelfReferentialCondition { .. })));
}

#[test]
fn test_first_match_wins_over_later_sources() {
    let report = sample_report("Asia");
    let mut chart = component(&report, SALES_CHART);
    let duplicate = ConditionalDataSource::new(5, Some("eu_sales")).with_condition(
        DataSourceCondition::component_fixed(REGION_PICKER, "value", ConditionOperator::Eq, json!("Asia")),
    );
    if let SourceKind::Conditional { conditional_sources, .. } = &mut chart.data_source.kind {
        conditional_sources.push(duplicate);
    }

    let resolved = resolve_source(&chart, &ValueResolver::from_report(&report)).unwrap();
    assert_eq!(resolved.table_name.as_deref(), Some("asia_sales"));
}

// ============================================================================
// DRILL-DOWN
// ============================================================================

#[tokio::test]
async fn test_drill_path_narrows_queries_and_stops_at_max_depth() {
    let service = sales_service();
    let report = sample_report("Asia");
    let mut pie = component(&report, REGION_PIE);
    let mut orchestrator = BindingOrchestrator::default();

    // level 0: the service picks the table, which is stored on the widget
    let outcome = orchestrator.refresh(&pie, &report, &service).await.unwrap();
    let write_back = match outcome {
        FetchOutcome::Applied {
            write_back: Some(write_back),
        } => write_back,
        other => panic!("expected a table write-back, got {:?}", other),
    };
    assert_eq!(write_back.table_name, "global_sales");
    pie = orchestrator.apply_write_back(&write_back, &pie);
    assert_eq!(orchestrator.poll(&pie, &report), RefetchDecision::Skip);

    for clicked in ["Asia", "China", "Shanghai"] {
        pie = descend_component(&pie, json!(clicked), MAX_DRILL_DEPTH).unwrap();
        let outcome = orchestrator.refresh(&pie, &report, &service).await;
        assert_eq!(outcome, Some(FetchOutcome::Applied { write_back: None }));
    }

    let query = build_query(&pie, &report, &EngineConfig::default()).unwrap();
    assert_eq!(
        query.request.filters,
        vec![
            Filter::eq("region", json!("Asia")),
            Filter::eq("country", json!("China")),
            Filter::eq("city", json!("Shanghai")),
        ]
    );

    let data = orchestrator.status().chart_data().unwrap();
    assert_eq!(data.total, 1);
    assert_eq!(data.display_dimension.as_deref(), Some("city"));

    assert_eq!(
        descend_component(&pie, json!("Pudong"), MAX_DRILL_DEPTH),
        Err(DrillRejection::MaxDepth)
    );

    pie = ascend_component(&pie).unwrap();
    orchestrator.refresh(&pie, &report, &service).await;
    let data = orchestrator.status().chart_data().unwrap();
    assert_eq!(data.total, 2);
    assert_eq!(data.display_dimension.as_deref(), Some("country"));
}

// ============================================================================
// FAILURE STATES
// ============================================================================

#[tokio::test]
async fn test_unknown_dataset_becomes_widget_error() {
    let service = sales_service();
    let widget = ComponentConfig::new("w", ComponentType::PieChart).with_data_source(
        DataSourceConfig::table(42, None)
            .with_field("category", "region")
            .with_field("value", "amount"),
    );
    let mut orchestrator = BindingOrchestrator::default();

    let outcome = orchestrator.refresh(&widget, &ValueResolver::new(&[]), &service).await;
    assert!(matches!(outcome, Some(FetchOutcome::Failed(_))));
    assert!(orchestrator.status().chart_data().is_none());
    assert!(orchestrator.status().error().is_some());

    // no automatic retry while inputs stay the same
    assert_eq!(
        orchestrator.refresh(&widget, &ValueResolver::new(&[]), &service).await,
        None
    );
}

#[tokio::test]
async fn test_incomplete_mapping_never_reaches_the_service() {
    let service = sales_service();
    let widget = ComponentConfig::new("w", ComponentType::LineChart)
        .with_data_source(DataSourceConfig::table(42, None).with_field("y", "amount"));
    let mut orchestrator = BindingOrchestrator::default();

    assert_eq!(orchestrator.refresh(&widget, &ValueResolver::new(&[]), &service).await, None);
    assert_eq!(
        orchestrator.status(),
        &BindingStatus::MissingFieldMapping(vec!["x".to_string()])
    );
}

#[tokio::test]
async fn test_response_of_superseded_fetch_is_dropped() {
    let service = sales_service();
    let asia = sample_report("Asia");
    let eu = sample_report("EU");
    let chart = component(&asia, SALES_CHART);
    let mut orchestrator = BindingOrchestrator::default();

    let first = match orchestrator.poll(&chart, &asia) {
        RefetchDecision::Fetch(pending) => pending,
        other => panic!("expected a fetch, got {:?}", other),
    };
    let second = match orchestrator.poll(&chart, &eu) {
        RefetchDecision::Fetch(pending) => pending,
        other => panic!("expected a fetch, got {:?}", other),
    };

    let second_result = second.execute(&service).await;
    let first_result = first.execute(&service).await;
    orchestrator.complete(second, second_result);
    assert_eq!(
        orchestrator.complete(first, first_result),
        FetchOutcome::Stale { seq: 1 }
    );
    assert_eq!(
        orchestrator.status().chart_data().unwrap().table_name.as_deref(),
        Some("global_sales")
    );
}

// ============================================================================
// SUPERSEDED FETCHES
// ============================================================================

fn chart_without_default(report: &ReportConfig) -> ComponentConfig {
    let mut chart = component(report, SALES_CHART);
    if let SourceKind::Conditional { default_source, .. } = &mut chart.data_source.kind {
        *default_source = None;
    }
    chart
}

#[tokio::test]
async fn test_fetch_overtaken_by_unconfigured_state_is_dropped() {
    let service = sales_service();
    let asia = sample_report("Asia");
    let eu = sample_report("EU");
    let chart = chart_without_default(&asia);
    let mut orchestrator = BindingOrchestrator::default();

    let pending = match orchestrator.poll(&chart, &asia) {
        RefetchDecision::Fetch(pending) => pending,
        other => panic!("expected a fetch, got {:?}", other),
    };
    assert_eq!(orchestrator.poll(&chart, &eu), RefetchDecision::Blocked);

    let result = pending.execute(&service).await;
    assert_eq!(
        orchestrator.complete(pending, result),
        FetchOutcome::Stale { seq: 1 }
    );
    assert_eq!(orchestrator.status(), &BindingStatus::Unconfigured);
    assert!(orchestrator.status().chart_data().is_none());
}

#[tokio::test]
async fn test_peer_change_during_auto_selected_fetch_is_refetched() {
    let service = sales_service();
    let asia = sample_report("Asia");
    let eu = sample_report("EU");
    let mut chart = component(&asia, SALES_CHART);
    if let SourceKind::Conditional { conditional_sources, .. } = &mut chart.data_source.kind {
        conditional_sources[0].table_name = None;
    }
    let mut orchestrator = BindingOrchestrator::default();

    let write_back = match orchestrator.refresh(&chart, &asia, &service).await {
        Some(FetchOutcome::Applied {
            write_back: Some(write_back),
        }) => write_back,
        other => panic!("expected a table write-back, got {:?}", other),
    };
    assert_eq!(write_back.origin, SourceOrigin::Conditional(0));
    assert_eq!(write_back.table_name, "global_sales");

    // storing the table name alone does not refetch, a new selection does
    chart = orchestrator.apply_write_back(&write_back, &chart);
    assert_eq!(orchestrator.refresh(&chart, &asia, &service).await, None);

    let outcome = orchestrator.refresh(&chart, &eu, &service).await;
    assert_eq!(outcome, Some(FetchOutcome::Applied { write_back: None }));
    let data = orchestrator.status().chart_data().unwrap();
    assert_eq!(data.origin, SourceOrigin::Default);
    assert_eq!(data.total, 5);
}
