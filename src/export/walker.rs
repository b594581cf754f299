use std::collections::HashSet;

use regex::Regex;
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::export::filter::EntityFilter;
use crate::export::parser;
use crate::export::sink::CsvSink;
use crate::export::{Backend, ExportSummary};
use crate::services::controller::MetricCatalog;

const OVERALL_PERFORMANCE: &str = "Overall Application Performance";
const EXTERNAL_CALLS: &str = "External Calls";
const THREAD_TASKS: &str = "Thread Tasks";
const FOLDER: &str = "folder";
const ANY: &str = ".*";

/// Walks the metric tree of every matching application and streams the
/// discovered backends into the sink, one tier at a time.
pub struct Extractor<'a, C: MetricCatalog> {
    catalog: &'a C,
    application_names: Regex,
    call_filter: EntityFilter,
    folder_filter: EntityFilter,
    skip_thread_tasks: bool,
}

impl<'a, C: MetricCatalog> Extractor<'a, C> {
    pub fn new(catalog: &'a C, config: &ExportConfig) -> ExportResult<Self> {
        let application_names = Regex::new(&config.application_names).map_err(|e| {
            ExportError::Config(format!(
                "invalid application filter '{}': {e}",
                config.application_names
            ))
        })?;

        Ok(Self {
            catalog,
            application_names,
            call_filter: EntityFilter::new(&config.backend_type, FOLDER)?,
            folder_filter: EntityFilter::new(ANY, FOLDER)?,
            skip_thread_tasks: config.skip_thread_tasks,
        })
    }

    /// Applications, tiers and backends are emitted in catalog order; a
    /// transport failure anywhere aborts the run and leaves the rows
    /// already flushed in place.
    pub async fn run(&self, sink: &mut CsvSink) -> ExportResult<ExportSummary> {
        let mut summary = ExportSummary::default();

        let applications = self.catalog.applications().await?;
        for app in applications
            .iter()
            .filter(|a| self.application_names.is_match(&a.name))
        {
            info!("Exporting application {} (id {})", app.name, app.id);
            summary.applications += 1;

            let tiers = self
                .catalog
                .entities(app.id, OVERALL_PERFORMANCE, &self.folder_filter)
                .await?;
            for tier in &tiers {
                summary.tiers += 1;
                let rows = self.collect_tier(app.id, &app.name, &tier.name).await?;
                debug!("Tier {} yielded {} backends", tier.name, rows.len());
                summary.backends += rows.len();
                sink.append_rows(&rows)?;
            }
        }

        Ok(summary)
    }

    /// Gather the raw call entries of one tier (direct external calls
    /// first, then each thread task's nested calls in task order) and
    /// reduce them to unique backends in first-seen order.
    async fn collect_tier(
        &self,
        app_id: u64,
        application: &str,
        tier: &str,
    ) -> ExportResult<Vec<Backend>> {
        let mut raw_calls: Vec<String> = Vec::new();

        let direct_path = format!("{OVERALL_PERFORMANCE}|{tier}|{EXTERNAL_CALLS}");
        raw_calls.extend(
            self.catalog
                .entities(app_id, &direct_path, &self.call_filter)
                .await?
                .into_iter()
                .map(|e| e.name),
        );

        if !self.skip_thread_tasks {
            let tasks_path = format!("{OVERALL_PERFORMANCE}|{tier}|{THREAD_TASKS}");
            let tasks = self
                .catalog
                .entities(app_id, &tasks_path, &self.folder_filter)
                .await?;
            for task in &tasks {
                let nested_path = format!(
                    "{OVERALL_PERFORMANCE}|{tier}|{THREAD_TASKS}|{}|{EXTERNAL_CALLS}",
                    task.name
                );
                raw_calls.extend(
                    self.catalog
                        .entities(app_id, &nested_path, &self.call_filter)
                        .await?
                        .into_iter()
                        .map(|e| e.name),
                );
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut rows = Vec::new();
        for raw in &raw_calls {
            let backend = parser::parse(raw);
            // Thread-task traversal is the only source of duplicates;
            // direct results are unique per tier by construction, so the
            // membership check only runs when that branch is searched.
            if !self.skip_thread_tasks && !seen.insert(backend.name.clone()) {
                continue;
            }
            rows.push(Backend {
                application: application.to_string(),
                tier: tier.to_string(),
                backend_type: backend.backend_type,
                name: backend.name,
            });
        }
        Ok(rows)
    }
}
