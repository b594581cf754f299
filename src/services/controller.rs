use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ExportError, ExportResult};
use crate::export::filter::EntityFilter;
use crate::models::{Application, MetricEntity};
use crate::services::auth::AuthSession;

/// Read access to the controller's metric catalog. The tree walker only
/// sees this trait, which keeps the traversal testable against an
/// in-memory catalog.
#[async_trait]
pub trait MetricCatalog {
    /// The full application catalog, in controller order.
    async fn applications(&self) -> ExportResult<Vec<Application>>;

    /// Children of the metric node addressed by the pipe-delimited `path`,
    /// reduced to the entities accepted by `filter`. An empty result is a
    /// normal traversal outcome.
    async fn entities(
        &self,
        app_id: u64,
        path: &str,
        filter: &EntityFilter,
    ) -> ExportResult<Vec<MetricEntity>>;
}

pub struct ControllerClient {
    http: Client,
    base_url: String,
    session: AuthSession,
}

impl ControllerClient {
    pub fn new(http: Client, base_url: &str, session: AuthSession) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> ExportResult<T> {
        let res = self
            .session
            .apply(self.http.get(&url))
            .send()
            .await
            .map_err(|e| ExportError::Transport(format!("request to {url} failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ExportError::Transport(format!("{url} returned {status}")));
        }

        res.json::<T>()
            .await
            .map_err(|e| ExportError::Transport(format!("malformed response from {url}: {e}")))
    }
}

#[async_trait]
impl MetricCatalog for ControllerClient {
    async fn applications(&self) -> ExportResult<Vec<Application>> {
        let url = format!("{}/controller/rest/applications?output=json", self.base_url);
        self.get_json(url).await
    }

    async fn entities(
        &self,
        app_id: u64,
        path: &str,
        filter: &EntityFilter,
    ) -> ExportResult<Vec<MetricEntity>> {
        let url = format!(
            "{}/controller/rest/applications/{}/metrics?output=json&metric-path={}",
            self.base_url,
            app_id,
            urlencoding::encode(path)
        );

        let entities: Vec<MetricEntity> = self.get_json(url).await?;
        let matched: Vec<MetricEntity> =
            entities.into_iter().filter(|e| filter.matches(e)).collect();
        debug!(
            "Catalog query app={} path={:?} matched {} entities",
            app_id,
            path,
            matched.len()
        );
        Ok(matched)
    }
}
