//! Authenticated HTTP client for the BrAPI backend
//!
//! Used for test setup and teardown that bypasses the UI: create the records
//! a scenario needs, then sweep anything carrying the disposable-data prefix.
//! The bearer token lives on the client instance, not in process globals, so
//! parallel test workers each hold their own credentials.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};

const HEALTH_POLL_INTERVAL: Duration = Duration::from_millis(100);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// The BrAPI collections the harness manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Programs,
    Trials,
    Studies,
    Locations,
    Germplasm,
    Variables,
    SeedLots,
    Crosses,
    People,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Programs,
        Resource::Trials,
        Resource::Studies,
        Resource::Locations,
        Resource::Germplasm,
        Resource::Variables,
        Resource::SeedLots,
        Resource::Crosses,
        Resource::People,
    ];

    /// Path segment under `/brapi/v2/`.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Programs => "programs",
            Resource::Trials => "trials",
            Resource::Studies => "studies",
            Resource::Locations => "locations",
            Resource::Germplasm => "germplasm",
            Resource::Variables => "variables",
            Resource::SeedLots => "seedlots",
            Resource::Crosses => "crosses",
            Resource::People => "people",
        }
    }

    /// Display-name field used for prefix matching during cleanup.
    pub fn name_field(self) -> &'static str {
        match self {
            Resource::Programs => "programName",
            Resource::Trials => "trialName",
            Resource::Studies => "studyName",
            Resource::Locations => "locationName",
            Resource::Germplasm => "germplasmName",
            Resource::Variables => "observationVariableName",
            Resource::SeedLots => "seedLotName",
            Resource::Crosses => "crossName",
            Resource::People => "firstName",
        }
    }

    /// Primary key field in list responses.
    pub fn id_field(self) -> &'static str {
        match self {
            Resource::Programs => "programDbId",
            Resource::Trials => "trialDbId",
            Resource::Studies => "studyDbId",
            Resource::Locations => "locationDbId",
            Resource::Germplasm => "germplasmDbId",
            Resource::Variables => "observationVariableDbId",
            Resource::SeedLots => "seedLotDbId",
            Resource::Crosses => "crossDbId",
            Resource::People => "personDbId",
        }
    }

    /// Observation variables expose no DELETE endpoint.
    pub fn deletable(self) -> bool {
        !matches!(self, Resource::Variables)
    }
}

/// Pagination query for list operations.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 100,
        }
    }
}

/// Raw BrAPI paginated envelope: `{ metadata, result: { data: [...] } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrapiPage {
    #[serde(default)]
    pub metadata: Value,
    pub result: BrapiResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrapiResult {
    #[serde(default)]
    pub data: Vec<Value>,
}

impl BrapiPage {
    pub fn records(&self) -> &[Value] {
        &self.result.data
    }

    pub fn total_count(&self) -> Option<u64> {
        self.metadata
            .get("pagination")
            .and_then(|p| p.get("totalCount"))
            .and_then(Value::as_u64)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Create payloads. Required fields are plain, optional fields serialize
/// only when set.

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewProgram {
    pub program_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_crop_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewTrial {
    pub trial_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_db_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewStudy {
    pub study_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_db_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_db_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    pub location_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewGermplasm {
    pub germplasm_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_crop_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accession_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewVariable {
    pub observation_variable_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_crop_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewSeedLot {
    pub seed_lot_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub germplasm_db_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewCross {
    pub cross_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossing_project_db_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
}

/// HTTP client for the BrAPI backend.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Log in with form-encoded credentials and store the bearer token for
    /// subsequent requests.
    ///
    /// A non-2xx response is fatal to the calling test.
    pub async fn authenticate(&mut self, email: &str, password: &str) -> E2eResult<String> {
        let url = format!("{}/api/auth/login", self.base_url);
        let resp = self
            .http
            .post(&url)
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(E2eError::Auth {
                status: status.as_u16(),
            });
        }

        let token: TokenResponse = resp.json().await?;
        info!("Authenticated as {}", email);
        self.token = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    /// Drop the stored token.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Best-effort health probe. Never errors; any failure is `false`.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Poll the health endpoint until the backend responds or the timeout
    /// elapses.
    pub async fn wait_for_healthy(&self, timeout: Duration) -> E2eResult<()> {
        let start = Instant::now();
        let mut attempts = 0usize;

        while start.elapsed() < timeout {
            attempts += 1;
            if self.check_health().await {
                return Ok(());
            }
            if attempts == 1 {
                info!("Waiting for backend at {}...", self.base_url);
            }
            sleep(HEALTH_POLL_INTERVAL).await;
        }

        Err(E2eError::Timeout(format!(
            "backend health after {} attempts",
            attempts
        )))
    }

    /// BrAPI server metadata.
    pub async fn server_info(&self) -> E2eResult<Value> {
        let url = format!("{}/brapi/v2/serverinfo", self.base_url);
        let resp = self.request(self.http.get(&url)).send().await?;
        Ok(resp.error_for_status()?.json().await?)
    }

    /// List one page of a collection, returning the raw paginated envelope.
    pub async fn list(&self, resource: Resource, query: PageQuery) -> E2eResult<BrapiPage> {
        let url = format!("{}/brapi/v2/{}", self.base_url, resource.path());
        let resp = self
            .request(self.http.get(&url))
            .query(&[
                ("page", query.page.to_string()),
                ("pageSize", query.page_size.to_string()),
            ])
            .send()
            .await?;
        Ok(resp.error_for_status()?.json().await?)
    }

    /// Create a record, returning the backend's representation of it.
    pub async fn create(&self, resource: Resource, payload: Value) -> E2eResult<Value> {
        let url = format!("{}/brapi/v2/{}", self.base_url, resource.path());
        // The variables endpoint takes a batch array even for a single record.
        let body = if resource == Resource::Variables {
            json!([payload])
        } else {
            payload
        };
        let resp = self.request(self.http.post(&url)).json(&body).send().await?;
        Ok(resp.error_for_status()?.json().await?)
    }

    /// Fire-and-forget delete. Failures are logged and swallowed so cleanup
    /// never aborts part-way.
    pub async fn delete(&self, resource: Resource, id: &str) {
        if !resource.deletable() {
            return;
        }
        let url = format!("{}/brapi/v2/{}/{}", self.base_url, resource.path(), id);
        match self.request(self.http.delete(&url)).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!("Deleted {} {}", resource.path(), id);
            }
            Ok(resp) => {
                warn!("Delete {} {} returned {}", resource.path(), id, resp.status());
            }
            Err(e) => {
                warn!("Delete {} {} failed: {}", resource.path(), id, e);
            }
        }
    }

    // Per-entity wrappers.

    pub async fn get_programs(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::Programs, query).await
    }

    pub async fn create_program(&self, program: NewProgram) -> E2eResult<Value> {
        self.create(Resource::Programs, serde_json::to_value(program)?).await
    }

    pub async fn delete_program(&self, id: &str) {
        self.delete(Resource::Programs, id).await;
    }

    pub async fn get_trials(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::Trials, query).await
    }

    pub async fn create_trial(&self, trial: NewTrial) -> E2eResult<Value> {
        self.create(Resource::Trials, serde_json::to_value(trial)?).await
    }

    pub async fn delete_trial(&self, id: &str) {
        self.delete(Resource::Trials, id).await;
    }

    pub async fn get_studies(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::Studies, query).await
    }

    pub async fn create_study(&self, study: NewStudy) -> E2eResult<Value> {
        self.create(Resource::Studies, serde_json::to_value(study)?).await
    }

    pub async fn delete_study(&self, id: &str) {
        self.delete(Resource::Studies, id).await;
    }

    pub async fn get_locations(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::Locations, query).await
    }

    pub async fn create_location(&self, location: NewLocation) -> E2eResult<Value> {
        self.create(Resource::Locations, serde_json::to_value(location)?).await
    }

    pub async fn delete_location(&self, id: &str) {
        self.delete(Resource::Locations, id).await;
    }

    pub async fn get_germplasm(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::Germplasm, query).await
    }

    pub async fn create_germplasm(&self, germplasm: NewGermplasm) -> E2eResult<Value> {
        self.create(Resource::Germplasm, serde_json::to_value(germplasm)?).await
    }

    pub async fn delete_germplasm(&self, id: &str) {
        self.delete(Resource::Germplasm, id).await;
    }

    pub async fn get_variables(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::Variables, query).await
    }

    pub async fn create_variable(&self, variable: NewVariable) -> E2eResult<Value> {
        self.create(Resource::Variables, serde_json::to_value(variable)?).await
    }

    pub async fn get_seed_lots(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::SeedLots, query).await
    }

    pub async fn create_seed_lot(&self, seed_lot: NewSeedLot) -> E2eResult<Value> {
        self.create(Resource::SeedLots, serde_json::to_value(seed_lot)?).await
    }

    pub async fn delete_seed_lot(&self, id: &str) {
        self.delete(Resource::SeedLots, id).await;
    }

    pub async fn get_crosses(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::Crosses, query).await
    }

    pub async fn create_cross(&self, cross: NewCross) -> E2eResult<Value> {
        self.create(Resource::Crosses, serde_json::to_value(cross)?).await
    }

    pub async fn delete_cross(&self, id: &str) {
        self.delete(Resource::Crosses, id).await;
    }

    pub async fn get_people(&self, query: PageQuery) -> E2eResult<BrapiPage> {
        self.list(Resource::People, query).await
    }

    pub async fn create_person(&self, person: NewPerson) -> E2eResult<Value> {
        self.create(Resource::People, serde_json::to_value(person)?).await
    }

    pub async fn delete_person(&self, id: &str) {
        self.delete(Resource::People, id).await;
    }

    /// Sweep every deletable collection for records whose display name starts
    /// with `prefix` and delete them.
    ///
    /// Each collection is paged through in full before any of its records
    /// are deleted; deleting while paging would shift later pages under the
    /// offset and skip records.
    ///
    /// Each individual failure (listing a collection, deleting a record) is
    /// swallowed so one bad entity type never aborts cleanup of the rest.
    /// Returns the number of deletions attempted.
    ///
    /// The prefix convention is the only isolation between test workers
    /// sharing a backend; concurrent runs using the same prefix can sweep
    /// each other's records.
    pub async fn cleanup_test_data(&self, prefix: &str) -> usize {
        let mut attempted = 0usize;

        for resource in Resource::ALL {
            if !resource.deletable() {
                continue;
            }

            let mut targets = Vec::new();
            let mut query = PageQuery::default();
            loop {
                let page = match self.list(resource, query).await {
                    Ok(page) => page,
                    Err(e) => {
                        warn!("Cleanup: listing {} failed: {}", resource.path(), e);
                        break;
                    }
                };

                for record in page.records() {
                    let name = record.get(resource.name_field()).and_then(Value::as_str);
                    if !name.is_some_and(|n| n.starts_with(prefix)) {
                        continue;
                    }
                    if let Some(id) = record.get(resource.id_field()).and_then(Value::as_str) {
                        targets.push(id.to_string());
                    }
                }

                let fetched = page.records().len() as u32;
                let exhausted = match page.total_count() {
                    Some(total) => {
                        u64::from(query.page + 1) * u64::from(query.page_size) >= total
                    }
                    None => fetched < query.page_size,
                };
                if exhausted || fetched == 0 {
                    break;
                }
                query.page += 1;
            }

            for id in targets {
                self.delete(resource, &id).await;
                attempted += 1;
            }
        }

        info!("Cleanup attempted {} deletion(s) for prefix {}", attempted, prefix);
        attempted
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page, 0);
        assert_eq!(query.page_size, 100);
    }

    #[test]
    fn variables_are_not_deletable() {
        for resource in Resource::ALL {
            assert_eq!(resource.deletable(), resource != Resource::Variables);
        }
    }

    #[test]
    fn envelope_deserializes_without_metadata() {
        let page: BrapiPage =
            serde_json::from_str(r#"{"result":{"data":[{"programDbId":"1"}]}}"#).unwrap();
        assert_eq!(page.records().len(), 1);
        assert_eq!(page.total_count(), None);
    }

    #[test]
    fn envelope_exposes_total_count() {
        let page: BrapiPage = serde_json::from_str(
            r#"{"metadata":{"pagination":{"totalCount":42}},"result":{"data":[]}}"#,
        )
        .unwrap();
        assert_eq!(page.total_count(), Some(42));
    }

    #[test]
    fn optional_payload_fields_are_omitted() {
        let program = NewProgram {
            program_name: "E2E_TEST_Wheat".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(program).unwrap();
        assert_eq!(value, serde_json::json!({"programName": "E2E_TEST_Wheat"}));
    }
}
