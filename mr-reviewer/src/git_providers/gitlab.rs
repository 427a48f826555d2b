//! GitLab REST v4 client for the review pipeline.
//!
//! Endpoints used:
//! - GET  /projects/:id/merge_requests/:iid/changes
//! - GET  /projects/:id/merge_requests/:iid
//! - GET  /projects/:id/merge_requests?state=opened (paginated)
//! - POST /projects/:id/merge_requests/:iid/notes
//!
//! Public methods never return errors: a timeout, a transport failure and a
//! non-success status are all logged and turned into a sentinel (`None`,
//! placeholder metadata, `false`) so the caller can degrade gracefully.

use std::time::Instant;

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::errors::{ConfigError, MrResult, ProviderError};
use crate::git_providers::{
    ProviderConfig,
    types::{ChangeSet, MergeRequestRef, MergeRequestSummary, MrInfo},
};

/// Upper bound on pages walked when listing merge requests.
const MAX_LIST_PAGES: u32 = 10;

/// Thin GitLab client; cheap to clone (shares the connection pool).
#[derive(Debug, Clone)]
pub struct GitLabClient {
    http: Client,
    api_base: String,
}

impl GitLabClient {
    /// Builds a client with the token header and fixed timeout baked in.
    ///
    /// # Errors
    /// - [`ConfigError::MissingToken`] for an empty token
    /// - [`ConfigError::InvalidBaseUrl`] if the base URL is not http(s)
    /// - [`ConfigError::InvalidToken`] if the token is not a valid header value
    pub fn new(cfg: &ProviderConfig) -> MrResult<Self> {
        if cfg.token.trim().is_empty() {
            return Err(ConfigError::MissingToken.into());
        }
        let api_base = cfg.api_base();
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(cfg.base_url.clone()).into());
        }

        let http = Client::builder()
            .default_headers(build_gitlab_headers(&cfg.token)?)
            .timeout(cfg.timeout)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self { http, api_base })
    }

    /// Fetches the MR diff. `Some` only for HTTP 200 with a decodable body.
    pub async fn fetch_changes(&self, mr: MergeRequestRef) -> Option<ChangeSet> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/changes",
            self.api_base, mr.project_id, mr.mr_iid
        );
        let t0 = Instant::now();
        match self.get_json::<ChangeSet>(&url).await {
            Ok(cs) => {
                info!(
                    %mr,
                    files = cs.changes.len(),
                    elapsed_ms = t0.elapsed().as_millis(),
                    "gitlab: changes fetched"
                );
                Some(cs)
            }
            Err(e) => {
                warn!(%mr, error = %e, elapsed_ms = t0.elapsed().as_millis(), "gitlab: fetch changes failed");
                None
            }
        }
    }

    /// Fetches title/description; placeholders on any failure.
    pub async fn fetch_mr_metadata(&self, mr: MergeRequestRef) -> MrInfo {
        let url = format!(
            "{}/projects/{}/merge_requests/{}",
            self.api_base, mr.project_id, mr.mr_iid
        );
        match self.get_json::<GitLabMr>(&url).await {
            Ok(m) => MrInfo::from_parts(m.title, m.description),
            Err(e) => {
                warn!(%mr, error = %e, "gitlab: fetch MR metadata failed, using placeholders");
                MrInfo::default()
            }
        }
    }

    /// Lists the project's opened MRs (id + iid only), following `x-next-page`
    /// for up to [`MAX_LIST_PAGES`] pages. `None` on failure.
    pub async fn list_merge_requests(&self, project_id: u64) -> Option<Vec<MergeRequestSummary>> {
        match self.try_list_merge_requests(project_id).await {
            Ok(list) => {
                debug!(project_id, count = list.len(), "gitlab: merge requests listed");
                Some(list)
            }
            Err(e) => {
                warn!(project_id, error = %e, "gitlab: list merge requests failed");
                None
            }
        }
    }

    async fn try_list_merge_requests(&self, project_id: u64) -> MrResult<Vec<MergeRequestSummary>> {
        let mut all = Vec::new();
        let mut page = 1;
        loop {
            let url = format!(
                "{}/projects/{}/merge_requests?state=opened&per_page=100&page={}",
                self.api_base, project_id, page
            );
            let resp = self.get_ok(&url).await?;
            let next = resp
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok());
            all.extend(decode::<Vec<MergeRequestSummary>>(resp).await?);

            match next {
                Some(n) if n > page && n <= MAX_LIST_PAGES => page = n,
                Some(_) => {
                    debug!(project_id, page, "gitlab: merge request listing truncated");
                    break;
                }
                None => break,
            }
        }
        Ok(all)
    }

    /// Posts a general MR note. Success is HTTP 200 or 201.
    pub async fn post_comment(&self, mr: MergeRequestRef, body: &str) -> bool {
        let t0 = Instant::now();
        debug!(%mr, body_len = body.len(), "gitlab: note POST");
        match self.try_post_note(mr, body).await {
            Ok(()) => {
                info!(%mr, elapsed_ms = t0.elapsed().as_millis(), "gitlab: note posted");
                true
            }
            Err(e) => {
                warn!(%mr, error = %e, elapsed_ms = t0.elapsed().as_millis(), "gitlab: note post failed");
                false
            }
        }
    }

    async fn try_post_note(&self, mr: MergeRequestRef, body: &str) -> MrResult<()> {
        let url = format!(
            "{}/projects/{}/merge_requests/{}/notes",
            self.api_base, mr.project_id, mr.mr_iid
        );

        #[derive(Serialize)]
        struct Req<'a> {
            body: &'a str,
        }

        let resp = self.http.post(&url).json(&Req { body }).send().await?;
        let status = resp.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            return Ok(());
        }
        let snippet = snippet_of(resp).await;
        Err(ProviderError::from_status(status.as_u16(), snippet).into())
    }

    /// GET + strict 200 check + JSON decode.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> MrResult<T> {
        decode(self.get_ok(url).await?).await
    }

    async fn get_ok(&self, url: &str) -> MrResult<reqwest::Response> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            let snippet = snippet_of(resp).await;
            return Err(ProviderError::from_status(status.as_u16(), snippet).into());
        }
        Ok(resp)
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> MrResult<T> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| ProviderError::InvalidResponse(e.to_string()).into())
}

async fn snippet_of(resp: reqwest::Response) -> String {
    resp.text()
        .await
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect()
}

fn build_gitlab_headers(token: &str) -> MrResult<HeaderMap> {
    let mut h = HeaderMap::new();
    h.insert(USER_AGENT, HeaderValue::from_static("mr-reviewer/0.1"));
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    let mut token = HeaderValue::from_str(token.trim()).map_err(|_| ConfigError::InvalidToken)?;
    token.set_sensitive(true);
    h.insert("PRIVATE-TOKEN", token);
    Ok(h)
}

/// --- GitLab response shapes (subset of fields we actually use) ---

#[derive(Debug, Deserialize)]
struct GitLabMr {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}
