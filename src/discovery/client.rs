//! GitHub search client

use super::error::{DiscoveryError, DiscoveryResult};
use crate::scanner::archive::DEFAULT_API_BASE;
use crate::scanner::RepositoryRef;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

/// The search API never returns more than this many results for a query
pub const SEARCH_RESULT_CAP: usize = 1000;

/// Largest page size the search API accepts
pub const MAX_PER_PAGE: usize = 100;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const SEARCH_TIMEOUT_SECS: u64 = 60;

/// Shared HTTP client for search and archive downloads
pub fn http_client() -> DiscoveryResult<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(crate::core::version::user_agent())
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()?;
    Ok(client)
}

/// One page of search results
#[derive(Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub items: Vec<RepositoryRef>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Client for the repository search endpoint
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(client: reqwest::Client, token: Option<String>) -> Self {
        Self::with_api_base(client, token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(
        client: reqwest::Client,
        token: Option<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Ranked repositories for `query`, most stars first, plus the query's total match count
    ///
    /// `top_n` is clamped to `1..=1000`.
    pub async fn fetch_top_repositories(
        &self,
        query: &str,
        top_n: usize,
    ) -> DiscoveryResult<(Vec<RepositoryRef>, u64)> {
        let requested = clamp_requested(top_n);
        log::info!("Searching for top {} repositories matching '{}'", requested, query);

        let client = self;
        let (repos, total_count) = paginate(requested, move |page, per_page| {
            client.search_page(query, page, per_page)
        })
        .await?;

        if repos.is_empty() {
            return Err(DiscoveryError::NoResults {
                query: query.to_string(),
            });
        }
        if total_count > 0 && total_count < requested as u64 {
            log::warn!(
                "Query '{}' matches only {} repositories. Returning {} out of requested {}.",
                query,
                total_count,
                repos.len(),
                requested
            );
        }
        Ok((repos, total_count))
    }

    async fn search_page(
        &self,
        query: &str,
        page: usize,
        per_page: usize,
    ) -> DiscoveryResult<SearchPage> {
        let url = format!("{}/search/repositories", self.api_base);
        let per_page = per_page.to_string();
        let page_number = page.to_string();

        let mut request = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[
                ("q", query),
                ("sort", "stars"),
                ("order", "desc"),
                ("per_page", per_page.as_str()),
                ("page", page_number.as_str()),
            ]);
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {}", token));
        }

        log::debug!("GET {} page={} per_page={}", url, page, per_page);
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }

        Ok(response.json::<SearchPage>().await?)
    }
}

fn clamp_requested(top_n: usize) -> usize {
    top_n.clamp(1, SEARCH_RESULT_CAP)
}

/// Build an API error whose message says what to do about it
fn api_error(status: u16, body: &str) -> DiscoveryError {
    let detail = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.trim().to_string());

    let hint = match status {
        401 => " (check the GitHub token)",
        403 | 429 => " (rate limited; set GITHUB_TOKEN or wait before retrying)",
        422 => " (check the search query syntax)",
        _ => "",
    };

    DiscoveryError::Api {
        status,
        message: format!("GitHub search failed with HTTP {}: {}{}", status, detail, hint),
    }
}

/// Collect up to `requested` results page by page
///
/// Stops on an empty page, a short page, the search API's result ceiling, or
/// once every matching repository has been collected.
pub(crate) async fn paginate<F, Fut>(
    requested: usize,
    mut fetch_page: F,
) -> DiscoveryResult<(Vec<RepositoryRef>, u64)>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = DiscoveryResult<SearchPage>>,
{
    let mut repos: Vec<RepositoryRef> = Vec::with_capacity(requested);
    let mut total_count = 0u64;
    let mut page = 1usize;

    while repos.len() < requested {
        let per_page = MAX_PER_PAGE.min(requested - repos.len());
        let result = fetch_page(page, per_page).await?;

        if total_count == 0 {
            total_count = result.total_count;
        }
        if result.items.is_empty() {
            break;
        }

        let received = result.items.len();
        repos.extend(result.items);

        if received < per_page
            || page * MAX_PER_PAGE >= SEARCH_RESULT_CAP
            || repos.len() as u64 >= total_count
        {
            break;
        }
        page += 1;
    }

    repos.truncate(requested);
    Ok((repos, total_count))
}
