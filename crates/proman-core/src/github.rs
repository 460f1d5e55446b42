//! Blocking GitHub REST client backing [`RepositorySource`].

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK, USER_AGENT};

use crate::remote::{
    NewRepository, RemoteError, RemoteRepository, RepositoryEdit, RepositoryPage,
    RepositorySource,
};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GitHubClient {
    client: Client,
    api_base: String,
    per_page: u32,
}

impl GitHubClient {
    pub fn new(token: &str, api_base: &str, per_page: u32) -> Result<Self, RemoteError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.trim()))
                .map_err(|_| RemoteError::InvalidToken)?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("proman/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            per_page,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

impl RepositorySource for GitHubClient {
    fn fetch_page(&self, page: u32) -> Result<RepositoryPage, RemoteError> {
        let response = self
            .client
            .get(self.url("/user/repos"))
            .query(&[
                ("per_page", self.per_page.to_string()),
                ("page", page.to_string()),
                ("sort", "full_name".to_string()),
            ])
            .send()?;
        let response = check_response(response)?;

        let links = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default();

        let items: Vec<RemoteRepository> = response
            .json()
            .map_err(|error| RemoteError::Parse(error.to_string()))?;

        Ok(RepositoryPage {
            total_hint: links
                .last
                .map(|last| last as usize * self.per_page as usize),
            next_page: links.next,
            items,
        })
    }

    fn create_repository(&self, request: &NewRepository) -> Result<RemoteRepository, RemoteError> {
        let response = self
            .client
            .post(self.url("/user/repos"))
            .json(request)
            .send()?;

        check_response(response)?
            .json()
            .map_err(|error| RemoteError::Parse(error.to_string()))
    }

    fn edit_repository(
        &self,
        full_name: &str,
        edit: &RepositoryEdit,
    ) -> Result<RemoteRepository, RemoteError> {
        let response = self
            .client
            .patch(self.url(&format!("/repos/{full_name}")))
            .json(edit)
            .send()?;

        check_response(response)?
            .json()
            .map_err(|error| RemoteError::Parse(error.to_string()))
    }

    fn delete_repository(&self, full_name: &str) -> Result<(), RemoteError> {
        let response = self
            .client
            .delete(self.url(&format!("/repos/{full_name}")))
            .send()?;

        check_response(response)?;
        Ok(())
    }
}

fn check_response(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(RemoteError::Unauthorized),
        StatusCode::NOT_FOUND => Err(RemoteError::NotFound(response.url().path().to_string())),
        _ => {
            let body = response.text().unwrap_or_default();
            Err(RemoteError::Http {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

/// Pulls the `message` field out of a GitHub error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkPages {
    pub next: Option<u32>,
    pub last: Option<u32>,
}

pub fn parse_link_header(value: &str) -> LinkPages {
    let mut pages = LinkPages::default();

    for link in value.split(',') {
        let mut parts = link.split(';');
        let Some(target) = parts.next() else {
            continue;
        };
        let url = target.trim().trim_start_matches('<').trim_end_matches('>');

        let rel = parts.find_map(|param| {
            let (key, value) = param.trim().split_once('=')?;
            (key.trim() == "rel").then(|| value.trim().trim_matches('"'))
        });

        let page = page_param(url);
        match rel {
            Some("next") => pages.next = page,
            Some("last") => pages.last = page,
            _ => {}
        }
    }

    pages
}

fn page_param(url: &str) -> Option<u32> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
