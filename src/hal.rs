//! HAL (`application/hal+json`) representations and absolute link building.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::{ser::SerializeMap, Serialize, Serializer};
use url::Url;

use crate::error::AppError;
use crate::repository::{Page, PageRequest};
use crate::state::AppState;

pub const HAL_JSON: &str = "application/hal+json";

const FALLBACK_ORIGIN: &str = "http://localhost";

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "is_false")]
    pub templated: bool,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into(), templated: false }
    }

    /// A URI template such as `.../contacts{?page,size,sort}`.
    pub fn templated(href: impl Into<String>) -> Self {
        Self { href: href.into(), templated: true }
    }
}

/// Link relations in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(String, Link)>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.0.push((rel.into(), link));
        self
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, link) in &self.0 {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

/// An entity with its `_links`.
#[derive(Debug, Clone, Serialize)]
pub struct Resource<T> {
    #[serde(flatten)]
    pub entity: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// Items under `_embedded.<rel>`; the array is written even when empty.
#[derive(Debug, Clone)]
pub struct Embedded<T> {
    pub rel: &'static str,
    pub items: Vec<Resource<T>>,
}

impl<T: Serialize> Serialize for Embedded<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.rel, &self.items)?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Collection<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
    #[serde(rename = "_links")]
    pub links: Links,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<crate::repository::PageMetadata>,
}

impl<T> Collection<T> {
    /// A non-paged collection, as returned by search resources.
    pub fn new(rel: &'static str, items: Vec<Resource<T>>, links: Links) -> Self {
        Self { embedded: Embedded { rel, items }, links, page: None }
    }

    /// A paged collection with `first`/`prev`/`self`/`next`/`last` navigation.
    pub fn paged(rel: &'static str, href: &str, page: Page<Resource<T>>, request: &PageRequest) -> Self {
        let metadata = page.metadata();
        let total_pages = metadata.total_pages;
        let number = i64::from(metadata.number);
        let nav = |n: i64| Link::new(page_href(href, n, request));

        let mut links = Links::new();
        if total_pages > 1 {
            links = links.with("first", nav(0));
            if number > 0 {
                links = links.with("prev", nav((number - 1).min(total_pages - 1)));
            }
        }
        links = links.with("self", nav(number));
        if total_pages > 1 {
            if number + 1 < total_pages {
                links = links.with("next", nav(number + 1));
            }
            links = links.with("last", nav(total_pages - 1));
        }

        Self { embedded: Embedded { rel, items: page.items }, links, page: Some(metadata) }
    }

    #[must_use]
    pub fn with_link(mut self, rel: impl Into<String>, link: Link) -> Self {
        self.links = self.links.with(rel, link);
        self
    }
}

fn page_href(href: &str, number: i64, request: &PageRequest) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("page", &number.to_string());
    query.append_pair("size", &request.size.to_string());
    for sort in &request.sort_params {
        query.append_pair("sort", sort);
    }
    format!("{}?{}", href, query.finish())
}

/// Serializes the body as `application/hal+json`.
pub struct Hal<T>(pub T);

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => ([(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON))], bytes).into_response(),
            Err(e) => AppError::Internal(e.into()).into_response(),
        }
    }
}

/// Absolute URLs of every resource, as seen by the client of this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUrls {
    origin: String,
    base_path: String,
}

impl ResourceUrls {
    pub fn new(origin: impl Into<String>, base_path: &str) -> Self {
        let base_path = if base_path == "/" { String::new() } else { base_path.to_string() };
        Self { origin: origin.into(), base_path }
    }

    /// Origin from `X-Forwarded-Proto`/`X-Forwarded-Host`, then `Host`,
    /// then `http://localhost`.
    pub fn from_headers(headers: &HeaderMap, base_path: &str) -> Self {
        let first = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };
        let proto = match first("x-forwarded-proto") {
            Some(p) if p.eq_ignore_ascii_case("https") => "https",
            _ => "http",
        };
        let host = first("x-forwarded-host")
            .or_else(|| first(header::HOST.as_str()))
            .filter(|h| is_valid_authority(h));

        match host {
            Some(host) => Self::new(format!("{}://{}", proto, host), base_path),
            None => Self::new(FALLBACK_ORIGIN, base_path),
        }
    }

    pub fn root(&self) -> String {
        if self.base_path.is_empty() {
            format!("{}/", self.origin)
        } else {
            format!("{}{}", self.origin, self.base_path)
        }
    }

    pub fn contacts(&self) -> String {
        format!("{}{}/contacts", self.origin, self.base_path)
    }

    pub fn contact(&self, id: i64) -> String {
        format!("{}/{}", self.contacts(), id)
    }

    pub fn installations(&self) -> String {
        format!("{}{}/production-installations", self.origin, self.base_path)
    }

    pub fn installation(&self, id: i64) -> String {
        format!("{}/{}", self.installations(), id)
    }

    pub fn installation_contact(&self, id: i64) -> String {
        format!("{}/contact", self.installation(id))
    }

    pub fn search(&self) -> String {
        format!("{}/search", self.installations())
    }

    /// Resolves an absolute or path-only contact URI to the contact id.
    pub fn contact_id_from_uri(&self, uri: &str) -> Option<i64> {
        let origin = Url::parse(&self.origin).ok()?;
        let url = origin.join(uri.trim()).ok()?;
        let prefix = format!("{}/contacts/", self.base_path);
        let id = url.path().strip_prefix(prefix.as_str())?.trim_end_matches('/');
        id.parse::<i64>().ok().filter(|id| *id > 0)
    }
}

fn is_valid_authority(host: &str) -> bool {
    host.len() <= 255 && host.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':' | '[' | ']' | '_'))
}

impl FromRequestParts<AppState> for ResourceUrls {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers, &state.config.rest.base_path))
    }
}
