//! Derived query resources under `/production-installations/search`.

use axum::extract::{rejection::QueryRejection, Query, State};
use serde::Deserialize;

use super::installations::{to_resource, REL_COLLECTION};
use super::query_params;
use crate::{
    error::{AppError, AppResult},
    hal::{Collection, Hal, Link, Links, ResourceUrls},
    model::ProductionInstallation,
    repository::installations,
    state::AppState,
};

const FIND_BY_NAME: &str = "findAllByName";
const FIND_BY_OUTPUT_POWER: &str = "findAllByOutputPowerBetween";

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// Bounds stay strings so that a malformed number gets a precise message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputPowerQuery {
    pub power_greater_than: Option<String>,
    pub power_lower_than: Option<String>,
}

fn parse_bound(param: &str, raw: Option<&str>) -> AppResult<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(AppError::BadRequest(format!(
            "Failed to convert '{}' to a number for parameter '{}'",
            raw, param
        ))),
    }
}

fn results(
    urls: &ResourceUrls,
    query: &str,
    items: Vec<ProductionInstallation>,
) -> Hal<Collection<ProductionInstallation>> {
    let items = items.into_iter().map(|i| to_resource(urls, i)).collect();
    let links = Links::new().with("self", Link::new(format!("{}/{}", urls.search(), query)));
    Hal(Collection::new(REL_COLLECTION, items, links))
}

pub async fn search_index(urls: ResourceUrls) -> Hal<serde_json::Value> {
    let search = urls.search();
    let links = Links::new()
        .with(FIND_BY_NAME, Link::templated(format!("{}/{}{{?name}}", search, FIND_BY_NAME)))
        .with(
            FIND_BY_OUTPUT_POWER,
            Link::templated(format!("{}/{}{{?powerGreaterThan,powerLowerThan}}", search, FIND_BY_OUTPUT_POWER)),
        )
        .with("self", Link::new(search));
    Hal(serde_json::json!({ "_links": links }))
}

/// Exact, case-sensitive match; without `name` nothing matches.
pub async fn find_all_by_name(
    State(state): State<AppState>,
    urls: ResourceUrls,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> AppResult<Hal<Collection<ProductionInstallation>>> {
    let q = query_params(query)?;
    state.metrics.inc_search_queries();
    let items = match q.name.as_deref() {
        Some(name) => installations::find_all_by_name(&state.db, name).await?,
        None => Vec::new(),
    };
    Ok(results(&urls, FIND_BY_NAME, items))
}

/// Inclusive range; a missing bound matches nothing.
pub async fn find_all_by_output_power_between(
    State(state): State<AppState>,
    urls: ResourceUrls,
    query: Result<Query<OutputPowerQuery>, QueryRejection>,
) -> AppResult<Hal<Collection<ProductionInstallation>>> {
    let q = query_params(query)?;
    state.metrics.inc_search_queries();
    let lower = parse_bound("powerGreaterThan", q.power_greater_than.as_deref())?;
    let upper = parse_bound("powerLowerThan", q.power_lower_than.as_deref())?;
    let items = match (lower, upper) {
        (Some(lower), Some(upper)) if lower <= upper => {
            installations::find_all_by_output_power_between(&state.db, lower, upper).await?
        }
        _ => Vec::new(),
    };
    Ok(results(&urls, FIND_BY_OUTPUT_POWER, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound("p", None).unwrap(), None);
        assert_eq!(parse_bound("p", Some("  ")).unwrap(), None);
        assert_eq!(parse_bound("p", Some("0.5")).unwrap(), Some(0.5));
        assert!(matches!(parse_bound("p", Some("abc")), Err(AppError::BadRequest(_))));
        assert!(parse_bound("p", Some("NaN")).is_err());
    }
}
