use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{contacts::to_resource as contact_resource, json_body, validated, ResourceId};
use crate::{
    error::{AppError, AppResult, OptionExt},
    hal::{Collection, Hal, Link, Links, Resource, ResourceUrls},
    model::{Contact, InstallationPayload, ProductionInstallation},
    repository::{contacts, installations, PageRequest},
    state::AppState,
};

pub const REL_ITEM: &str = "productionInstallation";
pub const REL_COLLECTION: &str = "productionInstallations";

const URI_LIST: &str = "text/uri-list";

pub(crate) fn to_resource(urls: &ResourceUrls, installation: ProductionInstallation) -> Resource<ProductionInstallation> {
    let href = urls.installation(installation.id);
    let links = Links::new()
        .with("self", Link::new(href.clone()))
        .with(REL_ITEM, Link::new(href))
        .with("contact", Link::new(urls.installation_contact(installation.id)));
    Resource { entity: installation, links }
}

/// Maps a contact URI to the id of an existing contact.
async fn resolve_contact(state: &AppState, urls: &ResourceUrls, uri: &str) -> AppResult<i64> {
    let id = urls
        .contact_id_from_uri(uri)
        .ok_or_else(|| AppError::BadRequest(format!("Cannot resolve contact URI '{}'", uri)))?;
    if !contacts::exists(&state.db, id).await? {
        return Err(AppError::BadRequest(format!("Contact {} does not exist", id)));
    }
    Ok(id)
}

/// The contact id an update leaves in place: absent keeps `current`, `null` clears.
async fn contact_after_update(
    state: &AppState,
    urls: &ResourceUrls,
    requested: Option<Option<String>>,
    current: Option<i64>,
) -> AppResult<Option<i64>> {
    match requested {
        None => Ok(current),
        Some(None) => Ok(None),
        Some(Some(uri)) => resolve_contact(state, urls, &uri).await.map(Some),
    }
}

pub async fn list_installations(
    State(state): State<AppState>,
    urls: ResourceUrls,
    RawQuery(query): RawQuery,
) -> AppResult<Hal<Collection<ProductionInstallation>>> {
    let request = PageRequest::from_query(query.as_deref(), &state.config.rest, installations::SORT_COLUMNS)?;
    let page = installations::find_page(&state.db, &request).await?;
    let page = page.map(|i| to_resource(&urls, i));
    let collection = Collection::paged(REL_COLLECTION, &urls.installations(), page, &request)
        .with_link("search", Link::new(urls.search()));
    Ok(Hal(collection))
}

pub async fn create_installation(
    State(state): State<AppState>,
    urls: ResourceUrls,
    payload: Result<Json<InstallationPayload>, JsonRejection>,
) -> AppResult<Response> {
    let payload = json_body(payload)?;
    let new = validated(&state, payload.validate())?;
    let contact_id = contact_after_update(&state, &urls, payload.contact, None).await?;
    let installation = installations::insert(&state.db, &new, contact_id).await?;
    state.metrics.inc_created();
    tracing::debug!(id = installation.id, "Created production installation");

    let location = urls.installation(installation.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Hal(to_resource(&urls, installation))).into_response())
}

pub async fn get_installation(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
) -> AppResult<Hal<Resource<ProductionInstallation>>> {
    let installation = installations::find_by_id(&state.db, id).await?.ok_or_not_found("Production installation")?;
    Ok(Hal(to_resource(&urls, installation)))
}

pub async fn replace_installation(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
    payload: Result<Json<InstallationPayload>, JsonRejection>,
) -> AppResult<Hal<Resource<ProductionInstallation>>> {
    let payload = json_body(payload)?;
    let current = installations::find_by_id(&state.db, id).await?.ok_or_not_found("Production installation")?;
    let new = validated(&state, payload.validate())?;
    let contact_id = contact_after_update(&state, &urls, payload.contact, current.contact_id).await?;
    let installation = installations::update(&state.db, id, &new, contact_id)
        .await?
        .ok_or_not_found("Production installation")?;
    state.metrics.inc_updated();
    Ok(Hal(to_resource(&urls, installation)))
}

pub async fn patch_installation(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
    payload: Result<Json<InstallationPayload>, JsonRejection>,
) -> AppResult<Hal<Resource<ProductionInstallation>>> {
    let payload = json_body(payload)?;
    let current = installations::find_by_id(&state.db, id).await?.ok_or_not_found("Production installation")?;
    let merged = payload.merge_into(&current);
    let new = validated(&state, merged.validate())?;
    let contact_id = contact_after_update(&state, &urls, merged.contact, current.contact_id).await?;
    let installation = installations::update(&state.db, id, &new, contact_id)
        .await?
        .ok_or_not_found("Production installation")?;
    state.metrics.inc_updated();
    Ok(Hal(to_resource(&urls, installation)))
}

pub async fn delete_installation(State(state): State<AppState>, ResourceId(id): ResourceId) -> AppResult<StatusCode> {
    if !installations::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Production installation not found".to_string()));
    }
    state.metrics.inc_deleted();
    tracing::debug!(id, "Deleted production installation");
    Ok(StatusCode::NO_CONTENT)
}

// --- association resource: /production-installations/{id}/contact ---

pub async fn get_installation_contact(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
) -> AppResult<Hal<Resource<Contact>>> {
    if !installations::exists(&state.db, id).await? {
        return Err(AppError::NotFound("Production installation not found".to_string()));
    }
    let contact = installations::find_contact(&state.db, id).await?.ok_or_not_found("Contact")?;
    Ok(Hal(contact_resource(&urls, contact)))
}

/// Links the contact named by a single-line `text/uri-list` body.
pub async fn put_installation_contact(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    let content_type = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    if !content_type.trim_start().to_ascii_lowercase().starts_with(URI_LIST) {
        return Err(AppError::UnsupportedMediaType(format!("Expected Content-Type {}", URI_LIST)));
    }
    let body = std::str::from_utf8(&body).map_err(|_| AppError::BadRequest("Body is not valid UTF-8".to_string()))?;
    let uris = parse_uri_list(body);
    let uri = match uris.as_slice() {
        [uri] => *uri,
        [] => return Err(AppError::BadRequest("Body must contain a contact URI".to_string())),
        _ => return Err(AppError::BadRequest("A production installation links at most one contact".to_string())),
    };

    if !installations::exists(&state.db, id).await? {
        return Err(AppError::NotFound("Production installation not found".to_string()));
    }
    let contact_id = resolve_contact(&state, &urls, uri).await?;
    installations::set_contact(&state.db, id, Some(contact_id)).await?;
    state.metrics.inc_updated();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_installation_contact(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<StatusCode> {
    if !installations::set_contact(&state.db, id, None).await? {
        return Err(AppError::NotFound("Production installation not found".to_string()));
    }
    state.metrics.inc_updated();
    Ok(StatusCode::NO_CONTENT)
}

/// Lines of a `text/uri-list` body without comments and blank lines.
fn parse_uri_list(body: &str) -> Vec<&str> {
    body.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with('#')).collect()
}
