use axum::{
    extract::{rejection::JsonRejection, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{json_body, validated, ResourceId};
use crate::{
    error::{AppError, AppResult, OptionExt},
    hal::{Collection, Hal, Link, Links, Resource, ResourceUrls},
    model::{Contact, ContactPayload},
    repository::{contacts, PageRequest},
    state::AppState,
};

pub const REL_ITEM: &str = "contact";
pub const REL_COLLECTION: &str = "contacts";

pub(crate) fn to_resource(urls: &ResourceUrls, contact: Contact) -> Resource<Contact> {
    let href = urls.contact(contact.id);
    let links = Links::new().with("self", Link::new(href.clone())).with(REL_ITEM, Link::new(href));
    Resource { entity: contact, links }
}

fn created(urls: &ResourceUrls, contact: Contact) -> Response {
    let location = urls.contact(contact.id);
    (StatusCode::CREATED, [(header::LOCATION, location)], Hal(to_resource(urls, contact))).into_response()
}

pub async fn list_contacts(
    State(state): State<AppState>,
    urls: ResourceUrls,
    RawQuery(query): RawQuery,
) -> AppResult<Hal<Collection<Contact>>> {
    let request = PageRequest::from_query(query.as_deref(), &state.config.rest, contacts::SORT_COLUMNS)?;
    let page = contacts::find_page(&state.db, &request).await?;
    let page = page.map(|c| to_resource(&urls, c));
    Ok(Hal(Collection::paged(REL_COLLECTION, &urls.contacts(), page, &request)))
}

pub async fn create_contact(
    State(state): State<AppState>,
    urls: ResourceUrls,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> AppResult<Response> {
    let payload = json_body(payload)?;
    let new = validated(&state, payload.validate())?;
    let contact = contacts::insert(&state.db, &new).await?;
    state.metrics.inc_created();
    tracing::debug!(id = contact.id, "Created contact");
    Ok(created(&urls, contact))
}

pub async fn get_contact(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
) -> AppResult<Hal<Resource<Contact>>> {
    let contact = contacts::find_by_id(&state.db, id).await?.ok_or_not_found("Contact")?;
    Ok(Hal(to_resource(&urls, contact)))
}

/// Full replace; fields missing from the body are validation errors.
pub async fn replace_contact(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> AppResult<Hal<Resource<Contact>>> {
    let payload = json_body(payload)?;
    if !contacts::exists(&state.db, id).await? {
        return Err(AppError::NotFound("Contact not found".to_string()));
    }
    let new = validated(&state, payload.validate())?;
    let contact = contacts::update(&state.db, id, &new).await?.ok_or_not_found("Contact")?;
    state.metrics.inc_updated();
    Ok(Hal(to_resource(&urls, contact)))
}

pub async fn patch_contact(
    State(state): State<AppState>,
    urls: ResourceUrls,
    ResourceId(id): ResourceId,
    payload: Result<Json<ContactPayload>, JsonRejection>,
) -> AppResult<Hal<Resource<Contact>>> {
    let payload = json_body(payload)?;
    let current = contacts::find_by_id(&state.db, id).await?.ok_or_not_found("Contact")?;
    let new = validated(&state, payload.merge_into(&current).validate())?;
    let contact = contacts::update(&state.db, id, &new).await?.ok_or_not_found("Contact")?;
    state.metrics.inc_updated();
    Ok(Hal(to_resource(&urls, contact)))
}

/// 409 while an installation still links the contact.
pub async fn delete_contact(State(state): State<AppState>, ResourceId(id): ResourceId) -> AppResult<StatusCode> {
    if !contacts::delete(&state.db, id).await? {
        return Err(AppError::NotFound("Contact not found".to_string()));
    }
    state.metrics.inc_deleted();
    tracing::debug!(id, "Deleted contact");
    Ok(StatusCode::NO_CONTENT)
}
