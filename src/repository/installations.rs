use sqlx::SqlitePool;

use super::contacts::ContactRow;
use super::paging::{Page, PageRequest, SortColumns};
use crate::model::{Contact, NewInstallation, ProductionInstallation};

/// Sortable properties of production installations.
pub const SORT_COLUMNS: SortColumns = &[("id", "id"), ("name", "name"), ("outputPower", "output_power")];

const SELECT: &str = "SELECT id, name, output_power, contact_id FROM production_installations";

#[derive(sqlx::FromRow)]
struct InstallationRow {
    id: i64,
    name: String,
    output_power: f64,
    contact_id: Option<i64>,
}

impl From<InstallationRow> for ProductionInstallation {
    fn from(r: InstallationRow) -> Self {
        ProductionInstallation { id: r.id, name: r.name, output_power: r.output_power, contact_id: r.contact_id }
    }
}

pub async fn insert(
    pool: &SqlitePool,
    i: &NewInstallation,
    contact_id: Option<i64>,
) -> Result<ProductionInstallation, sqlx::Error> {
    let row = sqlx::query_as::<_, InstallationRow>(
        r#"INSERT INTO production_installations (name, output_power, contact_id) VALUES (?1, ?2, ?3)
           RETURNING id, name, output_power, contact_id"#,
    )
    .bind(&i.name)
    .bind(i.output_power)
    .bind(contact_id)
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<ProductionInstallation>, sqlx::Error> {
    let row = sqlx::query_as::<_, InstallationRow>(&format!("{} WHERE id = ?1", SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM production_installations WHERE id = ?1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(found.is_some())
}

pub async fn find_page(
    pool: &SqlitePool,
    request: &PageRequest,
) -> Result<Page<ProductionInstallation>, sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM production_installations").fetch_one(pool).await?;
    let rows =
        sqlx::query_as::<_, InstallationRow>(&format!("{} {} LIMIT ?1 OFFSET ?2", SELECT, request.order_by()))
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(pool)
            .await?;
    Ok(Page::new(rows.into_iter().map(Into::into).collect(), request, total))
}

/// Replaces name, output power and contact link. `None` when the id is unknown.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    i: &NewInstallation,
    contact_id: Option<i64>,
) -> Result<Option<ProductionInstallation>, sqlx::Error> {
    let row = sqlx::query_as::<_, InstallationRow>(
        r#"UPDATE production_installations SET name = ?1, output_power = ?2, contact_id = ?3 WHERE id = ?4
           RETURNING id, name, output_power, contact_id"#,
    )
    .bind(&i.name)
    .bind(i.output_power)
    .bind(contact_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM production_installations WHERE id = ?1").bind(id).execute(pool).await?;
    Ok(res.rows_affected() > 0)
}

/// Exact, case-sensitive name match ordered by id.
pub async fn find_all_by_name(pool: &SqlitePool, name: &str) -> Result<Vec<ProductionInstallation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InstallationRow>(&format!("{} WHERE name = ?1 ORDER BY id ASC", SELECT))
        .bind(name)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Installations with `lower <= output_power <= upper`, ordered by id.
pub async fn find_all_by_output_power_between(
    pool: &SqlitePool,
    lower: f64,
    upper: f64,
) -> Result<Vec<ProductionInstallation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InstallationRow>(&format!(
        "{} WHERE output_power >= ?1 AND output_power <= ?2 ORDER BY id ASC",
        SELECT
    ))
    .bind(lower)
    .bind(upper)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// The contact linked to an installation, if any.
pub async fn find_contact(pool: &SqlitePool, installation_id: i64) -> Result<Option<Contact>, sqlx::Error> {
    let row = sqlx::query_as::<_, ContactRow>(
        r#"SELECT c.id, c.name, c.zip_code, c.city, c.house_number
           FROM production_installations p JOIN contacts c ON c.id = p.contact_id
           WHERE p.id = ?1"#,
    )
    .bind(installation_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

/// Sets or clears the contact link. Returns `false` when the installation does not exist.
pub async fn set_contact(
    pool: &SqlitePool,
    installation_id: i64,
    contact_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("UPDATE production_installations SET contact_id = ?1 WHERE id = ?2")
        .bind(contact_id)
        .bind(installation_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected() > 0)
}
