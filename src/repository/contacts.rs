use sqlx::SqlitePool;

use super::paging::{Page, PageRequest, SortColumns};
use crate::model::{Contact, NewContact};

/// Sortable properties of contacts.
pub const SORT_COLUMNS: SortColumns = &[
    ("id", "id"),
    ("name", "name"),
    ("zipCode", "zip_code"),
    ("city", "city"),
    ("houseNumber", "house_number"),
];

const SELECT: &str = "SELECT id, name, zip_code, city, house_number FROM contacts";

#[derive(sqlx::FromRow)]
pub(crate) struct ContactRow {
    id: i64,
    name: String,
    zip_code: String,
    city: String,
    house_number: String,
}

impl From<ContactRow> for Contact {
    fn from(r: ContactRow) -> Self {
        Contact { id: r.id, name: r.name, zip_code: r.zip_code, city: r.city, house_number: r.house_number }
    }
}

pub async fn insert(pool: &SqlitePool, c: &NewContact) -> Result<Contact, sqlx::Error> {
    let row = sqlx::query_as::<_, ContactRow>(
        r#"INSERT INTO contacts (name, zip_code, city, house_number) VALUES (?1, ?2, ?3, ?4)
           RETURNING id, name, zip_code, city, house_number"#,
    )
    .bind(&c.name)
    .bind(&c.zip_code)
    .bind(&c.city)
    .bind(&c.house_number)
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Contact>, sqlx::Error> {
    let row = sqlx::query_as::<_, ContactRow>(&format!("{} WHERE id = ?1", SELECT))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Into::into))
}

pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM contacts WHERE id = ?1").bind(id).fetch_optional(pool).await?;
    Ok(found.is_some())
}

pub async fn find_page(pool: &SqlitePool, request: &PageRequest) -> Result<Page<Contact>, sqlx::Error> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts").fetch_one(pool).await?;
    let rows = sqlx::query_as::<_, ContactRow>(&format!("{} {} LIMIT ?1 OFFSET ?2", SELECT, request.order_by()))
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(pool)
        .await?;
    Ok(Page::new(rows.into_iter().map(Into::into).collect(), request, total))
}

/// Replaces every field of an existing contact. `None` when the id is unknown.
pub async fn update(pool: &SqlitePool, id: i64, c: &NewContact) -> Result<Option<Contact>, sqlx::Error> {
    let row = sqlx::query_as::<_, ContactRow>(
        r#"UPDATE contacts SET name = ?1, zip_code = ?2, city = ?3, house_number = ?4 WHERE id = ?5
           RETURNING id, name, zip_code, city, house_number"#,
    )
    .bind(&c.name)
    .bind(&c.zip_code)
    .bind(&c.city)
    .bind(&c.house_number)
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Into::into))
}

/// Fails with a foreign key violation while an installation links the contact.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM contacts WHERE id = ?1").bind(id).execute(pool).await?;
    Ok(res.rows_affected() > 0)
}
