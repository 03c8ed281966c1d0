use sqlx::SqlitePool;

/// Applies connection pragmas and creates the schema. Safe to run on every start.
pub async fn init_db(pool: &SqlitePool) -> anyhow::Result<()> {
    if let Err(e) = sqlx::query("PRAGMA journal_mode=WAL;").execute(pool).await {
        tracing::warn!("Failed to set WAL journal mode: {}", e);
    }
    if let Err(e) = sqlx::query("PRAGMA synchronous=NORMAL;").execute(pool).await {
        tracing::warn!("Failed to set synchronous mode: {}", e);
    }
    // The contact link relies on RESTRICT; refuse to run without it.
    sqlx::query("PRAGMA foreign_keys=ON;").execute(pool).await?;
    if let Err(e) = sqlx::query("PRAGMA busy_timeout=10000;").execute(pool).await {
        tracing::warn!("Failed to set busy_timeout: {}", e);
    }

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            zip_code TEXT NOT NULL CHECK (length(trim(zip_code)) > 0),
            city TEXT NOT NULL CHECK (length(trim(city)) > 0),
            house_number TEXT NOT NULL CHECK (length(trim(house_number)) > 0)
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS production_installations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            output_power REAL NOT NULL CHECK (output_power BETWEEN 0.0001 AND 999999),
            contact_id INTEGER NULL UNIQUE,
            FOREIGN KEY(contact_id) REFERENCES contacts(id) ON DELETE RESTRICT
        )"#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        (
            "idx_installations_name",
            "CREATE INDEX IF NOT EXISTS idx_installations_name ON production_installations(name)",
        ),
        (
            "idx_installations_output_power",
            "CREATE INDEX IF NOT EXISTS idx_installations_output_power ON production_installations(output_power)",
        ),
    ];

    for (name, query) in indexes {
        if let Err(e) = sqlx::query(query).execute(pool).await {
            tracing::warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}
