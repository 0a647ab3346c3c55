//! Database target: one PostgreSQL migrations-tracking table per schema.
//!
//! Table layout and transaction shape follow golang-migrate's postgres driver, written in the
//! style of `pgorm::migrate`'s own `tokio_postgres`-based SQL helpers.

use crate::error::MultimigratorError;

/// Default suffix for a schema's migrations-tracking table.
pub const DEFAULT_TABLE_SUFFIX: &str = "schema_migrations_history";

fn quote_ident(ident: &str) -> Result<String, MultimigratorError> {
    if ident.is_empty() || !ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(MultimigratorError::Other(format!(
            "invalid identifier for migrations table: {ident}"
        )));
    }
    Ok(format!("\"{ident}\""))
}

/// A per-schema PostgreSQL migrations-tracking table.
#[derive(Debug, Clone)]
pub struct DbTarget {
    table_name: String,
}

impl DbTarget {
    /// Builds a target bound to `<schema_name>_schema_migrations_history`.
    pub fn new(schema_name: &str) -> Result<Self, MultimigratorError> {
        let table_name = format!("{schema_name}_{DEFAULT_TABLE_SUFFIX}");
        quote_ident(&table_name)?;
        Ok(DbTarget { table_name })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Creates the tracking table if it does not already exist.
    pub async fn ensure_table(&self, client: &tokio_postgres::Client) -> Result<(), MultimigratorError> {
        let table = quote_ident(&self.table_name)?;
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (version BIGINT NOT NULL PRIMARY KEY, dirty BOOLEAN NOT NULL)"
        );
        client.batch_execute(&sql).await?;
        Ok(())
    }

    /// Returns `(version, dirty)`, or `None` when nothing has been applied yet (the `NilVersion`
    /// case).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, client), fields(table = %self.table_name)))]
    pub async fn version(&self, client: &tokio_postgres::Client) -> Result<Option<(i64, bool)>, MultimigratorError> {
        let table = quote_ident(&self.table_name)?;
        let sql = format!("SELECT version, dirty FROM {table} ORDER BY version DESC LIMIT 1");
        let rows = match client.query(&sql, &[]).await {
            Ok(rows) => rows,
            Err(e) => {
                if e.as_db_error().is_some_and(|db| db.code().code() == "42P01") {
                    return Ok(None);
                }
                return Err(e.into());
            }
        };
        Ok(rows.first().map(|row| (row.get::<_, i64>(0), row.get::<_, bool>(1))))
    }

    /// Applies one migration step: marks the tracking row dirty, runs `sql`, then clears dirty
    /// and records `version` — all in one transaction, matching the shape golang-migrate's
    /// postgres driver uses for `Steps(1)`.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, client, sql), fields(table = %self.table_name, version)))]
    pub async fn apply_step(
        &self,
        client: &mut tokio_postgres::Client,
        version: u64,
        sql: &str,
    ) -> Result<(), MultimigratorError> {
        let table = quote_ident(&self.table_name)?;
        let version = version as i64;

        let tx = client.transaction().await?;
        tx.batch_execute(&format!("DELETE FROM {table}")).await?;
        tx.execute(
            &format!("INSERT INTO {table} (version, dirty) VALUES ($1, true)"),
            &[&version],
        )
        .await?;
        tx.batch_execute(sql).await?;
        tx.execute(
            &format!("UPDATE {table} SET dirty = false WHERE version = $1"),
            &[&version],
        )
        .await?;
        tx.commit().await?;

        #[cfg(feature = "tracing")]
        tracing::info!(table = %self.table_name, version, "applied migration step");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_name_is_namespaced_by_schema() {
        let target = DbTarget::new("customer").unwrap();
        assert_eq!(target.table_name(), "customer_schema_migrations_history");
    }

    #[test]
    fn rejects_schema_names_that_would_produce_an_invalid_identifier() {
        let err = DbTarget::new("bad name; drop table x").unwrap_err();
        assert!(matches!(err, MultimigratorError::Other(_)));
    }
}
