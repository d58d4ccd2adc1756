// Persistence collaborator
// Pool lifecycle, typed stored-procedure rows and the procedure traits services call

pub mod error;
pub mod models;
pub mod operations;

use sqlx::{Executor, PgPool, postgres::PgPoolOptions};

use crate::config::Config;

pub use error::{CollaboratorError, ConstraintViolation};
pub use operations::Procedures;

/// Owns the bounded connection pool for the lifetime of the process.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open the pool. Every new connection gets the session settings the
    /// stored procedures expect.
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let statement_timeout = format!(
            "SET statement_timeout = '{}s'",
            config.db_command_timeout.as_secs()
        );

        let pool = PgPoolOptions::new()
            .min_connections(config.db_pool_min_size)
            .max_connections(config.db_pool_max_size)
            .acquire_timeout(config.db_acquire_timeout)
            .after_connect(move |conn, _meta| {
                let statement_timeout = statement_timeout.clone();
                Box::pin(async move {
                    (&mut *conn)
                        .execute("SET search_path TO activity, public")
                        .await?;
                    (&mut *conn).execute("SET timezone TO 'UTC'").await?;
                    (&mut *conn)
                        .execute("SET application_name = 'activities_api'")
                        .await?;
                    (&mut *conn).execute(statement_timeout.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&config.database_url)
            .await?;

        tracing::info!(
            pool_size = %format!("{}-{}", config.db_pool_min_size, config.db_pool_max_size),
            "database_connected"
        );
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for checked-out connections to return, then close them all.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("database_disconnected");
    }
}

/// Rows whose primary identity column may be NULL.
///
/// A NULL identity is the collaborator's placeholder for "nothing to list"
/// while still carrying the aggregate columns of the result.
pub trait Keyed {
    fn is_present(&self) -> bool;
}

/// Outcome of a stored call, replacing "no rows" exceptions.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// Only the NULL-identity placeholder came back.
    Empty,
    /// The call returned no rows at all.
    NotFound,
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Empty | Lookup::NotFound => None,
        }
    }
}

impl<R: Keyed> Lookup<R> {
    /// Id-addressed calls: only the first row matters.
    pub fn first(rows: Vec<R>) -> Self {
        match rows.into_iter().next() {
            None => Lookup::NotFound,
            Some(row) if row.is_present() => Lookup::Found(row),
            Some(_) => Lookup::Empty,
        }
    }
}

/// A multi-row result: the first row carries the aggregates, `entries` holds
/// the real rows with placeholders removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RowGroup<R> {
    pub head: R,
    pub entries: Vec<R>,
}

impl<R: Keyed + Clone> Lookup<RowGroup<R>> {
    pub fn grouped(rows: Vec<R>) -> Self {
        let Some(head) = rows.first().cloned() else {
            return Lookup::NotFound;
        };
        let entries: Vec<R> = rows.into_iter().filter(Keyed::is_present).collect();
        Lookup::Found(RowGroup { head, entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(Option<u32>);

    impl Keyed for Row {
        fn is_present(&self) -> bool {
            self.0.is_some()
        }
    }

    #[test]
    fn first_distinguishes_missing_from_placeholder() {
        assert_eq!(Lookup::<Row>::first(vec![]), Lookup::NotFound);
        assert_eq!(Lookup::first(vec![Row(None)]), Lookup::Empty);
        assert_eq!(
            Lookup::first(vec![Row(Some(1)), Row(Some(2))]),
            Lookup::Found(Row(Some(1)))
        );
    }

    #[test]
    fn grouped_keeps_the_head_and_drops_placeholders() {
        let group = Lookup::grouped(vec![Row(None)]).found().expect("group");
        assert_eq!(group.head, Row(None));
        assert!(group.entries.is_empty());

        let group = Lookup::grouped(vec![Row(Some(1)), Row(None), Row(Some(3))])
            .found()
            .expect("group");
        assert_eq!(group.entries, vec![Row(Some(1)), Row(Some(3))]);
    }

    #[test]
    fn grouped_without_rows_is_not_found() {
        assert_eq!(Lookup::<RowGroup<Row>>::grouped(vec![]), Lookup::NotFound);
    }
}
