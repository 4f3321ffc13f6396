mod dsn;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Connection, Row};
use tracing::debug;

use crate::error::AgentError;
use crate::ports::DatabaseSource;

use dsn::connect_options;

/// Database source reading `SHOW GLOBAL STATUS` from MySQL or MariaDB.
///
/// A connection is opened for every call and closed afterwards, so a
/// restarted server is picked up on the next sample.
#[derive(Debug, Default)]
pub struct MysqlStatusSource;

impl MysqlStatusSource {
    pub fn new() -> Self {
        Self
    }
}

/// Variable names are validated as `[A-Za-z0-9_]+` when targets load
fn status_query(variables: &[String]) -> String {
    let names = variables
        .iter()
        .map(|v| format!("'{}'", v))
        .collect::<Vec<_>>()
        .join(", ");

    format!("SHOW GLOBAL STATUS WHERE Variable_name IN ({})", names)
}

fn text_column(row: &MySqlRow, index: usize) -> Result<String, sqlx::Error> {
    // Some servers label SHOW output as binary strings
    match row.try_get::<String, _>(index) {
        Ok(value) => Ok(value),
        Err(_) => row
            .try_get::<Vec<u8>, _>(index)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
    }
}

#[async_trait]
impl DatabaseSource for MysqlStatusSource {
    async fn global_status(
        &self,
        connection: &str,
        variables: &[String],
    ) -> Result<Vec<(String, String)>, AgentError> {
        let options = connect_options(connection)?;
        let mut conn = MySqlConnection::connect_with(&options).await?;

        let query = status_query(variables);
        let rows = sqlx::query(&query).fetch_all(&mut conn).await;

        if let Err(e) = conn.close().await {
            debug!(error = %e, "Failed to close mysql connection cleanly");
        }

        rows?
            .iter()
            .map(|row| Ok((text_column(row, 0)?, text_column(row, 1)?)))
            .collect()
    }
}
