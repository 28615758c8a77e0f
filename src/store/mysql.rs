//! MySQL-backed repository
//!
//! Rows are selected with the schema's columns in declared order and read
//! back as strings or NULL, whatever the column type.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts, OptsBuilder, Params, Pool, PoolConstraints, PoolOpts, Row, Value};

use super::errors::{StoreError, StoreResult};
use super::migration;
use super::repository::{Page, PageRequest, RecordRepository};
use super::sql::{self, Statement};
use crate::record::{CleanData, FieldValue, Record};
use crate::schema::{FieldType, Schema};

/// Connection settings for the MySQL pool
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: usize,
}

impl ConnectionOptions {
    fn into_opts(self) -> StoreResult<Opts> {
        let constraints = PoolConstraints::new(0, self.max_connections.max(1)).ok_or_else(|| {
            StoreError::Internal(format!(
                "invalid pool size {}",
                self.max_connections
            ))
        })?;

        let builder = OptsBuilder::default()
            .ip_or_hostname(self.host)
            .tcp_port(self.port)
            .user(Some(self.user))
            .pass(Some(self.password))
            .db_name(Some(self.database))
            .client_found_rows(true)
            .pool_opts(PoolOpts::default().with_constraints(constraints));

        Ok(builder.into())
    }
}

#[derive(Debug)]
pub struct MySqlRepository {
    pool: Pool,
    schema: Arc<Schema>,
}

impl MySqlRepository {
    /// Opens the pool and checks the server answers a ping.
    pub async fn connect(options: ConnectionOptions, schema: Arc<Schema>) -> StoreResult<Self> {
        let pool = Pool::new(options.into_opts()?);

        let mut conn = pool.get_conn().await?;
        conn.ping().await?;
        drop(conn);

        Ok(Self { pool, schema })
    }

    /// Creates the table when it does not exist yet.
    pub async fn auto_migrate(&self) -> StoreResult<()> {
        let ddl = migration::create_table(&self.schema);
        let mut conn = self.conn().await?;
        conn.query_drop(&ddl).await?;
        Ok(())
    }

    /// Closes every pooled connection.
    pub async fn disconnect(self) -> StoreResult<()> {
        self.pool.disconnect().await?;
        Ok(())
    }

    async fn conn(&self) -> StoreResult<Conn> {
        Ok(self.pool.get_conn().await?)
    }

    /// Runs a write and returns the matched row count.
    async fn exec_write(&self, stmt: Statement) -> StoreResult<u64> {
        let mut conn = self.conn().await?;
        conn.exec_drop(&stmt.sql, params(&stmt.params)).await?;
        Ok(conn.affected_rows())
    }

    fn to_record(&self, row: &Row) -> Record {
        self.schema
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let value = row.as_ref(idx).and_then(|v| read_value(v, field.field_type));
                (field.name.clone(), value)
            })
            .collect()
    }
}

#[async_trait]
impl RecordRepository for MySqlRepository {
    async fn create(&self, data: &CleanData) -> StoreResult<Option<u64>> {
        let stmt = sql::insert(&self.schema, data);
        let mut conn = self.conn().await?;
        conn.exec_drop(&stmt.sql, params(&stmt.params)).await?;

        let generated = self.schema.primary_key().is_some_and(|pk| pk.is_auto_increment());
        Ok(conn.last_insert_id().filter(|_| generated))
    }

    async fn update(&self, id: &FieldValue, data: &CleanData) -> StoreResult<()> {
        let stmt = sql::update(&self.schema, id, data)?;
        match self.exec_write(stmt).await? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn delete(&self, id: &FieldValue) -> StoreResult<()> {
        let stmt = sql::delete(&self.schema, id)?;
        match self.exec_write(stmt).await? {
            0 => Err(StoreError::NotFound),
            _ => Ok(()),
        }
    }

    async fn find_by_id(&self, id: &FieldValue) -> StoreResult<Record> {
        let stmt = sql::select_by_id(&self.schema, id)?;
        let mut conn = self.conn().await?;
        let row: Option<Row> = conn.exec_first(&stmt.sql, params(&stmt.params)).await?;
        row.map(|r| self.to_record(&r)).ok_or(StoreError::NotFound)
    }

    async fn find_all(&self, request: &PageRequest) -> StoreResult<Page> {
        let count = sql::count(&self.schema, request);
        let select = sql::select_page(&self.schema, request);

        let mut conn = self.conn().await?;
        let total: Option<u64> = conn.exec_first(&count.sql, params(&count.params)).await?;
        let rows: Vec<Row> = conn.exec(&select.sql, params(&select.params)).await?;

        Ok(Page {
            records: rows.iter().map(|r| self.to_record(r)).collect(),
            total: total.unwrap_or(0),
        })
    }
}

fn params(values: &[FieldValue]) -> Params {
    if values.is_empty() {
        return Params::Empty;
    }
    Params::Positional(values.iter().map(write_value).collect())
}

fn write_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::NULL,
        FieldValue::Int(v) => Value::Int(*v),
        FieldValue::Float(v) => Value::Double(*v),
        FieldValue::Date(d) => Value::Date(d.year() as u16, d.month() as u8, d.day() as u8, 0, 0, 0, 0),
        FieldValue::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
    }
}

/// Renders a column value the way the list view shows it.
fn read_value(value: &Value, field_type: FieldType) -> Option<String> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
        Value::Int(v) => Some(v.to_string()),
        Value::UInt(v) => Some(v.to_string()),
        Value::Float(v) => Some(v.to_string()),
        Value::Double(v) => Some(v.to_string()),
        Value::Date(y, m, d, h, min, s, _) => Some(match field_type {
            FieldType::Date => format!("{:04}-{:02}-{:02}", y, m, d),
            _ => format!("{:04}-{:02}-{:02} {:02}:{:02}:{:02}", y, m, d, h, min, s),
        }),
        Value::Time(negative, days, h, min, s, _) => {
            let hours = *days * 24 + u32::from(*h);
            let sign = if *negative { "-" } else { "" };
            Some(format!("{}{:02}:{:02}:{:02}", sign, hours, min, s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_write_value_mapping() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(write_value(&FieldValue::Null), Value::NULL);
        assert_eq!(write_value(&FieldValue::Int(5)), Value::Int(5));
        assert_eq!(
            write_value(&FieldValue::Date(date)),
            Value::Date(2024, 2, 29, 0, 0, 0, 0)
        );
        assert_eq!(
            write_value(&FieldValue::Text("ç".into())),
            Value::Bytes("ç".as_bytes().to_vec())
        );
    }

    #[test]
    fn test_read_value_mapping() {
        assert_eq!(read_value(&Value::NULL, FieldType::String), None);
        assert_eq!(
            read_value(&Value::Bytes(b"12.50".to_vec()), FieldType::Float).as_deref(),
            Some("12.50")
        );
        assert_eq!(read_value(&Value::Int(-1), FieldType::Int).as_deref(), Some("-1"));
        assert_eq!(
            read_value(&Value::Date(2024, 1, 31, 0, 0, 0, 0), FieldType::Date).as_deref(),
            Some("2024-01-31")
        );
        assert_eq!(
            read_value(&Value::Date(2024, 1, 31, 8, 5, 0, 0), FieldType::Datetime).as_deref(),
            Some("2024-01-31 08:05:00")
        );
    }

    #[test]
    fn test_params_empty_and_positional() {
        assert_eq!(params(&[]), Params::Empty);
        assert_eq!(
            params(&[FieldValue::Int(1), FieldValue::Null]),
            Params::Positional(vec![Value::Int(1), Value::NULL])
        );
    }
}
