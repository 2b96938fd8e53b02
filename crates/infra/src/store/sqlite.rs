//! SQLite-backed record store.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Row, SqlitePool};

use garage_core::{FieldKind, FieldValue, Fields, Record, RecordId, ResourceDescriptor, check};

use super::{RecordStore, StoreResult, no_counter};

/// Statements derived once from a descriptor.
#[derive(Debug, Clone)]
struct Statements {
    insert: String,
    list: String,
    get: String,
    update: String,
    delete: String,
    decrement: Option<String>,
}

impl Statements {
    fn for_resource(d: &ResourceDescriptor) -> Self {
        let table = d.table;
        let columns = d.column_list();
        let placeholders = vec!["?"; d.fields.len()].join(", ");
        let assignments = d
            .fields
            .iter()
            .map(|f| format!("{} = ?", f.name))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            insert: format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})"),
            list: format!("SELECT id, {columns} FROM {table} ORDER BY id DESC"),
            get: format!("SELECT id, {columns} FROM {table} WHERE id = ?"),
            update: format!("UPDATE {table} SET {assignments} WHERE id = ?"),
            delete: format!("DELETE FROM {table} WHERE id = ?"),
            // Single conditional UPDATE: concurrent sellers cannot both pass the guard.
            decrement: d.counter_field().map(|c| {
                let c = c.name;
                format!("UPDATE {table} SET {c} = {c} - 1 WHERE id = ? AND {c} > 0")
            }),
        }
    }
}

/// Record store over a shared SQLite pool.
///
/// The table must exist already (see [`crate::db::bootstrap`]).
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    pool: SqlitePool,
    descriptor: &'static ResourceDescriptor,
    sql: Statements,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool, descriptor: &'static ResourceDescriptor) -> Self {
        Self {
            pool,
            descriptor,
            sql: Statements::for_resource(descriptor),
        }
    }

    fn decode(&self, row: &SqliteRow) -> StoreResult<Record> {
        let id: i64 = row.try_get("id")?;
        let mut fields = Fields::new();
        for spec in self.descriptor.fields {
            let value = match spec.kind {
                FieldKind::Text => FieldValue::Text(row.try_get(spec.name)?),
                FieldKind::Integer | FieldKind::Count => FieldValue::Integer(row.try_get(spec.name)?),
            };
            fields.push(spec.name, value);
        }
        Ok(Record {
            id: RecordId::new(id),
            fields,
        })
    }
}

fn bind_fields<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    fields: &'q Fields,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in fields.values() {
        query = match value {
            FieldValue::Text(s) => query.bind(s.as_str()),
            FieldValue::Integer(n) => query.bind(*n),
        };
    }
    query
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    fn descriptor(&self) -> &'static ResourceDescriptor {
        self.descriptor
    }

    async fn create(&self, fields: Fields) -> StoreResult<RecordId> {
        let fields = check(self.descriptor, fields)?;
        let result = bind_fields(sqlx::query(&self.sql.insert), &fields)
            .execute(&self.pool)
            .await?;
        Ok(RecordId::new(result.last_insert_rowid()))
    }

    async fn list_all(&self) -> StoreResult<Vec<Record>> {
        let rows = sqlx::query(&self.sql.list).fetch_all(&self.pool).await?;
        rows.iter().map(|row| self.decode(row)).collect()
    }

    async fn get(&self, id: RecordId) -> StoreResult<Option<Record>> {
        let row = sqlx::query(&self.sql.get)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(|row| self.decode(row)).transpose()
    }

    async fn update(&self, id: RecordId, fields: Fields) -> StoreResult<bool> {
        let fields = check(self.descriptor, fields)?;
        let result = bind_fields(sqlx::query(&self.sql.update), &fields)
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: RecordId) -> StoreResult<bool> {
        let result = sqlx::query(&self.sql.delete)
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn decrement(&self, id: RecordId) -> StoreResult<bool> {
        let sql = self
            .sql
            .decrement
            .as_deref()
            .ok_or_else(|| no_counter(self.descriptor))?;
        let result = sqlx::query(sql).bind(id.get()).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
