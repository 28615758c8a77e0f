//! In-process repository
//!
//! Same contract as the MySQL repository. Integer keys auto-increment and
//! ignore submitted values; other keys are taken from the data and must be
//! unique. Search is a case-insensitive substring match over string/text
//! columns.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::errors::{StoreError, StoreResult};
use super::repository::{Page, PageRequest, RecordRepository};
use crate::record::{CleanData, FieldValue, Record};
use crate::schema::Schema;

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,
    last_id: u64,
}

/// Repository holding rows in memory
pub struct MemoryRepository {
    schema: Arc<Schema>,
    table: RwLock<Table>,
}

impl MemoryRepository {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            table: RwLock::new(Table::default()),
        }
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Table>> {
        self.table
            .read()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Table>> {
        self.table
            .write()
            .map_err(|_| StoreError::Internal("Lock poisoned".to_string()))
    }

    /// Index of the row whose key column equals `id`
    fn position(&self, table: &Table, id: &FieldValue) -> StoreResult<usize> {
        let pk = self.schema.require_primary_key()?;
        let wanted = id.to_storage_string();

        table
            .rows
            .iter()
            .position(|row| row.get(&pk.name).cloned().flatten() == wanted)
            .ok_or(StoreError::NotFound)
    }

    fn matches(&self, row: &Record, needle: &str) -> bool {
        self.schema.searchable_fields().any(|field| {
            row.get(&field.name)
                .and_then(|v| v.as_deref())
                .is_some_and(|v| v.to_lowercase().contains(needle))
        })
    }
}

#[async_trait]
impl RecordRepository for MemoryRepository {
    async fn create(&self, data: &CleanData) -> StoreResult<Option<u64>> {
        let mut table = self.write()?;

        let mut row = Record::new();
        let mut generated = None;

        for field in &self.schema.fields {
            let value = if field.is_auto_increment() {
                let next = table.last_id + 1;
                generated = Some(next);
                Some(next.to_string())
            } else {
                data.get(&field.name).and_then(FieldValue::to_storage_string)
            };

            if field.primary_key && !field.is_auto_increment() {
                let key = value
                    .clone()
                    .ok_or_else(|| StoreError::MissingKey(field.name.clone()))?;
                if table.rows.iter().any(|r| r.get(&field.name) == Some(&value)) {
                    return Err(StoreError::DuplicateKey(key));
                }
            }
            row.insert(field.name.clone(), value);
        }

        if let Some(id) = generated {
            table.last_id = id;
        }

        table.rows.push(row);
        Ok(generated)
    }

    async fn update(&self, id: &FieldValue, data: &CleanData) -> StoreResult<()> {
        let assignments: Vec<_> = self
            .schema
            .fields
            .iter()
            .filter(|f| !f.primary_key)
            .filter_map(|f| data.get(&f.name).map(|v| (f.name.clone(), v.to_storage_string())))
            .collect();

        if assignments.is_empty() {
            // Still surface a missing key before the empty update
            self.schema.require_primary_key()?;
            return Err(StoreError::NothingToUpdate);
        }

        let mut table = self.write()?;
        let idx = self.position(&table, id)?;
        let row = &mut table.rows[idx];
        for (name, value) in assignments {
            row.insert(name, value);
        }
        Ok(())
    }

    async fn delete(&self, id: &FieldValue) -> StoreResult<()> {
        let mut table = self.write()?;
        let idx = self.position(&table, id)?;
        table.rows.remove(idx);
        Ok(())
    }

    async fn find_by_id(&self, id: &FieldValue) -> StoreResult<Record> {
        let table = self.read()?;
        let idx = self.position(&table, id)?;
        Ok(table.rows[idx].clone())
    }

    async fn find_all(&self, request: &PageRequest) -> StoreResult<Page> {
        let table = self.read()?;
        let needle = request.search.to_lowercase();
        let searching = !needle.is_empty() && self.schema.searchable_fields().next().is_some();

        let matching: Vec<&Record> = table
            .rows
            .iter()
            .filter(|row| !searching || self.matches(row, &needle))
            .collect();

        let total = matching.len() as u64;
        let records = matching
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .cloned()
            .collect();

        Ok(Page { records, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Field, FieldType, SchemaErrorCode};

    fn repo() -> MemoryRepository {
        let schema = Schema::new(
            "clientes",
            vec![
                Field::new("id", FieldType::Int).primary_key(),
                Field::new("nome", FieldType::String).required(),
                Field::new("idade", FieldType::Int),
            ],
        )
        .unwrap();
        MemoryRepository::new(Arc::new(schema))
    }

    fn data(nome: &str, idade: FieldValue) -> CleanData {
        let mut data = CleanData::new();
        data.insert("nome".into(), FieldValue::Text(nome.into()));
        data.insert("idade".into(), idade);
        data
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = repo();
        assert_eq!(repo.create(&data("Ana", FieldValue::Int(30))).await.unwrap(), Some(1));
        assert_eq!(repo.create(&data("Bia", FieldValue::Null)).await.unwrap(), Some(2));

        let bia = repo.find_by_id(&FieldValue::Int(2)).await.unwrap();
        assert_eq!(bia["nome"].as_deref(), Some("Bia"));
        assert_eq!(bia["idade"], None);
        assert_eq!(bia["id"].as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_create_ignores_submitted_key() {
        let repo = repo();
        let mut d = data("Ana", FieldValue::Null);
        d.insert("id".into(), FieldValue::Int(99));
        assert_eq!(repo.create(&d).await.unwrap(), Some(1));
        assert!(repo.find_by_id(&FieldValue::Int(99)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo();
        repo.create(&data("Ana", FieldValue::Int(30))).await.unwrap();

        let mut changes = CleanData::new();
        changes.insert("idade".into(), FieldValue::Int(31));
        repo.update(&FieldValue::Int(1), &changes).await.unwrap();

        let ana = repo.find_by_id(&FieldValue::Int(1)).await.unwrap();
        assert_eq!(ana["idade"].as_deref(), Some("31"));
        assert_eq!(ana["nome"].as_deref(), Some("Ana"));

        repo.delete(&FieldValue::Int(1)).await.unwrap();
        assert!(repo.find_by_id(&FieldValue::Int(1)).await.unwrap_err().is_not_found());
        assert!(repo.delete(&FieldValue::Int(1)).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let repo = repo();
        let err = repo
            .update(&FieldValue::Int(7), &data("X", FieldValue::Null))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = repo.update(&FieldValue::Int(7), &CleanData::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NothingToUpdate));
    }

    #[tokio::test]
    async fn test_keyless_schema_cannot_be_addressed() {
        let schema = Schema::new("t", vec![Field::new("a", FieldType::String)]).unwrap();
        let repo = MemoryRepository::new(Arc::new(schema));
        assert_eq!(repo.create(&CleanData::new()).await.unwrap(), None);

        match repo.delete(&FieldValue::Int(1)).await {
            Err(StoreError::Schema(e)) => assert_eq!(e.code(), SchemaErrorCode::MissingPrimaryKey),
            other => panic!("unexpected {:?}", other),
        }
    }

    fn produtos() -> MemoryRepository {
        let schema = Schema::new(
            "produtos",
            vec![
                Field::new("codigo", FieldType::String).required().primary_key(),
                Field::new("nome", FieldType::String),
            ],
        )
        .unwrap();
        MemoryRepository::new(Arc::new(schema))
    }

    fn produto(codigo: FieldValue, nome: &str) -> CleanData {
        let mut data = CleanData::new();
        data.insert("codigo".into(), codigo);
        data.insert("nome".into(), FieldValue::Text(nome.into()));
        data
    }

    #[tokio::test]
    async fn test_text_key_is_written_from_data() {
        let repo = produtos();
        let created = repo
            .create(&produto(FieldValue::Text("AB1".into()), "Parafuso"))
            .await
            .unwrap();
        assert_eq!(created, None);

        let found = repo.find_by_id(&FieldValue::Text("AB1".into())).await.unwrap();
        assert_eq!(found["codigo"].as_deref(), Some("AB1"));
        assert_eq!(found["nome"].as_deref(), Some("Parafuso"));

        repo.delete(&FieldValue::Text("AB1".into())).await.unwrap();
        assert!(repo.find_all(&PageRequest::default()).await.unwrap().records.is_empty());
    }

    #[tokio::test]
    async fn test_text_key_must_be_unique_and_present() {
        let repo = produtos();
        repo.create(&produto(FieldValue::Text("AB1".into()), "Parafuso"))
            .await
            .unwrap();

        let err = repo
            .create(&produto(FieldValue::Text("AB1".into()), "Porca"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(ref k) if k == "AB1"));

        let err = repo.create(&produto(FieldValue::Null, "Porca")).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingKey(ref f) if f == "codigo"));

        assert_eq!(repo.find_all(&PageRequest::default()).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_find_all_paginates_and_searches() {
        let repo = repo();
        for i in 0..25 {
            let nome = if i % 5 == 0 { format!("Ana {}", i) } else { format!("Bia {}", i) };
            repo.create(&data(&nome, FieldValue::Null)).await.unwrap();
        }

        let page = repo.find_all(&PageRequest::new(3, "")).await.unwrap();
        assert_eq!(page.total, 25);
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.records[0]["id"].as_deref(), Some("21"));

        let page = repo.find_all(&PageRequest::new(1, "ANA")).await.unwrap();
        assert_eq!(page.total, 5);
        assert!(page
            .records
            .iter()
            .all(|r| r["nome"].as_deref().unwrap().starts_with("Ana")));
    }
}
