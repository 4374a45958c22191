//! Dataset repository: CRUD and filtered listing.

use mdip_core::entities::{Dataset, NewDataset};
use mdip_core::enums::EntityKind;
use tracing::debug;

use super::{Conditions, Repository};
use crate::{Store, StoreConn};
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, opt_integer, opt_text, parse_datetime};
use crate::updates::dataset::DatasetPatch;

const SELECT_COLS: &str = "id, source_id, name, row_count, column_count, uploaded_by, owner_id, upload_date";

fn row_to_dataset(row: &libsql::Row) -> Result<Dataset, DatabaseError> {
    let dataset = Dataset::new(NewDataset {
        source_id: get_opt_string(row, 1)?,
        name: row.get(2)?,
        rows: row.get(3)?,
        columns: row.get(4)?,
        uploaded_by: get_opt_string(row, 5)?,
        owner_id: row.get::<Option<i64>>(6)?,
        upload_date: parse_datetime(&row.get::<String>(7)?)?,
    })?;
    Ok(dataset.with_id(row.get(0)?)?)
}

fn column_values(dataset: &Dataset) -> Vec<libsql::Value> {
    vec![
        opt_text(dataset.source_id()),
        dataset.name().into(),
        dataset.rows().into(),
        dataset.columns().into(),
        opt_text(dataset.uploaded_by()),
        opt_integer(dataset.owner_id()),
        dataset.upload_date().to_rfc3339().into(),
    ]
}

#[derive(Debug, Clone, Default)]
pub struct DatasetFilter {
    pub owner_id: Option<i64>,
    pub uploaded_by: Option<String>,
    pub min_rows: Option<i64>,
    pub limit: Option<u32>,
}

pub struct DatasetRepo<'a> {
    store: &'a Store,
}

impl<'a> DatasetRepo<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }
}

impl Repository for DatasetRepo<'_> {
    type Entity = Dataset;
    type Patch = DatasetPatch;
    type Filter = DatasetFilter;

    const KIND: EntityKind = EntityKind::Dataset;

    fn store(&self) -> &Store {
        self.store
    }

    async fn create_in(
        &self,
        conn: &StoreConn<'_>,
        dataset: &Dataset,
    ) -> Result<i64, DatabaseError> {
        if let Some(id) = dataset.id() {
            return Err(DatabaseError::AlreadyPersisted {
                entity: Self::KIND,
                id,
            });
        }
        let id = conn
            .insert_with(
                "INSERT INTO datasets (source_id, name, row_count, column_count, uploaded_by, owner_id, upload_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                column_values(dataset),
            )
            .await?;
        debug!(id, rows = dataset.rows(), "dataset created");
        Ok(id)
    }

    async fn get(&self, id: i64) -> Result<Dataset, DatabaseError> {
        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM datasets WHERE id = ?1"),
                vec![id.into()],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NotFound {
            entity: Self::KIND,
            id,
        })?;
        row_to_dataset(&row)
    }

    async fn list(&self, filter: &DatasetFilter) -> Result<Vec<Dataset>, DatabaseError> {
        let mut conditions = Conditions::default();
        if let Some(owner_id) = filter.owner_id {
            conditions.push("owner_id = ?", owner_id);
        }
        if let Some(ref uploaded_by) = filter.uploaded_by {
            conditions.push("uploaded_by = ?", uploaded_by.clone());
        }
        if let Some(min_rows) = filter.min_rows {
            conditions.push("row_count >= ?", min_rows);
        }
        let (tail, params) = conditions.finish(filter.limit);

        let conn = self.store.connection()?;
        let mut rows = conn
            .query_with(&format!("SELECT {SELECT_COLS} FROM datasets {tail}"), params)
            .await?;
        let mut datasets = Vec::new();
        while let Some(row) = rows.next().await? {
            datasets.push(row_to_dataset(&row)?);
        }
        Ok(datasets)
    }

    async fn update(&self, id: i64, patch: DatasetPatch) -> Result<Dataset, DatabaseError> {
        let current = self.get(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let merged = Dataset::new(patch.apply(current.to_new()))?;

        let mut params = column_values(&merged);
        params.push(id.into());
        let conn = self.store.connection()?;
        conn.execute_with(
            "UPDATE datasets SET source_id = ?1, name = ?2, row_count = ?3, column_count = ?4,
                 uploaded_by = ?5, owner_id = ?6, upload_date = ?7
             WHERE id = ?8",
            params,
        )
        .await?;
        debug!(id, "dataset updated");
        Ok(merged.with_id(id)?)
    }
}
