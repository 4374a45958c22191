//! Dataset patch builder.

use chrono::{DateTime, Utc};
use mdip_core::entities::NewDataset;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetPatch {
    pub name: Option<String>,
    pub rows: Option<i64>,
    pub columns: Option<i64>,
    pub uploaded_by: Option<Option<String>>,
    pub owner_id: Option<Option<i64>>,
    pub upload_date: Option<DateTime<Utc>>,
}

impl DatasetPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn apply(self, mut base: NewDataset) -> NewDataset {
        if let Some(name) = self.name {
            base.name = name;
        }
        if let Some(rows) = self.rows {
            base.rows = rows;
        }
        if let Some(columns) = self.columns {
            base.columns = columns;
        }
        if let Some(uploaded_by) = self.uploaded_by {
            base.uploaded_by = uploaded_by;
        }
        if let Some(owner_id) = self.owner_id {
            base.owner_id = owner_id;
        }
        if let Some(upload_date) = self.upload_date {
            base.upload_date = upload_date;
        }
        base
    }
}

#[derive(Default)]
pub struct DatasetPatchBuilder(DatasetPatch);

impl DatasetPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn rows(mut self, rows: i64) -> Self {
        self.0.rows = Some(rows);
        self
    }

    #[must_use]
    pub const fn columns(mut self, columns: i64) -> Self {
        self.0.columns = Some(columns);
        self
    }

    #[must_use]
    pub fn uploaded_by(mut self, uploaded_by: Option<String>) -> Self {
        self.0.uploaded_by = Some(uploaded_by);
        self
    }

    #[must_use]
    pub const fn owner_id(mut self, owner_id: Option<i64>) -> Self {
        self.0.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub const fn upload_date(mut self, upload_date: DateTime<Utc>) -> Self {
        self.0.upload_date = Some(upload_date);
        self
    }

    #[must_use]
    pub fn build(self) -> DatasetPatch {
        self.0
    }
}
