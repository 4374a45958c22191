use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;
use crate::errors::{CoreError, ValidationError};
use crate::validate;

/// Metadata describing an uploaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    id: Option<i64>,
    name: String,
    rows: i64,
    columns: i64,
    uploaded_by: Option<String>,
    owner_id: Option<i64>,
    upload_date: DateTime<Utc>,
    source_id: Option<String>,
}

/// Parsed dataset fields, not yet checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDataset {
    pub name: String,
    pub rows: i64,
    pub columns: i64,
    pub uploaded_by: Option<String>,
    pub owner_id: Option<i64>,
    pub upload_date: DateTime<Utc>,
    pub source_id: Option<String>,
}

impl Dataset {
    /// Validate and build an unpersisted dataset record.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn new(fields: NewDataset) -> Result<Self, ValidationError> {
        validate::required("name", &fields.name)?;
        let rows = validate::non_negative("rows", fields.rows)?;
        let columns = validate::non_negative("columns", fields.columns)?;
        let owner_id = fields
            .owner_id
            .map(|id| validate::non_negative("owner_id", id))
            .transpose()?;

        Ok(Self {
            id: None,
            name: fields.name,
            rows,
            columns,
            uploaded_by: validate::optional_text(fields.uploaded_by),
            owner_id,
            upload_date: fields.upload_date,
            source_id: validate::optional_text(fields.source_id),
        })
    }

    /// Attach the identifier assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AlreadyPersisted`] if an id is already set.
    pub fn with_id(mut self, id: i64) -> Result<Self, CoreError> {
        super::assign_id(&mut self.id, EntityKind::Dataset, id)?;
        Ok(self)
    }

    #[must_use]
    pub fn to_new(&self) -> NewDataset {
        NewDataset {
            name: self.name.clone(),
            rows: self.rows,
            columns: self.columns,
            uploaded_by: self.uploaded_by.clone(),
            owner_id: self.owner_id,
            upload_date: self.upload_date,
            source_id: self.source_id.clone(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn rows(&self) -> i64 {
        self.rows
    }

    #[must_use]
    pub const fn columns(&self) -> i64 {
        self.columns
    }

    #[must_use]
    pub fn uploaded_by(&self) -> Option<&str> {
        self.uploaded_by.as_deref()
    }

    #[must_use]
    pub const fn owner_id(&self) -> Option<i64> {
        self.owner_id
    }

    #[must_use]
    pub const fn upload_date(&self) -> DateTime<Utc> {
        self.upload_date
    }

    #[must_use]
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    /// Rows times columns, saturating.
    #[must_use]
    pub const fn cell_count(&self) -> i64 {
        self.rows.saturating_mul(self.columns)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// One dataset row as it appears in `datasets_metadata.csv`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetDraft {
    #[serde(default)]
    pub dataset_id: Option<String>,
    pub name: String,
    pub rows: String,
    pub columns: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    pub upload_date: String,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl DatasetDraft {
    pub const CSV_COLUMNS: &'static [&'static str] =
        &["dataset_id", "name", "rows", "columns", "uploaded_by", "upload_date"];

    /// Parse and validate every field.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first field that fails.
    pub fn validate(self) -> Result<Dataset, ValidationError> {
        Dataset::new(NewDataset {
            name: self.name,
            rows: validate::parse_count("rows", &self.rows)?,
            columns: validate::parse_count("columns", &self.columns)?,
            uploaded_by: self.uploaded_by,
            owner_id: validate::parse_optional_ref("owner_id", self.owner_id.as_deref())?,
            upload_date: validate::parse_timestamp("upload_date", &self.upload_date)?,
            source_id: self.dataset_id,
        })
    }
}
