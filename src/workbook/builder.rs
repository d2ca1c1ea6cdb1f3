//! Workbook assembly

use crate::analysis::{AnalysisKind, AnalysisSchema, ComparedRow, Period, Totals};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeSeq, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Metadata fixing what a workbook compares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookMeta {
    /// Client name
    pub client: String,
    /// Analysis kind (workbook name form)
    pub analysis: String,
    /// Dimension key field of the rows
    pub dimension: String,
    /// Analytics counter id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_id: Option<i64>,
    /// Conversion goal id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<i64>,
    /// Search-console property
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Webmaster host id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<String>,
    /// Traffic source filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Period 1 start
    pub p1_start: String,
    /// Period 1 end
    pub p1_end: String,
    /// Period 2 start
    pub p2_start: String,
    /// Period 2 end
    pub p2_end: String,
    /// UTC build time, ISO-8601 with `Z`
    #[serde(default)]
    pub generated_at: String,
    /// Row limit; zero or negative keeps every row
    pub limit: i64,
    /// Whether caches were bypassed
    pub refresh_used: bool,
}

impl WorkbookMeta {
    /// Metadata for `kind` comparing `p1` with `p2`
    pub fn new(client: impl Into<String>, kind: AnalysisKind, p1: &Period, p2: &Period) -> Self {
        Self {
            client: client.into(),
            analysis: kind.workbook_name().to_string(),
            dimension: kind.key_field().to_string(),
            counter_id: None,
            goal_id: None,
            site_url: None,
            host_id: None,
            source: None,
            p1_start: p1.start_str(),
            p1_end: p1.end_str(),
            p2_start: p2.start_str(),
            p2_end: p2.end_str(),
            generated_at: String::new(),
            limit: 0,
            refresh_used: false,
        }
    }

    /// Record whether caches were bypassed
    pub fn with_refresh(mut self, refresh_used: bool) -> Self {
        self.refresh_used = refresh_used;
        self
    }
}

/// Totals, metadata and the top-N ranked rows of one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    /// What was compared
    pub meta: WorkbookMeta,
    /// Totals over every compared row
    pub totals: Totals,
    /// Ranked rows, truncated to `meta.limit` when positive
    pub rows: Vec<ComparedRow>,
}

impl Serialize for Workbook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Workbook", 3)?;
        state.serialize_field("meta", &self.meta)?;
        state.serialize_field("totals", &self.totals)?;
        state.serialize_field(
            "rows",
            &KeyedRows {
                key_field: &self.meta.dimension,
                rows: &self.rows,
            },
        )?;
        state.end()
    }
}

struct KeyedRows<'a> {
    key_field: &'a str,
    rows: &'a [ComparedRow],
}

impl Serialize for KeyedRows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows {
            seq.serialize_element(&row.keyed(self.key_field))?;
        }
        seq.end()
    }
}

/// Packages compared rows into a [`Workbook`]
pub struct WorkbookBuilder<'a> {
    schema: &'a AnalysisSchema,
}

impl<'a> WorkbookBuilder<'a> {
    /// Builder for rows shaped by `schema`
    pub fn new(schema: &'a AnalysisSchema) -> Self {
        Self { schema }
    }

    /// Build a workbook stamped with the current UTC time
    ///
    /// Totals come from `all_rows`; `rows` is `ranked_rows` cut to `limit`
    /// when `limit > 0`.
    pub fn build(
        &self,
        meta: WorkbookMeta,
        limit: i64,
        all_rows: &[ComparedRow],
        ranked_rows: &[ComparedRow],
    ) -> Workbook {
        self.build_at(meta, limit, all_rows, ranked_rows, Utc::now())
    }

    /// Build a workbook stamped with `generated_at`
    pub fn build_at(
        &self,
        mut meta: WorkbookMeta,
        limit: i64,
        all_rows: &[ComparedRow],
        ranked_rows: &[ComparedRow],
        generated_at: DateTime<Utc>,
    ) -> Workbook {
        let totals = Totals::from_rows(self.schema, all_rows);

        let rows = if limit > 0 {
            ranked_rows.iter().take(limit as usize).cloned().collect()
        } else {
            ranked_rows.to_vec()
        };

        meta.limit = limit;
        meta.dimension = self.schema.key_field.clone();
        meta.generated_at = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

        Workbook { meta, totals, rows }
    }
}
