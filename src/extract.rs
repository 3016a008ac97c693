//! Field extraction: named selectors in, aligned columns out.
//!
//! Each field is harvested in its own pass over the page, so one field's
//! selector going stale does not cost the others. The passes can disagree on
//! how many elements they matched; [`align`] repairs that by padding every
//! column with `None` up to the longest column before the caller zips rows
//! out of the table. Misalignment is an expected condition of real listing
//! pages, not an error.

use crate::driver::{DriverError, PageDriver};
use crate::models::FieldTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// How one named field is located on a listing page.
///
/// `Nested` covers result cards where a field only makes sense relative to
/// its per-result container (e.g. the date span inside the i-th card): the
/// containers are iterated by index and the child is looked up within each,
/// producing exactly one entry per container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSpec {
    /// Trimmed text of every match of a page-wide selector.
    Text(String),
    /// Attribute value of every match of a page-wide selector.
    Attr { selector: String, attr: String },
    /// Text of the first `child` inside each `parent` match, by parent index.
    Nested { parent: String, child: String },
}

impl FieldSpec {
    async fn collect(
        &self,
        driver: &dyn PageDriver,
    ) -> Result<Vec<Option<String>>, DriverError> {
        match self {
            FieldSpec::Text(selector) => Ok(driver
                .texts(selector)
                .await?
                .into_iter()
                .map(Some)
                .collect()),
            FieldSpec::Attr { selector, attr } => Ok(driver
                .attrs(selector, attr)
                .await?
                .into_iter()
                .map(Some)
                .collect()),
            FieldSpec::Nested { parent, child } => driver.nested_texts(parent, child).await,
        }
    }
}

/// Harvest every named field from the current page and align the columns.
///
/// A failure on one field is logged and recorded as an empty column; the
/// remaining fields are still extracted.
pub async fn extract(
    driver: &dyn PageDriver,
    fields: &BTreeMap<String, FieldSpec>,
) -> FieldTable {
    let mut table = FieldTable::new();
    for (name, spec) in fields {
        let column = match spec.collect(driver).await {
            Ok(column) => column,
            Err(e) => {
                warn!(field = %name, error = %e, "field extraction failed; recording empty column");
                Vec::new()
            }
        };
        table.insert(name.clone(), column);
    }
    align(&mut table);
    table
}

/// Pad every column with `None` to the length of the longest column.
pub fn align(table: &mut FieldTable) {
    let target = table.values().map(Vec::len).max().unwrap_or(0);
    for column in table.values_mut() {
        column.resize(target, None);
    }
}
