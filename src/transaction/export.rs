//! Stateless projections of the transaction list: the dashboard's
//! "recent" slice and the CSV download.

use super::models::TransactionResponse;
use crate::errors::AppError;

const CSV_HEADER: [&str; 5] = ["Date", "Category", "Description", "Amount", "Type"];

/// First `limit` rows of a newest-first list.
pub fn recent(mut rows: Vec<TransactionResponse>, limit: usize) -> Vec<TransactionResponse> {
    rows.truncate(limit);
    rows
}

/// Render rows as CSV with a header line.
pub fn to_csv(rows: &[TransactionResponse]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::InternalError(format!("Failed to write CSV: {e}")))?;

    for row in rows {
        writer
            .write_record([
                row.date.to_string(),
                row.category_name.clone(),
                row.description.clone(),
                crate::money::format(row.amount),
                row.transaction_type.as_str().to_string(),
            ])
            .map_err(|e| AppError::InternalError(format!("Failed to write CSV: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalError(format!("Failed to flush CSV: {e}")))?;

    String::from_utf8(bytes)
        .map_err(|e| AppError::InternalError(format!("CSV is not valid UTF-8: {e}")))
}
