use super::add::parse_fields;
use crate::error::ImportError;
use crate::ledger::TransactionLedger;
use crate::models::transaction::NewTransaction;
use crate::storage::TransactionStore;
use std::fs::File;
use std::io::Read;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
}

/// Imports every row of `path` into the ledger. The whole file is parsed
/// before anything is added, so a bad row leaves the ledger untouched.
pub fn import_transactions<S: TransactionStore>(
    ledger: &mut TransactionLedger<S>,
    format: ImportFormat,
    path: &str,
) -> Result<usize, ImportError> {
    let file = File::open(path).map_err(|source| ImportError::Open {
        path: path.to_string(),
        source,
    })?;
    let drafts = match format {
        ImportFormat::Csv => read_csv(file)?,
    };

    let mut count = 0;
    for (index, draft) in drafts.into_iter().enumerate() {
        ledger
            .add(draft)
            .map_err(|source| ImportError::Rejected {
                line: index + 1,
                source,
            })?;
        count += 1;
    }
    info!(count, path, "imported transactions");
    Ok(count)
}

fn read_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut drafts = Vec::new();

    for (line_index, result) in reader.records().enumerate() {
        let line = line_index + 1;
        let record = result.map_err(|source| ImportError::Csv { line, source })?;

        if record.len() != 5 {
            return Err(ImportError::Columns {
                line,
                found: record.len(),
            });
        }

        let draft = parse_fields(&record[0], &record[1], &record[2], &record[3], &record[4])
            .map_err(|source| ImportError::Rejected { line, source })?;
        drafts.push(draft);
    }

    Ok(drafts)
}
