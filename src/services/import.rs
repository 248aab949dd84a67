//! CSV import service
//!
//! Pulls bank-exported CSV rows into the family's transactions: column
//! mapping, tolerant date and amount parsing, and duplicate detection via a
//! stable per-row import id.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use csv::{Reader, StringRecord};

use crate::audit::EntityType;
use crate::error::{HearthError, HearthResult};
use crate::models::{
    Account, AccountId, Category, CategoryId, Money, Transaction, TransactionSource, User,
};
use crate::storage::Storage;

/// Which CSV columns hold what
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Index of the date column
    pub date_column: usize,
    /// Single signed amount column; `None` when inflow/outflow are split
    pub amount_column: Option<usize>,
    /// Outflow column when amounts are split (values taken as spending)
    pub outflow_column: Option<usize>,
    /// Inflow column when amounts are split
    pub inflow_column: Option<usize>,
    /// Payee/description column
    pub payee_column: Option<usize>,
    /// Memo/notes column
    pub memo_column: Option<usize>,
    /// Preferred date format tried before the fallbacks
    pub date_format: String,
    /// Flip amount signs (some card exports show purchases as positive)
    pub invert_amounts: bool,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: Some(1),
            outflow_column: None,
            inflow_column: None,
            payee_column: Some(2),
            memo_column: None,
            date_format: "%Y-%m-%d".to_string(),
            invert_amounts: false,
        }
    }
}

impl ColumnMapping {
    /// Common bank export shape: date, description, amount
    pub fn simple_bank() -> Self {
        Self {
            date_column: 0,
            amount_column: Some(2),
            payee_column: Some(1),
            date_format: "%m/%d/%Y".to_string(),
            ..Self::default()
        }
    }

    /// Split inflow/outflow columns
    pub fn separate_inout(
        date_column: usize,
        outflow_column: usize,
        inflow_column: usize,
        payee_column: usize,
    ) -> Self {
        Self {
            date_column,
            amount_column: None,
            outflow_column: Some(outflow_column),
            inflow_column: Some(inflow_column),
            payee_column: Some(payee_column),
            ..Self::default()
        }
    }

    /// Guess a mapping from header names
    pub fn detect(headers: &StringRecord) -> Self {
        let mut mapping = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();

            if h.contains("date") || h.contains("posted") {
                mapping.date_column = idx;
            } else if h.contains("debit") || h.contains("outflow") || h.contains("withdrawal") {
                mapping.outflow_column = Some(idx);
            } else if h.contains("credit") || h.contains("inflow") || h.contains("deposit") {
                mapping.inflow_column = Some(idx);
            } else if h.contains("amount") && mapping.amount_column == Some(1) {
                mapping.amount_column = Some(idx);
            } else if h.contains("description") || h.contains("payee") || h.contains("merchant") {
                mapping.payee_column = Some(idx);
            } else if h.contains("memo") || h.contains("note") {
                mapping.memo_column = Some(idx);
            }
        }

        if mapping.outflow_column.is_some() && mapping.inflow_column.is_some() {
            mapping.amount_column = None;
        }

        mapping
    }
}

/// One CSV row parsed into transaction fields
#[derive(Debug, Clone)]
pub struct ParsedRow {
    pub date: NaiveDate,
    pub amount: Money,
    pub payee: String,
    pub memo: String,
    /// Row number in the file (0-indexed, header excluded)
    pub row_number: usize,
    /// Stable dedup hash over date + amount + payee
    pub import_id: String,
}

/// How one previewed row will be handled on commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    New,
    Duplicate,
    Error(String),
}

/// One row of the import preview
#[derive(Debug, Clone)]
pub struct PreviewRow {
    pub row: Option<ParsedRow>,
    pub row_number: usize,
    pub status: RowStatus,
}

/// Outcome of a committed import
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub imported: usize,
    pub duplicates_skipped: usize,
    pub errors: usize,
    pub error_messages: HashMap<usize, String>,
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    user: &'a User,
}

impl<'a> ImportService<'a> {
    /// Create a new import service acting as the given user
    pub fn new(storage: &'a Storage, user: &'a User) -> Self {
        Self { storage, user }
    }

    /// Parse all CSV records. Rows that fail to parse are carried as errors
    /// rather than aborting the whole file.
    pub fn parse<R: std::io::Read>(
        &self,
        reader: &mut Reader<R>,
        mapping: &ColumnMapping,
    ) -> HearthResult<Vec<Result<ParsedRow, String>>> {
        let mut rows = Vec::new();

        for (row_number, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    rows.push(Err(format!("Unreadable CSV record: {}", e)));
                    continue;
                }
            };
            rows.push(parse_record(&record, row_number, mapping));
        }

        Ok(rows)
    }

    /// Mark each parsed row as new, duplicate, or error. Duplicates are rows
    /// whose import id already exists in the family, or that repeat inside
    /// the file itself.
    pub fn preview(
        &self,
        parsed: &[Result<ParsedRow, String>],
    ) -> HearthResult<Vec<PreviewRow>> {
        let mut preview = Vec::with_capacity(parsed.len());
        let mut seen_in_file = HashSet::new();

        for (row_number, result) in parsed.iter().enumerate() {
            match result {
                Ok(row) => {
                    let already_imported = self
                        .storage
                        .transactions
                        .import_id_exists(self.user.family_id, &row.import_id)?;
                    let status = if already_imported || !seen_in_file.insert(row.import_id.clone())
                    {
                        RowStatus::Duplicate
                    } else {
                        RowStatus::New
                    };
                    preview.push(PreviewRow {
                        row: Some(row.clone()),
                        row_number: row.row_number,
                        status,
                    });
                }
                Err(e) => preview.push(PreviewRow {
                    row: None,
                    row_number,
                    status: RowStatus::Error(e.clone()),
                }),
            }
        }

        Ok(preview)
    }

    /// Post every `New` preview row into the target account
    pub fn commit(
        &self,
        preview: &[PreviewRow],
        account_id: AccountId,
        default_category: Option<CategoryId>,
    ) -> HearthResult<ImportOutcome> {
        let account = self.check_account(account_id)?;
        if account.archived {
            return Err(HearthError::Validation(format!(
                "Account '{}' is archived; unarchive it before importing into it",
                account.name
            )));
        }
        if let Some(category_id) = default_category {
            let category = self.check_category(category_id)?;
            if category.archived {
                return Err(HearthError::Validation(format!(
                    "Category '{}' is archived; unarchive it before using it",
                    category.name
                )));
            }
        }

        let mut outcome = ImportOutcome::default();
        let mut imported = Vec::new();

        for entry in preview {
            match (&entry.status, &entry.row) {
                (RowStatus::New, Some(row)) => {
                    let mut txn = Transaction::new(
                        self.user.family_id,
                        account_id,
                        row.date,
                        row.amount,
                    );
                    txn.category_id = default_category;
                    txn.payee = row.payee.clone();
                    txn.memo = row.memo.clone();
                    txn.source = TransactionSource::Imported;
                    txn.import_id = Some(row.import_id.clone());

                    match txn.validate() {
                        Ok(()) => {
                            self.storage.transactions.upsert(txn.clone())?;
                            imported.push(txn);
                            outcome.imported += 1;
                        }
                        Err(e) => {
                            outcome.errors += 1;
                            outcome.error_messages.insert(row.row_number, e.to_string());
                        }
                    }
                }
                (RowStatus::Duplicate, _) => outcome.duplicates_skipped += 1,
                (RowStatus::Error(e), _) => {
                    outcome.errors += 1;
                    outcome.error_messages.insert(entry.row_number, e.clone());
                }
                (RowStatus::New, None) => {}
            }
        }

        self.storage.transactions.save()?;
        for txn in &imported {
            self.storage.log_create(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(txn.payee.clone()),
                txn,
            )?;
        }

        Ok(outcome)
    }

    fn check_account(&self, account_id: AccountId) -> HearthResult<Account> {
        let account = self
            .storage
            .accounts
            .get(account_id)?
            .ok_or_else(|| HearthError::account_not_found(account_id.to_string()))?;
        if account.family_id != self.user.family_id {
            return Err(HearthError::permission_denied(
                "Account",
                account_id.to_string(),
            ));
        }
        Ok(account)
    }

    fn check_category(&self, category_id: CategoryId) -> HearthResult<Category> {
        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| HearthError::category_not_found(category_id.to_string()))?;
        if category.family_id != self.user.family_id {
            return Err(HearthError::permission_denied(
                "Category",
                category_id.to_string(),
            ));
        }
        Ok(category)
    }
}

/// Stable dedup hash over the fields that identify a bank row
pub fn generate_import_id(date: NaiveDate, amount: Money, payee: &str) -> String {
    use std::hash::{Hash, Hasher};
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    date.hash(&mut hasher);
    amount.cents().hash(&mut hasher);
    payee.hash(&mut hasher);
    format!("imp-{:016x}", hasher.finish())
}

fn parse_record(
    record: &StringRecord,
    row_number: usize,
    mapping: &ColumnMapping,
) -> Result<ParsedRow, String> {
    let date_str = record
        .get(mapping.date_column)
        .ok_or_else(|| "Missing date column".to_string())?
        .trim();
    let date = parse_date(date_str, &mapping.date_format)?;

    let mut amount = parse_amount(record, mapping)?;
    if mapping.invert_amounts {
        amount = -amount;
    }

    let payee = mapping
        .payee_column
        .and_then(|col| record.get(col))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let memo = mapping
        .memo_column
        .and_then(|col| record.get(col))
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let import_id = generate_import_id(date, amount, &payee);

    Ok(ParsedRow {
        date,
        amount,
        payee,
        memo,
        row_number,
        import_id,
    })
}

fn parse_amount(record: &StringRecord, mapping: &ColumnMapping) -> Result<Money, String> {
    if let Some(col) = mapping.amount_column {
        let s = record
            .get(col)
            .ok_or_else(|| "Missing amount column".to_string())?
            .trim();
        return parse_amount_string(s);
    }

    let outflow_col = mapping
        .outflow_column
        .ok_or_else(|| "Mapping has neither an amount nor an outflow column".to_string())?;
    let inflow_col = mapping
        .inflow_column
        .ok_or_else(|| "Mapping has an outflow column but no inflow column".to_string())?;

    let outflow_str = record.get(outflow_col).map(str::trim).unwrap_or("");
    let inflow_str = record.get(inflow_col).map(str::trim).unwrap_or("");

    let outflow = if outflow_str.is_empty() {
        Money::zero()
    } else {
        -parse_amount_string(outflow_str)?.abs()
    };
    let inflow = if inflow_str.is_empty() {
        Money::zero()
    } else {
        parse_amount_string(inflow_str)?.abs()
    };

    Ok(outflow + inflow)
}

/// Parse an amount, stripping currency symbols and thousands separators and
/// accepting accounting-style parentheses for negatives
fn parse_amount_string(s: &str) -> Result<Money, String> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '(' | ')'))
        .collect();

    let (negative, value) = if cleaned.starts_with('(') && cleaned.ends_with(')') {
        (true, &cleaned[1..cleaned.len() - 1])
    } else if let Some(stripped) = cleaned.strip_prefix('-') {
        (true, stripped)
    } else {
        (false, cleaned.as_str())
    };

    Money::parse(value)
        .map(|m| if negative { -m } else { m })
        .map_err(|e| format!("Could not parse amount '{}': {}", s, e))
}

const DATE_FALLBACKS: [&str; 6] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y",
];

fn parse_date(s: &str, preferred: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, preferred) {
        return Ok(date);
    }
    for format in DATE_FALLBACKS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    Err(format!("Could not parse date: '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::HearthPaths;
    use crate::models::{Account, AccountType, FamilyId};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        user: User,
        account_id: AccountId,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = HearthPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let user = User::new(FamilyId::new(), "kim@example.com", "Kim", "$argon2id$stub");
        let account = Account::new(
            user.family_id,
            "Checking",
            AccountType::Checking,
            Money::zero(),
        );
        let account_id = account.id;
        storage.accounts.upsert(account).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            user,
            account_id,
        }
    }

    fn parse_str(f: &Fixture, csv: &str, mapping: &ColumnMapping) -> Vec<Result<ParsedRow, String>> {
        let service = ImportService::new(&f.storage, &f.user);
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        service.parse(&mut reader, mapping).unwrap()
    }

    #[test]
    fn test_parse_default_mapping() {
        let f = fixture();
        let csv = "Date,Amount,Description\n2026-01-15,-50.00,Corner Store\n2026-01-16,100.00,Paycheck";
        let rows = parse_str(&f, csv, &ColumnMapping::default());

        assert_eq!(rows.len(), 2);
        let first = rows[0].as_ref().unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert_eq!(first.amount.cents(), -5000);
        assert_eq!(first.payee, "Corner Store");
        assert_eq!(rows[1].as_ref().unwrap().amount.cents(), 10000);
    }

    #[test]
    fn test_parse_separate_inout() {
        let f = fixture();
        let csv = "Date,Outflow,Inflow,Description\n2026-01-15,50.00,,Groceries\n2026-01-16,,100.00,Paycheck";
        let rows = parse_str(&f, csv, &ColumnMapping::separate_inout(0, 1, 2, 3));

        assert_eq!(rows[0].as_ref().unwrap().amount.cents(), -5000);
        assert_eq!(rows[1].as_ref().unwrap().amount.cents(), 10000);
    }

    #[test]
    fn test_parse_accounting_negative_and_symbols() {
        let f = fixture();
        let csv = "Date,Amount,Description\n2026-01-15,\"($1,250.00)\",Rent";
        let rows = parse_str(&f, csv, &ColumnMapping::default());
        assert_eq!(rows[0].as_ref().unwrap().amount.cents(), -125000);
    }

    #[test]
    fn test_parse_date_fallbacks() {
        let f = fixture();
        let csv = "Date,Amount,Description\n01/15/2026,-50.00,Store";
        let rows = parse_str(&f, csv, &ColumnMapping::default());
        assert_eq!(
            rows[0].as_ref().unwrap().date,
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_bad_rows_become_errors_not_aborts() {
        let f = fixture();
        let csv = "Date,Amount,Description\nnot-a-date,-50.00,Store\n2026-01-16,20.00,Ok";
        let rows = parse_str(&f, csv, &ColumnMapping::default());

        assert!(rows[0].is_err());
        assert!(rows[1].is_ok());
    }

    #[test]
    fn test_detect_mapping_from_headers() {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader("Transaction Date,Debit,Credit,Description,Notes".as_bytes());
        let headers = reader.headers().unwrap().clone();
        let mapping = ColumnMapping::detect(&headers);

        assert_eq!(mapping.date_column, 0);
        assert_eq!(mapping.outflow_column, Some(1));
        assert_eq!(mapping.inflow_column, Some(2));
        assert_eq!(mapping.payee_column, Some(3));
        assert_eq!(mapping.memo_column, Some(4));
        assert!(mapping.amount_column.is_none());
    }

    #[test]
    fn test_commit_and_duplicate_detection() {
        let f = fixture();
        let service = ImportService::new(&f.storage, &f.user);
        let csv = "Date,Amount,Description\n2026-01-15,-50.00,Corner Store";

        let parsed = parse_str(&f, csv, &ColumnMapping::default());
        let preview = service.preview(&parsed).unwrap();
        assert_eq!(preview[0].status, RowStatus::New);

        let outcome = service.commit(&preview, f.account_id, None).unwrap();
        assert_eq!(outcome.imported, 1);

        let txn = &f
            .storage
            .transactions
            .get_by_account(f.account_id)
            .unwrap()[0];
        assert_eq!(txn.source, TransactionSource::Imported);
        assert!(txn.import_id.is_some());

        // Re-importing the same file only yields duplicates
        let preview2 = service.preview(&parsed).unwrap();
        assert_eq!(preview2[0].status, RowStatus::Duplicate);
        let outcome2 = service.commit(&preview2, f.account_id, None).unwrap();
        assert_eq!(outcome2.imported, 0);
        assert_eq!(outcome2.duplicates_skipped, 1);
    }

    #[test]
    fn test_repeated_row_within_file_is_duplicate() {
        let f = fixture();
        let service = ImportService::new(&f.storage, &f.user);
        let csv = "Date,Amount,Description\n2026-01-15,-50.00,Store\n2026-01-15,-50.00,Store";

        let parsed = parse_str(&f, csv, &ColumnMapping::default());
        let preview = service.preview(&parsed).unwrap();
        assert_eq!(preview[0].status, RowStatus::New);
        assert_eq!(preview[1].status, RowStatus::Duplicate);
    }

    #[test]
    fn test_commit_counts_errors() {
        let f = fixture();
        let service = ImportService::new(&f.storage, &f.user);
        let csv = "Date,Amount,Description\nbogus,-50.00,Store\n2026-01-16,20.00,Ok";

        let parsed = parse_str(&f, csv, &ColumnMapping::default());
        let preview = service.preview(&parsed).unwrap();
        let outcome = service.commit(&preview, f.account_id, None).unwrap();

        assert_eq!(outcome.imported, 1);
        assert_eq!(outcome.errors, 1);
        assert!(outcome.error_messages.contains_key(&0));
    }

    #[test]
    fn test_commit_rejects_foreign_account() {
        let f = fixture();
        let service = ImportService::new(&f.storage, &f.user);

        let foreign = Account::new(
            FamilyId::new(),
            "Foreign",
            AccountType::Checking,
            Money::zero(),
        );
        let foreign_id = foreign.id;
        f.storage.accounts.upsert(foreign).unwrap();

        let err = service.commit(&[], foreign_id, None).unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_commit_rejects_archived_account() {
        let f = fixture();
        let service = ImportService::new(&f.storage, &f.user);

        let mut account = f.storage.accounts.get(f.account_id).unwrap().unwrap();
        account.archive();
        f.storage.accounts.upsert(account).unwrap();

        let err = service.commit(&[], f.account_id, None).unwrap_err();
        assert!(matches!(err, HearthError::Validation(ref msg) if msg.contains("archived")));
    }
}
