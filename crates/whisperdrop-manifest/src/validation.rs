/*!
# Allocation CSV Validation & I/O

Reading, writing, and validating the `allocations.csv` an operator feeds
into campaign assembly. Every format problem is caught here, before any of
the rows reach hashing.
*/

use crate::{
    errors::{ManifestError, ManifestResult},
    schemas::{AllocationRow, ALLOCATION_CSV_HEADERS},
};
use csv::{Reader, Writer};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

// ================================================================================================
// CSV Reading with Validation
// ================================================================================================

/// Read and validate an allocations CSV file
pub fn read_allocations_csv<P: AsRef<Path>>(path: P) -> ManifestResult<Vec<AllocationRow>> {
    let file = File::open(path)?;
    let mut rdr = Reader::from_reader(file);

    // Validate headers
    let headers = rdr.headers()?;
    validate_headers(headers.iter(), ALLOCATION_CSV_HEADERS, "allocations.csv")?;

    // Read and deserialize rows; deserialize failures are format errors
    // and reported with the offending data row number
    let mut rows = Vec::new();
    for (index, result) in rdr.deserialize().enumerate() {
        let row: AllocationRow = result
            .map_err(|e| ManifestError::InvalidFormat(format!("row {}: {}", index + 1, e)))?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(ManifestError::SchemaValidation(
            "Allocations CSV file is empty".to_string(),
        ));
    }

    validate_allocation_rows(&rows)?;

    Ok(rows)
}

// ================================================================================================
// CSV Writing
// ================================================================================================

/// Write an allocations CSV with proper headers
pub fn write_allocations_csv<P: AsRef<Path>>(
    path: P,
    rows: &[AllocationRow],
) -> ManifestResult<()> {
    let file = File::create(path)?;
    let mut wtr = Writer::from_writer(file);

    // Write data rows (csv crate automatically writes headers)
    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    Ok(())
}

// ================================================================================================
// Row Validation
// ================================================================================================

/// Validate a batch of allocation rows before assembly
///
/// Ensures:
/// - No zero-amount rows (they could never pay anything out)
/// - No repeated `(recipient, nonce)` pair among rows that carry an
///   explicit nonce; reusing a nonce for the same recipient produces
///   identical leaves and defeats the blinding
///
/// Rows that omit the nonce are exempt from the pair check since assembly
/// gives each of them a fresh one.
pub fn validate_allocation_rows(rows: &[AllocationRow]) -> ManifestResult<()> {
    let mut seen: HashMap<([u8; 32], [u8; 16]), usize> = HashMap::new();

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;

        if row.amount == 0 {
            return Err(ManifestError::SchemaValidation(format!(
                "row {}: allocation for recipient {} has zero amount",
                row_number,
                hex::encode(row.recipient)
            )));
        }

        if let Some(nonce) = row.nonce {
            if let Some(first_row) = seen.insert((row.recipient, nonce), row_number) {
                return Err(ManifestError::DuplicateAllocation {
                    recipient: hex::encode(row.recipient),
                    nonce: hex::encode(nonce),
                    first_row,
                    duplicate_row: row_number,
                });
            }
        }
    }

    Ok(())
}

// ================================================================================================
// Header Validation
// ================================================================================================

fn validate_headers<'a, I>(actual: I, expected: &[&str], file_type: &str) -> ManifestResult<()>
where
    I: Iterator<Item = &'a str>,
{
    let actual_headers: Vec<&str> = actual.collect();

    if actual_headers.len() != expected.len() {
        return Err(ManifestError::SchemaValidation(format!(
            "{}: expected {} headers, found {}",
            file_type,
            expected.len(),
            actual_headers.len()
        )));
    }

    for (i, (actual, expected)) in actual_headers.iter().zip(expected.iter()).enumerate() {
        if actual != expected {
            return Err(ManifestError::SchemaValidation(format!(
                "{}: header {} should be '{}', found '{}'",
                file_type,
                i + 1,
                expected,
                actual
            )));
        }
    }

    Ok(())
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn test_row(seed: u8, nonce: Option<[u8; 16]>) -> AllocationRow {
        AllocationRow {
            recipient: [seed; 32],
            amount: seed as u64 * 100,
            nonce,
        }
    }

    #[test]
    fn test_write_and_read_allocations_csv() {
        let rows = vec![
            test_row(1, Some([0xaa; 16])),
            test_row(2, None),
            test_row(3, Some([0xbb; 16])),
        ];

        let temp_file = NamedTempFile::new().unwrap();
        write_allocations_csv(temp_file.path(), &rows).unwrap();
        let read_rows = read_allocations_csv(temp_file.path()).unwrap();

        assert_eq!(rows, read_rows);
    }

    #[test]
    fn test_read_rejects_wrong_headers() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "recipient,value,nonce").unwrap();
        writeln!(temp_file, "{},10,", hex::encode([1u8; 32])).unwrap();
        temp_file.flush().unwrap();

        let result = read_allocations_csv(temp_file.path());

        let message = result.unwrap_err().to_string();
        assert!(
            message.contains("header 2 should be 'amount'"),
            "unexpected error: {}",
            message
        );
    }

    #[test]
    fn test_read_rejects_empty_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "recipient,amount,nonce").unwrap();
        temp_file.flush().unwrap();

        let result = read_allocations_csv(temp_file.path());

        assert!(matches!(
            result,
            Err(ManifestError::SchemaValidation(ref message)) if message.contains("empty")
        ));
    }

    #[test]
    fn test_read_reports_bad_hex_with_row_number() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "recipient,amount,nonce").unwrap();
        writeln!(temp_file, "{},10,", hex::encode([1u8; 32])).unwrap();
        writeln!(temp_file, "{},20,", hex::encode([2u8; 31])).unwrap();
        temp_file.flush().unwrap();

        let result = read_allocations_csv(temp_file.path());

        let message = result.unwrap_err().to_string();
        assert!(message.contains("row 2"), "unexpected error: {}", message);
        assert!(
            message.contains("Expected 32 bytes, got 31"),
            "unexpected error: {}",
            message
        );
    }

    #[test]
    fn test_duplicate_recipient_nonce_pair_rejected() {
        let rows = vec![
            test_row(1, Some([0x33; 16])),
            test_row(2, Some([0x44; 16])),
            test_row(1, Some([0x33; 16])),
        ];

        let result = validate_allocation_rows(&rows);

        match result {
            Err(ManifestError::DuplicateAllocation {
                recipient,
                nonce,
                first_row,
                duplicate_row,
            }) => {
                assert_eq!(recipient, hex::encode([1u8; 32]));
                assert_eq!(nonce, hex::encode([0x33; 16]));
                assert_eq!(first_row, 1);
                assert_eq!(duplicate_row, 3);
            }
            other => panic!("expected DuplicateAllocation, got {:?}", other),
        }
    }

    #[test]
    fn test_same_recipient_with_distinct_nonces_allowed() {
        let rows = vec![test_row(1, Some([0x01; 16])), test_row(1, Some([0x02; 16]))];

        validate_allocation_rows(&rows).unwrap();
    }

    #[test]
    fn test_repeated_recipient_without_nonce_allowed() {
        // Assembly fills fresh nonces, so these rows cannot collide.
        let rows = vec![test_row(1, None), test_row(1, None)];

        validate_allocation_rows(&rows).unwrap();
    }

    #[test]
    fn test_zero_amount_rejected() {
        let rows = vec![AllocationRow {
            recipient: [9u8; 32],
            amount: 0,
            nonce: None,
        }];

        let result = validate_allocation_rows(&rows);

        assert!(matches!(
            result,
            Err(ManifestError::SchemaValidation(ref message)) if message.contains("zero amount")
        ));
    }
}
