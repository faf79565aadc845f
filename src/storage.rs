use std::path::PathBuf;

use thiserror::Error;

pub mod connector;
pub mod json;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize records to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A record that can be distinguished within its collection by a single
/// string-valued identity field (project id, username).
pub trait Record {
    fn identity(&self) -> &str;
}

/// Linear scan for the first record with the given identity. Duplicate
/// identities are tolerated; later occurrences are shadowed, not reported.
pub fn find_by_identity<'a, T: Record>(records: &'a [T], identity: &str) -> Option<&'a T> {
    records.iter().find(|r| r.identity() == identity)
}

/// Replace the first record sharing the new record's identity, or append.
/// The caller persists the collection afterwards; nothing is saved here.
pub fn upsert<T: Record>(records: &mut Vec<T>, record: T) {
    match records
        .iter_mut()
        .find(|r| r.identity() == record.identity())
    {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Entry {
        id: String,
        value: u32,
    }

    impl Record for Entry {
        fn identity(&self) -> &str {
            &self.id
        }
    }

    fn entry(id: &str, value: u32) -> Entry {
        Entry {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn test_find_by_identity_returns_first_match() {
        // Duplicates are possible because nothing enforces uniqueness here;
        // the lookup contract is simply "first occurrence wins".
        let records = vec![entry("PRJ001", 1), entry("PRJ001", 2), entry("PRJ002", 3)];
        assert_eq!(find_by_identity(&records, "PRJ001").unwrap().value, 1);
        assert_eq!(find_by_identity(&records, "PRJ002").unwrap().value, 3);
        assert!(find_by_identity(&records, "PRJ999").is_none());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut records = vec![entry("PRJ001", 1), entry("PRJ002", 2)];
        upsert(&mut records, entry("PRJ002", 20));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].value, 20);
    }

    #[test]
    fn test_upsert_appends_when_absent() {
        let mut records = vec![entry("PRJ001", 1)];
        upsert(&mut records, entry("PRJ003", 3));
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "PRJ003");
    }
}
