//! In-process record arena with secondary indexes.
//!
//! Shared by the memory and file backends. Callers hold the surrounding lock
//! for the whole check-then-insert sequence so the primary map and the indexes
//! are always updated together.

use std::collections::{HashMap, HashSet};

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::UrlRecord;
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct UrlIndex {
    records: HashMap<Uuid, UrlRecord>,
    by_hash: HashMap<String, Uuid>,
    by_url: HashMap<String, Uuid>,
    by_user: HashMap<Uuid, HashSet<Uuid>>,
}

impl UrlIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds an index from previously persisted records.
    ///
    /// # Errors
    ///
    /// Fails if the records violate uniqueness of id, hash or original URL.
    pub fn from_records(records: Vec<UrlRecord>) -> Result<Self, AppError> {
        let mut index = Self::new();
        for record in records {
            index.check(&record)?;
            index.insert(record);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Verifies that `record` can be inserted without breaking uniqueness.
    pub fn check(&self, record: &UrlRecord) -> Result<(), AppError> {
        if self.records.contains_key(&record.id) {
            return Err(AppError::internal(
                "Record id collision",
                json!({ "id": record.id }),
            ));
        }
        if self.by_hash.contains_key(&record.hash) {
            return Err(AppError::internal(
                "Hash collision",
                json!({ "hash": record.hash }),
            ));
        }
        if self.by_url.contains_key(&record.original_url) {
            return Err(AppError::duplicate(&record.original_url));
        }
        Ok(())
    }

    /// Verifies a whole batch against the index and against itself.
    pub fn check_batch(&self, records: &[UrlRecord]) -> Result<(), AppError> {
        let mut ids = HashSet::with_capacity(records.len());
        let mut hashes = HashSet::with_capacity(records.len());
        let mut urls = HashSet::with_capacity(records.len());

        for record in records {
            self.check(record)?;

            if !ids.insert(record.id) {
                return Err(AppError::internal(
                    "Record id collision",
                    json!({ "id": record.id }),
                ));
            }
            if !hashes.insert(record.hash.as_str()) {
                return Err(AppError::internal(
                    "Hash collision",
                    json!({ "hash": record.hash }),
                ));
            }
            if !urls.insert(record.original_url.as_str()) {
                return Err(AppError::duplicate(&record.original_url));
            }
        }

        Ok(())
    }

    /// Inserts a record that already passed [`Self::check`].
    pub fn insert(&mut self, record: UrlRecord) {
        self.by_hash.insert(record.hash.clone(), record.id);
        self.by_url.insert(record.original_url.clone(), record.id);
        if let Some(user_id) = record.user_id {
            self.by_user.entry(user_id).or_default().insert(record.id);
        }
        self.records.insert(record.id, record);
    }

    pub fn try_insert(&mut self, record: UrlRecord) -> Result<(), AppError> {
        self.check(&record)?;
        self.insert(record);
        Ok(())
    }

    pub fn try_insert_batch(&mut self, records: &[UrlRecord]) -> Result<(), AppError> {
        self.check_batch(records)?;
        for record in records {
            self.insert(record.clone());
        }
        Ok(())
    }

    pub fn get_by_hash(&self, hash: &str) -> Option<&UrlRecord> {
        self.by_hash.get(hash).and_then(|id| self.records.get(id))
    }

    pub fn get_by_original_url(&self, original_url: &str) -> Option<&UrlRecord> {
        self.by_url
            .get(original_url)
            .and_then(|id| self.records.get(id))
    }

    pub fn all_by_user(&self, user_id: Uuid) -> Vec<UrlRecord> {
        self.by_user
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.records.get(id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All records ordered by id, i.e. by creation time.
    pub fn snapshot(&self) -> Vec<UrlRecord> {
        let mut records: Vec<UrlRecord> = self.records.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, hash: &str, user_id: Option<Uuid>) -> UrlRecord {
        UrlRecord::new(url, hash, None, user_id).unwrap()
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut index = UrlIndex::new();
        let r = record("https://a.com", "aaaa1111", None);

        index.try_insert(r.clone()).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get_by_hash("aaaa1111"), Some(&r));
        assert_eq!(index.get_by_original_url("https://a.com"), Some(&r));
        assert!(index.get_by_hash("missing1").is_none());
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let mut index = UrlIndex::new();
        index
            .try_insert(record("https://a.com", "aaaa1111", None))
            .unwrap();

        let err = index
            .try_insert(record("https://a.com", "bbbb2222", None))
            .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_duplicate_hash_is_internal() {
        let mut index = UrlIndex::new();
        index
            .try_insert(record("https://a.com", "same1234", None))
            .unwrap();

        let err = index
            .try_insert(record("https://b.com", "same1234", None))
            .unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
        assert!(index.get_by_original_url("https://b.com").is_none());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut index = UrlIndex::new();
        index
            .try_insert(record("https://existing.com", "exist123", None))
            .unwrap();

        let batch = vec![
            record("https://new1.com", "new11111", None),
            record("https://existing.com", "new22222", None),
        ];

        assert!(index.try_insert_batch(&batch).is_err());
        assert_eq!(index.len(), 1);
        assert!(index.get_by_hash("new11111").is_none());
    }

    #[test]
    fn test_batch_detects_internal_repeats() {
        let index = UrlIndex::new();
        let batch = vec![
            record("https://a.com", "aaaa1111", None),
            record("https://b.com", "aaaa1111", None),
        ];

        assert!(matches!(
            index.check_batch(&batch),
            Err(AppError::Internal { .. })
        ));
    }

    #[test]
    fn test_all_by_user() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut index = UrlIndex::new();

        index
            .try_insert(record("https://a.com", "aaaa1111", Some(alice)))
            .unwrap();
        index
            .try_insert(record("https://b.com", "bbbb2222", Some(bob)))
            .unwrap();
        index
            .try_insert(record("https://c.com", "cccc3333", Some(alice)))
            .unwrap();
        index
            .try_insert(record("https://d.com", "dddd4444", None))
            .unwrap();

        let mut hashes: Vec<String> = index.all_by_user(alice).into_iter().map(|r| r.hash).collect();
        hashes.sort();

        assert_eq!(hashes, vec!["aaaa1111", "cccc3333"]);
        assert!(index.all_by_user(Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_snapshot_is_creation_ordered() {
        let mut index = UrlIndex::new();
        for i in 0..20 {
            index
                .try_insert(record(
                    &format!("https://site{i}.com"),
                    &format!("hash{i:04}"),
                    None,
                ))
                .unwrap();
        }

        let snapshot = index.snapshot();
        assert_eq!(snapshot.len(), 20);
        assert!(snapshot.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(snapshot[0].hash, "hash0000");
    }

    #[test]
    fn test_from_records_rejects_conflicts() {
        let a = record("https://a.com", "aaaa1111", None);
        let b = record("https://a.com", "bbbb2222", None);

        assert!(UrlIndex::from_records(vec![a, b]).is_err());
    }
}
