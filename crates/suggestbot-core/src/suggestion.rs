//! Suggestion metadata and time-bounded retention.
//!
//! Every forwarded suggestion leaves a [`SuggestionRecord`] behind so that a
//! moderator can later reply to it by id. Records are kept for one week and
//! expired lazily whenever a direct message is processed.

use serde::{Deserialize, Serialize};

use crate::id::{ChannelId, MessageId};

/// How long a suggestion can be replied to, in milliseconds (7 days).
pub const RETENTION_MILLIS: i64 = 604_800_000;

/// Links a forwarded suggestion back to the DM channel it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    #[serde(rename = "timestamp")]
    pub submitted_at_millis: i64,
    #[serde(rename = "suggestionMessageId")]
    pub suggestion_message_id: MessageId,
    #[serde(rename = "userChannelId")]
    pub origin_channel_id: ChannelId,
}

/// Suggestion records ordered by submission time, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SuggestionQueue {
    records: Vec<SuggestionRecord>,
}

impl SuggestionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, keeping ascending timestamp order.
    pub fn record(
        &mut self,
        submitted_at_millis: i64,
        suggestion_message_id: MessageId,
        origin_channel_id: ChannelId,
    ) {
        self.insert(SuggestionRecord {
            submitted_at_millis,
            suggestion_message_id,
            origin_channel_id,
        });
    }

    fn insert(&mut self, record: SuggestionRecord) {
        let at = self
            .records
            .partition_point(|r| r.submitted_at_millis <= record.submitted_at_millis);
        self.records.insert(at, record);
    }

    /// First record with the given suggestion message id.
    pub fn find_by_id(&self, id: &str) -> Option<&SuggestionRecord> {
        self.records
            .iter()
            .find(|r| r.suggestion_message_id.as_str() == id)
    }

    /// Drop every record older than [`RETENTION_MILLIS`] relative to `now_millis`.
    ///
    /// Returns the number of records removed.
    pub fn expire(&mut self, now_millis: i64) -> usize {
        let expired = self
            .records
            .partition_point(|r| now_millis.saturating_sub(r.submitted_at_millis) > RETENTION_MILLIS);
        self.records.drain(..expired).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending timestamp order.
    pub fn iter(&self) -> impl Iterator<Item = &SuggestionRecord> {
        self.records.iter()
    }
}

impl FromIterator<SuggestionRecord> for SuggestionQueue {
    fn from_iter<I: IntoIterator<Item = SuggestionRecord>>(iter: I) -> Self {
        let mut queue = Self::new();
        for record in iter {
            queue.insert(record);
        }
        queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn queue_with(timestamps: &[i64]) -> SuggestionQueue {
        let mut queue = SuggestionQueue::new();
        for (i, ts) in timestamps.iter().enumerate() {
            queue.record(*ts, MessageId::new(format!("m{i}")), ChannelId::from("dm"));
        }
        queue
    }

    #[test]
    fn test_records_sorted_by_timestamp() {
        let queue = queue_with(&[30, 10, 20, 10]);
        let order: Vec<i64> = queue.iter().map(|r| r.submitted_at_millis).collect();
        assert_eq!(order, vec![10, 10, 20, 30]);
    }

    #[test]
    fn test_find_by_id() {
        let queue = queue_with(&[5, 6]);
        let found = queue.find_by_id("m1").unwrap();
        assert_eq!(found.submitted_at_millis, 6);
        assert!(queue.find_by_id("missing").is_none());
    }

    #[test]
    fn test_find_by_id_first_match() {
        let mut queue = SuggestionQueue::new();
        queue.record(1, MessageId::from("dup"), ChannelId::from("first"));
        queue.record(2, MessageId::from("dup"), ChannelId::from("second"));
        assert_eq!(queue.find_by_id("dup").unwrap().origin_channel_id.as_str(), "first");
    }

    #[test]
    fn test_expiry_boundary() {
        let t = 1_000_000;
        let mut queue = queue_with(&[t]);

        assert_eq!(queue.expire(t + RETENTION_MILLIS - 1), 0);
        assert!(queue.find_by_id("m0").is_some());

        // Exactly seven days old is still kept.
        assert_eq!(queue.expire(t + RETENTION_MILLIS), 0);
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.expire(t + RETENTION_MILLIS + 1), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_expire_only_old_prefix() {
        let day = 86_400_000;
        let mut queue = queue_with(&[0, day, 8 * day, 9 * day]);
        // Ages are 9, 8, 1 and 0 days; the two past a week go.
        assert_eq!(queue.expire(9 * day), 2);
        let remaining: Vec<i64> = queue.iter().map(|r| r.submitted_at_millis).collect();
        assert_eq!(remaining, vec![8 * day, 9 * day]);
    }

    #[test]
    fn test_from_iter_sorts() {
        let queue: SuggestionQueue = [3, 1, 2]
            .into_iter()
            .map(|ts| SuggestionRecord {
                submitted_at_millis: ts,
                suggestion_message_id: MessageId::new(ts.to_string()),
                origin_channel_id: ChannelId::from("dm"),
            })
            .collect();
        let order: Vec<&str> = queue.iter().map(|r| r.suggestion_message_id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_serde_field_names() {
        let record = SuggestionRecord {
            submitted_at_millis: 7,
            suggestion_message_id: MessageId::from("m"),
            origin_channel_id: ChannelId::from("c"),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"timestamp": 7, "suggestionMessageId": "m", "userChannelId": "c"})
        );
    }
}
