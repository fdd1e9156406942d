//! High score leaderboard
//!
//! Ranked, bounded list of (name, score) records. The ledger itself is pure
//! data; durable storage hands it an opaque blob (JSON) at session
//! construction and receives one back after every qualifying death.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player-supplied name, never empty
    pub name: String,
    /// Score achieved
    pub score: u32,
}

/// High score leaderboard, sorted descending by score. Ties keep insertion
/// order. Starts empty; no placeholder entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Deserialize a persisted blob. A missing or corrupt blob is not an
    /// error; it yields an empty ledger.
    pub fn load(blob: Option<&str>) -> Self {
        match blob {
            Some(json) => match serde_json::from_str::<HighScores>(json) {
                Ok(mut scores) => {
                    scores.entries.truncate(MAX_HIGH_SCORES);
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(err) => {
                    log::warn!("Discarding corrupt high score blob: {err}");
                    Self::new()
                }
            },
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Serialize to the persisted blob form. Lossless inverse of [`load`].
    ///
    /// [`load`]: HighScores::load
    pub fn serialize(&self) -> String {
        // Vec<HighScoreEntry> of strings and ints cannot fail to encode
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Check if a score qualifies for the leaderboard: there is room, or it
    /// strictly beats the lowest-ranked entry. Ties do not displace.
    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a record, re-rank, and trim to the top 3. Returns the rank
    /// achieved (1-indexed). Callers check [`qualifies`] first; a
    /// non-qualifying insert is trimmed straight back out.
    ///
    /// The sort is stable, so equal scores keep their insertion order.
    ///
    /// [`qualifies`]: HighScores::qualifies
    pub fn insert(&mut self, name: String, score: u32) -> usize {
        self.entries.push(HighScoreEntry { name, score });
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);

        // Stable sort keeps the new record last among equal scores
        let rank = self
            .entries
            .iter()
            .rposition(|e| e.score == score)
            .unwrap_or(self.entries.len().saturating_sub(1));
        rank + 1
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_then_ranks() {
        let mut scores = HighScores::new();
        assert_eq!(scores.insert("ana".into(), 5), 1);
        assert_eq!(scores.insert("bo".into(), 3), 2);
        assert_eq!(scores.insert("cy".into(), 10), 1);

        let ranked: Vec<_> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ranked, vec![10, 5, 3]);
    }

    #[test]
    fn test_bounded_at_three() {
        let mut scores = HighScores::new();
        for (i, s) in [4, 8, 6, 9].into_iter().enumerate() {
            scores.insert(format!("p{i}"), s);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.top_score(), Some(9));
        // The 4 got evicted
        assert!(scores.entries.iter().all(|e| e.score != 4));
    }

    #[test]
    fn test_tie_does_not_qualify_when_full() {
        let mut scores = HighScores::new();
        for s in [9, 8, 7] {
            scores.insert("x".into(), s);
        }
        assert!(!scores.qualifies(7));
        assert!(scores.qualifies(8)); // strictly above the lowest
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut scores = HighScores::new();
        scores.insert("first".into(), 5);
        scores.insert("second".into(), 5);
        assert_eq!(scores.entries[0].name, "first");
        assert_eq!(scores.entries[1].name, "second");
    }

    #[test]
    fn test_blob_round_trip() {
        let mut scores = HighScores::new();
        scores.insert("ana".into(), 12);
        scores.insert("bo".into(), 7);

        let blob = scores.serialize();
        assert_eq!(HighScores::load(Some(&blob)), scores);
    }

    #[test]
    fn test_missing_and_corrupt_blobs_start_empty() {
        assert!(HighScores::load(None).is_empty());
        assert!(HighScores::load(Some("not json")).is_empty());
        assert!(HighScores::load(Some("{\"entries\":42}")).is_empty());
    }
}
