//! In-memory leaderboard and coin wallet
//!
//! Stands in for the remote data store: keeps the top 10 runs, a running coin
//! balance and the equipped skin.

use serde::{Deserialize, Serialize};

use crate::collaborator::{Collaborator, Cosmetic};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u64,
    pub coins: u32,
}

/// High score table plus wallet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Sorted descending by score
    pub entries: Vec<LeaderboardEntry>,
    /// Coins collected over all runs
    pub wallet: u64,
    pub equipped: Cosmetic,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cosmetic(equipped: Cosmetic) -> Self {
        Self {
            equipped,
            ..Self::default()
        }
    }

    /// Whether a finished run earns a place in the table
    pub fn qualifies(&self, score: u64) -> bool {
        self.potential_rank(score).is_some()
    }

    /// Place a run would take, 1-based
    ///
    /// Zero scores never rank. Ties go below the existing entry, so a full
    /// table is only entered by strictly beating its last run.
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let index = self.entries.partition_point(|e| e.score >= score);
        (index < MAX_HIGH_SCORES).then_some(index + 1)
    }

    /// Insert a run at its rank, dropping whatever falls off the bottom
    pub fn add_score(&mut self, score: u64, coins: u32) -> Option<usize> {
        let rank = self.potential_rank(score)?;
        self.entries
            .insert(rank - 1, LeaderboardEntry { score, coins });
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn fetch_currency(&self) -> u64 {
        self.wallet
    }

    /// Add coins to the wallet, returns the new balance
    pub fn increment_currency(&mut self, coins: u32) -> u64 {
        self.wallet = self.wallet.saturating_add(coins as u64);
        self.wallet
    }

    pub fn equip(&mut self, cosmetic: Cosmetic) {
        self.equipped = cosmetic;
    }
}

impl Collaborator for Leaderboard {
    fn report_game_over(&mut self, final_score: u64, coins_collected: u32) {
        let balance = self.increment_currency(coins_collected);
        match self.add_score(final_score, coins_collected) {
            Some(rank) => log::info!(
                "New high score #{}: {} ({} coins, wallet {})",
                rank,
                final_score,
                coins_collected,
                balance
            ),
            None => log::info!(
                "Run finished: {} ({} coins, wallet {})",
                final_score,
                coins_collected,
                balance
            ),
        }
    }

    fn equipped_cosmetic(&self) -> Cosmetic {
        self.equipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_score_never_qualifies() {
        let board = Leaderboard::new();
        assert!(!board.qualifies(0));
        assert_eq!(board.potential_rank(0), None);
    }

    #[test]
    fn test_scores_sorted_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add_score(500, 1), Some(1));
        assert_eq!(board.add_score(900, 2), Some(1));
        assert_eq!(board.add_score(700, 0), Some(2));
        let scores: Vec<u64> = board.entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 700, 500]);
        assert_eq!(board.top_score(), Some(900));
    }

    #[test]
    fn test_table_is_capped() {
        let mut board = Leaderboard::new();
        for score in 1..=MAX_HIGH_SCORES as u64 {
            board.add_score(score * 100, 0);
        }
        assert!(!board.qualifies(50));
        assert_eq!(board.add_score(50, 0), None);
        assert_eq!(board.add_score(150, 0), Some(10));
        assert_eq!(board.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries.last().unwrap().score, 150);
    }

    #[test]
    fn test_report_fills_wallet_even_without_rank() {
        let mut board = Leaderboard::with_cosmetic(Cosmetic::Red);
        board.report_game_over(0, 4);
        board.report_game_over(1200, 6);
        assert_eq!(board.fetch_currency(), 10);
        assert_eq!(board.entries.len(), 1);
        assert_eq!(board.equipped_cosmetic(), Cosmetic::Red);
    }

    #[test]
    fn test_ties_rank_below_existing_runs() {
        let mut board = Leaderboard::new();
        board.add_score(900, 1);
        assert_eq!(board.add_score(900, 5), Some(2));
        assert_eq!(board.entries[0].coins, 1);

        for _ in 2..MAX_HIGH_SCORES {
            board.add_score(100, 0);
        }
        assert!(!board.qualifies(100));
        assert_eq!(board.potential_rank(101), Some(3));
    }
}
