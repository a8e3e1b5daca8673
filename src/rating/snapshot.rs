//! Display ordering of the ladder
//!
//! A snapshot is derived from the stored players on demand and never
//! persisted. Ranked players are ordered by points, highest first, with ties
//! kept in store order. Guests are listed separately by name.

use crate::types::PlayerRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

/// Position label shown next to a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "position", rename_all = "lowercase")]
pub enum RankLabel {
    /// 1-based position on the ladder
    Position(usize),
    /// 1-based position among guests, shown as `G1`, `G2`, ...
    Guest(usize),
}

impl fmt::Display for RankLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankLabel::Position(n) => write!(f, "{}", n),
            RankLabel::Guest(n) => write!(f, "G{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub label: RankLabel,
    pub player: PlayerRecord,
}

/// Read-only view of the ladder for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub ranked: Vec<SnapshotEntry>,
    pub guests: Vec<SnapshotEntry>,
}

impl RankingSnapshot {
    /// Build a snapshot from players in store order
    pub fn from_players(players: Vec<PlayerRecord>) -> Self {
        let (mut ranked, mut guests): (Vec<_>, Vec<_>) =
            players.into_iter().partition(|p| !p.guest);

        // sort_by_key is stable, which is what breaks ties
        ranked.sort_by_key(|p| Reverse(p.ranking_points));
        guests.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            ranked: ranked
                .into_iter()
                .enumerate()
                .map(|(i, player)| SnapshotEntry {
                    label: RankLabel::Position(i + 1),
                    player,
                })
                .collect(),
            guests: guests
                .into_iter()
                .enumerate()
                .map(|(i, player)| SnapshotEntry {
                    label: RankLabel::Guest(i + 1),
                    player,
                })
                .collect(),
        }
    }

    /// Ranked entries followed by guests, the order they are displayed in
    pub fn entries(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.ranked.iter().chain(self.guests.iter())
    }

    pub fn len(&self) -> usize {
        self.ranked.len() + self.guests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current leader of the ranked ladder, if any
    pub fn leader(&self) -> Option<&PlayerRecord> {
        self.ranked.first().map(|entry| &entry.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, points: i64) -> PlayerRecord {
        PlayerRecord::new(name, points)
    }

    fn guest(name: &str, points: i64) -> PlayerRecord {
        PlayerRecord::new_guest(name, points)
    }

    fn names(entries: &[SnapshotEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.player.name.as_str()).collect()
    }

    #[test]
    fn test_stable_tie_and_guest_label() {
        let snapshot = RankingSnapshot::from_players(vec![
            player("P1", 1200),
            player("P2", 1200),
            guest("G1", 1000),
        ]);

        assert_eq!(names(&snapshot.ranked), vec!["P1", "P2"]);
        assert_eq!(names(&snapshot.guests), vec!["G1"]);
        assert_eq!(snapshot.guests[0].label.to_string(), "G1");
        assert_eq!(snapshot.ranked[0].label, RankLabel::Position(1));
        assert_eq!(snapshot.ranked[1].label, RankLabel::Position(2));
    }

    #[test]
    fn test_tie_order_follows_store_order() {
        let snapshot = RankingSnapshot::from_players(vec![
            player("Zed", 1000),
            player("Amy", 1100),
            player("Bob", 1000),
        ]);

        assert_eq!(names(&snapshot.ranked), vec!["Amy", "Zed", "Bob"]);
    }

    #[test]
    fn test_guests_sorted_by_name_not_points() {
        let snapshot = RankingSnapshot::from_players(vec![
            guest("Yuna", 1300),
            player("Kim", 900),
            guest("Ahn", 800),
            guest("Min", 1000),
        ]);

        assert_eq!(names(&snapshot.ranked), vec!["Kim"]);
        assert_eq!(names(&snapshot.guests), vec!["Ahn", "Min", "Yuna"]);
        let labels: Vec<String> = snapshot.guests.iter().map(|e| e.label.to_string()).collect();
        assert_eq!(labels, vec!["G1", "G2", "G3"]);
    }

    #[test]
    fn test_negative_points_sort_last() {
        let snapshot = RankingSnapshot::from_players(vec![
            player("Low", -20),
            player("High", 1000),
            player("Zero", 0),
        ]);

        assert_eq!(names(&snapshot.ranked), vec!["High", "Zero", "Low"]);
        assert_eq!(snapshot.leader().unwrap().name, "High");
    }

    #[test]
    fn test_entries_and_empty() {
        let empty = RankingSnapshot::from_players(vec![]);
        assert!(empty.is_empty());
        assert!(empty.leader().is_none());

        let snapshot = RankingSnapshot::from_players(vec![guest("G", 1000), player("P", 1000)]);
        assert_eq!(snapshot.len(), 2);
        let order: Vec<String> = snapshot.entries().map(|e| e.label.to_string()).collect();
        assert_eq!(order, vec!["1", "G1"]);
    }
}
