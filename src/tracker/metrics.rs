use serde::Serialize;

use super::{Alignment, GameLog};

const RECENT_GAMES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRateItem {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentGameWinner {
    pub name: String, // MM-DD
    pub winner: Alignment,
    pub value: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub has_logs: bool,
    pub total_games: usize,
    pub good_wins: usize,
    pub evil_wins: usize,
    pub win_rate: Vec<WinRateItem>,
    pub recent_winners: Vec<RecentGameWinner>,
}

impl DashboardMetrics {
    /// `logs` is expected newest first, as returned by `load_game_logs`.
    /// Recent winners come back oldest first so a chart reads left to right.
    pub fn from_logs(logs: &[GameLog]) -> Self {
        let good_wins = logs.iter().filter(|log| log.winner == Alignment::Good).count();
        let evil_wins = logs.len() - good_wins;

        let recent_winners = logs
            .iter()
            .take(RECENT_GAMES)
            .map(|log| RecentGameWinner {
                name: log.date.get(5..).unwrap_or_default().to_string(),
                winner: log.winner,
                value: 1,
            })
            .rev()
            .collect();

        Self {
            has_logs: !logs.is_empty(),
            total_games: logs.len(),
            good_wins,
            evil_wins,
            win_rate: vec![
                WinRateItem {
                    name: "Good".to_string(),
                    value: good_wins,
                },
                WinRateItem {
                    name: "Evil".to_string(),
                    value: evil_wins,
                },
            ],
            recent_winners,
        }
    }

    /// Share of games won by good, as a whole percentage.
    pub fn good_win_percent(&self) -> Option<u32> {
        if self.total_games == 0 {
            return None;
        }
        Some(((self.good_wins as f64 / self.total_games as f64) * 100.0).round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::GameEdition;

    fn log(id: &str, date: &str, winner: Alignment) -> GameLog {
        GameLog {
            id: id.to_string(),
            date: date.to_string(),
            winner,
            edition: GameEdition {
                id: "tb".to_string(),
                name: "Trouble Brewing".to_string(),
                author: None,
                is_official: None,
            },
            players: Vec::new(),
            bluffs: Vec::new(),
        }
    }

    #[test]
    fn test_empty_logs() {
        let metrics = DashboardMetrics::from_logs(&[]);
        assert!(!metrics.has_logs);
        assert_eq!(metrics.total_games, 0);
        assert!(metrics.recent_winners.is_empty());
        assert_eq!(metrics.good_win_percent(), None);
    }

    #[test]
    fn test_counts_and_recent_order() {
        let logs = vec![
            log("20240103_good.json", "2024-01-03", Alignment::Good),
            log("20240102_evil.json", "2024-01-02", Alignment::Evil),
            log("20240101_good.json", "2024-01-01", Alignment::Good),
        ];
        let metrics = DashboardMetrics::from_logs(&logs);

        assert_eq!((metrics.good_wins, metrics.evil_wins), (2, 1));
        assert_eq!(metrics.win_rate[0].value, 2);
        assert_eq!(metrics.win_rate[1].name, "Evil");
        let names: Vec<_> = metrics.recent_winners.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["01-01", "01-02", "01-03"]);
        assert_eq!(metrics.good_win_percent(), Some(67));
    }

    #[test]
    fn test_recent_winners_capped() {
        let logs: Vec<GameLog> = (1..=12)
            .rev()
            .map(|day| {
                let date = format!("2024-02-{day:02}");
                log(&date.replace('-', ""), &date, Alignment::Evil)
            })
            .collect();
        let metrics = DashboardMetrics::from_logs(&logs);

        assert_eq!(metrics.recent_winners.len(), 10);
        assert_eq!(metrics.recent_winners[0].name, "02-03");
        assert_eq!(metrics.recent_winners[9].name, "02-12");
    }
}
