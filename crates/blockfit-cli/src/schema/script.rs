use blockfit_engine::{Board, PieceId, PieceSeed, RoundConfig, TerminationReason};
use serde::{Deserialize, Serialize};

/// Scripted round for non-interactive replays.
///
/// ```json
/// {
///   "seed": "0123456789abcdef0123456789abcdef",
///   "config": { "batch_size": 3 },
///   "board": ["....######"],
///   "steps": [
///     { "action": "unlock" },
///     { "action": "place", "piece_id": 0, "row": 0, "col": 0 },
///     { "action": "terminate", "reason": "time-up" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    pub seed: PieceSeed,
    #[serde(default)]
    pub config: RoundConfig,
    /// Initial board as ASCII rows (`#` occupied, `.` empty). Missing rows
    /// at the bottom are empty.
    #[serde(default)]
    pub board: Vec<String>,
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScriptStep {
    Unlock,
    Place {
        piece_id: PieceId,
        row: usize,
        col: usize,
    },
    Terminate {
        reason: TerminationReason,
    },
}

impl ReplayScript {
    pub fn initial_board(&self) -> Result<Board, blockfit_engine::ParseBoardError> {
        self.board.join("\n").parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r##"{
        "seed": "0123456789abcdef0123456789abcdef",
        "config": { "auto_deal": false },
        "board": ["....######", "..........", "#........."],
        "steps": [
            { "action": "unlock" },
            { "action": "place", "piece_id": 2, "row": 0, "col": 0 },
            { "action": "terminate", "reason": "error-limit" }
        ]
    }"##;

    #[test]
    fn test_parse_script() {
        let script: ReplayScript = serde_json::from_str(SCRIPT).unwrap();
        assert_eq!(script.config.batch_size, 3);
        assert!(!script.config.auto_deal);
        assert_eq!(
            script.steps,
            vec![
                ScriptStep::Unlock,
                ScriptStep::Place {
                    piece_id: PieceId::new(2),
                    row: 0,
                    col: 0
                },
                ScriptStep::Terminate {
                    reason: TerminationReason::ErrorLimit
                },
            ]
        );

        let board = script.initial_board().unwrap();
        assert_eq!(board.occupied_count(), 7);
        assert!(board.is_occupied(0, 4));
        assert!(board.is_occupied(2, 0));
        assert!(!board.is_occupied(1, 0));
    }

    #[test]
    fn test_minimal_script() {
        let script: ReplayScript = serde_json::from_str(
            r#"{ "seed": "00000000000000000000000000000000", "steps": [] }"#,
        )
        .unwrap();
        assert_eq!(script.config, RoundConfig::default());
        assert!(script.initial_board().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_board_row() {
        let mut script: ReplayScript = serde_json::from_str(SCRIPT).unwrap();
        script.board = vec!["....".to_owned()];
        assert!(script.initial_board().is_err());
    }

    #[test]
    fn test_unknown_action() {
        let result = serde_json::from_str::<ScriptStep>(r#"{ "action": "rotate" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_reason() {
        let result =
            serde_json::from_str::<ScriptStep>(r#"{ "action": "terminate", "reason": "bored" }"#);
        assert!(result.is_err());
    }
}
