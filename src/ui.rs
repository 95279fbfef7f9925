//! Overlay and HUD text
//!
//! The browser glue applies these to the DOM; keeping the decisions here
//! means the text for every phase is testable without a page.

use crate::sim::GamePhase;

/// What the modal overlay shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub visible: bool,
    pub title: &'static str,
    /// `None` hides the score line
    pub score_line: Option<String>,
    pub button_label: &'static str,
}

impl Overlay {
    pub fn for_phase(phase: GamePhase, score: u64) -> Self {
        match phase {
            GamePhase::Idle => Self {
                visible: true,
                title: "ORB SHOOTER",
                score_line: None,
                button_label: "Start Game",
            },
            GamePhase::Running => Self {
                visible: false,
                title: "",
                score_line: None,
                button_label: "",
            },
            GamePhase::Stopped => Self {
                visible: true,
                title: "GAME OVER",
                score_line: Some(final_score_text(score)),
                button_label: "Restart Game",
            },
        }
    }
}

pub fn final_score_text(score: u64) -> String {
    format!("Final Score: {score}")
}

/// HUD score element text
pub fn hud_score_text(score: u64) -> String {
    score.to_string()
}
