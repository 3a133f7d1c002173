//! HUD snapshot
//!
//! Plain values the presentation layer draws. Nothing here feeds back into the
//! simulation.

use serde::Serialize;

use crate::sim::{Phase, Session, streak_multiplier};

/// Display names for the speed stages
pub const STAGE_LABELS: [&str; 3] = ["Cruising", "Picking up speed", "Full throttle"];

pub const PRIZE_UNLOCKED_LABEL: &str = "Prize unlocked";

/// End-of-session numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub final_score: u64,
    pub best_streak: u32,
    pub catches: u32,
    pub hazards_hit: u32,
    pub misses: u32,
}

/// What full-screen overlay, if any, is showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Overlay {
    Start,
    Prize { score: u64 },
    GameOver(Summary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub countdown: u32,
    /// `m:ss`
    pub countdown_label: String,
    /// Shown only while a streak multiplier is active
    pub multiplier_badge: Option<String>,
    pub stage_label: &'static str,
    pub prize_label: String,
    pub overlay: Option<Overlay>,
}

impl Hud {
    pub fn from_session(session: &Session) -> Self {
        let multiplier = streak_multiplier(session.streak, &session.tuning);
        let multiplier_badge = (multiplier > 1.0).then(|| format!("x{multiplier}"));

        let prize_label = if session.prize_achieved {
            PRIZE_UNLOCKED_LABEL.to_string()
        } else {
            format!("{} / {}", session.score, session.tuning.prize_threshold)
        };

        let overlay = match session.phase {
            Phase::Idle => Some(Overlay::Start),
            Phase::Playing => None,
            Phase::Paused => Some(Overlay::Prize {
                score: session.score,
            }),
            Phase::Ended => Some(Overlay::GameOver(summary(session))),
        };

        Self {
            score: session.score,
            countdown: session.time_remaining,
            countdown_label: format!(
                "{}:{:02}",
                session.time_remaining / 60,
                session.time_remaining % 60
            ),
            multiplier_badge,
            stage_label: STAGE_LABELS[session.stage.min(STAGE_LABELS.len() - 1)],
            prize_label,
            overlay,
        }
    }
}

pub fn summary(session: &Session) -> Summary {
    Summary {
        final_score: session.score,
        best_streak: session.stats.best_streak,
        catches: session.stats.catches,
        hazards_hit: session.stats.hazards_hit,
        misses: session.stats.misses,
    }
}
