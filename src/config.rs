//! Runtime configuration: server bind address and tournament scoring policy.

use serde::{Deserialize, Serialize};
use std::env;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Where the web binary listens. Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| default_host());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        Self { host, port }
    }
}

/// Match-point scoring and tiebreaker floor.
///
/// Each tournament keeps its own copy, taken at creation, so a later change to the
/// server defaults never rewrites the standings of a running event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub win_points: u32,
    pub draw_points: u32,
    /// Points credited for a bye. A bye always counts as a match won.
    pub bye_points: u32,
    /// Lower bound for GWP, MWP and OMW%.
    pub tiebreak_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            win_points: 3,
            draw_points: 1,
            bye_points: 3,
            tiebreak_floor: 1.0 / 3.0,
        }
    }
}

impl ScoringConfig {
    /// Defaults, overridden by BYE_POINTS and TIEBREAK_FLOOR when they parse to sane values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = env::var("BYE_POINTS") {
            match raw.parse::<u32>() {
                Ok(points) if points <= config.win_points => config.bye_points = points,
                _ => log::warn!("Ignoring BYE_POINTS={raw:?}; using {}", config.bye_points),
            }
        }
        if let Ok(raw) = env::var("TIEBREAK_FLOOR") {
            match raw.parse::<f64>() {
                Ok(floor) if (0.0..=1.0).contains(&floor) => config.tiebreak_floor = floor,
                _ => log::warn!(
                    "Ignoring TIEBREAK_FLOOR={raw:?}; using {:.4}",
                    config.tiebreak_floor
                ),
            }
        }
        config
    }

    /// Points a participant could have earned from `matches_played` matches.
    pub fn points_available(&self, matches_played: u32) -> u32 {
        self.win_points * matches_played
    }

    /// Clamp a ratio into `[tiebreak_floor, 1.0]`.
    pub fn floored(&self, ratio: f64) -> f64 {
        ratio.max(self.tiebreak_floor).min(1.0)
    }
}
