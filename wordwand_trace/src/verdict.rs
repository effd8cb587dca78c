use serde_derive::{Deserialize, Serialize};

use super::config::TraceConfig;

pub const MSG_EXCELLENT: &str = "Wow! You did it! 🌟";
pub const MSG_GOOD: &str = "Great job! ⭐";
pub const MSG_RETRY: &str = "Try again 😊";
pub const MSG_EMPTY: &str = "Draw something first 😊";

const COLOR_SUCCESS: &str = "#4CAF50";
const COLOR_RETRY: &str = "#ff4444";
const COLOR_EMPTY: &str = "#ff6b6b";
const CELEBRATION_TEXT: &str = "⭐ ⭐ ⭐";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Excellent,
    Good,
    Retry,
}

/// Short-lived overlay shown on success.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Celebration {
    pub text: String,
    pub duration_ms: u32,
}

/// What the page shows after a check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Feedback {
    pub message: String,
    pub color: String,
    pub celebration: Option<Celebration>,
}

/// Result of pressing "check".
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CheckOutcome {
    // Nothing drawn yet
    Empty,
    Scored { score: f32, band: Band },
}

// Lower bounds are inclusive
pub fn classify(score: f32, config: &TraceConfig) -> Band {
    if score >= config.excellent_threshold {
        Band::Excellent
    } else if score >= config.good_threshold {
        Band::Good
    } else {
        Band::Retry
    }
}

impl CheckOutcome {
    pub fn score(&self) -> f32 {
        match *self {
            CheckOutcome::Empty => 0.0,
            CheckOutcome::Scored { score, .. } => score,
        }
    }

    pub fn feedback(&self, config: &TraceConfig) -> Feedback {
        let celebration = Some(Celebration {
            text: CELEBRATION_TEXT.to_string(),
            duration_ms: config.celebration_ms,
        });
        let (message, color, celebration) = match *self {
            CheckOutcome::Empty => (MSG_EMPTY, COLOR_EMPTY, None),
            CheckOutcome::Scored { band: Band::Excellent, .. } => (MSG_EXCELLENT, COLOR_SUCCESS, celebration),
            CheckOutcome::Scored { band: Band::Good, .. } => (MSG_GOOD, COLOR_SUCCESS, celebration),
            CheckOutcome::Scored { band: Band::Retry, .. } => (MSG_RETRY, COLOR_RETRY, None),
        };
        Feedback {
            message: message.to_string(),
            color: color.to_string(),
            celebration: celebration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_bounds() {
        let config = TraceConfig::default();
        assert_eq!(classify(100.0, &config), Band::Excellent);
        assert_eq!(classify(70.0, &config), Band::Excellent);
        assert_eq!(classify(69.99, &config), Band::Good);
        assert_eq!(classify(40.0, &config), Band::Good);
        assert_eq!(classify(39.99, &config), Band::Retry);
        assert_eq!(classify(0.0, &config), Band::Retry);
    }

    #[test]
    fn test_feedback() {
        let config = TraceConfig::default();
        let fb = CheckOutcome::Scored { score: 82.0, band: Band::Excellent }.feedback(&config);
        assert_eq!(fb.message, MSG_EXCELLENT);
        assert_eq!(fb.color, COLOR_SUCCESS);
        assert_eq!(fb.celebration.unwrap().duration_ms, 1500);
        let fb = CheckOutcome::Scored { score: 50.0, band: Band::Good }.feedback(&config);
        assert_eq!(fb.message, MSG_GOOD);
        assert!(fb.celebration.is_some());
        let fb = CheckOutcome::Scored { score: 10.0, band: Band::Retry }.feedback(&config);
        assert_eq!(fb.message, MSG_RETRY);
        assert!(fb.celebration.is_none());
        let fb = CheckOutcome::Empty.feedback(&config);
        assert!(fb.message.starts_with("Draw something first"));
        assert_eq!(fb.color, COLOR_EMPTY);
        assert!(fb.celebration.is_none());
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_string(&CheckOutcome::Scored { score: 75.0, band: Band::Excellent }).unwrap();
        assert_eq!(json, "{\"kind\":\"scored\",\"score\":75.0,\"band\":\"excellent\"}");
        let json = serde_json::to_string(&CheckOutcome::Empty).unwrap();
        assert_eq!(json, "{\"kind\":\"empty\"}");
    }
}
