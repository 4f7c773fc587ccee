use rand::Rng;

/// Message shown with a locally synthesized estimate.
pub const FALLBACK_MESSAGE: &str = "High probability of confirmation";

/// A confirmation-probability estimate, keeping the predictor's answer
/// distinguishable from the locally synthesized fallback so callers and
/// tests can tell which path ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prediction {
    /// Answer from the prediction service.
    Server { percentage: u8, message: String },

    /// Synthesized locally because the service was unreachable.
    Fallback { percentage: u8, message: String },
}

impl Prediction {
    pub fn percentage(&self) -> u8 {
        match self {
            Prediction::Server { percentage, .. } | Prediction::Fallback { percentage, .. } => {
                *percentage
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Prediction::Server { message, .. } | Prediction::Fallback { message, .. } => message,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Prediction::Fallback { .. })
    }

    /// Local estimate: uniform in [75, 95), fixed message.
    pub(crate) fn fallback() -> Self {
        Prediction::Fallback {
            percentage: rand::thread_rng().gen_range(75..95),
            message: FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Normalize a wire percentage (may carry decimals) into 0..=100.
    pub(crate) fn from_server(percentage: f64, message: String) -> Self {
        Prediction::Server {
            percentage: percentage.round().clamp(0.0, 100.0) as u8,
            message,
        }
    }
}
