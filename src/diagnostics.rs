//! Stage timing records surfaced alongside pipeline results.

use serde::{Deserialize, Serialize};

/// Timing entry describing a single stage of the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for one pipeline invocation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Observer invoked between pipeline stages, never from inner loops.
pub type StageObserver<'a> = &'a mut dyn FnMut(&StageTiming);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_accumulates_stages() {
        let mut timing = TimingBreakdown::default();
        timing.push("grayscale", 0.5);
        timing.push("energy", 1.25);
        assert_eq!(timing.stages.len(), 2);
        assert_eq!(timing.stages[1].label, "energy");
    }
}
