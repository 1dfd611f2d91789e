use std::sync::Arc;
use std::time::Duration;

use common_auth::{Clock, ManualClock, SystemClock};
use tracing::info;

/// How elapsed time is produced between verification attempts.
#[derive(Debug, Clone)]
pub enum Timeline {
    /// Time only moves when [`Timeline::wait`] advances the shared clock.
    Simulated(ManualClock),
    /// Wall-clock time with real sleeps.
    Real,
}

impl Timeline {
    pub fn simulated() -> Self {
        Timeline::Simulated(ManualClock::starting_now())
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        match self {
            Timeline::Simulated(clock) => Arc::new(clock.clone()),
            Timeline::Real => Arc::new(SystemClock),
        }
    }

    pub async fn wait(&self, duration: Duration) {
        info!(seconds = duration.as_secs_f64(), "sleeping");
        match self {
            Timeline::Simulated(clock) => clock.advance(duration),
            Timeline::Real => tokio::time::sleep(duration).await,
        }
    }
}
