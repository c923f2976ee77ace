//! Synthetic data source for demonstration without hardware
//!
//! Samples random readings on a fixed period and classifies them locally,
//! since there is no firmware to report a status.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use drivesafe_core::{
    fail_safe_motor_speed, DataSource, LocalPrecedence, SensorSnapshot, SensorStatus,
    SourceError, SourceMetadata, StateStore, StatusPolicy,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use drivesafe_types::SyntheticSourceConfig;

/// Produces pseudo-random snapshots
pub struct SyntheticGenerator<R = StdRng> {
    config: SyntheticSourceConfig,
    rng: R,
}

impl SyntheticGenerator<StdRng> {
    pub fn new(config: SyntheticSourceConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> SyntheticGenerator<R> {
    pub fn with_rng(config: SyntheticSourceConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Sample one snapshot
    ///
    /// Alcohol is uniform in [0, 500), distance in [5, 205). Motor speed is
    /// the cruise speed while safe and 0 otherwise.
    pub fn sample(&mut self, at: DateTime<Local>) -> SensorSnapshot {
        let mut snapshot = SensorSnapshot {
            alcohol: self.rng.gen_range(0..500),
            distance: self.rng.gen_range(5..205),
            ir_obstacle: self.rng.gen_bool(probability(self.config.ir_probability)),
            tilt: self.rng.gen_bool(probability(self.config.tilt_probability)),
            motor_speed: 0,
            status: SensorStatus::Safe,
            timestamp: at,
        };
        snapshot.status = LocalPrecedence.status(&snapshot);
        snapshot.motor_speed = fail_safe_motor_speed(snapshot.status, self.config.cruise_speed);
        snapshot
    }
}

/// Clamp a configured probability into what `gen_bool` accepts
fn probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Handle to the running sampler task
struct Sampler {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Demo source publishing synthetic snapshots on a timer
pub struct SyntheticSource {
    metadata: SourceMetadata,
    config: SyntheticSourceConfig,
    store: Arc<StateStore>,
    sampler: Option<Sampler>,
}

impl SyntheticSource {
    pub fn new(config: SyntheticSourceConfig, store: Arc<StateStore>) -> Self {
        Self {
            metadata: SourceMetadata {
                id: "synthetic".to_string(),
                name: "Demo".to_string(),
                description: "Randomized readings for demonstration without hardware"
                    .to_string(),
                default_interval: Some(Duration::from_millis(config.interval_ms)),
            },
            config,
            store,
            sampler: None,
        }
    }

    /// Sampling period, never zero
    fn interval(&self) -> Duration {
        Duration::from_millis(self.config.interval_ms.max(1))
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            let _ = sampler.shutdown_tx.send(true);
            sampler.task.abort();
            self.store.set_connected(false);
        }
    }
}

#[async_trait]
impl DataSource for SyntheticSource {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    async fn start(&mut self) -> Result<(), SourceError> {
        if self.is_active() {
            return Ok(());
        }
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(SourceError::NoRuntime);
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let generator = SyntheticGenerator::new(self.config.clone());
        let task = tokio::spawn(run_sampler(
            generator,
            self.interval(),
            Arc::clone(&self.store),
            shutdown_rx,
        ));

        // Nothing can disconnect a generator
        self.store.set_connected(true);
        self.sampler = Some(Sampler { shutdown_tx, task });
        info!("Demo source started, sampling every {:?}", self.interval());
        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(sampler) = self.sampler.take() {
            let _ = sampler.shutdown_tx.send(true);
            if let Err(e) = sampler.task.await {
                debug!("Demo sampler task ended abnormally: {}", e);
            }
            info!("Demo source stopped");
        }
        self.store.set_connected(false);
    }

    fn is_active(&self) -> bool {
        self.sampler.as_ref().is_some_and(|s| !s.task.is_finished())
    }
}

async fn run_sampler<R: Rng + Send>(
    mut generator: SyntheticGenerator<R>,
    period: Duration,
    store: Arc<StateStore>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(period);
    // First sample lands one period after start
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                store.publish(generator.sample(Local::now()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: SyntheticSourceConfig) -> SyntheticGenerator<StdRng> {
        SyntheticGenerator::with_rng(config, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut generator = seeded(SyntheticSourceConfig::default());
        for _ in 0..2000 {
            let s = generator.sample(Local::now());
            assert!(s.alcohol < 500);
            assert!((5..205).contains(&s.distance));
            assert_eq!(LocalPrecedence.status(&s), s.status);
            if s.status == SensorStatus::Safe {
                assert_eq!(s.motor_speed, 180);
            } else {
                assert_eq!(s.motor_speed, 0);
            }
        }
    }

    #[test]
    fn test_probabilities_are_respected() {
        let config = SyntheticSourceConfig {
            ir_probability: 1.0,
            tilt_probability: 0.0,
            ..SyntheticSourceConfig::default()
        };
        let mut generator = seeded(config);
        for _ in 0..200 {
            let s = generator.sample(Local::now());
            assert!(s.ir_obstacle);
            assert!(!s.tilt);
            assert!(matches!(s.status, SensorStatus::Alcohol | SensorStatus::Ir));
        }
    }

    #[test]
    fn test_invalid_probability_is_clamped() {
        assert_eq!(probability(1.5), 1.0);
        assert_eq!(probability(-0.2), 0.0);
        assert_eq!(probability(f64::NAN), 0.0);
    }

    #[test]
    fn test_custom_cruise_speed() {
        let config = SyntheticSourceConfig {
            cruise_speed: 200,
            ir_probability: 0.0,
            tilt_probability: 0.0,
            ..SyntheticSourceConfig::default()
        };
        let mut generator = seeded(config);
        let safe = (0..500)
            .map(|_| generator.sample(Local::now()))
            .find(|s| s.status == SensorStatus::Safe)
            .expect("some sample should be safe");
        assert_eq!(safe.motor_speed, 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_publishes_on_interval() {
        let store = Arc::new(StateStore::new());
        let mut source = SyntheticSource::new(SyntheticSourceConfig::default(), Arc::clone(&store));
        source.start().await.unwrap();
        assert!(source.is_active());
        assert!(store.is_connected());

        tokio::time::sleep(Duration::from_millis(800 * 3 + 100)).await;
        assert_eq!(store.update_count(), 3);

        source.stop().await;
        tokio::time::sleep(Duration::from_millis(800 * 5)).await;
        assert_eq!(store.update_count(), 3);
        assert!(!store.is_connected());
        assert!(!source.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_sampler() {
        let store = Arc::new(StateStore::new());
        {
            let mut source =
                SyntheticSource::new(SyntheticSourceConfig::default(), Arc::clone(&store));
            source.start().await.unwrap();
            tokio::time::sleep(Duration::from_millis(900)).await;
        }
        let count = store.update_count();
        tokio::time::sleep(Duration::from_millis(800 * 4)).await;
        assert_eq!(store.update_count(), count);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let store = Arc::new(StateStore::new());
        let mut source = SyntheticSource::new(SyntheticSourceConfig::default(), store);
        source.stop().await;
        source.start().await.unwrap();
        source.stop().await;
        source.stop().await;
        assert!(!source.is_active());
    }
}
