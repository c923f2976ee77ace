//! Session: one active source driving the dashboard until shutdown

use crate::ui::ConsolePresenter;
use drivesafe_core::{BoxedDataSource, StateStore, TelemetryView};
use log::{error, info, trace};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Owns the active source and the store it publishes into
pub struct Session {
    source: BoxedDataSource,
}

impl Session {
    pub fn new(source: BoxedDataSource) -> Self {
        Self { source }
    }

    pub fn store(&self) -> &Arc<StateStore> {
        self.source.store()
    }

    pub fn view(&self) -> TelemetryView {
        self.source.store().view()
    }

    /// Start the source, present the state every `refresh` until `shutdown`
    /// resolves, then stop the source
    ///
    /// A source that fails to start leaves the dashboard disconnected; the
    /// session keeps presenting until shutdown.
    pub async fn run<F>(&mut self, presenter: &ConsolePresenter, refresh: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let name = self.source.metadata().name.clone();
        info!(
            "Starting {} source: {}",
            name,
            self.source.metadata().description
        );
        if let Err(e) = self.source.start().await {
            error!("{} source failed to start: {}", name, e);
        }

        let mut interval = tokio::time::interval(refresh.max(Duration::from_millis(1)));
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    let start = Instant::now();
                    presenter.present(&self.view());
                    trace!("Render took {:?}", start.elapsed());
                }
            }
        }

        info!("Stopping {} source", name);
        self.source.stop().await;
    }
}
