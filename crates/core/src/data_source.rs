//! Data source trait and related types

use crate::port::PortError;
use crate::state_store::StateStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Metadata about a data source
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    /// Unique identifier for this source type
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what this source provides
    pub description: String,
    /// Sampling period, `None` for sources driven by incoming data
    pub default_interval: Option<Duration>,
}

/// Errors raised when starting a source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no tokio runtime is running")]
    NoRuntime,
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Trait for all telemetry sources
///
/// A source owns one background task that publishes snapshots into its
/// [`StateStore`]. Only one task writes to a store at a time.
#[async_trait]
pub trait DataSource: Send {
    /// Get metadata about this source
    fn metadata(&self) -> &SourceMetadata;

    /// Store this source publishes into
    fn store(&self) -> &Arc<StateStore>;

    /// Start publishing. Starting an active source does nothing.
    async fn start(&mut self) -> Result<(), SourceError>;

    /// Stop publishing and release resources. Idempotent.
    ///
    /// Once this returns, the source publishes nothing further.
    async fn stop(&mut self);

    /// Whether the background task is running
    fn is_active(&self) -> bool;
}

/// Type-erased data source for dynamic dispatch
pub type BoxedDataSource = Box<dyn DataSource>;
