//! Hardware-linked source
//!
//! Reads newline-terminated frames from a port and feeds them to the
//! decoder. The read loop is one tokio task that races each read against a
//! shutdown signal, so a pending read is abandoned as soon as
//! [`SerialLink::disconnect`] asks for it.

use async_trait::async_trait;
use drivesafe_core::{
    DataSource, LineFramer, PortProvider, PortStream, SourceError, SourceMetadata, StateStore,
    DEFAULT_BAUD_RATE,
};
use drivesafe_core::constants::READ_CHUNK_SIZE;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Connection lifecycle of a [`SerialLink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Why the read loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Cancelled,
    EndOfStream,
    Failed(String),
}

/// Handle to a running read loop
struct Reader {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<ReadOutcome>,
}

/// Source backed by a serial port
pub struct SerialLink {
    metadata: SourceMetadata,
    provider: Arc<dyn PortProvider>,
    baud_rate: u32,
    store: Arc<StateStore>,
    state: Arc<watch::Sender<LinkState>>,
    reader: Option<Reader>,
}

impl SerialLink {
    pub fn new(provider: Arc<dyn PortProvider>, store: Arc<StateStore>) -> Self {
        Self::with_baud_rate(provider, store, DEFAULT_BAUD_RATE)
    }

    pub fn with_baud_rate(
        provider: Arc<dyn PortProvider>,
        store: Arc<StateStore>,
        baud_rate: u32,
    ) -> Self {
        let (state, _) = watch::channel(LinkState::Disconnected);
        Self {
            metadata: SourceMetadata {
                id: "serial".to_string(),
                name: "Serial".to_string(),
                description: "Frames from the vehicle microcontroller over a serial link"
                    .to_string(),
                default_interval: None,
            },
            provider,
            baud_rate,
            store,
            state: Arc::new(state),
            reader: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    /// Receive lifecycle changes, including the loop ending on its own
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.state.subscribe()
    }

    /// Open the port and start the read loop
    ///
    /// On failure the link stays disconnected; the error is logged and
    /// returned, never retried.
    pub async fn connect(&mut self) -> Result<(), SourceError> {
        if self.reader.as_ref().is_some_and(|r| !r.task.is_finished()) {
            debug!("Serial link already connected");
            return Ok(());
        }
        // Reap a loop that ended by itself
        self.reader = None;

        if tokio::runtime::Handle::try_current().is_err() {
            return Err(SourceError::NoRuntime);
        }

        self.state.send_replace(LinkState::Connecting);
        let stream = match self.open_port().await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Serial connect failed: {}", e);
                self.state.send_replace(LinkState::Disconnected);
                self.store.set_connected(false);
                return Err(e);
            }
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        self.store.set_connected(true);
        self.state.send_replace(LinkState::Connected);
        let task = tokio::spawn(read_loop(
            stream,
            Arc::clone(&self.store),
            Arc::clone(&self.state),
            shutdown_rx,
        ));
        self.reader = Some(Reader { shutdown_tx, task });
        Ok(())
    }

    async fn open_port(&self) -> Result<PortStream, SourceError> {
        let port = self.provider.request_access().await?;
        let name = port.name().to_string();
        let stream = port.open(self.baud_rate).await?;
        info!("Serial port {} open at {} baud", name, self.baud_rate);
        Ok(stream)
    }

    /// Cancel the read loop, close the port and mark the link disconnected
    ///
    /// Waits for the loop to finish, so no frame is published after this
    /// returns. Calling it while disconnected is a no-op.
    pub async fn disconnect(&mut self) {
        if let Some(reader) = self.reader.take() {
            let _ = reader.shutdown_tx.send(true);
            match reader.task.await {
                Ok(outcome) => debug!("Serial read loop ended: {:?}", outcome),
                Err(e) => warn!("Serial read loop failed: {}", e),
            }
            info!("Serial link disconnected");
        }
        self.store.set_connected(false);
        self.state.send_replace(LinkState::Disconnected);
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            let _ = reader.shutdown_tx.send(true);
            reader.task.abort();
            self.store.set_connected(false);
            self.state.send_replace(LinkState::Disconnected);
        }
    }
}

#[async_trait]
impl DataSource for SerialLink {
    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }

    fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    async fn start(&mut self) -> Result<(), SourceError> {
        self.connect().await
    }

    async fn stop(&mut self) {
        self.disconnect().await
    }

    fn is_active(&self) -> bool {
        self.state() == LinkState::Connected
    }
}

async fn read_loop(
    mut stream: PortStream,
    store: Arc<StateStore>,
    state: Arc<watch::Sender<LinkState>>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> ReadOutcome {
    let mut framer = LineFramer::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];

    let outcome = loop {
        tokio::select! {
            biased;
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    break ReadOutcome::Cancelled;
                }
            }
            read = stream.read(&mut buf) => match read {
                Ok(0) => break ReadOutcome::EndOfStream,
                Ok(n) => {
                    for line in framer.push(&buf[..n]) {
                        store.ingest_line(&line);
                    }
                }
                Err(e) => break ReadOutcome::Failed(e.to_string()),
            },
        }
    };

    drop(stream);

    match &outcome {
        ReadOutcome::Cancelled => {}
        ReadOutcome::EndOfStream => info!("Serial port closed by device"),
        ReadOutcome::Failed(reason) => warn!("Serial read failed: {}", reason),
    }
    if outcome != ReadOutcome::Cancelled {
        store.set_connected(false);
        state.send_replace(LinkState::Disconnected);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivesafe_core::{check_baud_rate, Port, PortError, SensorStatus};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::io::{AsyncWriteExt, DuplexStream};

    /// Hands out one end of an in-memory pipe as the port
    struct PipeProvider {
        stream: Mutex<Option<DuplexStream>>,
    }

    struct PipePort {
        stream: DuplexStream,
    }

    #[async_trait]
    impl Port for PipePort {
        fn name(&self) -> &str {
            "pipe"
        }

        async fn open(self: Box<Self>, baud_rate: u32) -> Result<PortStream, PortError> {
            check_baud_rate(baud_rate)?;
            Ok(Box::new(self.stream))
        }
    }

    #[async_trait]
    impl PortProvider for PipeProvider {
        async fn request_access(&self) -> Result<Box<dyn Port>, PortError> {
            let stream = self.stream.lock().unwrap().take();
            match stream {
                Some(stream) => Ok(Box::new(PipePort { stream })),
                None => Err(PortError::NoPortAvailable),
            }
        }
    }

    fn pipe_link(baud_rate: u32) -> (SerialLink, DuplexStream, Arc<StateStore>) {
        let (device, host) = tokio::io::duplex(64);
        let provider = Arc::new(PipeProvider {
            stream: Mutex::new(Some(host)),
        });
        let store = Arc::new(StateStore::new());
        let link = SerialLink::with_baud_rate(provider, Arc::clone(&store), baud_rate);
        (link, device, store)
    }

    async fn wait_for_updates(store: &StateStore, count: u64) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while store.update_count() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for snapshots");
    }

    #[tokio::test]
    async fn test_connect_and_receive_frames() {
        let (mut link, mut device, store) = pipe_link(9600);
        link.connect().await.unwrap();
        assert_eq!(link.state(), LinkState::Connected);
        assert!(store.is_connected());

        device.write_all(b"A:350 D:4").await.unwrap();
        device
            .write_all(b"5 IR:1 TILT:0 SPD:180 ST:safe\r\n\nA:999 D:999 IR:0 TILT:1 SPD:0 ST:tilt\n")
            .await
            .unwrap();
        wait_for_updates(&store, 2).await;

        let snapshot = store.snapshot();
        assert_eq!(snapshot.status, SensorStatus::Tilt);
        assert!(snapshot.ir_obstacle);
        let alerts = store.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "TILT DETECTED");

        link.disconnect().await;
    }

    #[tokio::test]
    async fn test_malformed_frames_do_not_stop_the_loop() {
        let (mut link, mut device, store) = pipe_link(9600);
        link.connect().await.unwrap();

        device
            .write_all(b"noise\n:::\nA:12 ST:alcohol\n")
            .await
            .unwrap();
        wait_for_updates(&store, 3).await;
        assert_eq!(store.snapshot().alcohol, 12);
        assert_eq!(store.snapshot().status, SensorStatus::Alcohol);
        assert!(link.is_active());

        link.disconnect().await;
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let (mut link, _device, store) = pipe_link(9600);
        link.disconnect().await;
        link.connect().await.unwrap();
        link.disconnect().await;
        link.disconnect().await;
        assert_eq!(link.state(), LinkState::Disconnected);
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_no_updates_after_disconnect() {
        let (mut link, mut device, store) = pipe_link(9600);
        link.connect().await.unwrap();

        device.write_all(b"A:1 ST:ir\n").await.unwrap();
        wait_for_updates(&store, 1).await;

        link.disconnect().await;
        // The host end is gone, so the write may fail
        let _ = device.write_all(b"A:2 ST:alcohol\n").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.update_count(), 1);
        assert_eq!(store.snapshot().alcohol, 1);
        assert_eq!(store.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_drop_stops_read_loop() {
        let (mut link, mut device, store) = pipe_link(9600);
        let mut state_rx = link.subscribe();
        link.connect().await.unwrap();

        device.write_all(b"A:1 ST:ir\n").await.unwrap();
        wait_for_updates(&store, 1).await;

        drop(link);
        assert!(!store.is_connected());
        assert_eq!(*state_rx.borrow_and_update(), LinkState::Disconnected);

        // The aborted loop no longer holds the host end, so the write may fail
        let _ = device.write_all(b"A:2 ST:alcohol\n").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(store.update_count(), 1);
        assert_eq!(store.snapshot().alcohol, 1);
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_end_of_stream_disconnects() {
        let (mut link, device, store) = pipe_link(9600);
        let mut state_rx = link.subscribe();
        link.connect().await.unwrap();

        drop(device);
        tokio::time::timeout(
            Duration::from_secs(2),
            state_rx.wait_for(|s| *s == LinkState::Disconnected),
        )
        .await
        .expect("link did not notice end of stream")
        .unwrap();

        assert!(!store.is_connected());
        assert!(!link.is_active());
        link.disconnect().await;
    }

    #[tokio::test]
    async fn test_connect_failure_stays_disconnected() {
        let (mut link, _device, store) = pipe_link(9600);
        link.connect().await.unwrap();
        link.disconnect().await;

        // The provider only had one port to hand out
        let err = link.connect().await.unwrap_err();
        assert!(matches!(err, SourceError::Port(PortError::NoPortAvailable)));
        assert_eq!(link.state(), LinkState::Disconnected);
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn test_unsupported_rate_fails() {
        let (mut link, _device, store) = pipe_link(1234);
        let err = link.connect().await.unwrap_err();
        assert!(matches!(
            err,
            SourceError::Port(PortError::UnsupportedRate(1234))
        ));
        assert!(!store.is_connected());
    }
}
