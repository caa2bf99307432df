use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::Gt7Config;
use crate::source::{Gt7Source, LinkState};
use crate::{IngestError, SampleTx, TelemetrySource};

/// An explicitly owned GT7 capture: one background task per `start`, stopped on demand or
/// when the connection is dropped.
pub struct Gt7Connection {
    cfg: Gt7Config,
    link: Arc<LinkState>,
    task: Option<JoinHandle<Result<(), IngestError>>>,
}

impl Gt7Connection {
    pub fn new(cfg: Gt7Config) -> Self {
        Self { cfg, link: Arc::default(), task: None }
    }

    pub fn config(&self) -> &Gt7Config {
        &self.cfg
    }

    pub fn link(&self) -> &LinkState {
        &self.link
    }

    /// Spawn the capture task on the current Tokio runtime.
    pub fn start(&mut self, tx: SampleTx) -> Result<(), IngestError> {
        if self.is_running() {
            return Err(IngestError::AlreadyRunning);
        }
        let runtime = Handle::try_current().map_err(anyhow::Error::from)?;
        let source = Gt7Source::with_link(self.cfg.clone(), Arc::clone(&self.link));
        self.task = Some(runtime.spawn(async move { source.run(tx).await }));
        info!(console = %self.cfg.console_ip, "GT7 connection started");
        Ok(())
    }

    /// Abort the capture task and wait for it to release the socket. Idempotent.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            match task.await {
                Err(e) if e.is_cancelled() => debug!("GT7 capture task cancelled"),
                Err(e) => debug!(error = %e, "GT7 capture task panicked"),
                Ok(result) => debug!(?result, "GT7 capture task had already finished"),
            }
            info!("GT7 connection stopped");
        }
        self.link.set_connected(false);
    }

    pub async fn restart(&mut self, tx: SampleTx) -> Result<(), IngestError> {
        self.stop().await;
        self.start(tx)
    }

    /// Wait for the capture task to end on its own, e.g. after a bind failure or once every
    /// receiver is gone. Returns immediately when nothing is running.
    ///
    /// Cancel safe: the task handle stays owned by the connection until the task has ended,
    /// so `stop` still reaches it if this future is dropped early.
    pub async fn wait(&mut self) -> Result<(), IngestError> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };
        let joined = task.await;
        self.task = None;
        self.link.set_connected(false);
        joined.map_err(anyhow::Error::from)?
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// True while datagrams keep decoding and none of them is overdue.
    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }
}

impl Drop for Gt7Connection {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel;

    fn local_config() -> Gt7Config {
        Gt7Config {
            bind_addr: "127.0.0.1:0".into(),
            console_ip: "127.0.0.1".into(),
            ..Gt7Config::default()
        }
    }

    #[test]
    fn start_outside_runtime_is_an_error() {
        let mut conn = Gt7Connection::new(local_config());
        let (tx, _rx) = channel();
        assert!(matches!(conn.start(tx), Err(IngestError::Other(_))));
        assert!(!conn.is_running());
    }

    #[tokio::test]
    async fn start_stop_restart_lifecycle() {
        let mut conn = Gt7Connection::new(local_config());
        let (tx, _rx) = channel();
        assert_eq!(conn.config(), &local_config());

        assert!(!conn.is_running());
        conn.start(tx.clone()).unwrap();
        assert!(conn.is_running());
        assert!(matches!(conn.start(tx.clone()), Err(IngestError::AlreadyRunning)));
        assert!(!conn.is_connected());

        conn.restart(tx).await.unwrap();
        assert!(conn.is_running());

        conn.stop().await;
        assert!(!conn.is_running());
        assert!(!conn.is_connected());
        conn.stop().await;
    }

    #[tokio::test]
    async fn bad_console_ip_ends_task_with_error() {
        let mut conn = Gt7Connection::new(Gt7Config {
            console_ip: "not-an-ip".into(),
            ..local_config()
        });
        let (tx, _rx) = channel();
        conn.start(tx).unwrap();
        let err = conn.wait().await.unwrap_err();
        assert!(err.to_string().contains("console ip not-an-ip"));
        assert!(!conn.is_running());
    }
}
