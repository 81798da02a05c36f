//! Cross-thread signals between the ingestion loop and its owner.
//!
//! Both are thin wrappers over `tokio::sync::watch`, which keeps only the
//! latest value: any number of redraw requests between two checks collapse
//! into one, and the listeners can be polled synchronously from a frame loop
//! or awaited from a task.

use tokio::sync::watch;

/// Producer half of the "markers changed" flag.
#[derive(Debug, Clone)]
pub struct RedrawSignal {
    tx: watch::Sender<u64>,
}

/// Consumer half of the "markers changed" flag.
#[derive(Debug, Clone)]
pub struct RedrawListener {
    rx: watch::Receiver<u64>,
}

pub fn redraw_channel() -> (RedrawSignal, RedrawListener) {
    let (tx, rx) = watch::channel(0);
    (RedrawSignal { tx }, RedrawListener { rx })
}

impl RedrawSignal {
    /// Requests a redraw without waiting for it. Works with no listener.
    pub fn notify_changed(&self) {
        self.tx.send_modify(|generation| *generation = generation.wrapping_add(1));
    }
}

impl RedrawListener {
    /// Returns true once per batch of notifications since the last call.
    pub fn take_pending(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {
                self.rx.borrow_and_update();
                true
            }
            _ => false,
        }
    }

    /// Waits for the next batch of notifications. Returns false when every
    /// `RedrawSignal` has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Owner-side trigger for stopping the ingestion loop.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

/// Loop-side view of the shutdown trigger.
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

pub fn shutdown_channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is triggered or the handle is dropped.
    pub async fn wait(&mut self) {
        // Err means the handle is gone, which also ends the loop.
        let _ = self.rx.wait_for(|triggered| *triggered).await;
    }
}
