//! Stop token for the frame loop and the input thread.
//!
//! The loop is `Running` until any holder of a [`Shutdown`] triggers it;
//! after that it is `Stopped` for good.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    pub fn trigger(&self) {
        self.sender.send_replace(true);
    }
}

#[derive(Debug, Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<bool>,
}

impl ShutdownListener {
    pub fn is_triggered(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves once shutdown is triggered, or when every [`Shutdown`]
    /// handle has been dropped.
    pub async fn triggered(&mut self) {
        let _ = self.receiver.wait_for(|stopped| *stopped).await;
    }
}

pub fn channel() -> (Shutdown, ShutdownListener) {
    let (sender, receiver) = watch::channel(false);
    (
        Shutdown {
            sender: Arc::new(sender),
        },
        ShutdownListener { receiver },
    )
}
