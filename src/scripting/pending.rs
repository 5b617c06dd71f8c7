//! Representation of "not yet available" evaluation results.

use std::fmt;
use std::sync::{Arc, Mutex};

use rhai::Dynamic;
use tokio::sync::oneshot;

type Settled = Result<Dynamic, String>;

/// A value a script returned before it was ready. The session watches it and
/// writes the outcome into the reserved `_result` / `_error` bindings when it
/// settles.
#[derive(Clone)]
pub struct Pending {
    label: String,
    rx: Arc<Mutex<Option<oneshot::Receiver<Settled>>>>,
}

/// Settles the [`Pending`] it was created with, exactly once.
pub struct Settler {
    tx: oneshot::Sender<Settled>,
}

impl Pending {
    pub fn channel(label: impl Into<String>) -> (Self, Settler) {
        let (tx, rx) = oneshot::channel();
        let pending = Self {
            label: label.into(),
            rx: Arc::new(Mutex::new(Some(rx))),
        };
        (pending, Settler { tx })
    }

    /// A pending that has already settled successfully.
    pub fn resolved(value: Dynamic) -> Self {
        let (pending, settler) = Self::channel("resolved");
        settler.resolve(value);
        pending
    }

    /// A pending that has already settled with a failure.
    pub fn rejected(label: impl Into<String>, error: impl Into<String>) -> Self {
        let (pending, settler) = Self::channel(label);
        settler.reject(error);
        pending
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Wait for settlement. The underlying channel is consumed; waiting a
    /// second time reports an error.
    pub async fn wait(&self) -> Settled {
        let rx = self.rx.lock().ok().and_then(|mut slot| slot.take());
        match rx {
            Some(rx) => match rx.await {
                Ok(settled) => settled,
                Err(_) => Err(format!("{} was dropped before settling", self.label)),
            },
            None => Err(format!("{} was already consumed", self.label)),
        }
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").field("label", &self.label).finish()
    }
}

impl Settler {
    pub fn resolve(self, value: Dynamic) {
        let _ = self.tx.send(Ok(value));
    }

    pub fn reject(self, error: impl Into<String>) {
        let _ = self.tx.send(Err(error.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolved_pending_settles_immediately() {
        let pending = Pending::resolved(Dynamic::from(42_i64));
        let value = pending.wait().await.unwrap();
        assert_eq!(value.as_int().unwrap(), 42);
    }

    #[tokio::test]
    async fn rejection_carries_the_error() {
        let (pending, settler) = Pending::channel("prompt");
        settler.reject("prompt cancelled");
        assert_eq!(pending.wait().await.unwrap_err(), "prompt cancelled");
    }

    #[tokio::test]
    async fn dropped_settler_reads_as_an_error() {
        let (pending, settler) = Pending::channel("task");
        drop(settler);
        assert!(pending.wait().await.unwrap_err().contains("dropped"));
    }

    #[tokio::test]
    async fn second_wait_reports_consumption() {
        let pending = Pending::resolved(Dynamic::UNIT);
        pending.wait().await.unwrap();
        assert!(pending.wait().await.unwrap_err().contains("consumed"));
    }
}
