//! One-shot readiness signal.
//!
//! Fulfilled at most once, observable any number of times before or after
//! fulfillment. Late subscribers take the fast path through [`OneShot::get`].

use std::sync::Arc;

use dawn_core::DawnError;
use tokio::sync::watch;

/// Single-assignment value with async waiters.
#[derive(Debug)]
pub struct OneShot<T> {
    name: &'static str,
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for OneShot<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
        }
    }
}

impl<T> OneShot<T>
where
    T: Clone + Send + Sync,
{
    /// Create an unfulfilled signal. `name` is used in errors and logs.
    pub fn new(name: &'static str) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            name,
            tx: Arc::new(tx),
        }
    }

    /// Fulfill the signal and wake every waiter.
    ///
    /// A second publish is a programming error: the first value stays and
    /// `DawnError::AlreadyPublished` is returned.
    pub fn publish(&self, value: T) -> Result<(), DawnError> {
        let mut value = Some(value);
        let accepted = self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = value.take();
            true
        });

        if accepted {
            Ok(())
        } else {
            tracing::error!(signal = self.name, "one-shot signal published twice");
            Err(DawnError::already_published(self.name))
        }
    }

    /// The published value, if any.
    pub fn get(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Whether the signal has been fulfilled.
    pub fn is_published(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Suspend until the signal is fulfilled.
    pub async fn wait(&self) -> Result<T, DawnError> {
        let mut rx = self.tx.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(value) = current {
                return Ok(value);
            }
            if rx.changed().await.is_err() {
                return Err(DawnError::cancelled(format!(
                    "{} signal dropped before publish",
                    self.name
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    #[tokio::test]
    async fn test_publish_then_get() {
        let signal = OneShot::new("test");
        assert!(!signal.is_published());
        signal.publish(7u32).unwrap();
        assert_eq!(signal.get(), Some(7));
        assert_eq!(signal.wait().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_second_publish_rejected() {
        let signal = OneShot::new("test");
        signal.publish(1u32).unwrap();
        assert_matches!(signal.publish(2), Err(DawnError::AlreadyPublished { .. }));
        assert_eq!(signal.get(), Some(1));
    }

    #[tokio::test]
    async fn test_waiters_wake_on_publish() {
        let signal = OneShot::new("test");
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        signal.publish("ready".to_string()).unwrap();

        let value = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(value, "ready");
    }
}
