use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Single-slot last-known-good cache.
///
/// Written only on a confirmed successful fetch, so a failed fetch can never
/// clobber it with partial data. There is no expiry; staleness is signalled
/// by the consumer, not by discarding the value.
#[derive(Clone)]
pub struct LastGood<T>
where
    T: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<Option<T>>>,
}

impl<T> LastGood<T>
where
    T: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn get(&self) -> Option<T> {
        let slot = self.inner.lock().await;
        let value = slot.clone();
        if value.is_some() {
            debug!("Cache HIT");
        } else {
            debug!("Cache MISS");
        }
        value
    }

    pub async fn set(&self, value: T) {
        let mut slot = self.inner.lock().await;
        debug!("Cache PUT");
        *slot = Some(value);
    }
}

impl<T> Default for LastGood<T>
where
    T: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_last_good_get_set() {
        let cache = LastGood::<f64>::new();

        // Empty until the first successful write
        assert!(cache.get().await.is_none());

        cache.set(7.18).await;
        assert_eq!(cache.get().await, Some(7.18));

        // A newer success replaces the previous value
        cache.set(7.21).await;
        assert_eq!(cache.get().await, Some(7.21));
    }
}
