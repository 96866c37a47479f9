use std::{num::NonZeroUsize, time::Duration};

use serde::Deserialize;

use crate::errors::error::{VcxLedgerError, VcxLedgerResult};

#[derive(Clone, Debug, Deserialize)]
pub struct InMemoryResponseCacherConfig {
    ttl: Duration,
    capacity: NonZeroUsize,
}

impl InMemoryResponseCacherConfig {
    pub fn new(ttl: Duration, capacity: usize) -> VcxLedgerResult<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or(VcxLedgerError::InvalidOption(
            "Failed to parse cache capacity into NonZeroUsize".into(),
        ))?;
        Ok(Self { ttl, capacity })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl Default for InMemoryResponseCacherConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
            capacity: NonZeroUsize::MIN.saturating_add(999),
        }
    }
}
