use crate::domain::model::{Sample, SampleRequest};
use crate::domain::ports::SampleRepository;
use crate::utils::error::{IceError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Process-local repository, used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySampleRepository {
    samples: Arc<Mutex<HashMap<i64, Vec<Sample>>>>,
    requests: Arc<Mutex<Vec<SampleRequest>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemorySampleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests(&self) -> Vec<SampleRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl SampleRepository for InMemorySampleRepository {
    async fn list(&self, entry_id: i64) -> Result<Vec<Sample>> {
        let samples = self.samples.lock().await;
        Ok(samples.get(&entry_id).cloned().unwrap_or_default())
    }

    async fn create(&self, entry_id: i64, sample: &Sample) -> Result<Vec<Sample>> {
        let mut stored = sample.clone();
        stored.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        stored.creation_time = Some(Utc::now());

        let mut samples = self.samples.lock().await;
        let entry_samples = samples.entry(entry_id).or_default();
        entry_samples.push(stored);
        Ok(entry_samples.clone())
    }

    async fn delete(&self, entry_id: i64, sample_id: i64) -> Result<()> {
        let mut samples = self.samples.lock().await;
        let entry_samples = samples.entry(entry_id).or_default();
        let before = entry_samples.len();
        entry_samples.retain(|sample| sample.id != Some(sample_id));

        if entry_samples.len() == before {
            return Err(IceError::PersistenceError {
                status: 404,
                message: format!("sample {} not found for entry {}", sample_id, entry_id),
            });
        }
        Ok(())
    }

    async fn request(&self, request: &SampleRequest) -> Result<()> {
        self.requests.lock().await.push(request.clone());
        Ok(())
    }
}
