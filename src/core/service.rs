use crate::core::request::RequestForm;
use crate::core::session::PlateSession;
use crate::domain::model::{LocationType, Sample, SampleRequest};
use crate::domain::ports::SampleRepository;
use crate::utils::error::{IceError, Result};

/// Checks a sample is ready to be persisted: it must sit in a well or tube, or
/// point at AddGene.
pub fn validate_new_sample(sample: &Sample) -> Result<()> {
    let located = sample.chain().any(|node| {
        matches!(
            node.kind,
            LocationType::Well | LocationType::Tube | LocationType::AddGene
        )
    });
    if !located {
        return Err(IceError::MissingLocation);
    }
    Ok(())
}

pub struct SampleService<R: SampleRepository> {
    repository: R,
}

impl<R: SampleRepository> SampleService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn list(&self, entry_id: i64) -> Result<Vec<Sample>> {
        let samples = self.repository.list(entry_id).await?;
        tracing::info!("Loaded {} samples for entry {}", samples.len(), entry_id);
        Ok(samples)
    }

    /// Submits the session's sample. On success the session starts over and the
    /// entry's updated collection is returned; on failure the session is left
    /// as it was.
    pub async fn create(&self, entry_id: i64, session: &mut PlateSession) -> Result<Vec<Sample>> {
        validate_new_sample(session.new_sample())?;

        let samples = self.repository.create(entry_id, session.new_sample()).await?;
        session.take_new_sample();
        tracing::info!(
            "Created sample for entry {} ({} samples now)",
            entry_id,
            samples.len()
        );
        Ok(samples)
    }

    /// Deletes a sample and drops it from `samples` once the repository confirms.
    pub async fn delete(&self, entry_id: i64, samples: &mut Vec<Sample>, sample_id: i64) -> Result<()> {
        self.repository.delete(entry_id, sample_id).await?;
        samples.retain(|sample| sample.id != Some(sample_id));
        tracing::info!("Deleted sample {} from entry {}", sample_id, entry_id);
        Ok(())
    }

    pub async fn request(&self, part_id: i64, form: &RequestForm) -> Result<SampleRequest> {
        let request = form.build(part_id)?;
        self.repository.request(&request).await?;
        tracing::info!(
            "Requested {:?} of part {} at {}C",
            request.request_type,
            part_id,
            request.growth_temperature
        );
        Ok(request)
    }
}
