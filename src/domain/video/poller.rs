use super::error::JobError;
use super::job::{CreateJobRequest, JobState};
use super::VideoLocation;
use crate::infrastructure::repositories::AnimationRepository;
use std::time::Duration;

/// Create one rendering job and wait for it to reach a terminal state.
///
/// The job is created exactly once. The status is then checked at most
/// `max_attempts` times, sleeping `poll_interval` before each check:
/// - `done` with a result location ends the wait successfully
/// - `failed` ends it immediately
/// - a failed status request ends it without further polling
/// - anything else keeps waiting until the attempts run out
pub async fn submit_and_await(
    repo: &dyn AnimationRepository,
    image_ref: &str,
    audio_ref: &str,
    poll_interval: Duration,
    max_attempts: u32,
) -> Result<VideoLocation, JobError> {
    let created = repo
        .create_job(&CreateJobRequest::new(image_ref, audio_ref))
        .await
        .map_err(JobError::Creation)?;

    let job_id = created
        .job_id()
        .ok_or_else(|| JobError::Creation("response carried no job id".to_string()))?
        .to_string();

    tracing::info!(job_id = %job_id, max_attempts, "Video job created");

    for attempt in 1..=max_attempts {
        tokio::time::sleep(poll_interval).await;

        let snapshot = repo
            .job_status(&job_id)
            .await
            .map_err(|reason| JobError::PollTransport {
                job_id: job_id.clone(),
                reason,
            })?;

        tracing::debug!(
            job_id = %job_id,
            attempt,
            status = snapshot.status.as_deref().unwrap_or("<none>"),
            "Polled video job"
        );

        match snapshot.state() {
            JobState::Done(location) => {
                tracing::info!(job_id = %job_id, attempt, "Video job finished");
                return Ok(VideoLocation::Url(location));
            }
            JobState::Failed(reason) => {
                tracing::warn!(job_id = %job_id, attempt, reason = %reason, "Video job failed");
                return Err(JobError::Failed { job_id, reason });
            }
            JobState::InProgress => {}
        }
    }

    tracing::warn!(job_id = %job_id, max_attempts, "Video job timed out");

    Err(JobError::Timeout {
        job_id,
        attempts: max_attempts,
    })
}
