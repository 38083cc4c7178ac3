use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use tokio::sync::RwLock;

use crate::{
    dto::{CreateNoteRequest, CreateNoteResponse, NoteResponse, SummaryResponse},
    repository::{Repository, RepositoryError},
    summarizer::{Summarizer, SummarizerError},
};

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("content must not be empty")]
    EmptyContent,

    #[error(transparent)]
    Storage(#[from] RepositoryError),

    #[error(transparent)]
    Summarization(#[from] SummarizerError),
}

pub struct NoteService {
    repo: Arc<RwLock<Repository>>,
    summarizer: Arc<Summarizer>,
}

impl NoteService {
    pub const fn new(repo: Arc<RwLock<Repository>>, summarizer: Arc<Summarizer>) -> Self {
        Self { repo, summarizer }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<CreateNoteResponse, ServiceError> {
        let content = request
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or(ServiceError::EmptyContent)?;

        let mut repo = self.repo.write().await;
        let note = repo.create_note(content)?;

        tracing::info!("Created note {} ({} notes stored)", note.id, repo.len());

        Ok(CreateNoteResponse::ok(note.id))
    }

    pub async fn get_all_notes(&self) -> Vec<NoteResponse> {
        self.repo
            .read()
            .await
            .get_all_notes()
            .into_iter()
            .map(NoteResponse::from)
            .collect()
    }

    pub async fn summarize_today(&self) -> Result<SummaryResponse, ServiceError> {
        self.summarize_day(Local::now().date_naive()).await
    }

    pub async fn summarize_day(&self, date: NaiveDate) -> Result<SummaryResponse, ServiceError> {
        let (start, end) = day_window(date);

        // Release the lock before the upstream call.
        let notes = self.repo.read().await.get_notes_between(start, end);

        tracing::info!(
            "Summarizing {} notes between {} and {}",
            notes.len(),
            start,
            end
        );

        let summary = self.summarizer.summarize(&notes).await?;

        Ok(SummaryResponse { summary })
    }
}

const END_OF_DAY: NaiveTime = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap();

/// Local calendar-day window `[00:00:00, 23:59:59.999999999]` for `date`, in UTC.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = resolve_local(date.and_time(NaiveTime::MIN));
    let end = resolve_local(date.and_time(END_OF_DAY));

    (start, end)
}

// A local wall time can be skipped or repeated around DST changes.
fn resolve_local(naive: chrono::NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
}
