use crate::domain::{truncate_to_micros, validate_subject, NewVote, Vote, VoteChanges};
use crate::infrastructure::db::VoteRepository;
use chrono::Utc;
use votes_errors::{AppError, FieldErrors};

/// Record store for votes: validation and defaults on top of the repository.
#[derive(Clone)]
pub struct VoteStore {
    repo: VoteRepository,
}

impl VoteStore {
    pub fn new(repo: VoteRepository) -> Self {
        Self { repo }
    }

    pub async fn create(&self, new_vote: NewVote) -> Result<Vote, AppError> {
        validate_subject(&new_vote.subject)
            .map_err(|message| FieldErrors::single("subject", message))?;

        let vote_taken = truncate_to_micros(new_vote.vote_taken.unwrap_or_else(Utc::now));
        let model = self
            .repo
            .create(new_vote.subject, vote_taken, new_vote.ayes, new_vote.nays)
            .await?;

        tracing::info!("Created vote {}", model.id);
        Ok(model.into())
    }

    pub async fn list(&self) -> Result<Vec<Vote>, AppError> {
        let models = self.repo.find_all().await?;
        Ok(models.into_iter().map(Vote::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Vote, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(Vote::from)
            .ok_or(AppError::NotFound)
    }

    pub async fn update(&self, id: i32, mut changes: VoteChanges) -> Result<Vote, AppError> {
        if let Some(subject) = &changes.subject {
            validate_subject(subject).map_err(|message| FieldErrors::single("subject", message))?;
        }
        changes.vote_taken = changes.vote_taken.map(truncate_to_micros);

        let model = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or(AppError::NotFound)?;

        tracing::info!("Updated vote {}", model.id);
        Ok(model.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if self.repo.delete(id).await? == 0 {
            return Err(AppError::NotFound);
        }
        tracing::info!("Deleted vote {}", id);
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        Ok(self.repo.count().await?)
    }
}
