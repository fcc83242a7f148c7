use super::entities::{vote, Vote};
use crate::domain::VoteChanges;
use chrono::{DateTime, Utc};
use sea_orm::{
    entity::*, query::*, DatabaseConnection, DbErr, PaginatorTrait, TransactionTrait,
};

#[derive(Clone)]
pub struct VoteRepository {
    db: DatabaseConnection,
}

impl VoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        subject: String,
        vote_taken: DateTime<Utc>,
        ayes: Option<i32>,
        nays: Option<i32>,
    ) -> Result<vote::Model, DbErr> {
        let active = vote::ActiveModel {
            id: NotSet,
            subject: Set(subject),
            vote_taken: Set(vote_taken),
            ayes: Set(ayes),
            nays: Set(nays),
        };
        active.insert(&self.db).await
    }

    pub async fn find_all(&self) -> Result<Vec<vote::Model>, DbErr> {
        Vote::find()
            .order_by_asc(vote::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<vote::Model>, DbErr> {
        Vote::find_by_id(id).one(&self.db).await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Vote::find().count(&self.db).await
    }

    /// Applies `changes` to the row with `id`; `None` if there is no such row.
    pub async fn update(
        &self,
        id: i32,
        changes: &VoteChanges,
    ) -> Result<Option<vote::Model>, DbErr> {
        let txn = self.db.begin().await?;

        let Some(existing) = Vote::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };
        if changes.is_empty() {
            return Ok(Some(existing));
        }

        let mut active: vote::ActiveModel = existing.into();
        if let Some(subject) = &changes.subject {
            active.subject = Set(subject.clone());
        }
        if let Some(vote_taken) = changes.vote_taken {
            active.vote_taken = Set(vote_taken);
        }
        if let Some(ayes) = changes.ayes {
            active.ayes = Set(ayes);
        }
        if let Some(nays) = changes.nays {
            active.nays = Set(nays);
        }
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(Some(updated))
    }

    /// Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let result = Vote::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}
