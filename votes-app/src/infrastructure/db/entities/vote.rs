use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(300))")]
    pub subject: String,
    pub vote_taken: DateTimeUtc,
    pub ayes: Option<i32>,
    pub nays: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for domain::Vote {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            subject: model.subject,
            vote_taken: model.vote_taken,
            ayes: model.ayes,
            nays: model.nays,
        }
    }
}
