use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use thiserror::Error;
use uuid::Uuid;

use arcade_types::Stage;

use crate::entities::{prelude::*, stages};

pub struct StageRepository {
    db: DatabaseConnection,
}

impl StageRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_stage(model: stages::Model) -> Stage {
        Stage {
            id: model.id,
            title: model.title,
            description: model.description,
        }
    }

    pub async fn create(
        &self,
        id: Option<String>,
        title: String,
        description: String,
    ) -> Result<Stage, StoreError> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

        let model = stages::ActiveModel {
            id: sea_orm::ActiveValue::Set(id),
            title: sea_orm::ActiveValue::Set(title),
            description: sea_orm::ActiveValue::Set(description),
        };

        let created = model.insert(&self.db).await?;
        Ok(Self::model_to_stage(created))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Stage>, StoreError> {
        let model = Stages::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Self::model_to_stage))
    }

    pub async fn search(&self, query: Option<String>) -> Result<Vec<Stage>, StoreError> {
        let mut select = Stages::find().order_by_asc(stages::Column::Id);

        // An empty query lists everything, same as no query at all
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            select = select.filter(stages::Column::Title.contains(query));
        }

        let models = select.all(&self.db).await?;
        Ok(models.into_iter().map(Self::model_to_stage).collect())
    }

    pub async fn update(
        &self,
        id: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> Result<Stage, StoreError> {
        let existing = Stages::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        if title.is_none() && description.is_none() {
            return Ok(Self::model_to_stage(existing));
        }

        let mut model: stages::ActiveModel = existing.into();
        if let Some(title) = title {
            model.title = sea_orm::ActiveValue::Set(title);
        }
        if let Some(description) = description {
            model.description = sea_orm::ActiveValue::Set(description);
        }

        let updated = model.update(&self.db).await?;
        Ok(Self::model_to_stage(updated))
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let result = Stages::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Stage not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
