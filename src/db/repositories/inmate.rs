use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use tracing::info;

use crate::entities::inmates;
use crate::models::inmate::{Inmate, NewInmate};

pub struct InmateRepository {
    conn: DatabaseConnection,
}

impl InmateRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: inmates::Model) -> Inmate {
        Inmate {
            id: model.id,
            name: model.name,
            age: model.age,
            gender: model.gender,
            nationality: model.nationality,
            security_level: model.security_level,
            date_apprehended: model.date_apprehended,
            date_added: model.date_added,
            evidence_file: model.evidence_file,
        }
    }

    pub async fn add(&self, fields: NewInmate, evidence_file: Option<String>) -> Result<Inmate> {
        let active = inmates::ActiveModel {
            name: Set(fields.name),
            age: Set(fields.age),
            gender: Set(fields.gender),
            nationality: Set(fields.nationality),
            security_level: Set(fields.security_level),
            date_apprehended: Set(fields.date_apprehended),
            date_added: Set(fields.date_added),
            evidence_file: Set(evidence_file),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert inmate record")?;

        info!("Added inmate record {} ({})", model.id, model.name);
        Ok(Self::map_model(model))
    }

    /// Full listing, most recently added first. Ties on `date_added` fall
    /// back to insertion order via the id.
    pub async fn list(&self) -> Result<Vec<Inmate>> {
        let rows = inmates::Entity::find()
            .order_by_desc(inmates::Column::DateAdded)
            .order_by_asc(inmates::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list inmate records")?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Inmate>> {
        let row = inmates::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query inmate record")?;

        Ok(row.map(Self::map_model))
    }

    /// Overwrites every field from the form. The evidence filename is only
    /// touched when a replacement was uploaded.
    pub async fn update(
        &self,
        id: i32,
        fields: NewInmate,
        new_evidence_file: Option<String>,
    ) -> Result<Option<Inmate>> {
        let Some(existing) = inmates::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to load inmate record for update")?
        else {
            return Ok(None);
        };

        let mut active: inmates::ActiveModel = existing.into();
        active.name = Set(fields.name);
        active.age = Set(fields.age);
        active.gender = Set(fields.gender);
        active.nationality = Set(fields.nationality);
        active.security_level = Set(fields.security_level);
        active.date_apprehended = Set(fields.date_apprehended);
        active.date_added = Set(fields.date_added);
        if let Some(filename) = new_evidence_file {
            active.evidence_file = Set(Some(filename));
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update inmate record")?;

        info!("Updated inmate record {}", id);
        Ok(Some(Self::map_model(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = inmates::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete inmate record")?;

        let removed = result.rows_affected > 0;
        if removed {
            info!("Removed inmate record {}", id);
        }
        Ok(removed)
    }
}
