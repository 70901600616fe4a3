//! Key/value markers persisted in the `system_state` table.

use crate::{
    entities::{SystemState, system_state},
    errors::Result,
};
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Retrieves a marker value, or `None` when the key was never set.
pub async fn get_value<C>(db: &C, key: &str) -> Result<Option<String>>
where
    C: ConnectionTrait,
{
    let state = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;
    debug!("System state for key '{}': {:?}", key, state.as_ref().map(|s| &s.value));
    Ok(state.map(|s| s.value))
}

/// Sets or replaces a marker value (upsert).
pub async fn set_value<C>(db: &C, key: &str, value: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let now = chrono::Utc::now();
    let existing = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?;

    if let Some(state) = existing {
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(value.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
    }

    Ok(())
}
