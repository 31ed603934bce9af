//! Recipe report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user's request for moderator review of a recipe.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe_report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The reported recipe.
    pub recipe_id: String,
    /// The user who submitted the report.
    pub user_id: String,
    /// Reason given by the reporter.
    #[sea_orm(column_type = "Text")]
    pub report: String,
    /// When the report was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recipe::Entity",
        from = "Column::RecipeId",
        to = "super::recipe::Column::Id",
        on_delete = "Cascade"
    )]
    Recipe,
}

impl Related<super::recipe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Recipe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
