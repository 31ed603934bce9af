//! Recipe entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recipe")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Author
    pub user_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Cooking time in minutes
    pub cook_time: i32,

    /// Number of servings
    pub serving: i32,

    #[sea_orm(nullable)]
    pub difficulty: Option<String>,

    /// Image URLs (JSON array of strings)
    pub images: Json,

    #[sea_orm(nullable)]
    pub video: Option<String>,

    /// Tag names (JSON array of strings)
    pub tags: Json,

    /// Visible in public listings and search
    #[sea_orm(default_value = false)]
    pub is_published: bool,

    /// Cleared while awaiting moderation and when blocked
    #[sea_orm(default_value = false)]
    pub is_activate: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Tag names as strings; non-string entries are skipped.
    #[must_use]
    pub fn tag_names(&self) -> Vec<String> {
        json_strings(&self.tags)
    }

    /// Image URLs as strings.
    #[must_use]
    pub fn image_urls(&self) -> Vec<String> {
        json_strings(&self.images)
    }
}

/// Collect the string elements of a JSON array.
#[must_use]
pub fn json_strings(value: &Json) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(ToString::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::recipe_step::Entity")]
    Steps,
    #[sea_orm(has_many = "super::recipe_ingredient::Entity")]
    Ingredients,
    #[sea_orm(has_many = "super::recipe_comment::Entity")]
    Comments,
    #[sea_orm(has_many = "super::recipe_reaction::Entity")]
    Reactions,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::recipe_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl Related<super::recipe_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredients.def()
    }
}

impl Related<super::recipe_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl Related<super::recipe_reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
