//! Create recipe, recipe step, recipe ingredient and recipe tag tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Recipe::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Recipe::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(Recipe::UserId).string_len(128).not_null())
                    .col(ColumnDef::new(Recipe::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Recipe::Description).text().not_null())
                    .col(ColumnDef::new(Recipe::CookTime).integer().not_null().default(0))
                    .col(ColumnDef::new(Recipe::Serving).integer().not_null().default(1))
                    .col(ColumnDef::new(Recipe::Difficulty).string_len(32))
                    .col(ColumnDef::new(Recipe::Images).json_binary().not_null().default("[]"))
                    .col(ColumnDef::new(Recipe::Video).string_len(1024))
                    .col(ColumnDef::new(Recipe::Tags).json_binary().not_null().default("[]"))
                    .col(ColumnDef::new(Recipe::IsPublished).boolean().not_null().default(false))
                    .col(ColumnDef::new(Recipe::IsActivate).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Recipe::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Recipe::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_user")
                            .from(Recipe::Table, Recipe::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for a user's recipe list)
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_user_id")
                    .table(Recipe::Table)
                    .col(Recipe::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (is_activate, is_published, created_at) - public listing order
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_listing")
                    .table(Recipe::Table)
                    .col(Recipe::IsActivate)
                    .col(Recipe::IsPublished)
                    .col(Recipe::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeStep::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeStep::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeStep::RecipeId).string_len(32).not_null())
                    .col(ColumnDef::new(RecipeStep::Position).integer().not_null())
                    .col(ColumnDef::new(RecipeStep::Description).text().not_null())
                    .col(
                        ColumnDef::new(RecipeStep::Images)
                            .json_binary()
                            .not_null()
                            .default("[]"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_step_recipe")
                            .from(RecipeStep::Table, RecipeStep::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_step_recipe_position")
                    .table(RecipeStep::Table)
                    .col(RecipeStep::RecipeId)
                    .col(RecipeStep::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeIngredient::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeIngredient::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecipeIngredient::RecipeId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecipeIngredient::Position).integer().not_null())
                    .col(ColumnDef::new(RecipeIngredient::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(RecipeIngredient::Quantity)
                            .string_len(64)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(RecipeIngredient::Unit).string_len(32))
                    .col(ColumnDef::new(RecipeIngredient::ProductId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_ingredient_recipe")
                            .from(RecipeIngredient::Table, RecipeIngredient::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_ingredient_recipe_position")
                    .table(RecipeIngredient::Table)
                    .col(RecipeIngredient::RecipeId)
                    .col(RecipeIngredient::Position)
                    .to_owned(),
            )
            .await?;

        // Index: name (for ingredient search and the distinct ingredient list)
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_ingredient_name")
                    .table(RecipeIngredient::Table)
                    .col(RecipeIngredient::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeTag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeTag::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecipeTag::Name)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(RecipeTag::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RecipeTag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeIngredient::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeStep::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Recipe::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Recipe {
    Table,
    Id,
    UserId,
    Title,
    Description,
    CookTime,
    Serving,
    Difficulty,
    Images,
    Video,
    Tags,
    IsPublished,
    IsActivate,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RecipeStep {
    Table,
    Id,
    RecipeId,
    Position,
    Description,
    Images,
}

#[derive(Iden)]
enum RecipeIngredient {
    Table,
    Id,
    RecipeId,
    Position,
    Name,
    Quantity,
    Unit,
    ProductId,
}

#[derive(Iden)]
enum RecipeTag {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
