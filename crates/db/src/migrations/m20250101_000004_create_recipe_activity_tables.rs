//! Create recipe comment, reaction, report and favorite tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecipeComment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeComment::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeComment::RecipeId).string_len(32).not_null())
                    .col(ColumnDef::new(RecipeComment::UserId).string_len(128).not_null())
                    .col(ColumnDef::new(RecipeComment::Content).text().not_null())
                    .col(
                        ColumnDef::new(RecipeComment::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_comment_recipe")
                            .from(RecipeComment::Table, RecipeComment::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_comment_user")
                            .from(RecipeComment::Table, RecipeComment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_comment_recipe_created")
                    .table(RecipeComment::Table)
                    .col(RecipeComment::RecipeId)
                    .col(RecipeComment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeReaction::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeReaction::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeReaction::RecipeId).string_len(32).not_null())
                    .col(ColumnDef::new(RecipeReaction::UserId).string_len(128).not_null())
                    .col(
                        ColumnDef::new(RecipeReaction::IsLike)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RecipeReaction::IsHeart)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RecipeReaction::IsCookpot)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RecipeReaction::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(RecipeReaction::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_reaction_recipe")
                            .from(RecipeReaction::Table, RecipeReaction::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_reaction_user")
                            .from(RecipeReaction::Table, RecipeReaction::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (recipe_id, user_id) - one reaction row per user
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_reaction_recipe_user")
                    .table(RecipeReaction::Table)
                    .col(RecipeReaction::RecipeId)
                    .col(RecipeReaction::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RecipeReport::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeReport::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RecipeReport::RecipeId).string_len(32).not_null())
                    .col(ColumnDef::new(RecipeReport::UserId).string_len(128).not_null())
                    .col(ColumnDef::new(RecipeReport::Report).text().not_null())
                    .col(
                        ColumnDef::new(RecipeReport::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_report_recipe")
                            .from(RecipeReport::Table, RecipeReport::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recipe_report_user")
                            .from(RecipeReport::Table, RecipeReport::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (recipe_id, user_id) - a user reports a recipe once
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_report_recipe_user")
                    .table(RecipeReport::Table)
                    .col(RecipeReport::RecipeId)
                    .col(RecipeReport::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Favorite::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favorite::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favorite::UserId).string_len(128).not_null())
                    .col(ColumnDef::new(Favorite::RecipeId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Favorite::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_user")
                            .from(Favorite::Table, Favorite::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorite_recipe")
                            .from(Favorite::Table, Favorite::RecipeId)
                            .to(Recipe::Table, Recipe::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (user_id, recipe_id) - prevent duplicate favorites
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_user_recipe")
                    .table(Favorite::Table)
                    .col(Favorite::UserId)
                    .col(Favorite::RecipeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Favorite::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeReport::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeReaction::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeComment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RecipeComment {
    Table,
    Id,
    RecipeId,
    UserId,
    Content,
    CreatedAt,
}

#[derive(Iden)]
enum RecipeReaction {
    Table,
    Id,
    RecipeId,
    UserId,
    IsLike,
    IsHeart,
    IsCookpot,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum RecipeReport {
    Table,
    Id,
    RecipeId,
    UserId,
    Report,
    CreatedAt,
}

#[derive(Iden)]
enum Favorite {
    Table,
    Id,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden)]
enum Recipe {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
