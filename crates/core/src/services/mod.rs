//! Business logic services.

#![allow(missing_docs)]

pub mod analysis;
pub mod auth;
pub mod comment;
pub mod dashboard;
pub mod favorite;
pub mod following;
pub mod notification;
pub mod nutrition;
pub mod reaction;
pub mod recipe;
pub mod report;
pub mod search;
pub mod tag;
pub mod user;

pub use analysis::{
    AnalysisService, CompletionProvider, NutritionFacts, NutritionInput, OpenAiProvider,
    RecipeAnalysis,
};
pub use auth::{Claims, TokenService};
pub use comment::{CommentService, CreateCommentInput};
pub use dashboard::{DashboardService, DashboardStats, MonthlyRecipes};
pub use favorite::{FavoriteService, FavoriteStatus};
pub use following::FollowingService;
pub use notification::NotificationService;
pub use nutrition::{NutritionTargets, TargetsInput, calculate_targets};
pub use reaction::{ReactionInput, ReactionService, ReactionSummary};
pub use recipe::{
    AuthorSummary, IngredientInput, ListRecipesQuery, ProductLink, RecipeDetails, RecipeInput,
    RecipePage, RecipeService, RecipeWithComments,
};
pub use report::{CreateReportInput, ReportService, ReportedRecipe};
pub use search::{SearchQuery, SearchResult, SearchService};
pub use tag::{CreateTagInput, SetTagsInput, TagService};
pub use user::{AuthenticateInput, UpdateUserInput, UserService};
