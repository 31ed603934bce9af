//! Admin dashboard statistics.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use letcook_common::{AppError, AppResult};
use letcook_db::repositories::{RecipeReportRepository, RecipeRepository, UserRepository};
use serde::Serialize;

/// Number of calendar months in the creation chart.
pub const MONTHS_IN_CHART: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub users: u64,
    pub recipes: u64,
    /// Recipes waiting for moderation.
    pub recipes_to_check: u64,
    /// Active recipes with at least one report.
    pub reported_recipes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRecipes {
    /// Abbreviated English month name.
    pub month: String,
    pub recipes: u64,
}

/// A `[start, end)` UTC window covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    fn containing(year: i32, month: u32) -> AppResult<Self> {
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        Ok(Self {
            start: first_of_month(year, month)?,
            end: first_of_month(next_year, next_month)?,
        })
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.start.format("%b").to_string()
    }
}

fn first_of_month(year: i32, month: u32) -> AppResult<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| AppError::Internal(format!("Invalid month {year}-{month}")))
}

/// The last `count` calendar months up to and including the one containing
/// `now`, oldest first.
pub fn month_windows(now: DateTime<Utc>, count: u32) -> AppResult<Vec<MonthWindow>> {
    let current = now.year() * 12 + now.month0() as i32;
    (0..count as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            MonthWindow::containing(index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

/// Dashboard service.
#[derive(Clone)]
pub struct DashboardService {
    user_repo: UserRepository,
    recipe_repo: RecipeRepository,
    report_repo: RecipeReportRepository,
}

impl DashboardService {
    /// Create a new dashboard service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        recipe_repo: RecipeRepository,
        report_repo: RecipeReportRepository,
    ) -> Self {
        Self {
            user_repo,
            recipe_repo,
            report_repo,
        }
    }

    /// Headline counters.
    pub async fn stats(&self) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            users: self.user_repo.count().await?,
            recipes: self.recipe_repo.count().await?,
            recipes_to_check: self.recipe_repo.count_inactive().await?,
            reported_recipes: self.report_repo.count_by_active_recipe().await?.len() as u64,
        })
    }

    /// Recipes created in each of the last few months, oldest first.
    pub async fn recipes_by_month(&self, now: DateTime<Utc>) -> AppResult<Vec<MonthlyRecipes>> {
        let mut result = Vec::new();
        for window in month_windows(now, MONTHS_IN_CHART)? {
            let recipes = self
                .recipe_repo
                .count_created_between(window.start, window.end)
                .await?;
            result.push(MonthlyRecipes {
                month: window.label(),
                recipes,
            });
        }
        Ok(result)
    }
}
