//! Storage and business rules of the personal dashboard.
//!
//! The [`Engine`] owns the database connection and exposes one async method
//! per operation. Every operation is scoped to a user id.

pub use budget::{BudgetItem, BudgetSummary, Category, DateType, WeekendRule};
pub use budget_transactions::BudgetTransaction;
pub use commands::{
    BudgetItemInput, BudgetItemPatch, CookingSessionCmd, InboxCmd, RecipeCmd, TodoCmd,
    TodoUpdateCmd,
};
pub use cooking_sessions::CookingSession;
pub use dates::resolve_due_date;
pub use error::EngineError;
pub use events::Event;
pub use inbox::{InboxKind, InboxNotification};
pub use month_key::MonthKey;
pub use monthly_transactions::MonthlyTransaction;
pub use notifications::Notification;
pub use ops::{
    Engine, EngineBuilder, FAN_OUT_MONTHS, OrphanCleanup, TemplateRemoval, UPCOMING_DAYS,
};
pub use recipe_categories::{FALLBACK_CATEGORY, RecipeCategory};
pub use recipes::{Direction, Ingredient, Recipe, TimeUnit};
pub use records::{DerivedStore, Priority, RecordTarget, RepeatType, SourceType};
pub use templates::Template;
pub use todos::Todo;

mod budget;
mod budget_months;
mod budget_transactions;
mod commands;
mod cooking_sessions;
mod dates;
mod error;
mod events;
mod inbox;
mod month_key;
mod monthly_transactions;
mod notifications;
mod ops;
mod recipe_categories;
mod recipes;
mod records;
mod templates;
mod todos;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
