use chrono::{NaiveDate, TimeDelta};
use sea_orm::Database;

use engine::{
    CookingSessionCmd, Direction, Engine, EngineError, InboxCmd, InboxKind, Ingredient, Priority,
    RecipeCmd, RepeatType, SourceType, TimeUnit, TodoCmd, TodoUpdateCmd, FALLBACK_CATEGORY,
};
use migration::MigratorTrait;

const USER: &str = "default-user";

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn todo_with_due_date_is_mirrored() {
    let engine = engine().await;
    let todo = engine
        .create_todo(
            USER,
            TodoCmd::new("File taxes")
                .priority("high")
                .due_date(date(2024, 4, 15)),
        )
        .await
        .unwrap();
    assert_eq!(todo.status, "pending");
    assert!(!todo.completed);

    let notifications = engine.notifications(USER).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].source_type, SourceType::Todo);
    assert_eq!(notifications[0].source_id, todo.id);
    assert_eq!(notifications[0].priority, Priority::High);
    assert_eq!(notifications[0].repeat_type, RepeatType::None);
    assert_eq!(notifications[0].category(), "todo");

    let updated = engine
        .update_todo(
            USER,
            &todo.id,
            TodoUpdateCmd {
                completed: Some(true),
                due_date: Some(date(2024, 5, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.completed);
    let events = engine.events(USER).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].date, date(2024, 5, 2));

    engine.delete_todo(USER, &todo.id).await.unwrap();
    assert!(engine.notifications(USER).await.unwrap().is_empty());
    assert!(engine.events(USER).await.unwrap().is_empty());
    assert_eq!(
        engine.todo(USER, &todo.id).await,
        Err(EngineError::NotFound {
            entity: "Todo",
            id: todo.id.clone()
        })
    );
}

#[tokio::test]
async fn todo_requires_a_title() {
    let engine = engine().await;
    assert_eq!(
        engine.create_todo(USER, TodoCmd::default()).await,
        Err(EngineError::MissingFields(vec!["title".to_string()]))
    );
    let plain = engine.create_todo(USER, TodoCmd::new("Call mum")).await.unwrap();
    assert!(engine.notifications(USER).await.unwrap().is_empty());
    assert_eq!(engine.todos(USER).await.unwrap()[0].id, plain.id);
}

#[tokio::test]
async fn upcoming_notifications_cover_the_next_week() {
    let engine = engine().await;
    let today = date(2024, 6, 10);
    for (title, offset) in [("yesterday", -1), ("today", 0), ("soon", 3), ("edge", 7), ("later", 8)] {
        engine
            .create_todo(
                USER,
                TodoCmd::new(title).due_date(today + TimeDelta::days(offset)),
            )
            .await
            .unwrap();
    }

    let titles: Vec<String> = engine
        .upcoming_notifications(USER, today)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec!["today", "soon", "edge"]);
}

#[tokio::test]
async fn recipes_and_category_counts() {
    let engine = engine().await;
    assert_eq!(
        engine.create_recipe(USER, RecipeCmd::default()).await,
        Err(EngineError::MissingFields(vec![
            "title".to_string(),
            "category".to_string()
        ]))
    );

    let bread = engine
        .create_recipe(
            USER,
            RecipeCmd::new("Bread", "Baking")
                .total_time(3, TimeUnit::Hours)
                .ingredients(vec![Ingredient {
                    id: String::new(),
                    name: "Flour".to_string(),
                    quantity: "500".to_string(),
                    unit: "g".to_string(),
                }])
                .directions(vec![Direction {
                    id: String::new(),
                    step: 0,
                    instruction: "Knead".to_string(),
                    duration: None,
                    time_value: Some(10),
                    time_unit: Some(TimeUnit::Minutes),
                }]),
        )
        .await
        .unwrap();
    assert_eq!(bread.total_time, "3 hours");
    assert_eq!(bread.directions[0].step, 1);
    assert_eq!(bread.directions[0].duration.as_deref(), Some("10 mins"));

    engine
        .create_recipe(USER, RecipeCmd::new("Cake", "Baking"))
        .await
        .unwrap();
    let soup = engine
        .create_recipe(USER, RecipeCmd::new("Soup", "Dinner"))
        .await
        .unwrap();

    let categories = engine.recipe_categories(USER).await.unwrap();
    let counts: Vec<(String, u64)> = categories
        .iter()
        .map(|c| (c.name.clone(), c.count))
        .collect();
    assert_eq!(
        counts,
        vec![("Baking".to_string(), 2), ("Dinner".to_string(), 1)]
    );

    let stored = engine.recipe(USER, &bread.id).await.unwrap();
    assert_eq!(stored.ingredients, bread.ingredients);
    assert!(!stored.ingredients[0].id.is_empty());

    let favorite = engine.toggle_recipe_favorite(USER, &soup.id).await.unwrap();
    assert!(favorite.is_favorite);
    assert_eq!(engine.favorite_recipes(USER).await.unwrap().len(), 1);
    assert_eq!(
        engine.recipes_by_category(USER, "Baking").await.unwrap().len(),
        2
    );

    let moved = engine
        .update_recipe(
            USER,
            &soup.id,
            RecipeCmd {
                category: Some("Baking".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.category, "Baking");
    assert!(moved.is_favorite);
    let categories = engine.recipe_categories(USER).await.unwrap();
    assert_eq!(categories[0].count, 3);
    assert_eq!(categories[1].count, 0);

    engine.delete_recipe(USER, &soup.id).await.unwrap();
    assert_eq!(engine.recipes(USER).await.unwrap().len(), 2);
    assert_eq!(engine.recipe_categories(USER).await.unwrap()[0].count, 2);
}

#[tokio::test]
async fn recipe_counts_keep_their_value() {
    let engine = engine().await;
    let large = u32::try_from(i32::MAX).unwrap();

    let created = engine
        .create_recipe(
            USER,
            RecipeCmd {
                serving_size: Some(large),
                total_time_value: Some(large),
                ..RecipeCmd::new("Stock", "Basics")
            },
        )
        .await
        .unwrap();
    let stored = engine.recipe(USER, &created.id).await.unwrap();
    assert_eq!(stored.serving_size, large);
    assert_eq!(stored.total_time_value, large);

    assert_eq!(
        engine
            .create_recipe(
                USER,
                RecipeCmd {
                    serving_size: Some(4),
                    total_time_value: Some(3_000_000_000),
                    ..RecipeCmd::new("Broth", "Basics")
                },
            )
            .await,
        Err(EngineError::InvalidValue(format!(
            "Total time must be at most {}",
            i32::MAX
        )))
    );
    assert!(matches!(
        engine
            .update_recipe(
                USER,
                &created.id,
                RecipeCmd {
                    serving_size: Some(3_000_000_000),
                    ..Default::default()
                },
            )
            .await,
        Err(EngineError::InvalidValue(_))
    ));

    let recipes = engine.recipes(USER).await.unwrap();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].serving_size, large);
}

#[tokio::test]
async fn renaming_and_deleting_categories_moves_recipes() {
    let engine = engine().await;
    let category = engine
        .create_recipe_category(USER, Some("Sweets".to_string()), None)
        .await
        .unwrap();
    assert_eq!(category.count, 0);
    assert_eq!(category.description, "");
    engine
        .create_recipe(USER, RecipeCmd::new("Cake", "Sweets"))
        .await
        .unwrap();

    let renamed = engine
        .update_recipe_category(
            USER,
            &category.id,
            Some("Desserts".to_string()),
            Some("After dinner".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Desserts");
    assert_eq!(
        engine.recipes_by_category(USER, "Desserts").await.unwrap().len(),
        1
    );

    engine
        .delete_recipe_category(USER, &category.id)
        .await
        .unwrap();
    let recipes = engine.recipes(USER).await.unwrap();
    assert_eq!(recipes[0].category, FALLBACK_CATEGORY);
    let categories = engine.recipe_categories(USER).await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, FALLBACK_CATEGORY);
    assert_eq!(categories[0].count, 1);

    assert_eq!(
        engine.delete_recipe_category(USER, &category.id).await,
        Err(EngineError::NotFound {
            entity: "Category",
            id: category.id.clone()
        })
    );
    assert_eq!(
        engine.create_recipe_category(USER, None, None).await,
        Err(EngineError::MissingFields(vec!["name".to_string()]))
    );
}

#[tokio::test]
async fn cooking_session_round_trip() {
    let engine = engine().await;
    assert_eq!(engine.cooking_session(USER, "r1").await.unwrap(), None);

    let saved = engine
        .save_cooking_session(
            USER,
            "r1",
            CookingSessionCmd {
                is_playing: Some(true),
                start_time: Some("2024-06-10T18:00:00Z".to_string()),
                checked_steps: Some(vec![1, 2]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let loaded = engine.cooking_session(USER, "r1").await.unwrap().unwrap();
    assert!(loaded.is_playing);
    assert_eq!(loaded.checked_steps, saved.checked_steps);

    engine
        .save_cooking_session(
            USER,
            "r1",
            CookingSessionCmd {
                is_paused: Some(true),
                total_pause_duration: Some(1500),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let loaded = engine.cooking_session(USER, "r1").await.unwrap().unwrap();
    assert!(!loaded.is_playing);
    assert!(loaded.is_paused);
    assert_eq!(loaded.total_pause_duration, 1500);
    assert!(loaded.checked_steps.is_empty());

    engine.delete_cooking_session(USER, "r1").await.unwrap();
    engine.delete_cooking_session(USER, "r1").await.unwrap();
    assert_eq!(engine.cooking_session(USER, "r1").await.unwrap(), None);
}

#[tokio::test]
async fn inbox_read_state() {
    let engine = engine().await;
    assert_eq!(
        engine
            .create_inbox_notification(USER, InboxCmd::new("Hello", ""))
            .await,
        Err(EngineError::MissingFields(vec!["message".to_string()]))
    );

    let first = engine
        .create_inbox_notification(USER, InboxCmd::new("Welcome", "Hi there"))
        .await
        .unwrap();
    assert_eq!(first.kind, InboxKind::Info);
    engine
        .create_inbox_notification(USER, InboxCmd::new("Backup", "Done").kind("success"))
        .await
        .unwrap();
    engine
        .create_inbox_notification(USER, InboxCmd::new("Disk", "Low space").kind("warning"))
        .await
        .unwrap();
    assert!(engine
        .create_inbox_notification(USER, InboxCmd::new("Bad", "Kind").kind("loud"))
        .await
        .is_err());

    assert_eq!(engine.inbox_unread_count(USER).await.unwrap(), 3);
    engine.mark_inbox_read(USER, &first.id).await.unwrap();
    assert_eq!(engine.inbox_unread_count(USER).await.unwrap(), 2);
    assert_eq!(engine.mark_all_inbox_read(USER).await.unwrap(), 2);
    assert_eq!(engine.inbox_unread_count(USER).await.unwrap(), 0);

    assert_eq!(engine.delete_read_inbox(USER).await.unwrap(), 3);
    assert!(engine.inbox(USER).await.unwrap().is_empty());
    assert_eq!(
        engine.mark_inbox_read(USER, &first.id).await,
        Err(EngineError::NotFound {
            entity: "Notification",
            id: first.id.clone()
        })
    );
}
