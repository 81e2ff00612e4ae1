use std::collections::HashSet;

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database};

use engine::{
    BudgetItemInput, BudgetItemPatch, Category, Engine, EngineError, MonthKey, Priority,
    RepeatType, SourceType, TemplateRemoval,
};
use migration::MigratorTrait;

const USER: &str = "default-user";

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

fn key(raw: &str) -> MonthKey {
    raw.parse().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rent() -> BudgetItemInput {
    BudgetItemInput::new("Rent", "Expense", "Housing", "5", 1200.0).date_type("dynamic")
}

#[tokio::test]
async fn template_fans_out_into_thirteen_months() {
    let engine = engine().await;
    let template = engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    for month in key("2024-06").span(13) {
        let transactions = engine.month_transactions(USER, month).await.unwrap();
        assert_eq!(transactions.len(), 1, "{month}");
        let instance = &transactions[0];
        assert_eq!(instance.id, format!("{}-{month}", template.id));
        assert_eq!(instance.template_id.as_deref(), Some(template.id.as_str()));
        assert!(!instance.is_customized);
        assert_eq!(instance.item.category, Category::Expense);
    }

    let notifications = engine.notifications(USER).await.unwrap();
    let events = engine.events(USER).await.unwrap();
    assert_eq!(notifications.len(), 13);
    assert_eq!(events.len(), 13);

    let months: HashSet<MonthKey> = notifications.iter().filter_map(|n| n.month_key).collect();
    assert_eq!(months.len(), 13);
    assert!(notifications.iter().all(|n| n.source_id == template.id
        && n.source_type == SourceType::Budget
        && n.repeat_type == RepeatType::Monthly
        && n.priority == Priority::High
        && n.title == "Rent"));

    // 2024-06-05 is a Wednesday, so the dynamic date is not shifted.
    assert_eq!(notifications[0].due_date, date(2024, 6, 5));
    assert_eq!(events[0].date, date(2024, 6, 5));
    assert_eq!(events[0].title, "Rent - Housing");
    assert_eq!(events[0].description, "Category: Expense, Amount: 1200");
}

#[tokio::test]
async fn weekend_due_day_is_shifted_in_derived_records() {
    let engine = engine().await;
    // 2024-06-01 is a Saturday.
    let input = BudgetItemInput::new("Gym", "Expense", "Health", "1", 40.0).date_type("dynamic");
    engine
        .create_template(USER, input, Some(key("2024-06")))
        .await
        .unwrap();

    let june = engine.events_in_month(USER, key("2024-06")).await.unwrap();
    assert_eq!(june.len(), 1);
    assert_eq!(june[0].date, date(2024, 6, 3));
    assert_eq!(june[0].priority, Priority::Medium);
}

#[tokio::test]
async fn month_only_delete_leaves_other_months() {
    let engine = engine().await;
    let template = engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    let id = format!("{}-2024-07", template.id);
    let removed = engine
        .delete_month_transaction(USER, key("2024-07"), &id)
        .await
        .unwrap();
    assert_eq!(removed.id, id);

    assert!(engine.month_transactions(USER, key("2024-07")).await.unwrap().is_empty());
    assert_eq!(engine.month_transactions(USER, key("2024-06")).await.unwrap().len(), 1);
    assert_eq!(engine.month_transactions(USER, key("2024-08")).await.unwrap().len(), 1);
    assert_eq!(engine.templates(USER).await.unwrap().len(), 1);

    let notifications = engine.notifications(USER).await.unwrap();
    assert_eq!(notifications.len(), 12);
    assert!(notifications.iter().all(|n| n.month_key != Some(key("2024-07"))));
    assert_eq!(engine.events(USER).await.unwrap().len(), 12);
}

#[tokio::test]
async fn month_only_delete_reports_missing_month_and_transaction() {
    let engine = engine().await;
    assert_eq!(
        engine
            .delete_month_transaction(USER, key("2030-01"), "anything")
            .await,
        Err(EngineError::NotFound {
            entity: "Month",
            id: "2030-01".to_string()
        })
    );

    engine.month_transactions(USER, key("2030-01")).await.unwrap();
    assert_eq!(
        engine
            .delete_month_transaction(USER, key("2030-01"), "anything")
            .await,
        Err(EngineError::NotFound {
            entity: "Transaction",
            id: "anything".to_string()
        })
    );
}

#[tokio::test]
async fn delete_from_month_onward_keeps_earlier_months() {
    let engine = engine().await;
    let template = engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    let removal = engine
        .delete_template_from_month(USER, &template.id, key("2024-09"))
        .await
        .unwrap();
    assert_eq!(
        removal,
        TemplateRemoval {
            template_existed: true,
            instances_removed: 10,
        }
    );

    for month in ["2024-06", "2024-07", "2024-08"] {
        assert_eq!(engine.month_transactions(USER, key(month)).await.unwrap().len(), 1);
    }
    for month in key("2024-09").span(10) {
        assert!(engine.month_transactions(USER, month).await.unwrap().is_empty());
    }
    assert!(engine.templates(USER).await.unwrap().is_empty());
    assert!(engine.notifications(USER).await.unwrap().is_empty());
    assert!(engine.events(USER).await.unwrap().is_empty());

    let again = engine
        .delete_template_from_month(USER, &template.id, key("2024-06"))
        .await
        .unwrap();
    assert_eq!(
        again,
        TemplateRemoval {
            template_existed: false,
            instances_removed: 3,
        }
    );
}

#[tokio::test]
async fn orphaned_instances_are_cleaned_up() {
    let engine = engine().await;
    let kept = engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();
    let dropped = engine
        .create_template(
            USER,
            BudgetItemInput::new("Salary", "Income", "Work", "25", 3000.0),
            Some(key("2024-06")),
        )
        .await
        .unwrap();
    engine
        .delete_template_from_month(USER, &dropped.id, key("2024-09"))
        .await
        .unwrap();

    let cleanup = engine.cleanup_orphaned_instances(USER).await.unwrap();
    assert_eq!(cleanup.total(), 3);
    assert_eq!(cleanup.removed.get(&key("2024-06")), Some(&1));
    assert_eq!(cleanup.removed.get(&key("2024-08")), Some(&1));

    let june = engine.month_transactions(USER, key("2024-06")).await.unwrap();
    assert_eq!(june.len(), 1);
    assert_eq!(june[0].template_id.as_deref(), Some(kept.id.as_str()));

    assert_eq!(engine.cleanup_orphaned_instances(USER).await.unwrap().total(), 0);
}

#[tokio::test]
async fn reading_an_empty_month_twice_returns_nothing() {
    let engine = engine().await;
    assert!(engine.month_transactions(USER, key("2024-01")).await.unwrap().is_empty());
    assert!(engine.month_transactions(USER, key("2024-01")).await.unwrap().is_empty());
}

#[tokio::test]
async fn first_read_copies_templates_once() {
    let engine = engine().await;
    let template = engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    let first = engine.month_transactions(USER, key("2030-01")).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, format!("{}-2030-01", template.id));
    assert!(!first[0].is_customized);

    let second = engine.month_transactions(USER, key("2030-01")).await.unwrap();
    assert_eq!(second, first);

    // Templates created after the month was materialized are not added to it.
    engine
        .create_template(
            USER,
            BudgetItemInput::new("Car", "Expense", "Loan", "10", 300.0),
            Some(key("2031-01")),
        )
        .await
        .unwrap();
    assert_eq!(engine.month_transactions(USER, key("2030-01")).await.unwrap().len(), 1);

    // Lazy copies do not emit notifications.
    assert_eq!(engine.notifications(USER).await.unwrap().len(), 26);
}

#[tokio::test]
async fn one_off_transaction_lifecycle() {
    let engine = engine().await;
    engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    // Writing to a month that was never read materializes it without the
    // templates.
    let bonus = engine
        .create_month_transaction(
            USER,
            key("2023-01"),
            BudgetItemInput::new("Bonus", "Income", "Work", "15", 500.0),
        )
        .await
        .unwrap();
    assert!(bonus.id.starts_with("custom-"));
    assert!(bonus.template_id.is_none());
    assert!(bonus.is_customized);

    let month = engine.month_transactions(USER, key("2023-01")).await.unwrap();
    assert_eq!(month.len(), 1);
    assert_eq!(month[0].id, bonus.id);
    assert_eq!(month[0].item, bonus.item);

    let derived: Vec<_> = engine
        .notifications(USER)
        .await
        .unwrap()
        .into_iter()
        .filter(|n| n.source_id == bonus.id)
        .collect();
    assert_eq!(derived.len(), 1);
    assert_eq!(derived[0].repeat_type, RepeatType::None);
    assert_eq!(derived[0].priority, Priority::High);
    assert_eq!(derived[0].due_date, date(2023, 1, 15));

    engine
        .delete_month_transaction(USER, key("2023-01"), &bonus.id)
        .await
        .unwrap();
    assert!(engine
        .notifications(USER)
        .await
        .unwrap()
        .iter()
        .all(|n| n.source_id != bonus.id));
    assert_eq!(engine.events(USER).await.unwrap().len(), 13);
}

#[tokio::test]
async fn editing_an_instance_customizes_only_that_month() {
    let engine = engine().await;
    let template = engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    let id = format!("{}-2024-06", template.id);
    let patch = BudgetItemPatch {
        amount: Some(900.0),
        due_date: Some("1".to_string()),
        ..Default::default()
    };
    let edited = engine
        .update_month_transaction(USER, key("2024-06"), &id, patch)
        .await
        .unwrap();
    assert!(edited.is_customized);
    assert_eq!(edited.item.amount, 900.0);

    let july = engine.month_transactions(USER, key("2024-07")).await.unwrap();
    assert_eq!(july[0].item.amount, 1200.0);
    assert!(!july[0].is_customized);

    let notifications = engine.notifications(USER).await.unwrap();
    assert_eq!(notifications.len(), 13);
    let june = notifications
        .iter()
        .find(|n| n.month_key == Some(key("2024-06")))
        .unwrap();
    assert_eq!(june.due_date, date(2024, 6, 3));
    assert_eq!(june.priority, Priority::Medium);
    let july = notifications
        .iter()
        .find(|n| n.month_key == Some(key("2024-07")))
        .unwrap();
    assert_eq!(july.priority, Priority::High);

    assert_eq!(
        engine
            .update_month_transaction(USER, key("2024-06"), "missing", BudgetItemPatch::default())
            .await,
        Err(EngineError::NotFound {
            entity: "Transaction",
            id: "missing".to_string()
        })
    );
}

#[tokio::test]
async fn editing_restores_a_missing_notification_without_duplicating_the_event() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    let template = engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    db.execute_unprepared("DELETE FROM notifications WHERE month_key = '2024-06'")
        .await
        .unwrap();

    let id = format!("{}-2024-06", template.id);
    let patch = BudgetItemPatch {
        amount: Some(900.0),
        ..Default::default()
    };
    engine
        .update_month_transaction(USER, key("2024-06"), &id, patch)
        .await
        .unwrap();

    let june_notifications: Vec<_> = engine
        .notifications(USER)
        .await
        .unwrap()
        .into_iter()
        .filter(|n| n.month_key == Some(key("2024-06")))
        .collect();
    assert_eq!(june_notifications.len(), 1);
    assert_eq!(june_notifications[0].priority, Priority::Medium);

    let june_events = engine.events_in_month(USER, key("2024-06")).await.unwrap();
    assert_eq!(june_events.len(), 1);
    assert_eq!(june_events[0].priority, Priority::Medium);
}

#[tokio::test]
async fn invalid_templates_are_rejected_without_side_effects() {
    let engine = engine().await;
    let missing = BudgetItemInput {
        source: Some("Rent".to_string()),
        ..Default::default()
    };
    assert_eq!(
        engine
            .create_template(USER, missing, Some(key("2024-06")))
            .await,
        Err(EngineError::MissingFields(vec![
            "category".to_string(),
            "purpose".to_string(),
            "dueDate".to_string(),
            "amount".to_string(),
        ]))
    );

    let wrong = BudgetItemInput::new("Rent", "Bills", "Housing", "5", 10.0);
    assert_eq!(
        engine
            .create_template(USER, wrong, Some(key("2024-06")))
            .await,
        Err(EngineError::InvalidCategory("Bills".to_string()))
    );

    assert!(engine.templates(USER).await.unwrap().is_empty());
    assert!(engine.month_transactions(USER, key("2024-06")).await.unwrap().is_empty());
}

#[tokio::test]
async fn users_do_not_see_each_other() {
    let engine = engine().await;
    engine
        .create_template(USER, rent(), Some(key("2024-06")))
        .await
        .unwrap();

    assert!(engine.templates("someone-else").await.unwrap().is_empty());
    assert!(engine
        .month_transactions("someone-else", key("2024-06"))
        .await
        .unwrap()
        .is_empty());
    assert!(engine.notifications("someone-else").await.unwrap().is_empty());
}

#[tokio::test]
async fn legacy_budget_crud_and_summary() {
    let engine = engine().await;
    let salary = engine
        .create_budget_transaction(
            USER,
            BudgetItemInput::new("Salary", "Income", "Work", "25", 3000.0),
        )
        .await
        .unwrap();
    engine
        .create_budget_transaction(
            USER,
            BudgetItemInput::new("Rent", "Expense", "Housing", "1", 1200.0),
        )
        .await
        .unwrap();
    engine
        .create_budget_transaction(
            USER,
            BudgetItemInput::new("ETF", "Savings", "Retirement", "10", 300.0),
        )
        .await
        .unwrap();

    let all = engine.budget_transactions(USER).await.unwrap();
    let days: Vec<u32> = all.iter().map(|t| t.item.due_day).collect();
    assert_eq!(days, vec![1, 10, 25]);

    let income = engine
        .budget_transactions_by_category(USER, "Income")
        .await
        .unwrap();
    assert_eq!(income.len(), 1);
    assert_eq!(
        engine.budget_transactions_by_category(USER, "Food").await,
        Err(EngineError::InvalidCategory("Food".to_string()))
    );

    let summary = engine.budget_summary(USER).await.unwrap();
    assert_eq!(summary.total_income, 3000.0);
    assert_eq!(summary.total_expense, 1200.0);
    assert_eq!(summary.total_savings, 300.0);
    assert_eq!(summary.balance, 1500.0);

    let updated = engine
        .update_budget_transaction(
            USER,
            &salary.id,
            BudgetItemPatch {
                amount: Some(3200.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.item.amount, 3200.0);
    assert_eq!(
        engine.budget_transaction(USER, &salary.id).await.unwrap().item.amount,
        3200.0
    );

    engine
        .delete_budget_transaction(USER, &salary.id)
        .await
        .unwrap();
    assert_eq!(
        engine.budget_transaction(USER, &salary.id).await,
        Err(EngineError::NotFound {
            entity: "Budget transaction",
            id: salary.id.clone()
        })
    );
    assert!(engine
        .delete_budget_transaction(USER, &salary.id)
        .await
        .is_err());
}
