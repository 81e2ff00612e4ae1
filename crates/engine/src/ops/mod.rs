use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod cooking;
mod derived;
mod inbox;
mod legacy;
mod maintenance;
mod months;
mod recipes;
mod templates;
mod todos;

pub use derived::UPCOMING_DAYS;
pub use maintenance::OrphanCleanup;
pub use templates::{FAN_OUT_MONTHS, TemplateRemoval};

/// Run `$body` inside a DB transaction bound to `$tx`. The transaction is
/// committed when the body returns `Ok` and dropped (rolled back) otherwise.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every dashboard operation.
///
/// Each method takes the id of the user it acts for; nothing is shared
/// between users.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// The connection must point at a migrated schema.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Build the engine, failing if the database does not answer.
    pub async fn build(self) -> ResultEngine<Engine> {
        self.database.ping().await?;
        tracing::debug!("engine ready");
        Ok(Engine {
            database: self.database,
        })
    }
}
