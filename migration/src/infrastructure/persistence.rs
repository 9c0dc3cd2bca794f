use std::collections::HashSet;

use anyhow::Context;
use hallostories_common::database::Database;

use crate::domain::import::ImportPlan;
use crate::domain::migration::MigrationStep;
use crate::domain::persistence::Persistence;

#[derive(Clone)]
pub struct PersistenceAdapter {
    database: &'static Database,
}

impl PersistenceAdapter {
    pub fn new(database: &'static Database) -> Self {
        Self { database }
    }
}

impl Persistence for PersistenceAdapter {
    async fn load(&self) -> Result<HashSet<String>, anyhow::Error> {
        let sql = "SELECT table_name
            FROM information_schema.tables
            WHERE
              table_schema = $1
              AND table_type = 'BASE TABLE'";

        let mut rows = sqlx::query_scalar::<_, String>(sql)
            .bind(self.database.database_schema())
            .fetch(self.database.database_pool());

        let mut set = HashSet::new();

        use futures::TryStreamExt;
        while let Some(name) = rows.try_next().await? {
            set.insert(name);
        }

        Ok(set)
    }

    async fn apply_migration_steps(
        &self,
        steps: Vec<impl MigrationStep>,
    ) -> Result<(), anyhow::Error> {
        use futures::stream::{self, StreamExt};

        let mut stream = stream::iter(steps);
        while let Some(step) = stream.next().await {
            let ctx = step.ctx();
            let ddls = step.ddls();
            self.database.execute_in_transaction(ddls, ctx).await?;
        }

        Ok(())
    }

    async fn import(&self, plan: ImportPlan) -> Result<(u64, u64), anyhow::Error> {
        let mut transaction = self
            .database
            .database_pool()
            .begin()
            .await
            .context("failed to start import transaction")?;

        let mut stories = 0;
        for story in plan.stories {
            tracing::debug!("importing story {}", story.id);
            let result = sqlx::query(
                "INSERT INTO stories (id, author, title, body, is_real, status, submitted_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(story.id.as_str())
            .bind(story.author.into_inner())
            .bind(story.title.into_inner())
            .bind(story.body.into_inner())
            .bind(story.is_real)
            .bind(story.status.as_str())
            .bind(story.submitted_at)
            .execute(&mut *transaction)
            .await
            .context("failed to import story")?;
            stories += result.rows_affected();
        }

        // legacy votes carry no reliable order, keep the order of the export
        let mut votes = 0;
        for vote in plan.votes {
            let result = sqlx::query(
                "INSERT INTO votes (voter, story_id, guessed_author, guessed_real, created_at)
                 VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (voter, story_id) DO NOTHING",
            )
            .bind(vote.voter.into_inner())
            .bind(vote.story_id.as_str())
            .bind(vote.guessed_author.into_inner())
            .bind(vote.guessed_real)
            .bind(vote.timestamp)
            .execute(&mut *transaction)
            .await
            .context("failed to import vote")?;
            votes += result.rows_affected();
        }

        transaction
            .commit()
            .await
            .context("failed to commit import transaction")?;

        Ok((stories, votes))
    }

    fn database_schema(&self) -> &str {
        self.database.database_schema()
    }
}
