use std::collections::HashSet;
use std::future::Future;

use crate::domain::import::ImportPlan;
use crate::domain::migration::MigrationStep;

pub trait Persistence: Send + Sync + Clone + 'static {
    /// load tables from database
    fn load(&self) -> impl Future<Output = Result<HashSet<String>, anyhow::Error>>;
    /// apply migration steps to database
    fn apply_migration_steps(
        &self,
        steps: Vec<impl MigrationStep>,
    ) -> impl Future<Output = Result<(), anyhow::Error>>;
    /// insert imported stories and votes, skipping rows that already exist;
    /// returns the number of stories and votes actually inserted
    fn import(&self, plan: ImportPlan) -> impl Future<Output = Result<(u64, u64), anyhow::Error>>;
    /// extract database schema
    fn database_schema(&self) -> &str;
}
