use std::collections::HashSet;

use hallostories_common::GameSnapshot;

use crate::domain::import::plan_import;
use crate::domain::persistence::Persistence;
use crate::domain::tables::{Column, ForeignKeyConstraint, Index, Table, game_tables};

/// Brings the database schema up to date and optionally seeds it from a
/// legacy snapshot.
pub struct Migration<P: Persistence> {
    persistence: P,
}

impl<P: Persistence> Migration<P> {
    pub fn new(persistence: P) -> Self {
        Self { persistence }
    }

    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        let existing_tables = self.persistence.load().await?;
        let steps = migration_steps(
            self.persistence.database_schema(),
            game_tables(),
            &existing_tables,
        );

        if steps.is_empty() {
            tracing::info!("schema is up to date");
            return Ok(());
        }
        self.persistence.apply_migration_steps(steps).await
    }

    pub async fn import(&self, snapshot: GameSnapshot) -> Result<(), anyhow::Error> {
        let plan = plan_import(snapshot);
        if plan.skipped_votes > 0 {
            tracing::warn!(
                "{} votes refer to stories that were never open for voting",
                plan.skipped_votes
            );
        }

        let (stories, votes) = self.persistence.import(plan).await?;
        tracing::info!("imported {} stories and {} votes", stories, votes);
        Ok(())
    }
}

pub trait MigrationStep {
    fn ctx(&self) -> &'static str;
    fn ddls(self) -> Vec<String>;
}

pub enum SchemaStep {
    CreateSchema { ddls: Vec<String> },
    CreateTable { ddls: Vec<String> },
}

impl SchemaStep {
    fn create_schema(database_schema: &str) -> Self {
        let ddls = vec![format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", database_schema)];
        SchemaStep::CreateSchema { ddls }
    }

    fn create_table(database_schema: &str, table: &Table) -> Self {
        let ddls = create_table_ddl(database_schema, table);
        SchemaStep::CreateTable { ddls }
    }
}

impl MigrationStep for SchemaStep {
    fn ctx(&self) -> &'static str {
        match self {
            SchemaStep::CreateSchema { .. } => "CREATE SCHEMA",
            SchemaStep::CreateTable { .. } => "CREATE TABLE",
        }
    }

    fn ddls(self) -> Vec<String> {
        match self {
            SchemaStep::CreateSchema { ddls } | SchemaStep::CreateTable { ddls } => ddls,
        }
    }
}

/// Steps creating every game table that is not in `existing_tables` yet.
/// Existing tables are left untouched.
pub fn migration_steps(
    database_schema: &str,
    tables: Vec<Table>,
    existing_tables: &HashSet<String>,
) -> Vec<SchemaStep> {
    let missing = tables
        .iter()
        .filter(|table| !existing_tables.contains(table.name))
        .collect::<Vec<_>>();

    if missing.is_empty() {
        return Vec::new();
    }

    let mut steps = vec![SchemaStep::create_schema(database_schema)];
    steps.extend(
        missing
            .into_iter()
            .map(|table| SchemaStep::create_table(database_schema, table)),
    );
    steps
}

fn create_table_ddl(schema: &str, table: &Table) -> Vec<String> {
    let mut columns = Vec::new();
    let mut pk_columns = Vec::new();

    for column in table.columns.iter() {
        columns.push(column_ddl(column));
        if column.primary_key {
            pk_columns.push(format!("\"{}\"", column.name));
        }
    }

    let columns_sql = columns.join(",\n    ");
    let pk_columns_sql = pk_columns.join(", ");

    let table_ddl = format!(
        "CREATE TABLE \"{}\".\"{}\" (\n    {},\n    PRIMARY KEY({})\n)",
        schema, table.name, columns_sql, pk_columns_sql
    );

    let mut ddls = vec![table_ddl];

    for fk in table.foreign_keys.iter() {
        ddls.push(create_fk_ddl(schema, fk));
    }

    for index in table.indexes.iter() {
        ddls.push(create_index_ddl(schema, index));
    }

    ddls
}

fn column_ddl(column: &Column) -> String {
    let mut sql = format!("\"{}\" {}", column.name, column.column_type.as_sql());
    if column.not_null {
        sql.push_str(" NOT NULL");
    }
    if let Some(default_value) = column.default_value {
        sql.push_str(&format!(" DEFAULT {}", default_value));
    }
    if column.unique {
        sql.push_str(" UNIQUE");
    }
    if let Some(check) = column.check {
        sql.push_str(&format!(" CHECK ({})", check));
    }
    sql
}

fn create_fk_ddl(schema: &str, fk: &ForeignKeyConstraint) -> String {
    format!(
        "ALTER TABLE \"{}\".\"{}\" ADD CONSTRAINT \"{}_{}_fkey\" FOREIGN KEY (\"{}\") \
         REFERENCES \"{}\".\"{}\" (\"{}\") ON DELETE CASCADE",
        schema,
        fk.table_name,
        fk.table_name,
        fk.column_name,
        fk.column_name,
        schema,
        fk.referenced_table_name,
        fk.referenced_column_name
    )
}

fn create_index_ddl(schema: &str, index: &Index) -> String {
    let columns_sql = index
        .columns
        .iter()
        .map(|column| format!("\"{}\"", column))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE {}INDEX \"{}_{}_idx\" ON \"{}\".\"{}\" ({})",
        if index.unique { "UNIQUE " } else { "" },
        index.table_name,
        index.columns.join("_"),
        schema,
        index.table_name,
        columns_sql
    )
}
