use hallostories_common::{
    CREATED_FIELD_NAME, ID_FIELD_NAME, MODERATED_FIELD_NAME, POSITION_FIELD_NAME,
    STATUS_FIELD_NAME, STORIES_TABLE_NAME, STORY_ID_FIELD_NAME, SUBMITTED_FIELD_NAME,
    VOTER_FIELD_NAME, VOTES_TABLE_NAME,
};

/// Represents table in a database, used for ddl generation
pub struct Table {
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
    pub indexes: Vec<Index>,
}

/// Represents one column in the database table
pub struct Column {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub default_value: Option<&'static str>,
    pub check: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Boolean,
    BigSerial,
    TimestampTZ,
}

impl ColumnType {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::BigSerial => "BIGSERIAL",
            ColumnType::TimestampTZ => "TIMESTAMPTZ",
        }
    }
}

/// Represents foreign key constraint in the database table
pub struct ForeignKeyConstraint {
    pub table_name: &'static str,
    pub column_name: &'static str,
    pub referenced_table_name: &'static str,
    pub referenced_column_name: &'static str,
}

/// Represents an index in the database table
pub struct Index {
    pub table_name: &'static str,
    pub columns: Vec<&'static str>,
    pub unique: bool,
}

impl Column {
    pub fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            not_null: true,
            unique: false,
            primary_key: false,
            default_value: None,
            check: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.not_null = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn check(mut self, condition: &'static str) -> Self {
        self.check = Some(condition);
        self
    }
}

/// Tables of the game in creation order: a table only references tables
/// listed before it.
pub fn game_tables() -> Vec<Table> {
    vec![stories_table(), votes_table()]
}

fn stories_table() -> Table {
    let columns = vec![
        Column::new(ID_FIELD_NAME, ColumnType::Text)
            .primary_key()
            .default_value("gen_random_uuid()::text"),
        Column::new(POSITION_FIELD_NAME, ColumnType::BigSerial).unique(),
        Column::new("author", ColumnType::Text),
        Column::new("title", ColumnType::Text),
        Column::new("body", ColumnType::Text),
        Column::new("is_real", ColumnType::Boolean),
        Column::new(STATUS_FIELD_NAME, ColumnType::Text)
            .default_value("'pending'")
            .check("status IN ('pending', 'approved', 'rejected')"),
        Column::new(SUBMITTED_FIELD_NAME, ColumnType::TimestampTZ).default_value("now()"),
        Column::new(MODERATED_FIELD_NAME, ColumnType::TimestampTZ).nullable(),
    ];

    let indexes = vec![Index {
        table_name: STORIES_TABLE_NAME,
        columns: vec![STATUS_FIELD_NAME],
        unique: false,
    }];

    Table {
        name: STORIES_TABLE_NAME,
        columns,
        foreign_keys: Vec::new(),
        indexes,
    }
}

/// One row per `(voter, story)`: the composite primary key is what makes a
/// second vote on the same story impossible.
fn votes_table() -> Table {
    let columns = vec![
        Column::new(VOTER_FIELD_NAME, ColumnType::Text).primary_key(),
        Column::new(STORY_ID_FIELD_NAME, ColumnType::Text).primary_key(),
        Column::new(POSITION_FIELD_NAME, ColumnType::BigSerial).unique(),
        Column::new("guessed_author", ColumnType::Text),
        Column::new("guessed_real", ColumnType::Boolean),
        Column::new(CREATED_FIELD_NAME, ColumnType::TimestampTZ).default_value("now()"),
    ];

    let foreign_keys = vec![ForeignKeyConstraint {
        table_name: VOTES_TABLE_NAME,
        column_name: STORY_ID_FIELD_NAME,
        referenced_table_name: STORIES_TABLE_NAME,
        referenced_column_name: ID_FIELD_NAME,
    }];

    let indexes = vec![Index {
        table_name: VOTES_TABLE_NAME,
        columns: vec![STORY_ID_FIELD_NAME],
        unique: false,
    }];

    Table {
        name: VOTES_TABLE_NAME,
        columns,
        foreign_keys,
        indexes,
    }
}
