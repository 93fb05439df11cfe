//! Dialect-neutral statements.
//!
//! The sync strategies describe what they want done as [`Statement`] values
//! with named parameters. Each adapter renders them through its [`Dialect`],
//! which picks identifier quoting, placeholder syntax and the upsert form.
//! No SQL text is assembled outside this module and the adapters.

use sync_core::SqlValue;

/// Operation a statement performs.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Read `columns` from every row of the table.
    Select { columns: Vec<String> },
    /// Probe for any row equal to the parameters on every column.
    Find,
    /// Insert one row built from the parameters.
    Insert,
    /// Insert one row, overwriting every non-key column on key conflict.
    Upsert { key: String },
}

/// A statement against one table with named parameters.
///
/// Parameter names are column names; their order is the order in which the
/// columns appear in the rendered SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    table: String,
    kind: StatementKind,
    params: Vec<(String, SqlValue)>,
}

impl Statement {
    pub fn select(table: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            table: table.into(),
            kind: StatementKind::Select { columns },
            params: Vec::new(),
        }
    }

    pub fn find(table: impl Into<String>, criteria: Vec<(String, SqlValue)>) -> Self {
        Self {
            table: table.into(),
            kind: StatementKind::Find,
            params: criteria,
        }
    }

    pub fn insert(table: impl Into<String>, values: Vec<(String, SqlValue)>) -> Self {
        Self {
            table: table.into(),
            kind: StatementKind::Insert,
            params: values,
        }
    }

    pub fn upsert(
        table: impl Into<String>,
        key: impl Into<String>,
        values: Vec<(String, SqlValue)>,
    ) -> Self {
        Self {
            table: table.into(),
            kind: StatementKind::Upsert { key: key.into() },
            params: values,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn kind(&self) -> &StatementKind {
        &self.kind
    }

    pub fn params(&self) -> &[(String, SqlValue)] {
        &self.params
    }

    /// Column names a query returns, known before execution.
    pub fn output_columns(&self) -> Vec<String> {
        match &self.kind {
            StatementKind::Select { columns } => columns.clone(),
            StatementKind::Find => vec!["found".to_string()],
            StatementKind::Insert | StatementKind::Upsert { .. } => Vec::new(),
        }
    }
}

/// Transaction control operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOp {
    Begin,
    Savepoint(String),
    RollbackTo(String),
    Release(String),
    Commit,
    Rollback,
}

/// SQL text plus positional parameters, ready for a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// SQL dialect of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    /// Quote an identifier, doubling any embedded quote character.
    pub fn quote(&self, ident: &str) -> String {
        match self {
            Dialect::Sqlite => format!("\"{}\"", ident.replace('"', "\"\"")),
            Dialect::MySql => format!("`{}`", ident.replace('`', "``")),
        }
    }

    /// Placeholder for the `n`-th (1-based) parameter.
    fn placeholder(&self, n: usize) -> String {
        match self {
            Dialect::Sqlite => format!("?{n}"),
            Dialect::MySql => "?".to_string(),
        }
    }

    fn column_list(&self, params: &[(String, SqlValue)]) -> String {
        params
            .iter()
            .map(|(c, _)| self.quote(c))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn placeholder_list(&self, count: usize) -> String {
        (1..=count)
            .map(|n| self.placeholder(n))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render a statement to SQL text with positional parameters.
    pub fn render(&self, stmt: &Statement) -> RenderedStatement {
        let table = self.quote(&stmt.table);
        let params: Vec<SqlValue> = stmt.params.iter().map(|(_, v)| v.clone()).collect();

        let sql = match &stmt.kind {
            StatementKind::Select { columns } => {
                let cols = columns
                    .iter()
                    .map(|c| self.quote(c))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("SELECT {cols} FROM {table}")
            }
            StatementKind::Find => {
                let predicate = stmt
                    .params
                    .iter()
                    .enumerate()
                    .map(|(i, (c, _))| format!("{} = {}", self.quote(c), self.placeholder(i + 1)))
                    .collect::<Vec<_>>()
                    .join(" AND ");
                format!("SELECT 1 AS found FROM {table} WHERE {predicate} LIMIT 1")
            }
            StatementKind::Insert => format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                self.column_list(&stmt.params),
                self.placeholder_list(stmt.params.len())
            ),
            StatementKind::Upsert { key } => {
                let insert = format!(
                    "INSERT INTO {table} ({}) VALUES ({})",
                    self.column_list(&stmt.params),
                    self.placeholder_list(stmt.params.len())
                );
                let updates: Vec<String> = stmt
                    .params
                    .iter()
                    .filter(|(c, _)| c != key)
                    .map(|(c, _)| {
                        let q = self.quote(c);
                        match self {
                            Dialect::Sqlite => format!("{q} = excluded.{q}"),
                            Dialect::MySql => format!("{q} = VALUES({q})"),
                        }
                    })
                    .collect();
                let key = self.quote(key);
                match (self, updates.is_empty()) {
                    (Dialect::Sqlite, true) => {
                        format!("{insert} ON CONFLICT({key}) DO NOTHING")
                    }
                    (Dialect::Sqlite, false) => format!(
                        "{insert} ON CONFLICT({key}) DO UPDATE SET {}",
                        updates.join(", ")
                    ),
                    (Dialect::MySql, true) => {
                        format!("{insert} ON DUPLICATE KEY UPDATE {key} = {key}")
                    }
                    (Dialect::MySql, false) => {
                        format!("{insert} ON DUPLICATE KEY UPDATE {}", updates.join(", "))
                    }
                }
            }
        };

        RenderedStatement { sql, params }
    }

    /// SQL for a transaction control operation.
    pub fn transaction_sql(&self, op: &TxOp) -> String {
        match op {
            TxOp::Begin => match self {
                Dialect::Sqlite => "BEGIN".to_string(),
                Dialect::MySql => "START TRANSACTION".to_string(),
            },
            TxOp::Savepoint(name) => format!("SAVEPOINT {}", self.quote(name)),
            TxOp::RollbackTo(name) => format!("ROLLBACK TO SAVEPOINT {}", self.quote(name)),
            TxOp::Release(name) => format!("RELEASE SAVEPOINT {}", self.quote(name)),
            TxOp::Commit => "COMMIT".to_string(),
            TxOp::Rollback => "ROLLBACK".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Vec<(String, SqlValue)> {
        vec![
            ("book_id".to_string(), SqlValue::from("B1")),
            ("title".to_string(), SqlValue::from("Dune")),
            ("quantity".to_string(), SqlValue::Integer(3)),
        ]
    }

    #[test]
    fn test_select() {
        let stmt = Statement::select("books", vec!["book_id".into(), "title".into()]);
        assert_eq!(
            Dialect::Sqlite.render(&stmt).sql,
            r#"SELECT "book_id", "title" FROM "books""#
        );
        assert_eq!(
            Dialect::MySql.render(&stmt).sql,
            "SELECT `book_id`, `title` FROM `books`"
        );
        assert_eq!(stmt.output_columns(), vec!["book_id", "title"]);
    }

    #[test]
    fn test_sqlite_upsert() {
        let rendered = Dialect::Sqlite.render(&Statement::upsert("books", "book_id", row()));
        assert_eq!(
            rendered.sql,
            r#"INSERT INTO "books" ("book_id", "title", "quantity") VALUES (?1, ?2, ?3) ON CONFLICT("book_id") DO UPDATE SET "title" = excluded."title", "quantity" = excluded."quantity""#
        );
        assert_eq!(rendered.params[2], SqlValue::Integer(3));
    }

    #[test]
    fn test_mysql_upsert() {
        let rendered = Dialect::MySql.render(&Statement::upsert("books", "book_id", row()));
        assert_eq!(
            rendered.sql,
            "INSERT INTO `books` (`book_id`, `title`, `quantity`) VALUES (?, ?, ?) ON DUPLICATE KEY UPDATE `title` = VALUES(`title`), `quantity` = VALUES(`quantity`)"
        );
        assert_eq!(rendered.params.len(), 3);
    }

    #[test]
    fn test_upsert_with_only_key_column() {
        let values = vec![("book_id".to_string(), SqlValue::from("B1"))];
        let stmt = Statement::upsert("books", "book_id", values);

        assert!(Dialect::Sqlite
            .render(&stmt)
            .sql
            .ends_with(r#"ON CONFLICT("book_id") DO NOTHING"#));
        assert!(Dialect::MySql
            .render(&stmt)
            .sql
            .ends_with("ON DUPLICATE KEY UPDATE `book_id` = `book_id`"));
    }

    #[test]
    fn test_find_by_natural_key() {
        let stmt = Statement::find(
            "requests",
            vec![
                ("student_id".to_string(), SqlValue::from("S1")),
                ("created_at".to_string(), SqlValue::from("2024-01-01 00:00:00")),
            ],
        );
        let rendered = Dialect::Sqlite.render(&stmt);
        assert_eq!(
            rendered.sql,
            r#"SELECT 1 AS found FROM "requests" WHERE "student_id" = ?1 AND "created_at" = ?2 LIMIT 1"#
        );
        assert_eq!(
            Dialect::MySql.render(&stmt).sql,
            "SELECT 1 AS found FROM `requests` WHERE `student_id` = ? AND `created_at` = ? LIMIT 1"
        );
        assert_eq!(rendered.params.len(), 2);
    }

    #[test]
    fn test_insert() {
        let rendered = Dialect::MySql.render(&Statement::insert("broadcasts", row()));
        assert_eq!(
            rendered.sql,
            "INSERT INTO `broadcasts` (`book_id`, `title`, `quantity`) VALUES (?, ?, ?)"
        );
    }

    #[test]
    fn test_identifier_quoting_escapes() {
        assert_eq!(Dialect::Sqlite.quote(r#"we"ird"#), r#""we""ird""#);
        assert_eq!(Dialect::MySql.quote("we`ird"), "`we``ird`");
    }

    #[test]
    fn test_transaction_sql() {
        assert_eq!(Dialect::Sqlite.transaction_sql(&TxOp::Begin), "BEGIN");
        assert_eq!(
            Dialect::MySql.transaction_sql(&TxOp::Begin),
            "START TRANSACTION"
        );
        assert_eq!(
            Dialect::MySql.transaction_sql(&TxOp::RollbackTo("row".into())),
            "ROLLBACK TO SAVEPOINT `row`"
        );
        assert_eq!(
            Dialect::Sqlite.transaction_sql(&TxOp::Release("row".into())),
            r#"RELEASE SAVEPOINT "row""#
        );
    }
}
