//! The fixed set of synchronized tables.

use sync_core::{Leg, SchemaError, TableDescriptor};

/// Ordered list of table descriptors. Runs visit tables in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSet {
    tables: Vec<TableDescriptor>,
}

impl TableSet {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        Self { tables }
    }

    /// Tables of the library application.
    ///
    /// Catalogue tables are mirrored; student requests flow up from the
    /// shared server and broadcasts flow down to it.
    pub fn library() -> Self {
        Self::new(vec![
            TableDescriptor::mirrored("students", "student_id"),
            TableDescriptor::mirrored("books", "book_id"),
            TableDescriptor::mirrored("transactions", "transaction_id"),
            TableDescriptor::append_only(
                "requests",
                "id",
                ["student_id", "request_type", "created_at"],
                Leg::Pull,
            ),
            TableDescriptor::append_only(
                "deletion_requests",
                "id",
                ["student_id", "created_at"],
                Leg::Pull,
            ),
            TableDescriptor::append_only("broadcasts", "id", ["title", "created_at"], Leg::Push),
        ])
    }

    /// Keep only the named tables, preserving set order.
    pub fn only(&self, names: &[String]) -> Result<Self, SchemaError> {
        if let Some(unknown) = names
            .iter()
            .find(|n| !self.tables.iter().any(|t| &t.name == *n))
        {
            return Err(SchemaError::UnknownTable(unknown.clone()));
        }
        Ok(Self::new(
            self.tables
                .iter()
                .filter(|t| names.contains(&t.name))
                .cloned()
                .collect(),
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Default for TableSet {
    fn default() -> Self {
        Self::library()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sync_core::SyncMode;

    #[test]
    fn test_library_set_is_valid_and_ordered() {
        let set = TableSet::library();
        assert_eq!(
            set.names(),
            vec![
                "students",
                "books",
                "transactions",
                "requests",
                "deletion_requests",
                "broadcasts"
            ]
        );
        for table in set.iter() {
            table.validate().unwrap();
        }

        let broadcasts = set.iter().last().unwrap();
        assert_eq!(broadcasts.mode, SyncMode::AppendOnly);
        assert!(broadcasts.runs_on(Leg::Push));
        assert!(!broadcasts.runs_on(Leg::Pull));
    }

    #[test]
    fn test_only_keeps_set_order() {
        let set = TableSet::library()
            .only(&["requests".to_string(), "books".to_string()])
            .unwrap();
        assert_eq!(set.names(), vec!["books", "requests"]);
    }

    #[test]
    fn test_only_rejects_unknown() {
        assert_eq!(
            TableSet::library().only(&["loans".to_string()]),
            Err(SchemaError::UnknownTable("loans".to_string()))
        );
    }
}
