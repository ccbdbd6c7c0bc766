use crate::domain::ports::Database;
use crate::utils::error::{Result, TaskError};

pub const SELECT_NAMES: &str = "SELECT name FROM users";
pub const SELECT_UNIQUE_NAMES: &str = "SELECT DISTINCT name FROM users";

pub struct DbService<D: Database> {
    db: D,
}

impl<D: Database> DbService<D> {
    pub fn new(db: D) -> Self {
        Self { db }
    }

    pub async fn get_names(&self) -> Result<Vec<String>> {
        self.query_names(SELECT_NAMES).await
    }

    pub async fn get_unique_names(&self) -> Result<Vec<String>> {
        self.query_names(SELECT_UNIQUE_NAMES).await
    }

    async fn query_names(&self, sql: &str) -> Result<Vec<String>> {
        tracing::debug!("Running query: {}", sql);
        let mut rows = self.db.query(sql).await.map_err(TaskError::QueryError)?;

        let mut names = Vec::new();
        while let Some(row) = rows.next_row().map_err(TaskError::RowsError)? {
            names.push(row.get_string(0).map_err(TaskError::ScanError)?);
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{Row, RowStream};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct MockRows {
        rows: VecDeque<std::result::Result<Row, String>>,
    }

    impl RowStream for MockRows {
        fn next_row(&mut self) -> std::result::Result<Option<Row>, String> {
            self.rows.pop_front().transpose()
        }
    }

    struct MockDatabase {
        result: std::result::Result<Vec<std::result::Result<Row, String>>, String>,
        queries: Mutex<Vec<String>>,
    }

    impl MockDatabase {
        fn with_rows(rows: Vec<std::result::Result<Row, String>>) -> Self {
            Self {
                result: Ok(rows),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                result: Err(message.to_string()),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Database for MockDatabase {
        async fn query(&self, sql: &str) -> std::result::Result<Box<dyn RowStream>, String> {
            self.queries.lock().unwrap().push(sql.to_string());
            let rows = self.result.clone()?;
            Ok(Box::new(MockRows { rows: rows.into() }))
        }
    }

    fn name_row(name: &str) -> std::result::Result<Row, String> {
        Ok(Row::new(vec![Some(name.to_string())]))
    }

    #[tokio::test]
    async fn test_get_names() {
        let db = MockDatabase::with_rows(vec![name_row("Ivan"), name_row("Gena228")]);
        let service = DbService::new(db);

        let names = service.get_names().await.unwrap();
        assert_eq!(names, vec!["Ivan", "Gena228"]);
        assert_eq!(*service.db.queries.lock().unwrap(), vec![SELECT_NAMES]);
    }

    #[tokio::test]
    async fn test_get_unique_names_uses_distinct() {
        let db = MockDatabase::with_rows(vec![name_row("Ivan")]);
        let service = DbService::new(db);

        let names = service.get_unique_names().await.unwrap();
        assert_eq!(names, vec!["Ivan"]);
        assert_eq!(*service.db.queries.lock().unwrap(), vec![SELECT_UNIQUE_NAMES]);
    }

    #[tokio::test]
    async fn test_query_error() {
        let service = DbService::new(MockDatabase::failing("connection refused"));
        let err = service.get_names().await.unwrap_err();
        assert!(matches!(err, TaskError::QueryError(_)));
        assert_eq!(err.to_string(), "query: connection refused");
    }

    #[tokio::test]
    async fn test_scan_error_on_null() {
        let db = MockDatabase::with_rows(vec![name_row("Ivan"), Ok(Row::new(vec![None]))]);
        let service = DbService::new(db);
        let err = service.get_unique_names().await.unwrap_err();
        assert!(matches!(err, TaskError::ScanError(_)));
    }

    #[tokio::test]
    async fn test_rows_error() {
        let db = MockDatabase::with_rows(vec![name_row("Ivan"), Err("row error".to_string())]);
        let service = DbService::new(db);
        let err = service.get_names().await.unwrap_err();
        assert!(matches!(err, TaskError::RowsError(_)));
        assert_eq!(err.to_string(), "rows: row error");
    }

    #[tokio::test]
    async fn test_empty_result() {
        let service = DbService::new(MockDatabase::with_rows(Vec::new()));
        assert!(service.get_names().await.unwrap().is_empty());
    }
}
