use crate::domain::model::WifiInterface;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_file(&self) -> &str;
    fn output_file(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<String>;
}

/// 資料庫的一列，欄位可能為 NULL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub columns: Vec<Option<String>>,
}

impl Row {
    pub fn new(columns: Vec<Option<String>>) -> Self {
        Self { columns }
    }

    pub fn get_string(&self, index: usize) -> std::result::Result<String, String> {
        match self.columns.get(index) {
            Some(Some(value)) => Ok(value.clone()),
            Some(None) => Err(format!(
                "converting NULL to string is unsupported (column {})",
                index
            )),
            None => Err(format!(
                "expected at least {} columns, got {}",
                index + 1,
                self.columns.len()
            )),
        }
    }
}

/// 查詢結果游標；`Ok(None)` 代表已讀完
pub trait RowStream: Send {
    fn next_row(&mut self) -> std::result::Result<Option<Row>, String>;
}

#[async_trait]
pub trait Database: Send + Sync {
    async fn query(&self, sql: &str) -> std::result::Result<Box<dyn RowStream>, String>;
}

pub trait WifiHandle: Send + Sync {
    fn interfaces(&self) -> Result<Vec<WifiInterface>>;
}
