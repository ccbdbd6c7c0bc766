use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{Currency, ValCurs, Valute};
use crate::utils::error::{Result, TaskError};
use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use std::sync::OnceLock;

/// 央行匯率 XML → 依匯率遞減排序的 JSON
pub struct CurrencyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CurrencyPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CurrencyPipeline<S, C> {
    type Extracted = ValCurs;
    type Transformed = Vec<Currency>;

    async fn extract(&self) -> Result<ValCurs> {
        let input_file = self.config.input_file();
        tracing::debug!("Reading currency feed from: {}", input_file);

        let raw = self.storage.read_file(input_file).await?;
        let feed = parse_feed(&raw)?;

        match parse_feed_date(&feed.date) {
            Some(date) => tracing::info!(
                "📥 Loaded {} currencies dated {}",
                feed.valutes.len(),
                date
            ),
            None => tracing::warn!(
                "Loaded {} currencies, feed date '{}' is not dd.mm.yyyy",
                feed.valutes.len(),
                feed.date
            ),
        }

        Ok(feed)
    }

    async fn transform(&self, data: ValCurs) -> Result<Vec<Currency>> {
        let mut currencies = data
            .valutes
            .iter()
            .map(to_currency)
            .collect::<Result<Vec<_>>>()?;

        sort_by_value_desc(&mut currencies);
        tracing::debug!("Transformed {} currencies", currencies.len());
        Ok(currencies)
    }

    async fn load(&self, result: Vec<Currency>) -> Result<String> {
        let output_file = self.config.output_file();
        let json_data = serde_json::to_string_pretty(&result)?;

        self.storage
            .write_file(output_file, json_data.as_bytes())
            .await?;

        Ok(output_file.to_string())
    }
}

/// 依 XML 宣告的編碼解碼後再反序列化，沒有宣告時視為 UTF-8
pub fn parse_feed(raw: &[u8]) -> Result<ValCurs> {
    let text = decode_document(raw);
    let feed: ValCurs = quick_xml::de::from_str(&text)?;
    Ok(feed)
}

pub fn decode_document(raw: &[u8]) -> String {
    let encoding = declared_encoding(raw).unwrap_or(UTF_8);
    // decode 會自動處理 BOM
    let (text, used, had_errors) = encoding.decode(raw);
    if had_errors {
        tracing::warn!("Input contained bytes invalid for {}", used.name());
    }
    text.into_owned()
}

fn declared_encoding(raw: &[u8]) -> Option<&'static Encoding> {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    let re = DECLARATION.get_or_init(|| {
        Regex::new(r#"^(?-u:\xEF\xBB\xBF)?\s*<\?xml[^>]*encoding\s*=\s*["']([A-Za-z0-9._-]+)["']"#)
            .expect("declaration pattern is a valid regex")
    });

    let head = &raw[..raw.len().min(256)];
    let label = re.captures(head)?.get(1)?.as_bytes();
    Encoding::for_label(label)
}

pub fn parse_feed_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%d.%m.%Y").ok()
}

/// 央行使用逗號作為小數點
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse::<f64>().ok()
}

fn to_currency(valute: &Valute) -> Result<Currency> {
    let num_code = match valute.num_code.trim() {
        "" => 0,
        code => code.parse::<i32>().map_err(|_| TaskError::ValidationError {
            message: format!(
                "currency {} has invalid NumCode '{}'",
                valute.char_code, valute.num_code
            ),
        })?,
    };

    let value = parse_decimal(&valute.value).ok_or_else(|| TaskError::ValidationError {
        message: format!(
            "currency {} has invalid Value '{}'",
            valute.char_code, valute.value
        ),
    })?;

    Ok(Currency {
        num_code,
        char_code: valute.char_code.trim().to_string(),
        value,
    })
}

/// 穩定排序，匯率相同時保留原始順序
pub fn sort_by_value_desc(currencies: &mut [Currency]) {
    currencies.sort_by(|a, b| b.value.total_cmp(&a.value));
}
