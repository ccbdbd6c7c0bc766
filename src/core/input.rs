use crate::utils::error::{Result, TaskError};
use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;

/// 逐個讀取以空白分隔的 token，需要時才往下讀行
pub struct TokenReader<R: BufRead> {
    reader: R,
    pending: VecDeque<String>,
    line_number: usize,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            line_number: 0,
        }
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }

    /// 讀取並解析下一個 token；缺少或格式錯誤都回報 `InvalidInput`
    pub fn next_parsed<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.next_token()?.ok_or_else(|| TaskError::InvalidInput {
            message: format!("expected {} but input ended", what),
        })?;

        token.parse::<T>().map_err(|_| TaskError::InvalidInput {
            message: format!(
                "expected {} on line {}, got '{}'",
                what, self.line_number, token
            ),
        })
    }
}
