use crate::core::input::TokenReader;
use crate::utils::error::{Result, TaskError};
use crate::utils::validation::validate_count;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::{BufRead, Write};

pub const MAX_ITEMS: i64 = 10_000;

/// 固定容量的最小堆，堆頂即為第 k 大
#[derive(Debug, Clone)]
pub struct TopK {
    capacity: usize,
    heap: BinaryHeap<Reverse<i64>>,
}

impl TopK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1),
        }
    }

    pub fn push(&mut self, value: i64) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(value));
        } else if let Some(Reverse(smallest)) = self.heap.peek() {
            if value > *smallest {
                self.heap.pop();
                self.heap.push(Reverse(value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// 收集滿 k 個之後才有答案
    pub fn kth(&self) -> Option<i64> {
        if self.heap.len() < self.capacity {
            return None;
        }
        self.heap.peek().map(|Reverse(value)| *value)
    }

    pub fn into_sorted_desc(self) -> Vec<i64> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(value)| value)
            .collect()
    }
}

impl Extend<i64> for TopK {
    fn extend<I: IntoIterator<Item = i64>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

pub fn kth_largest(values: &[i64], k: usize) -> Result<i64> {
    validate_count(k as i64, 1, values.len() as i64)?;

    let mut top = TopK::new(k);
    top.extend(values.iter().copied());
    top.kth().ok_or(TaskError::CountOutOfRange {
        value: k as i64,
        min: 1,
        max: values.len() as i64,
    })
}

pub fn run<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<i64> {
    let mut tokens = TokenReader::new(reader);

    let count: i64 = tokens.next_parsed("item count")?;
    validate_count(count, 1, MAX_ITEMS)?;

    let mut values = Vec::with_capacity(count as usize);
    for _ in 0..count {
        values.push(tokens.next_parsed::<i64>("rating")?);
    }

    let k: i64 = tokens.next_parsed("k")?;
    validate_count(k, 1, count)?;

    let answer = kth_largest(&values, k as usize)?;
    tracing::debug!("{}-th largest of {} values is {}", k, count, answer);
    writeln!(writer, "{}", answer)?;
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kth_largest() {
        let values = [5, 1, 9, 3, 7, 9];
        assert_eq!(kth_largest(&values, 1).unwrap(), 9);
        assert_eq!(kth_largest(&values, 2).unwrap(), 9);
        assert_eq!(kth_largest(&values, 3).unwrap(), 7);
        assert_eq!(kth_largest(&values, 6).unwrap(), 1);
    }

    #[test]
    fn test_kth_largest_out_of_range() {
        let values = [1, 2, 3];
        assert!(matches!(
            kth_largest(&values, 0),
            Err(TaskError::CountOutOfRange { .. })
        ));
        assert!(matches!(
            kth_largest(&values, 4),
            Err(TaskError::CountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_top_k_collector() {
        let mut top = TopK::new(3);
        assert!(top.is_empty());
        top.extend([4, -2, 10, 8, 1]);
        assert_eq!(top.len(), 3);
        assert_eq!(top.kth(), Some(4));
        assert_eq!(top.into_sorted_desc(), vec![10, 8, 4]);
    }

    #[test]
    fn test_top_k_not_full() {
        let mut top = TopK::new(3);
        top.push(1);
        assert_eq!(top.kth(), None);
    }

    #[test]
    fn test_run() {
        let mut out = Vec::new();
        let answer = run("5\n3 1 2 4 5\n2\n".as_bytes(), &mut out).unwrap();
        assert_eq!(answer, 4);
        assert_eq!(String::from_utf8(out).unwrap(), "4\n");
    }

    #[test]
    fn test_run_missing_values() {
        let mut out = Vec::new();
        let err = run("5\n3 1\n".as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput { .. }));
    }

    #[test]
    fn test_run_k_too_large() {
        let mut out = Vec::new();
        let err = run("2\n3 1\n3\n".as_bytes(), &mut out).unwrap_err();
        assert!(matches!(
            err,
            TaskError::CountOutOfRange { value: 3, min: 1, max: 2 }
        ));
    }
}
