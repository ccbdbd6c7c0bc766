use crate::utils::error::{OperandPosition, Result, TaskError};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl std::str::FromStr for Operation {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Operation::Add),
            "-" => Ok(Operation::Subtract),
            "*" => Ok(Operation::Multiply),
            "/" => Ok(Operation::Divide),
            _ => Err(TaskError::InvalidOperation),
        }
    }
}

pub fn calculate(first: i64, second: i64, operation: Operation) -> Result<i64> {
    match operation {
        Operation::Add => first.checked_add(second).ok_or(TaskError::Overflow),
        Operation::Subtract => first.checked_sub(second).ok_or(TaskError::Overflow),
        Operation::Multiply => first.checked_mul(second).ok_or(TaskError::Overflow),
        Operation::Divide => {
            if second == 0 {
                return Err(TaskError::DivisionByZero);
            }
            first.checked_div(second).ok_or(TaskError::Overflow)
        }
    }
}

fn parse_operand(token: Option<&str>, position: OperandPosition) -> Result<i64> {
    token
        .and_then(|t| t.parse::<i64>().ok())
        .ok_or(TaskError::InvalidOperand { position })
}

/// 讀入「第一個運算元、第二個運算元、運算子」三個 token 並輸出結果
pub fn run<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<i64> {
    let mut tokens = Vec::new();
    for line in reader.lines() {
        let line = line?;
        tokens.extend(line.split_whitespace().map(str::to_string));
        if tokens.len() >= 3 {
            break;
        }
    }
    let mut tokens = tokens.iter().map(String::as_str);

    let first = parse_operand(tokens.next(), OperandPosition::First)?;
    let second = parse_operand(tokens.next(), OperandPosition::Second)?;
    let operation: Operation = tokens.next().unwrap_or_default().parse()?;

    tracing::debug!("Calculating {} {:?} {}", first, operation, second);
    let result = calculate(first, second, operation)?;
    writeln!(writer, "{}", result)?;
    Ok(result)
}
