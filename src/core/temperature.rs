use crate::core::input::TokenReader;
use crate::domain::model::TemperatureBounds;
use crate::utils::error::{Result, TaskError};
use crate::utils::validation::validate_count;
use std::io::{BufRead, Write};

pub const MIN_TEMPERATURE: i32 = 15;
pub const MAX_TEMPERATURE: i32 = 30;
pub const MAX_COUNT: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    AtLeast(i32),
    AtMost(i32),
}

impl Constraint {
    pub fn parse(operator: &str, value: i32) -> Result<Self> {
        match operator {
            ">=" => Ok(Constraint::AtLeast(value)),
            "<=" => Ok(Constraint::AtMost(value)),
            other => Err(TaskError::InvalidInput {
                message: format!("unknown temperature operator '{}'", other),
            }),
        }
    }
}

impl Default for TemperatureBounds {
    fn default() -> Self {
        Self {
            lower: MIN_TEMPERATURE,
            upper: MAX_TEMPERATURE,
        }
    }
}

impl TemperatureBounds {
    /// 只會收窄，不會放寬
    pub fn apply(&mut self, constraint: Constraint) {
        match constraint {
            Constraint::AtLeast(value) => self.lower = self.lower.max(value),
            Constraint::AtMost(value) => self.upper = self.upper.min(value),
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.lower <= self.upper
    }

    /// 目前可用的最佳溫度，無解時為 -1
    pub fn optimal(&self) -> i32 {
        if self.is_feasible() {
            self.lower
        } else {
            -1
        }
    }
}

/// 處理一個部門的員工偏好，回傳每位員工加入後的最佳溫度
pub fn narrow_department(constraints: &[Constraint]) -> Vec<i32> {
    let mut bounds = TemperatureBounds::default();
    constraints
        .iter()
        .map(|constraint| {
            bounds.apply(*constraint);
            bounds.optimal()
        })
        .collect()
}

pub fn run<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<()> {
    let mut tokens = TokenReader::new(reader);

    let departments: i64 = tokens.next_parsed("department count")?;
    validate_count(departments, 1, MAX_COUNT)?;

    for department in 0..departments {
        let employees: i64 = tokens.next_parsed("employee count")?;
        validate_count(employees, 1, MAX_COUNT)?;
        tracing::debug!("Department {}: {} employees", department + 1, employees);

        let mut bounds = TemperatureBounds::default();
        for _ in 0..employees {
            let operator: String = tokens.next_parsed("temperature operator")?;
            let line = tokens.line_number();
            let value: i32 = tokens.next_parsed("temperature")?;
            let constraint = Constraint::parse(&operator, value).map_err(|e| match e {
                TaskError::InvalidInput { message } => TaskError::InvalidInput {
                    message: format!("{} on line {}", message, line),
                },
                other => other,
            })?;
            bounds.apply(constraint);
            writeln!(writer, "{}", bounds.optimal())?;
        }
    }

    Ok(())
}
