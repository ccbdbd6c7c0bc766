use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::DeError),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid {position} operand")]
    InvalidOperand { position: OperandPosition },

    #[error("Invalid operation")]
    InvalidOperation,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow")]
    Overflow,

    #[error("Count {value} is out of range {min}..={max}")]
    CountOutOfRange { value: i64, min: i64, max: i64 },

    #[error("chan not found: {name}")]
    ChannelNotFound { name: String },

    #[error("chan closed: {name}")]
    ChannelClosed { name: String },

    #[error("can't be decorated: {data}")]
    CannotDecorate { data: String },

    #[error("Stage '{stage}' failed: {details}")]
    StageFailed { stage: String, details: String },

    #[error("query: {0}")]
    QueryError(String),

    #[error("scan: {0}")]
    ScanError(String),

    #[error("rows: {0}")]
    RowsError(String),

    #[error("getting interfaces: {0}")]
    InterfacesError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandPosition {
    First,
    Second,
}

impl std::fmt::Display for OperandPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperandPosition::First => write!(f, "first"),
            OperandPosition::Second => write!(f, "second"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Data,
    Pipeline,
    External,
    System,
}

/// 錯誤嚴重程度，決定 CLI 退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl TaskError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TaskError::InvalidInput { .. }
            | TaskError::InvalidOperand { .. }
            | TaskError::InvalidOperation
            | TaskError::DivisionByZero
            | TaskError::Overflow
            | TaskError::CountOutOfRange { .. } => ErrorCategory::Input,
            TaskError::InvalidConfigValueError { .. }
            | TaskError::YamlError(_)
            | TaskError::TomlError(_) => ErrorCategory::Configuration,
            TaskError::SerializationError(_)
            | TaskError::XmlError(_)
            | TaskError::ValidationError { .. } => ErrorCategory::Data,
            TaskError::ChannelNotFound { .. }
            | TaskError::ChannelClosed { .. }
            | TaskError::CannotDecorate { .. }
            | TaskError::StageFailed { .. } => ErrorCategory::Pipeline,
            TaskError::QueryError(_)
            | TaskError::ScanError(_)
            | TaskError::RowsError(_)
            | TaskError::InterfacesError(_) => ErrorCategory::External,
            TaskError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Pipeline | ErrorCategory::External => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息；練習題的錯誤直接沿用其固定文字
    pub fn user_friendly_message(&self) -> String {
        match self {
            TaskError::IoError(e) => format!("File system error: {}", e),
            TaskError::YamlError(_) | TaskError::TomlError(_) => {
                format!("Could not read the configuration file ({})", self)
            }
            TaskError::XmlError(e) => format!("The currency feed is not valid XML: {}", e),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TaskError::InvalidOperand { .. } => "Operands must be whole numbers",
            TaskError::InvalidOperation => "Use one of the operators: + - * /",
            TaskError::DivisionByZero => "Use a non-zero second operand",
            TaskError::Overflow => "Use smaller operands",
            TaskError::CountOutOfRange { .. } => "Pick a count inside the allowed range",
            TaskError::InvalidInput { .. } => "Check the input format and try again",
            TaskError::InvalidConfigValueError { .. }
            | TaskError::YamlError(_)
            | TaskError::TomlError(_) => {
                "Check the config file has valid input-file and output-file entries"
            }
            TaskError::XmlError(_) | TaskError::ValidationError { .. } => {
                "Make sure the input file is a ValCurs currency feed"
            }
            TaskError::SerializationError(_) => "Inspect the data being serialized",
            TaskError::ChannelNotFound { .. } => "Register a stage that uses this channel first",
            TaskError::ChannelClosed { .. } => "The conveyor has already been shut down",
            TaskError::CannotDecorate { .. } | TaskError::StageFailed { .. } => {
                "Remove the offending item and run the conveyor again"
            }
            TaskError::QueryError(_) | TaskError::ScanError(_) | TaskError::RowsError(_) => {
                "Check the database connection and the users table"
            }
            TaskError::InterfacesError(_) => "Check that network interfaces are readable",
            TaskError::IoError(_) => "Check the file exists and permissions are correct",
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;
