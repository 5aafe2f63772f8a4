use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Base year and target year must differ (both are {0})")]
    SameYears(i64),
    #[error("Column position {position} is used by both '{first}' and '{second}'")]
    DuplicateColumn {
        position: usize,
        first: &'static str,
        second: &'static str,
    },
}
