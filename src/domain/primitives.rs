//! Domain primitives: ClientId, Operation, Column, ClientCategory.

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opaque client identifier assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        ClientId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a transaction's amount affects the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    /// Recorded but not counted.
    None,
}

impl Operation {
    /// Signed effect of `amount` under this operation.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        match self {
            Operation::Add => amount,
            Operation::Subtract => -amount,
            Operation::None => Decimal::zero(),
        }
    }

    /// `Add` for non-negative quantities, `Subtract` otherwise.
    pub fn for_signed(quantity: Decimal) -> Self {
        if quantity.is_negative() {
            Operation::Subtract
        } else {
            Operation::Add
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::None => "none",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three balance partitions of a client's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    #[default]
    Main,
    Panel1,
    Panel2,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Main, Column::Panel1, Column::Panel2];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Main => "main",
            Column::Panel1 => "panel1",
            Column::Panel2 => "panel2",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which ledger a client is kept on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientCategory {
    #[default]
    Paper,
    Mobile,
}

impl ClientCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientCategory::Paper => "paper",
            ClientCategory::Mobile => "mobile",
        }
    }
}

impl fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        ParseEnumError {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for Operation {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(Operation::Add),
            "subtract" => Ok(Operation::Subtract),
            "none" => Ok(Operation::None),
            _ => Err(ParseEnumError::new("operation", s)),
        }
    }
}

impl FromStr for Column {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" => Ok(Column::Main),
            "panel1" => Ok(Column::Panel1),
            "panel2" => Ok(Column::Panel2),
            _ => Err(ParseEnumError::new("column", s)),
        }
    }
}

impl FromStr for ClientCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paper" => Ok(ClientCategory::Paper),
            "mobile" => Ok(ClientCategory::Mobile),
            _ => Err(ParseEnumError::new("client category", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_operation_apply() {
        assert_eq!(Operation::Add.apply(d("500")), d("500"));
        assert_eq!(Operation::Subtract.apply(d("200")), d("-200"));
        assert_eq!(Operation::None.apply(d("999")), Decimal::zero());
    }

    #[test]
    fn test_operation_for_signed() {
        assert_eq!(Operation::for_signed(d("0")), Operation::Add);
        assert_eq!(Operation::for_signed(d("10")), Operation::Add);
        assert_eq!(Operation::for_signed(d("-150")), Operation::Subtract);
    }

    #[test]
    fn test_column_default_is_main() {
        assert_eq!(Column::default(), Column::Main);
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&Operation::Subtract).unwrap(), "\"subtract\"");
        assert_eq!(serde_json::to_string(&Column::Panel1).unwrap(), "\"panel1\"");
        assert_eq!(serde_json::to_string(&ClientCategory::Mobile).unwrap(), "\"mobile\"");
    }

    #[test]
    fn test_enum_parse() {
        assert_eq!("ADD".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("panel2".parse::<Column>().unwrap(), Column::Panel2);
        assert_eq!("paper".parse::<ClientCategory>().unwrap(), ClientCategory::Paper);

        let err = "sideways".parse::<Column>().unwrap_err();
        assert_eq!(err.to_string(), "unknown column: sideways");
    }
}
