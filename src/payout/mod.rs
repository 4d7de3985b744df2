//! Payout calculator for 4D/3D lottery-style bets.
//!
//! Given a drawn number, the channels a bet was placed on, a bet type and
//! stakes, computes win amounts from fixed multiplier tables and packages
//! them into a description plus total suitable for the ledger.

pub mod calculator;
pub mod description;
pub mod permutations;
pub mod tables;

pub use calculator::{calculate, PayoutSession};
pub use description::{format_description, parse_description, reprice_description};
pub use permutations::permutation_count;
pub use tables::multiplier;

use crate::domain::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Draw format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    #[serde(rename = "4D")]
    FourD,
    #[serde(rename = "3D")]
    ThreeD,
}

impl DrawMode {
    pub fn digits(&self) -> usize {
        match self {
            DrawMode::FourD => 4,
            DrawMode::ThreeD => 3,
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawMode::FourD => f.write_str("4D"),
            DrawMode::ThreeD => f.write_str("3D"),
        }
    }
}

/// Prize tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    First,
    Second,
    Third,
    Special,
    Consolation,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::First => "1st",
            Position::Second => "2nd",
            Position::Third => "3rd",
            Position::Special => "Special",
            Position::Consolation => "Consolation",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Position {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1st" => Ok(Position::First),
            "2nd" => Ok(Position::Second),
            "3rd" => Ok(Position::Third),
            "Special" => Ok(Position::Special),
            "Consolation" => Ok(Position::Consolation),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetType {
    /// Stake applies as-is.
    Straight,
    /// Stake is divided across the distinct permutations of the number.
    Box,
    /// Priced like Straight; only the description differs.
    Pau,
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetType::Straight => f.write_str("Straight"),
            BetType::Box => f.write_str("Box"),
            BetType::Pau => f.write_str("Pau"),
        }
    }
}

impl FromStr for BetType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Straight" => Ok(BetType::Straight),
            "Box" => Ok(BetType::Box),
            "Pau" => Ok(BetType::Pau),
            _ => Err(()),
        }
    }
}

/// Which stake a win is paid against. Big/Small are 4D, 3A/3ABC are 3D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeKind {
    Big,
    Small,
    #[serde(rename = "3A")]
    ThreeA,
    #[serde(rename = "3ABC")]
    ThreeAbc,
}

impl StakeKind {
    pub fn mode(&self) -> DrawMode {
        match self {
            StakeKind::Big | StakeKind::Small => DrawMode::FourD,
            StakeKind::ThreeA | StakeKind::ThreeAbc => DrawMode::ThreeD,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StakeKind::Big => "Big",
            StakeKind::Small => "Small",
            StakeKind::ThreeA => "3A",
            StakeKind::ThreeAbc => "3ABC",
        }
    }
}

impl fmt::Display for StakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StakeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Big" => Ok(StakeKind::Big),
            "Small" => Ok(StakeKind::Small),
            "3A" => Ok(StakeKind::ThreeA),
            "3ABC" => Ok(StakeKind::ThreeAbc),
            _ => Err(()),
        }
    }
}

/// Draw operator a stake is placed with; written as a single letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    #[serde(rename = "M")]
    Magnum,
    #[serde(rename = "P")]
    DaMaCai,
    #[serde(rename = "T")]
    Toto,
    #[serde(rename = "S")]
    Singapore,
    #[serde(rename = "B")]
    Sabah,
    #[serde(rename = "K")]
    Sandakan,
    #[serde(rename = "W")]
    Sarawak,
    #[serde(rename = "H")]
    GrandDragon,
}

impl Channel {
    pub fn code(&self) -> char {
        match self {
            Channel::Magnum => 'M',
            Channel::DaMaCai => 'P',
            Channel::Toto => 'T',
            Channel::Singapore => 'S',
            Channel::Sabah => 'B',
            Channel::Sandakan => 'K',
            Channel::Sarawak => 'W',
            Channel::GrandDragon => 'H',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'M' => Some(Channel::Magnum),
            'P' => Some(Channel::DaMaCai),
            'T' => Some(Channel::Toto),
            'S' => Some(Channel::Singapore),
            'B' => Some(Channel::Sabah),
            'K' => Some(Channel::Sandakan),
            'W' => Some(Channel::Sarawak),
            'H' => Some(Channel::GrandDragon),
            _ => None,
        }
    }

    /// Parse a run of channel codes such as `"MPT"`.
    pub fn parse_codes(codes: &str) -> Option<Vec<Channel>> {
        codes.chars().map(Channel::from_code).collect()
    }

    pub fn codes(sides: &[Channel]) -> String {
        sides.iter().map(Channel::code).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stake {
    pub kind: StakeKind,
    pub amount: Decimal,
}

impl Stake {
    pub fn new(kind: StakeKind, amount: Decimal) -> Self {
        Stake { kind, amount }
    }
}

/// A declared bet to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    pub mode: DrawMode,
    pub number: String,
    pub position: Position,
    pub sides: Vec<Channel>,
    pub bet_type: BetType,
    pub stakes: Vec<Stake>,
}

/// One priced win, the unit accumulated by a calculator session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinningEntry {
    pub number: String,
    pub mode: DrawMode,
    pub position: Position,
    pub sides: Vec<Channel>,
    pub bet_type: BetType,
    pub stake_kind: StakeKind,
    pub stake: Decimal,
    pub win_amount: Decimal,
}

/// Input validation failures. Nothing is computed when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayoutError {
    #[error("{mode} number must have {expected} digits, got {actual}")]
    InvalidNumberLength {
        mode: DrawMode,
        expected: usize,
        actual: usize,
    },
    #[error("drawn number must contain only digits: {0}")]
    NonDigitNumber(String),
    #[error("at least one side is required")]
    NoSides,
    #[error("side {0:?} selected more than once")]
    DuplicateSide(Channel),
    #[error("at least one stake is required")]
    NoStakes,
    #[error("{0} stake given more than once")]
    DuplicateStake(StakeKind),
    #[error("{kind} stake does not apply to {mode} draws")]
    StakeModeMismatch { kind: StakeKind, mode: DrawMode },
    #[error("{0} stake must be positive")]
    NonPositiveStake(StakeKind),
    #[error("win amount for entry {0} cannot be negative")]
    NegativeWinAmount(usize),
    #[error("entry {0} does not exist")]
    EntryOutOfRange(usize),
    #[error("win amount exceeds the supported range")]
    AmountOverflow,
}
