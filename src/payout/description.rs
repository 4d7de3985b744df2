//! Text encoding of payout entries stored in a transaction description.
//!
//! One entry reads `MPT 1234 Box Big 240 = 27500.00 1st`; entries are joined
//! with `"; "`. Win amounts are written with two decimal places.

use crate::domain::Decimal;
use crate::payout::calculator::PayoutSession;
use crate::payout::{BetType, Channel, PayoutError, Position, StakeKind, WinningEntry};

pub const ENTRY_SEPARATOR: &str = "; ";

pub fn format_entry(entry: &WinningEntry) -> String {
    format!(
        "{} {} {} {} {} = {} {}",
        Channel::codes(&entry.sides),
        entry.number,
        entry.bet_type,
        entry.stake_kind,
        entry.stake.to_canonical_string(),
        entry.win_amount.to_fixed(2),
        entry.position,
    )
}

pub fn format_description(entries: &[WinningEntry]) -> String {
    entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join(ENTRY_SEPARATOR)
}

fn parse_entry(text: &str) -> Option<WinningEntry> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let [sides, number, bet_type, kind, stake, "=", win, position] = tokens.as_slice() else {
        return None;
    };

    let sides = Channel::parse_codes(sides).filter(|s| !s.is_empty())?;
    let stake_kind: StakeKind = kind.parse().ok()?;
    let mode = stake_kind.mode();
    if number.len() != mode.digits() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    Some(WinningEntry {
        number: number.to_string(),
        mode,
        position: position.parse::<Position>().ok()?,
        sides,
        bet_type: bet_type.parse::<BetType>().ok()?,
        stake_kind,
        stake: Decimal::from_str_canonical(stake).ok()?,
        win_amount: Decimal::from_str_canonical(win).ok()?,
    })
}

/// Parse a stored description back into entries.
///
/// Returns `None` unless every entry matches the payout format.
pub fn parse_description(description: &str) -> Option<Vec<WinningEntry>> {
    if description.trim().is_empty() {
        return None;
    }
    description.split(ENTRY_SEPARATOR).map(parse_entry).collect()
}

/// Re-derive a payout from its description with per-entry win overrides.
///
/// `Ok(None)` means the description is not a payout.
pub fn reprice_description(
    description: &str,
    edits: &[(usize, Decimal)],
) -> Result<Option<PayoutSession>, PayoutError> {
    let Some(entries) = parse_description(description) else {
        return Ok(None);
    };
    let mut session = PayoutSession::from_entries(entries)?;
    for (index, amount) in edits {
        session.set_win_amount(*index, *amount)?;
    }
    Ok(Some(session))
}
