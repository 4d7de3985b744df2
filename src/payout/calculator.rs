//! Pricing of bet requests and the session that accumulates them.

use crate::domain::Decimal;
use crate::payout::description::format_description;
use crate::payout::permutations::permutation_count;
use crate::payout::tables::multiplier;
use crate::payout::{BetRequest, BetType, PayoutError, WinningEntry};
use std::collections::HashSet;
use tracing::debug;

fn validate(request: &BetRequest) -> Result<u32, PayoutError> {
    let digits = request.number.chars().count();
    if digits != request.mode.digits() {
        return Err(PayoutError::InvalidNumberLength {
            mode: request.mode,
            expected: request.mode.digits(),
            actual: digits,
        });
    }
    if !request.number.chars().all(|c| c.is_ascii_digit()) {
        return Err(PayoutError::NonDigitNumber(request.number.clone()));
    }

    if request.sides.is_empty() {
        return Err(PayoutError::NoSides);
    }
    let mut seen_sides = HashSet::new();
    for side in &request.sides {
        if !seen_sides.insert(*side) {
            return Err(PayoutError::DuplicateSide(*side));
        }
    }

    if request.stakes.is_empty() {
        return Err(PayoutError::NoStakes);
    }
    let mut seen_kinds = HashSet::new();
    for stake in &request.stakes {
        if stake.kind.mode() != request.mode {
            return Err(PayoutError::StakeModeMismatch {
                kind: stake.kind,
                mode: request.mode,
            });
        }
        if !seen_kinds.insert(stake.kind) {
            return Err(PayoutError::DuplicateStake(stake.kind));
        }
        if !stake.amount.is_positive() {
            return Err(PayoutError::NonPositiveStake(stake.kind));
        }
    }

    permutation_count(&request.number).ok_or(PayoutError::InvalidNumberLength {
        mode: request.mode,
        expected: request.mode.digits(),
        actual: digits,
    })
}

/// Price a bet request into zero or more winning entries.
///
/// `win = (effective_stake / sides) * multiplier`, where the effective stake
/// is the stake itself for Straight and Pau, and the stake divided by the
/// permutation count for Box. Wins are rounded to 2 decimal places, half
/// away from zero, so the stored total matches the description. Stake kinds
/// with no multiplier at the position and non-positive wins are omitted
/// without error.
pub fn calculate(request: &BetRequest) -> Result<Vec<WinningEntry>, PayoutError> {
    let permutations = Decimal::from_i64(i64::from(validate(request)?));
    let sides = Decimal::from_i64(request.sides.len() as i64);

    let mut entries = Vec::new();
    for stake in &request.stakes {
        let Some(rate) = multiplier(stake.kind, request.position) else {
            debug!(
                kind = %stake.kind,
                position = %request.position,
                "No multiplier for stake at position, skipping"
            );
            continue;
        };

        let effective = match request.bet_type {
            BetType::Straight | BetType::Pau => Some(stake.amount),
            BetType::Box => stake.amount.checked_div(permutations),
        };
        let win_amount = effective
            .and_then(|e| e.checked_div(sides))
            .and_then(|e| e.checked_mul(rate))
            .ok_or(PayoutError::AmountOverflow)?
            .round_dp(2);
        if !win_amount.is_positive() {
            continue;
        }

        entries.push(WinningEntry {
            number: request.number.clone(),
            mode: request.mode,
            position: request.position,
            sides: request.sides.clone(),
            bet_type: request.bet_type,
            stake_kind: stake.kind,
            stake: stake.amount,
            win_amount,
        });
    }
    Ok(entries)
}

fn checked_total(entries: &[WinningEntry]) -> Option<Decimal> {
    entries
        .iter()
        .try_fold(Decimal::zero(), |acc, e| acc.checked_add(e.win_amount))
}

/// Entries accumulated before they are saved to the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayoutSession {
    entries: Vec<WinningEntry>,
}

impl PayoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from parsed entries. Fails if their total overflows.
    pub fn from_entries(entries: Vec<WinningEntry>) -> Result<Self, PayoutError> {
        checked_total(&entries).ok_or(PayoutError::AmountOverflow)?;
        Ok(Self { entries })
    }

    /// Price `request` and append its entries. Returns how many were added.
    ///
    /// The session is unchanged if pricing fails or the new total would
    /// overflow.
    pub fn add(&mut self, request: &BetRequest) -> Result<usize, PayoutError> {
        let priced = calculate(request)?;
        let combined = checked_total(&priced)
            .and_then(|added| added.checked_add(self.total_winnings()))
            .is_some();
        if !combined {
            return Err(PayoutError::AmountOverflow);
        }
        let added = priced.len();
        self.entries.extend(priced);
        Ok(added)
    }

    pub fn remove(&mut self, index: usize) -> Result<WinningEntry, PayoutError> {
        if index >= self.entries.len() {
            return Err(PayoutError::EntryOutOfRange(index));
        }
        Ok(self.entries.remove(index))
    }

    /// Override the win amount of one entry, as when correcting a saved payout.
    /// The amount is rounded to 2 decimal places.
    pub fn set_win_amount(&mut self, index: usize, amount: Decimal) -> Result<(), PayoutError> {
        if amount.is_negative() {
            return Err(PayoutError::NegativeWinAmount(index));
        }
        let amount = amount.round_dp(2);
        let current = self
            .entries
            .get(index)
            .ok_or(PayoutError::EntryOutOfRange(index))?
            .win_amount;
        // Replacing one entry can only overflow through the others.
        let others = self
            .entries
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .try_fold(amount, |acc, (_, e)| acc.checked_add(e.win_amount));
        if others.is_none() {
            return Err(PayoutError::AmountOverflow);
        }
        debug!(index, from = %current, to = %amount, "Win amount overridden");
        self.entries[index].win_amount = amount;
        Ok(())
    }

    pub fn entries(&self) -> &[WinningEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all win amounts. Every mutation keeps this within range.
    pub fn total_winnings(&self) -> Decimal {
        checked_total(&self.entries).unwrap_or_else(Decimal::zero)
    }

    pub fn description(&self) -> String {
        format_description(&self.entries)
    }
}
