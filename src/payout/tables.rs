//! Fixed payout multipliers per unit stake.

use crate::domain::Decimal;
use crate::payout::{Position, StakeKind};

/// Multiplier for a stake kind at a prize position.
///
/// `None` means the pair does not pay: Small at Special/Consolation, 3A
/// below first prize, and any 3D stake at a 4D-only tier. The draw mode is
/// implied by the stake kind.
pub fn multiplier(kind: StakeKind, position: Position) -> Option<Decimal> {
    let per_unit: i64 = match (kind, position) {
        (StakeKind::Big, Position::First) => 2750,
        (StakeKind::Big, Position::Second) => 1100,
        (StakeKind::Big, Position::Third) => 550,
        (StakeKind::Big, Position::Special) => 220,
        (StakeKind::Big, Position::Consolation) => 66,

        (StakeKind::Small, Position::First) => 3850,
        (StakeKind::Small, Position::Second) => 2200,
        (StakeKind::Small, Position::Third) => 1100,
        (StakeKind::Small, Position::Special | Position::Consolation) => 0,

        (StakeKind::ThreeA, Position::First) => 660,
        (StakeKind::ThreeA, _) => 0,

        (StakeKind::ThreeAbc, Position::First) => 250,
        (StakeKind::ThreeAbc, Position::Second) => 210,
        (StakeKind::ThreeAbc, Position::Third) => 150,
        (StakeKind::ThreeAbc, Position::Special | Position::Consolation) => 0,
    };
    (per_unit > 0).then(|| Decimal::from_i64(per_unit))
}
