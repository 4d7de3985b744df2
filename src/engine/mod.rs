//! Pure computation over a client's ledger: synthesis, aggregation,
//! overrides, column balances, and reporting weeks.

pub mod aggregate;
pub mod balance;
pub mod overrides;
pub mod synthesizer;
pub mod weeks;

pub use aggregate::aggregate_sales;
pub use balance::{visible_balance, BalanceCalculator, ClientBalances, ColumnView, LedgerWindow};
pub use overrides::{OverrideTable, PriorBalanceRule};
pub use synthesizer::{merge_client_ledger, synthesize};
pub use weeks::{FixedWeekdayCalendar, WeekCalendar};
