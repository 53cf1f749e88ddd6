//! The month view: a calendar month of expense entries with the month's
//! total, a per-category breakdown and an index of every month in the ledger.

mod chart;
mod page;
mod summary;

pub use page::get_month_page;
