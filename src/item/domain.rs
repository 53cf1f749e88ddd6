//! Domain types for expense entries.

use time::Date;

use crate::{Error, month::YearMonth};

/// Alias for the integer type used for expense entry IDs.
pub type ItemId = i64;

/// The label used for entries without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A single ledger entry: money spent on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseItem {
    /// The ID assigned by the database when the entry was inserted.
    pub id: ItemId,
    /// The day the money was spent.
    pub date: Date,
    /// A free-text label. May be empty, see [ExpenseItem::category_label].
    pub category: String,
    /// The amount spent in whole yen.
    pub amount: i64,
    /// A free-text note.
    pub memo: String,
}

impl ExpenseItem {
    /// The category to display, substituting [UNCATEGORIZED] for an empty category.
    pub fn category_label(&self) -> &str {
        if self.category.is_empty() {
            UNCATEGORIZED
        } else {
            &self.category
        }
    }
}

/// An expense entry that has not been inserted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpenseItem {
    /// The day the money was spent.
    pub date: Date,
    /// A free-text label, stored exactly as given.
    pub category: String,
    /// The amount spent in whole yen.
    pub amount: i64,
    /// A free-text note.
    pub memo: String,
}

/// The total spent in one category over some date range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The category, or [UNCATEGORIZED].
    pub label: String,
    /// The sum of the amounts in this category.
    pub total: i64,
}

/// The total spent in a calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTotal {
    /// The month.
    pub year_month: YearMonth,
    /// The sum of the amounts dated in this month.
    pub total: i64,
}

/// Parse an amount of yen entered by the user.
///
/// Surrounding whitespace is ignored. The rest of the text must be one or
/// more decimal digits, so signs, decimal points and separators are rejected.
/// Full-width digits, as typed with a Japanese input method, count as digits.
///
/// # Errors
/// Returns [Error::InvalidAmount] if `text` is not a string of digits or is
/// too large to store.
pub fn parse_amount(text: &str) -> Result<i64, Error> {
    let digits: Option<String> = text.trim().chars().map(to_ascii_digit).collect();

    match digits {
        Some(digits) if !digits.is_empty() => digits
            .parse()
            .map_err(|_| Error::InvalidAmount(text.to_owned())),
        _ => Err(Error::InvalidAmount(text.to_owned())),
    }
}

/// Map ASCII digits and full-width digits (U+FF10 to U+FF19) to ASCII digits.
fn to_ascii_digit(character: char) -> Option<char> {
    match character {
        '0'..='9' => Some(character),
        '０'..='９' => char::from_u32(character as u32 - '０' as u32 + '0' as u32),
        _ => None,
    }
}
