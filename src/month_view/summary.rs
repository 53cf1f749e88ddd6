//! Builds the read model for a month view.

use rusqlite::Connection;
use time::Date;

use crate::{
    Error,
    item::{
        CategoryTotal, ExpenseItem, MonthTotal, get_category_totals, get_items_in_range,
        get_month_index, get_month_total,
    },
    month::YearMonth,
};

/// Everything needed to render a month view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSummary {
    /// The month being viewed.
    pub year_month: YearMonth,
    /// The entries dated in the month, most recent first.
    pub items: Vec<ExpenseItem>,
    /// The sum of the amounts of `items`.
    pub total: i64,
    /// The totals per category for the month, largest first.
    pub category_totals: Vec<CategoryTotal>,
    /// Every month in the ledger with its total, most recent first.
    pub month_index: Vec<MonthTotal>,
}

/// Query the entries and totals for `year_month`.
///
/// Run this inside a single transaction so that the entries, totals and
/// index all describe the same state of the ledger. Entries with an
/// unreadable stored date are listed as dated `today`.
pub fn get_month_summary(
    year_month: YearMonth,
    today: Date,
    connection: &Connection,
) -> Result<MonthSummary, Error> {
    let range = year_month.range();

    let items = get_items_in_range(range, today, connection)
        .inspect_err(|error| tracing::error!("Could not get entries for {year_month}: {error}"))?;
    let total = get_month_total(range, connection)
        .inspect_err(|error| tracing::error!("Could not get total for {year_month}: {error}"))?;
    let category_totals = get_category_totals(range, connection).inspect_err(|error| {
        tracing::error!("Could not get category totals for {year_month}: {error}")
    })?;
    let month_index = get_month_index(connection)
        .inspect_err(|error| tracing::error!("Could not get month index: {error}"))?;

    Ok(MonthSummary {
        year_month,
        items,
        total,
        category_totals,
        month_index,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        db::initialize,
        item::{ExpenseItem, NewExpenseItem, UNCATEGORIZED, insert_item},
        month::YearMonth,
    };

    use super::get_month_summary;

    const TODAY: Date = date!(2024 - 06 - 10);

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn insert(date: Date, category: &str, amount: i64, connection: &Connection) -> ExpenseItem {
        insert_item(
            NewExpenseItem {
                date,
                category: category.to_owned(),
                amount,
                memo: String::new(),
            },
            connection,
        )
        .unwrap()
    }

    #[test]
    fn summary_is_scoped_to_the_month() {
        let connection = get_test_connection();
        insert(date!(2024 - 01 - 31), "Food", 100, &connection);
        let first = insert(date!(2024 - 02 - 01), "Food", 200, &connection);
        let last = insert(date!(2024 - 02 - 29), "", 300, &connection);
        let february = YearMonth::new(2024, 2).unwrap();

        let summary = get_month_summary(february, TODAY, &connection).unwrap();

        assert_eq!(summary.year_month, february);
        assert_eq!(summary.items, vec![last, first]);
        assert_eq!(summary.total, 500);
        assert_eq!(
            summary.total,
            summary.items.iter().map(|item| item.amount).sum::<i64>()
        );
        let labels: Vec<_> = summary
            .category_totals
            .iter()
            .map(|category| category.label.as_str())
            .collect();
        assert_eq!(labels, vec![UNCATEGORIZED, "Food"]);
        assert_eq!(summary.month_index.len(), 2);
    }

    #[test]
    fn every_item_is_within_the_range() {
        let connection = get_test_connection();
        for day in [
            date!(2024 - 02 - 28),
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 31),
            date!(2024 - 04 - 01),
        ] {
            insert(day, "", 1, &connection);
        }
        let march = YearMonth::new(2024, 3).unwrap();

        let summary = get_month_summary(march, TODAY, &connection).unwrap();

        assert_eq!(summary.items.len(), 2);
        assert!(summary.items.iter().all(|item| march.range().contains(item.date)));
    }

    #[test]
    fn empty_month_has_zero_total_but_keeps_index() {
        let connection = get_test_connection();
        insert(date!(2024 - 01 - 15), "Food", 100, &connection);
        let june = YearMonth::new(2024, 6).unwrap();

        let summary = get_month_summary(june, TODAY, &connection).unwrap();

        assert!(summary.items.is_empty());
        assert_eq!(summary.total, 0);
        assert!(summary.category_totals.is_empty());
        assert_eq!(summary.month_index.len(), 1);
    }
}
