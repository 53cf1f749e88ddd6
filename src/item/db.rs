//! Database operations for expense entries.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    item::{CategoryTotal, ExpenseItem, ItemId, MonthTotal, NewExpenseItem, UNCATEGORIZED},
    month::{MonthRange, YearMonth, format_iso_date, parse_date_or_today},
};

type RowsAffected = usize;

/// Initialize the items table and indexes.
pub fn create_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            category TEXT,
            amount INTEGER NOT NULL,
            memo TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_items_date ON items(date);",
    )?;

    Ok(())
}

/// Insert an expense entry and return it with its generated ID.
pub fn insert_item(item: NewExpenseItem, connection: &Connection) -> Result<ExpenseItem, Error> {
    connection.execute(
        "INSERT INTO items (date, category, amount, memo) VALUES (?1, ?2, ?3, ?4)",
        (item.date, &item.category, item.amount, &item.memo),
    )?;

    let id = connection.last_insert_rowid();

    Ok(ExpenseItem {
        id,
        date: item.date,
        category: item.category,
        amount: item.amount,
        memo: item.memo,
    })
}

/// Delete an expense entry by ID and return the number of deleted rows.
///
/// Deleting an ID that does not exist is not an error, zero is returned instead.
pub fn delete_item(id: ItemId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM items WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Retrieve the entries dated within `range`, most recent first.
///
/// Entries on the same day are ordered by descending ID so that the most
/// recently inserted entry comes first. A stored date that is not a valid
/// "YYYY-MM-DD" date is read as `today`.
pub fn get_items_in_range(
    range: MonthRange,
    today: Date,
    connection: &Connection,
) -> Result<Vec<ExpenseItem>, Error> {
    connection
        .prepare(
            "SELECT id, date, category, amount, memo
            FROM items
            WHERE date >= :start AND date < :end
            ORDER BY date DESC, id DESC",
        )?
        .query_map(
            &[(":start", &range.start), (":end", &range.end)],
            |row| map_item_row(row, today),
        )?
        .map(|maybe_item| maybe_item.map_err(|error| error.into()))
        .collect()
}

/// The sum of the amounts of the entries dated within `range`, zero if there are none.
pub fn get_month_total(range: MonthRange, connection: &Connection) -> Result<i64, Error> {
    connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0)
            FROM items
            WHERE date >= :start AND date < :end",
        )?
        .query_row(&[(":start", &range.start), (":end", &range.end)], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// The total per category for the entries dated within `range`, largest first.
///
/// Entries with a missing or empty category are grouped under [UNCATEGORIZED].
pub fn get_category_totals(
    range: MonthRange,
    connection: &Connection,
) -> Result<Vec<CategoryTotal>, Error> {
    connection
        .prepare(
            "SELECT
                COALESCE(NULLIF(category, ''), :uncategorized) AS label,
                SUM(amount) AS total
            FROM items
            WHERE date >= :start AND date < :end
            GROUP BY label
            ORDER BY total DESC, label ASC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":uncategorized": UNCATEGORIZED,
                ":start": range.start,
                ":end": range.end,
            },
            |row| {
                Ok(CategoryTotal {
                    label: row.get(0)?,
                    total: row.get(1)?,
                })
            },
        )?
        .map(|maybe_total| maybe_total.map_err(|error| error.into()))
        .collect()
}

/// Every month that has at least one entry, paired with its total, most recent first.
///
/// This covers the whole ledger, not just a single month.
pub fn get_month_index(connection: &Connection) -> Result<Vec<MonthTotal>, Error> {
    let rows = connection
        .prepare(
            "SELECT substr(date, 1, 7) AS year_month, SUM(amount) AS total
            FROM items
            GROUP BY year_month
            ORDER BY year_month DESC",
        )?
        .query_map([], |row| {
            let year_month: String = row.get(0)?;
            let total: i64 = row.get(1)?;

            Ok((year_month, total))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let month_index = rows
        .into_iter()
        .filter_map(|(raw_year_month, total)| match YearMonth::parse(&raw_year_month) {
            Some(year_month) => Some(MonthTotal { year_month, total }),
            None => {
                tracing::warn!("Skipping entries with unrecognised month {raw_year_month:?}");
                None
            }
        })
        .collect();

    Ok(month_index)
}

/// Retrieve a single entry by ID.
///
/// A stored date that is not a valid "YYYY-MM-DD" date is read as `Date::MIN`.
#[cfg(test)]
pub fn get_item(id: ItemId, connection: &Connection) -> Result<ExpenseItem, Error> {
    connection
        .prepare("SELECT id, date, category, amount, memo FROM items WHERE id = :id")?
        .query_row(&[(":id", &id)], |row| map_item_row(row, Date::MIN))
        .map_err(|error| error.into())
}

/// The number of entries in the ledger.
#[cfg(test)]
pub fn count_items(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM items;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

fn map_item_row(row: &Row, fallback_date: Date) -> Result<ExpenseItem, rusqlite::Error> {
    let id: ItemId = row.get(0)?;
    let raw_date: String = row.get(1)?;
    let category: Option<String> = row.get(2)?;
    let memo: Option<String> = row.get(4)?;

    let date = parse_date_or_today(Some(&raw_date), fallback_date);
    if format_iso_date(date) != raw_date {
        tracing::warn!(
            "Expense entry {id} has unrecognised date {raw_date:?}, reading it as {date}"
        );
    }

    Ok(ExpenseItem {
        id,
        date,
        category: category.unwrap_or_default(),
        amount: row.get(3)?,
        memo: memo.unwrap_or_default(),
    })
}
