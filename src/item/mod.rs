//! Expense entries: the ledger's only persisted entity.

mod add_endpoint;
mod db;
mod delete_endpoint;
mod domain;

pub use add_endpoint::add_item_endpoint;
pub use db::{
    create_item_table, get_category_totals, get_items_in_range, get_month_index, get_month_total,
    insert_item,
};
pub use delete_endpoint::delete_item_endpoint;
pub use domain::{
    CategoryTotal, ExpenseItem, ItemId, MonthTotal, NewExpenseItem, UNCATEGORIZED, parse_amount,
};

#[cfg(test)]
pub use db::{count_items, get_item};
