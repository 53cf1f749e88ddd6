//! Defines the endpoint for adding an expense entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::Response,
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::{Form, FormRejection};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    clock::Clock,
    db::unit_of_work,
    endpoints::redirect_to_month,
    item::{NewExpenseItem, insert_item, parse_amount},
    month::{YearMonth, parse_date_or_today, parse_positive_int, redirect_target},
};

/// The state needed to add an expense entry.
#[derive(Debug, Clone)]
pub struct AddItemState {
    /// The database connection for managing expense entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Supplies the date for entries submitted without one.
    pub clock: Clock,
}

impl FromRef<AppState> for AddItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

/// The form data for adding an expense entry.
///
/// Every field is kept as raw text so that malformed input can be handled
/// leniently instead of rejecting the whole request.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AddItemForm {
    /// The date of the expense as "YYYY-MM-DD", defaults to today.
    #[serde(default)]
    pub date: Option<String>,
    /// The category of the expense.
    #[serde(default)]
    pub category: Option<String>,
    /// The amount in whole yen.
    #[serde(default)]
    pub amount: Option<String>,
    /// A note about the expense.
    #[serde(default)]
    pub memo: Option<String>,
    /// The year of the month view to return to.
    #[serde(default)]
    pub redirect_year: Option<String>,
    /// The month of the month view to return to.
    #[serde(default)]
    pub redirect_month: Option<String>,
}

/// A route handler for adding an expense entry.
///
/// Always redirects to a month view: the one named by the redirect fields if
/// given, otherwise the month of the entry's date. Nothing is inserted if the
/// amount is not a whole number of yen or the entry's month cannot be viewed.
/// A missing or unreadable form body is treated as an empty form.
pub async fn add_item_endpoint(
    State(state): State<AddItemState>,
    form: Result<Form<AddItemForm>, FormRejection>,
) -> Result<Response, Error> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!("Could not read expense entry form, treating it as empty: {rejection}");
            AddItemForm::default()
        }
    };

    let today = state.clock.today()?;
    let date = parse_date_or_today(form.date.as_deref(), today);
    let entry_month = YearMonth::containing(date).ok();

    let return_to = match redirect_target(
        parse_positive_int(form.redirect_year.as_deref()),
        parse_positive_int(form.redirect_month.as_deref()),
    ) {
        Some(year_month) => year_month,
        None => match entry_month {
            Some(year_month) => year_month,
            None => YearMonth::containing(today)?,
        },
    };

    if entry_month.is_none() {
        tracing::warn!("Ignoring expense entry dated {date}: its month cannot be viewed");
        return Ok(redirect_to_month(return_to));
    }

    let amount = match parse_amount(form.amount.as_deref().unwrap_or_default()) {
        Ok(amount) => amount,
        Err(error) => {
            tracing::warn!("Ignoring expense entry: {error}");
            return Ok(redirect_to_month(return_to));
        }
    };

    let new_item = NewExpenseItem {
        date,
        category: trimmed(form.category),
        amount,
        memo: trimmed(form.memo),
    };

    let item = unit_of_work(&state.db_connection, |connection| {
        insert_item(new_item, connection)
    })
    .inspect_err(|error| tracing::error!("could not add expense entry: {error}"))?;

    tracing::debug!("Added expense entry {} dated {}", item.id, item.date);

    Ok(redirect_to_month(return_to))
}

fn trimmed(text: Option<String>) -> String {
    text.as_deref().map(str::trim).unwrap_or_default().to_owned()
}
