//! Defines the endpoint for deleting an expense entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::Response,
};
use axum_extra::extract::{Form, FormRejection};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    clock::Clock,
    db::unit_of_work,
    endpoints::redirect_to_month,
    item::{ItemId, db::delete_item},
    month::{YearMonth, parse_positive_int, redirect_target},
};

/// The state needed to delete an expense entry.
#[derive(Debug, Clone)]
pub struct DeleteItemState {
    /// The database connection for managing expense entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Decides the month to return to when the client does not name one.
    pub clock: Clock,
}

impl FromRef<AppState> for DeleteItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

/// The month view to return to after deleting an entry.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeleteItemForm {
    /// The year of the month view to return to.
    #[serde(default)]
    pub redirect_year: Option<String>,
    /// The month of the month view to return to.
    #[serde(default)]
    pub redirect_month: Option<String>,
}

/// A route handler for deleting an expense entry, redirects to a month view.
///
/// Deleting an entry that does not exist is not an error, but an ID that is
/// not an integer is treated as an unknown route. A missing or unreadable form
/// body is treated as an empty form.
pub async fn delete_item_endpoint(
    State(state): State<DeleteItemState>,
    item_id: Result<Path<ItemId>, PathRejection>,
    form: Result<Form<DeleteItemForm>, FormRejection>,
) -> Result<Response, Error> {
    let item_id = match item_id {
        Ok(Path(item_id)) => item_id,
        Err(rejection) => {
            tracing::debug!("Could not read expense entry ID: {rejection}");
            return Err(Error::NotFound);
        }
    };

    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::warn!("Could not read delete form, treating it as empty: {rejection}");
            DeleteItemForm::default()
        }
    };

    let rows_affected = unit_of_work(&state.db_connection, |connection| {
        delete_item(item_id, connection)
    })
    .inspect_err(|error| tracing::error!("Could not delete expense entry {item_id}: {error}"))?;

    if rows_affected == 0 {
        tracing::debug!("Tried to delete expense entry {item_id}, but it does not exist");
    }

    let return_to = match redirect_target(
        parse_positive_int(form.redirect_year.as_deref()),
        parse_positive_int(form.redirect_month.as_deref()),
    ) {
        Some(year_month) => year_month,
        None => YearMonth::containing(state.clock.today()?)?,
    };

    Ok(redirect_to_month(return_to))
}

#[cfg(test)]
mod delete_item_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        clock::Clock,
        db::initialize,
        item::{NewExpenseItem, count_items, get_item, insert_item},
        test_utils::get_header,
    };

    use super::{DeleteItemForm, DeleteItemState, delete_item_endpoint};

    fn get_test_state() -> DeleteItemState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        DeleteItemState {
            db_connection: Arc::new(Mutex::new(connection)),
            clock: Clock::Fixed(date!(2024 - 05 - 20)),
        }
    }

    fn redirect_form(year: &str, month: &str) -> DeleteItemForm {
        DeleteItemForm {
            redirect_year: Some(year.to_owned()),
            redirect_month: Some(month.to_owned()),
        }
    }

    #[tokio::test]
    async fn deletes_item_and_redirects_to_given_month() {
        let state = get_test_state();
        let item = insert_item(
            NewExpenseItem {
                date: date!(2024 - 03 - 15),
                category: "Food".to_owned(),
                amount: 500,
                memo: String::new(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_item_endpoint(
            State(state.clone()),
            Ok(Path(item.id)),
            Ok(Form(redirect_form("2024", "3"))),
        )
        .await
        .expect("handler failed");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(get_header(&response, "location"), "/month?year=2024&month=3");
        assert_eq!(
            get_item(item.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_item_is_silent() {
        let state = get_test_state();
        insert_item(
            NewExpenseItem {
                date: date!(2024 - 03 - 15),
                category: String::new(),
                amount: 500,
                memo: String::new(),
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_item_endpoint(
            State(state.clone()),
            Ok(Path(999)),
            Ok(Form(redirect_form("2024", "3"))),
        )
        .await
        .expect("deleting a missing item should not fail");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(count_items(&state.db_connection.lock().unwrap()), Ok(1));
    }

    #[tokio::test]
    async fn redirects_to_current_month_without_redirect_fields() {
        let state = get_test_state();

        let response = delete_item_endpoint(
            State(state),
            Ok(Path(1)),
            Ok(Form(DeleteItemForm::default())),
        )
        .await
        .expect("handler failed");

        assert_eq!(get_header(&response, "location"), "/month?year=2024&month=5");
    }

    #[tokio::test]
    async fn invalid_redirect_fields_fall_back_to_current_month() {
        let state = get_test_state();

        let response = delete_item_endpoint(
            State(state),
            Ok(Path(1)),
            Ok(Form(redirect_form("x", "3"))),
        )
        .await
        .expect("handler failed");

        assert_eq!(get_header(&response, "location"), "/month?year=2024&month=5");
    }
}
