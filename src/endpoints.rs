//! The endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete/{item_id}', use [format_endpoint].

use axum::{
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::month::YearMonth;

/// The root route which redirects to the current month.
pub const ROOT: &str = "/";
/// The page for displaying the entries, totals and chart for one month.
pub const MONTH_VIEW: &str = "/month";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";

/// The route for adding an expense entry.
pub const ADD_ITEM: &str = "/add";
/// The route for deleting an expense entry.
pub const DELETE_ITEM: &str = "/delete/{item_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete/{item_id}', '{item_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// The URL of the month view for `year_month`, e.g. '/month?year=2024&month=3'.
pub fn format_month_view(year_month: YearMonth) -> String {
    let query = [
        ("year", year_month.year().to_string()),
        ("month", year_month.month().to_string()),
    ];

    match serde_urlencoded::to_string(query) {
        Ok(query) => format!("{MONTH_VIEW}?{query}"),
        Err(error) => {
            tracing::error!("Could not encode query for {year_month}: {error}");
            MONTH_VIEW.to_owned()
        }
    }
}

/// A "302 Found" response that sends the client to the month view for `year_month`.
pub fn redirect_to_month(year_month: YearMonth) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, format_month_view(year_month))],
    )
        .into_response()
}
