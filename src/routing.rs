//! Application router configuration.

use axum::{
    Router,
    extract::State,
    response::Response,
    routing::{get, post},
};

use crate::{
    AppState, Error,
    clock::Clock,
    endpoints::{self, redirect_to_month},
    internal_server_error::get_internal_server_error_page,
    item::{add_item_endpoint, delete_item_endpoint},
    month::YearMonth,
    month_view::get_month_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::MONTH_VIEW, get(get_month_page))
        .route(endpoints::ADD_ITEM, post(add_item_endpoint))
        .route(endpoints::DELETE_ITEM, post(delete_item_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the current month's view.
async fn get_index_page(State(clock): State<Clock>) -> Result<Response, Error> {
    let current_month = YearMonth::containing(clock.today()?)?;

    Ok(redirect_to_month(current_month))
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{AppState, clock::Clock, item::count_items, routing::build_router};

    fn get_test_server() -> (TestServer, AppState) {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, Clock::Fixed(date!(2024 - 03 - 20))).unwrap();
        let server = TestServer::try_new(build_router(state.clone())).unwrap();

        (server, state)
    }

    fn row_count(state: &AppState) -> u32 {
        count_items(&state.db_connection.lock().unwrap()).unwrap()
    }

    fn item_ids(page: &str) -> Vec<String> {
        Html::parse_document(page)
            .select(&Selector::parse("#items tbody tr").unwrap())
            .filter_map(|row| row.value().attr("data-item-id").map(str::to_owned))
            .collect()
    }

    #[tokio::test]
    async fn root_redirects_to_month_view() {
        let (server, _) = get_test_server();

        let response = server.get("/").await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/month?year=2024&month=3");
    }

    #[tokio::test]
    async fn added_item_shows_in_its_month() {
        let (server, state) = get_test_server();

        let response = server
            .post("/add")
            .form(&[
                ("date", "2024-03-15"),
                ("category", "食費"),
                ("amount", "500"),
                ("memo", "lunch"),
            ])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/month?year=2024&month=3");
        assert_eq!(row_count(&state), 1);

        let page = server.get("/month?year=2024&month=3").await;
        page.assert_status_ok();
        let text = page.text();
        assert_eq!(item_ids(&text).len(), 1);
        assert!(text.contains("lunch"));
        assert!(text.contains("¥500"));
    }

    #[tokio::test]
    async fn invalid_amount_inserts_nothing() {
        let (server, state) = get_test_server();

        let response = server
            .post("/add")
            .form(&[("date", "2024-03-15"), ("amount", "12ab")])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(row_count(&state), 0);
    }

    #[tokio::test]
    async fn deleted_item_disappears_from_month() {
        let (server, state) = get_test_server();
        server
            .post("/add")
            .form(&[("date", "2024-03-15"), ("amount", "500")])
            .await;
        let page = server.get("/month?year=2024&month=3").await.text();
        let id = item_ids(&page).pop().expect("added item not listed");

        let response = server
            .post(&format!("/delete/{id}"))
            .form(&[("redirect_year", "2024"), ("redirect_month", "3")])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/month?year=2024&month=3");
        assert_eq!(row_count(&state), 0);
        let page = server.get("/month?year=2024&month=3").await.text();
        assert!(item_ids(&page).is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_item_redirects() {
        let (server, _) = get_test_server();

        let response = server
            .post("/delete/42")
            .form(&[("redirect_year", ""), ("redirect_month", "")])
            .await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/month?year=2024&month=3");
    }

    #[tokio::test]
    async fn add_without_form_body_redirects_to_current_month() {
        let (server, state) = get_test_server();

        let response = server.post("/add").await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/month?year=2024&month=3");
        assert_eq!(row_count(&state), 0);
    }

    #[tokio::test]
    async fn delete_without_form_body_deletes_and_redirects() {
        let (server, state) = get_test_server();
        server
            .post("/add")
            .form(&[("date", "2024-01-15"), ("amount", "500")])
            .await;
        let page = server.get("/month?year=2024&month=1").await.text();
        let id = item_ids(&page).pop().expect("added item not listed");

        let response = server.post(&format!("/delete/{id}")).await;

        response.assert_status(StatusCode::FOUND);
        assert_eq!(response.header("location"), "/month?year=2024&month=3");
        assert_eq!(row_count(&state), 0);
    }

    #[tokio::test]
    async fn delete_with_non_integer_id_returns_404() {
        let (server, _) = get_test_server();

        let response = server
            .post("/delete/abc")
            .form(&[("redirect_year", "2024"), ("redirect_month", "3")])
            .await;

        response.assert_status_not_found();
    }

    #[tokio::test]
    async fn full_width_amount_is_added() {
        let (server, state) = get_test_server();

        server
            .post("/add")
            .form(&[("date", "2024-03-15"), ("amount", "１０００")])
            .await;

        let amount: i64 = state
            .db_connection
            .lock()
            .unwrap()
            .query_row("SELECT amount FROM items", [], |row| row.get(0))
            .unwrap();
        assert_eq!(amount, 1000);
    }

    #[tokio::test]
    async fn month_with_malformed_stored_date_still_renders() {
        let (server, state) = get_test_server();
        state
            .db_connection
            .lock()
            .unwrap()
            .execute(
                "INSERT INTO items (date, category, amount) VALUES ('2024-03-1', 'Food', 10)",
                [],
            )
            .unwrap();

        let response = server.get("/month?year=2024&month=3").await;

        response.assert_status_ok();
        let page = Html::parse_document(&response.text());
        let dates: Vec<String> = page
            .select(&Selector::parse("#items tbody tr td:first-child").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(dates, vec!["2024-03-20".to_owned()]);
    }

    #[tokio::test]
    async fn error_page_returns_500() {
        let (server, _) = get_test_server();

        let response = server.get("/error").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let (server, _) = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status_not_found();
    }
}
