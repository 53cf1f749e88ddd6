//! The page that lists the expense entries for one month.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    clock::Clock,
    db::unit_of_work,
    endpoints::{self, format_endpoint, format_month_view},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_yen, link,
    },
    item::{CategoryTotal, ExpenseItem, MonthTotal},
    month::{YearMonth, format_iso_date, parse_positive_int, resolve_year_month},
    month_view::{
        chart::{CATEGORY_CHART_ID, ECHARTS_SCRIPT, category_chart, chart_script},
        summary::{MonthSummary, get_month_summary},
    },
};

/// The state needed for displaying the month view.
#[derive(Debug, Clone)]
pub struct MonthViewState {
    /// The database connection for reading expense entries.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Supplies the month to show when the query does not name one.
    pub clock: Clock,
}

impl FromRef<AppState> for MonthViewState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            clock: state.clock.clone(),
        }
    }
}

/// The query parameters for the month view.
///
/// Kept as raw text so that junk like `?year=abc` falls back to the current
/// month instead of being rejected.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The year to show, e.g. 2024.
    pub year: Option<String>,
    /// The 1-based month to show.
    pub month: Option<String>,
}

/// Display the entries, totals and category breakdown for a month.
pub async fn get_month_page(
    State(state): State<MonthViewState>,
    Query(query): Query<MonthQuery>,
) -> Result<Response, Error> {
    let today = state.clock.today()?;
    let year_month = resolve_year_month(
        parse_positive_int(query.year.as_deref()),
        parse_positive_int(query.month.as_deref()),
        today,
    )?;

    let summary = unit_of_work(&state.db_connection, |transaction| {
        get_month_summary(year_month, today, transaction)
    })?;

    Ok(month_view(&summary, today).into_response())
}

fn month_view(summary: &MonthSummary, today: Date) -> Markup {
    let year_month = summary.year_month;
    let title = year_month.name();

    let mut head_elements = Vec::new();
    if !summary.category_totals.is_empty() {
        let chart = category_chart(&summary.category_totals);
        head_elements.push(HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()));
        head_elements.push(chart_script(CATEGORY_CHART_ID, &chart));
    }

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-4xl space-y-8"
            {
                (month_header(year_month))

                (month_selector(year_month, &summary.month_index))

                section class="text-center"
                {
                    h2 class="text-lg font-semibold" { "Total" }
                    p id="month-total" class="text-3xl font-bold" { (format_yen(summary.total)) }
                }

                @if !summary.category_totals.is_empty() {
                    (category_breakdown(&summary.category_totals))
                }

                (add_item_form(year_month, default_entry_date(year_month, today)))

                (items_table(year_month, &summary.items))
            }
        }
    };

    base(&title, &head_elements, &content)
}

/// The date pre-filled in the add form: today if it is in the month being
/// viewed, otherwise the first day of that month.
fn default_entry_date(year_month: YearMonth, today: Date) -> Date {
    let range = year_month.range();

    if range.contains(today) {
        today
    } else {
        range.start
    }
}

fn month_header(year_month: YearMonth) -> Markup {
    html! {
        header class="flex items-center justify-between"
        {
            @if let Some(previous) = year_month.previous() {
                (link(&format_month_view(previous), "← Previous"))
            } @else {
                span {}
            }

            h1 class="text-2xl font-bold" { (year_month.name()) }

            @if let Some(next) = year_month.next() {
                (link(&format_month_view(next), "Next →"))
            } @else {
                span {}
            }
        }
    }
}

fn month_selector(year_month: YearMonth, month_index: &[MonthTotal]) -> Markup {
    html! {
        section
        {
            form
                method="get"
                action=(endpoints::MONTH_VIEW)
                class="flex items-end gap-4"
            {
                div
                {
                    label for="year" class=(FORM_LABEL_STYLE) { "Year" }
                    input
                        type="number"
                        name="year"
                        id="year"
                        min="1"
                        max="9999"
                        value=(year_month.year())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }
                    input
                        type="number"
                        name="month"
                        id="month"
                        min="1"
                        max="12"
                        value=(year_month.month())
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Go" }
                }
            }

            @if !month_index.is_empty() {
                ul id="month-index" class="flex flex-wrap gap-4 mt-4"
                {
                    @for month_total in month_index {
                        li
                        {
                            @if month_total.year_month == year_month {
                                span class="font-bold"
                                {
                                    (month_total.year_month) " (" (format_yen(month_total.total)) ")"
                                }
                            } @else {
                                (link(
                                    &format_month_view(month_total.year_month),
                                    &format!(
                                        "{} ({})",
                                        month_total.year_month,
                                        format_yen(month_total.total)
                                    ),
                                ))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn category_breakdown(category_totals: &[CategoryTotal]) -> Markup {
    html! {
        section class="grid gap-4 md:grid-cols-2"
        {
            div id=(CATEGORY_CHART_ID) class="min-h-[320px]" {}

            table id="category-totals" class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Total" }
                    }
                }

                tbody
                {
                    @for category in category_totals {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (category.label) }
                            td class=(TABLE_CELL_STYLE) { (format_yen(category.total)) }
                        }
                    }
                }
            }
        }
    }
}

fn add_item_form(year_month: YearMonth, default_date: Date) -> Markup {
    html! {
        section
        {
            h2 class="text-lg font-semibold mb-4" { "Add an expense" }

            form
                id="add-item-form"
                method="post"
                action=(endpoints::ADD_ITEM)
                class="grid gap-4 md:grid-cols-4"
            {
                input type="hidden" name="redirect_year" value=(year_month.year());
                input type="hidden" name="redirect_month" value=(year_month.month());

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                    input
                        type="date"
                        name="date"
                        id="date"
                        required
                        value=(format_iso_date(default_date))
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                    input
                        type="text"
                        name="category"
                        id="category"
                        placeholder="e.g. 食費"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount (¥)" }
                    input
                        type="text"
                        name="amount"
                        id="amount"
                        inputmode="numeric"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="memo" class=(FORM_LABEL_STYLE) { "Memo" }
                    input
                        type="text"
                        name="memo"
                        id="memo"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="md:col-span-4"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add" }
                }
            }
        }
    }
}

fn items_table(year_month: YearMonth, items: &[ExpenseItem]) -> Markup {
    html! {
        section
        {
            @if items.is_empty() {
                p class="text-center text-gray-500 dark:text-gray-400"
                {
                    "No expenses recorded for " (year_month.name()) "."
                }
            } @else {
                table id="items" class="w-full text-sm text-left"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Memo" }
                            th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                        }
                    }

                    tbody
                    {
                        @for item in items {
                            tr class=(TABLE_ROW_STYLE) data-item-id=(item.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (format_iso_date(item.date)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    span class=(CATEGORY_BADGE_STYLE) { (item.category_label()) }
                                }
                                td class=(TABLE_CELL_STYLE) { (format_yen(item.amount)) }
                                td class=(TABLE_CELL_STYLE) { (item.memo) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    form
                                        method="post"
                                        action=(format_endpoint(endpoints::DELETE_ITEM, item.id))
                                    {
                                        input type="hidden" name="redirect_year" value=(year_month.year());
                                        input type="hidden" name="redirect_month" value=(year_month.month());
                                        button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
