//! The category breakdown chart for the month view.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! initialised by an inline script once the page has loaded.

use charming::{
    Chart,
    component::Legend,
    element::{JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::PreEscaped;

use crate::{html::HeadElement, item::CategoryTotal};

/// The HTML element ID of the container for the category chart.
pub(super) const CATEGORY_CHART_ID: &str = "category-chart";

/// The ECharts bundle that renders the chart options.
pub(super) const ECHARTS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/echarts@5.5.1/dist/echarts.min.js";

/// A doughnut chart with one slice per category.
pub(super) fn category_chart(category_totals: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = category_totals
        .iter()
        .map(|category| (category.total as f64, category.label.as_str()))
        .collect();

    Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(yen_formatter()),
        )
        .legend(Legend::new().top("5%").left("center"))
        .series(
            Pie::new()
                .name("Expenses by category")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// Generates the JavaScript that draws `chart` into the element with `chart_id`.
///
/// The chart follows the browser's dark mode setting and resizes with the window.
pub(super) fn chart_script(chart_id: &str, chart: &Chart) -> HeadElement {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{chart_id}");
            if (!chartDom) {{
                return;
            }}

            const chart = echarts.init(chartDom);
            const option = {chart};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }}
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

fn yen_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('ja-JP', {
              style: 'currency',
              currency: 'JPY'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
