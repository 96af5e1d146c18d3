//! Intraday price chart rendered as an embeddable Plotly fragment

use crate::error::Result;
use crate::market::{PriceSeries, TIMESTAMP_FORMAT};
use minijinja::{Environment, Value, context};
use serde_json::json;
use uuid::Uuid;

const CHART_TEMPLATE: &str = include_str!("../templates/chart.html");
const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Plotly figure for a closing-price line chart
///
/// Points are emitted oldest first so the x axis reads left to right.
pub fn figure_json(series: &PriceSeries) -> serde_json::Value {
    let (x, y): (Vec<String>, Vec<f64>) = series
        .points()
        .iter()
        .rev()
        .map(|p| (p.timestamp.format(TIMESTAMP_FORMAT).to_string(), p.close))
        .unzip();

    json!({
        "data": [{
            "type": "scatter",
            "mode": "lines",
            "name": "Closing Price",
            "x": x,
            "y": y,
            "line": {"color": "red"}
        }],
        "layout": {
            "title": {"text": format!("{} Intraday Stock Data (5-min Interval)", series.symbol)},
            "xaxis": {
                "title": {"text": "Time"},
                "rangeslider": {"visible": true}
            },
            "yaxis": {"title": {"text": "Price (USD)"}},
            "template": "seaborn"
        }
    })
}

/// Render `<div>` + `<script>` markup drawing the series
pub fn render_price_chart(series: &PriceSeries) -> Result<String> {
    let figure = script_safe(&serde_json::to_string(&figure_json(series))?);

    let mut env = Environment::new();
    env.add_template("chart.html", CHART_TEMPLATE)?;
    let html = env.get_template("chart.html")?.render(context! {
        div_id => format!("chart-{}", Uuid::new_v4()),
        plotly_src => PLOTLY_SRC,
        figure => Value::from_safe_string(figure),
    })?;
    Ok(html)
}

// JSON inside <script> must not be able to close the tag
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::PricePoint;
    use chrono::NaiveDateTime;

    fn series(symbol: &str) -> PriceSeries {
        let point = |ts: &str, close: f64| PricePoint {
            timestamp: NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 100,
        };
        PriceSeries::new(
            symbol,
            vec![point("2024-05-01 16:00:00", 195.0), point("2024-05-01 09:35:00", 190.0)],
        )
    }

    #[test]
    fn test_figure_is_chronological() {
        let figure = figure_json(&series("AAPL"));
        let trace = &figure["data"][0];
        assert_eq!(trace["x"][0], "2024-05-01 09:35:00");
        assert_eq!(trace["y"][0], 190.0);
        assert_eq!(trace["y"][1], 195.0);
        assert_eq!(trace["mode"], "lines");
        assert_eq!(figure["layout"]["xaxis"]["rangeslider"]["visible"], true);
        assert_eq!(
            figure["layout"]["title"]["text"],
            "AAPL Intraday Stock Data (5-min Interval)"
        );
    }

    #[test]
    fn test_render_fragment() {
        let html = render_price_chart(&series("AAPL")).unwrap();
        assert!(html.contains("<div id=\"chart-"));
        assert!(html.contains("cdn.plot.ly"));
        assert!(html.contains("\"Closing Price\""));
        assert!(html.contains("Plotly.newPlot"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = render_price_chart(&series("AAPL")).unwrap();
        let b = render_price_chart(&series("AAPL")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_script_breakout_escaped() {
        let html = render_price_chart(&series("</script><b>")).unwrap();
        assert!(!html.contains("</script><b>"));
        assert!(html.contains("\\u003c/script\\u003e"));
    }
}
