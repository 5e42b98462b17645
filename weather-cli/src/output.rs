//! Terminal rendering of a [`ForecastView`].

use std::fmt::Write;

use classy_weather_core::{ForecastView, presenter};

const TITLE: &str = "Classy Weather";

pub fn render(view: &ForecastView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));

    let status = presenter::status_message(view);
    match view.location() {
        Some(location)
            if !view.display_location.is_empty() && !location.country_code.is_empty() =>
        {
            let _ = writeln!(
                out,
                "{status} {}",
                presenter::country_flag(&location.country_code)
            );
        }
        _ => {
            let _ = writeln!(out, "{status}");
        }
    }

    for row in presenter::visible_rows(view) {
        let _ = writeln!(out, "  {row}");
    }
    out.push('\n');

    out
}
