//! Start year selector bounded by the selected country's record years.

use crate::state::AppState;
use dioxus::prelude::*;

/// Years offered for `range`, always including the current `start_year`.
pub fn year_options(range: Option<(i32, i32)>, start_year: i32) -> Vec<i32> {
    match range {
        Some((first, last)) => (first.min(start_year)..=last.max(start_year)).collect(),
        None => vec![start_year],
    }
}

#[component]
pub fn StartYearSelector() -> Element {
    let mut state = use_context::<AppState>();
    let start_year = (state.start_year)();
    let years = year_options((state.year_range)(), start_year);

    let on_change = move |evt: Event<FormData>| {
        if let Ok(year) = evt.value().parse::<i32>() {
            state.start_year.set(year);
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "start-year-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Since: "
            }
            select {
                id: "start-year-select",
                onchange: on_change,
                for year in years.into_iter() {
                    option {
                        value: "{year}",
                        selected: year == start_year,
                        "{year}"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_cover_the_record_range() {
        assert_eq!(year_options(Some((2018, 2020)), 2019), vec![2018, 2019, 2020]);
    }

    #[test]
    fn options_keep_a_start_year_outside_the_range() {
        assert_eq!(year_options(Some((2020, 2021)), 2023), vec![2020, 2021, 2022, 2023]);
        assert_eq!(year_options(Some((2020, 2021)), 2018), vec![2018, 2019, 2020, 2021]);
        assert_eq!(year_options(None, 1980), vec![1980]);
    }
}
