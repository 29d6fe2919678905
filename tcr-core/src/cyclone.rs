use serde::{Deserialize, Serialize};

/// One row per storm, derived from the storm's first track observation.
///
/// Several storms can share a name across seasons, so `label` combines the
/// display name with the year to keep them apart in tables and legends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cyclone {
    pub sid: String,
    /// Title-cased display name (e.g. "Winston").
    pub name: String,
    /// Year of the first observation.
    pub year: i32,
    /// "Name Year" label, e.g. "Winston 2016".
    pub label: String,
}

impl Cyclone {
    /// Build the index row for a storm from its raw name and first-observation year.
    pub fn new(sid: &str, raw_name: &str, year: i32) -> Self {
        let name = title_case(raw_name.trim());
        Cyclone {
            sid: sid.to_string(),
            label: storm_label(&name, year),
            name,
            year,
        }
    }
}

/// Compose the "Name Year" label shown for a storm.
pub fn storm_label(name: &str, year: i32) -> String {
    if name.is_empty() {
        format!("Unnamed {}", year)
    } else {
        format!("{} {}", name, year)
    }
}

/// Title-case a storm name: the first letter of each alphabetic run is
/// upper-cased and the rest lower-cased ("NOT_NAMED" -> "Not_Named").
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_basic() {
        assert_eq!(title_case("WINSTON"), "Winston");
        assert_eq!(title_case("winston"), "Winston");
        assert_eq!(title_case("NOT_NAMED"), "Not_Named");
        assert_eq!(title_case("TWENTY-TWO"), "Twenty-Two");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn cyclone_label_disambiguates_by_year() {
        let a = Cyclone::new("1985001S10170", "ERIC", 1985);
        let b = Cyclone::new("2003001S10170", "ERIC", 2003);
        assert_eq!(a.name, b.name);
        assert_eq!(a.label, "Eric 1985");
        assert_ne!(a.label, b.label);
    }

    #[test]
    fn unnamed_storm_label() {
        let c = Cyclone::new("X", "  ", 1990);
        assert_eq!(c.name, "");
        assert_eq!(c.label, "Unnamed 1990");
    }
}
