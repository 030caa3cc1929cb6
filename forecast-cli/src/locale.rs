//! Fixed display locales for day headings.

use chrono::{Datelike, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayLocale {
    French,
    English,
}

impl DisplayLocale {
    /// Unknown language codes fall back to English headings.
    pub fn from_lang(lang: &str) -> Self {
        match lang.to_lowercase().split(['-', '_']).next() {
            Some("fr") => DisplayLocale::French,
            _ => DisplayLocale::English,
        }
    }

    fn weekday(self, day: Weekday) -> &'static str {
        let idx = day.num_days_from_monday() as usize;
        match self {
            DisplayLocale::French => {
                ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"][idx]
            }
            DisplayLocale::English => {
                ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"][idx]
            }
        }
    }

    fn month(self, month0: u32) -> &'static str {
        const FR: [&str; 12] = [
            "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
            "octobre", "novembre", "décembre",
        ];
        const EN: [&str; 12] = [
            "January", "February", "March", "April", "May", "June", "July", "August",
            "September", "October", "November", "December",
        ];
        match self {
            DisplayLocale::French => FR[month0 as usize],
            DisplayLocale::English => EN[month0 as usize],
        }
    }

    /// "Vendredi 1 mars" / "Friday, March 1".
    pub fn day_heading(self, date: NaiveDate) -> String {
        let weekday = self.weekday(date.weekday());
        let month = self.month(date.month0());
        let heading = match self {
            DisplayLocale::French => format!("{weekday} {} {month}", date.day()),
            DisplayLocale::English => format!("{weekday}, {month} {}", date.day()),
        };
        capitalize_first(&heading)
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
