// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the ferretdex CLI.
//!
//! Reproduces the original's `Search.print_results`: rank, score, URL, and
//! per-term TF-IDF values sorted descending, with a "... and N more"
//! footer when the corpus has more matches than were printed. Colors
//! respect `NO_COLOR` and fall back to plain text on non-TTY output
//! (piping into a file or another program shouldn't embed escape codes).

use std::sync::OnceLock;

use crate::types::ScoredDocument;

/// Terminal color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("FERRETDEX_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }
    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
}
pub use colors::*;

mod onedark {
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);
}

mod onelight {
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(CYAN);
theme_color!(GRAY);

/// Whether colors should be used (respects `NO_COLOR` and TTY detection).
pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.join(""), text, RESET)
    } else {
        text.to_string()
    }
}

pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Color-coded cosine*TF-IDF score.
pub fn score_value(score: f64) -> String {
    if !use_colors() {
        return format!("{:.4}", score);
    }
    let color = if score >= 0.5 {
        GREEN()
    } else if score >= 0.1 {
        YELLOW()
    } else {
        GRAY()
    };
    format!("{}{:.4}{}", color, score, RESET)
}

/// Print one ranked hit: rank, score, URL, and its per-term TF-IDF map
/// sorted by descending weight.
pub fn print_result(rank: usize, doc: &ScoredDocument) {
    let rank_label = styled(&[BOLD], &format!("{:>3}.", rank));
    println!("{} {}  {}", rank_label, score_value(doc.score), doc.url);

    let mut terms: Vec<(&String, &f64)> = doc.term_scores.iter().collect();
    terms.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (term, weight) in terms {
        println!("      {} {:.4}", themed(CYAN, &[], term), weight);
    }
}

/// Print a full ranked result page, with a truncation footer when
/// `total_matches` exceeds the number of rows actually printed.
pub fn print_results(results: &[ScoredDocument], offset: usize, total_matches: usize) {
    if results.is_empty() {
        println!("{}", themed(GRAY, &[], "No results."));
        return;
    }
    for (i, doc) in results.iter().enumerate() {
        print_result(offset + i + 1, doc);
    }
    let shown = offset + results.len();
    if total_matches > shown {
        println!(
            "{}",
            themed(GRAY, &[], &format!("... and {} more", total_matches - shown))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_formats_escape_code() {
        assert_eq!(rgb(255, 128, 64), "\x1b[38;2;255;128;64m");
    }

    #[test]
    fn theme_colors_are_different() {
        assert_ne!(onedark::GREEN, onelight::GREEN);
        assert_ne!(onedark::BLUE, onelight::BLUE);
    }
}
