//! Rendering of ranking snapshots
//!
//! Presentation only: these functions take a finished `RankingSnapshot` and
//! never touch stored data. The first three ranked players get a gold, silver
//! and bronze crown in the HTML view.

use crate::error::LadderError;
use crate::rating::snapshot::{RankLabel, RankingSnapshot, SnapshotEntry};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Output format for standings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    #[default]
    Text,
    Html,
    Json,
}

impl std::str::FromStr for DisplayFormat {
    type Err = LadderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(DisplayFormat::Text),
            "html" => Ok(DisplayFormat::Html),
            "json" => Ok(DisplayFormat::Json),
            other => Err(LadderError::Configuration {
                message: format!("Unknown display format: {}", other),
            }),
        }
    }
}

const CROWNS: [&str; 3] = ["gold", "silver", "bronze"];

/// Column titles shared by the table renderers
const COLUMNS: [&str; 7] = [
    "Rank",
    "Player",
    "Ranking Points",
    "Wins",
    "Losses",
    "Draws",
    "Championships",
];

pub fn render(snapshot: &RankingSnapshot, format: DisplayFormat) -> Result<String> {
    match format {
        DisplayFormat::Text => Ok(render_text(snapshot)),
        DisplayFormat::Html => Ok(render_html(snapshot)),
        DisplayFormat::Json => render_json(snapshot),
    }
}

/// Crown colour for a ranked position, if it earns one
fn crown_for(label: RankLabel) -> Option<&'static str> {
    match label {
        RankLabel::Position(n) if (1..=CROWNS.len()).contains(&n) => Some(CROWNS[n - 1]),
        _ => None,
    }
}

/// Fixed-width plain text table
pub fn render_text(snapshot: &RankingSnapshot) -> String {
    let name_width = snapshot
        .entries()
        .map(|e| e.player.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Player".len());

    let mut out = String::from("# Ranking\n");
    let _ = writeln!(
        out,
        "{:<5} {:<name_width$} {:>6} {:>4} {:>4} {:>4} {:>4}",
        "Rank", "Player", "Points", "W", "L", "D", "Ch"
    );

    if snapshot.is_empty() {
        out.push_str("(no players yet)\n");
        return out;
    }

    for entry in snapshot.entries() {
        let p = &entry.player;
        let _ = writeln!(
            out,
            "{:<5} {:<name_width$} {:>6} {:>4} {:>4} {:>4} {:>4}",
            entry.label.to_string(),
            p.name,
            p.ranking_points,
            p.wins,
            p.losses,
            p.draws,
            p.championships
        );
    }

    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn html_row(out: &mut String, entry: &SnapshotEntry) {
    let p = &entry.player;
    let mut name = escape_html(&p.name);
    if let Some(crown) = crown_for(entry.label) {
        let _ = write!(name, " <span class=\"crown crown-{}\" title=\"{}\"></span>", crown, crown);
    }

    let _ = writeln!(
        out,
        "    <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        entry.label, name, p.ranking_points, p.wins, p.losses, p.draws, p.championships
    );
}

/// HTML table with crown markers on the podium
pub fn render_html(snapshot: &RankingSnapshot) -> String {
    let mut out = String::from("<table class=\"ranking\">\n  <thead>\n    <tr>");
    for column in COLUMNS {
        let _ = write!(out, "<th>{}</th>", column);
    }
    out.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for entry in snapshot.entries() {
        html_row(&mut out, entry);
    }

    out.push_str("  </tbody>\n</table>\n");
    out
}

pub fn render_json(snapshot: &RankingSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerRecord;

    fn snapshot() -> RankingSnapshot {
        RankingSnapshot::from_players(vec![
            PlayerRecord::new("Kim", 1100),
            PlayerRecord::new("Lee", 1050),
            PlayerRecord::new("Park", 1000),
            PlayerRecord::new("Choi", 990),
            PlayerRecord::new_guest("<Visitor>", 1000),
        ])
    }

    #[test]
    fn test_text_table() {
        let text = render_text(&snapshot());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# Ranking");
        assert!(lines[1].starts_with("Rank"));
        assert!(lines[2].starts_with("1     Kim"));
        assert!(lines[2].contains("1100"));
        assert!(lines[6].starts_with("G1    <Visitor>"));
    }

    #[test]
    fn test_text_empty() {
        let text = render_text(&RankingSnapshot::default());
        assert!(text.contains("(no players yet)"));
    }

    #[test]
    fn test_html_crowns_only_on_podium() {
        let html = render_html(&snapshot());

        assert!(html.contains("<th>Ranking Points</th>"));
        assert_eq!(html.matches("class=\"crown ").count(), 3);
        assert!(html.contains("Kim <span class=\"crown crown-gold\""));
        assert!(html.contains("Lee <span class=\"crown crown-silver\""));
        assert!(html.contains("Park <span class=\"crown crown-bronze\""));
        assert!(!html.contains("Choi <span"));
    }

    #[test]
    fn test_html_escapes_names() {
        let html = render_html(&snapshot());
        assert!(html.contains("<td>G1</td><td>&lt;Visitor&gt;</td>"));
        assert!(!html.contains("<Visitor>"));
    }

    #[test]
    fn test_guest_never_gets_crown() {
        let only_guests = RankingSnapshot::from_players(vec![PlayerRecord::new_guest("G", 2000)]);
        assert!(!render_html(&only_guests).contains("crown"));
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("HTML".parse::<DisplayFormat>().unwrap(), DisplayFormat::Html);
        assert_eq!("text".parse::<DisplayFormat>().unwrap(), DisplayFormat::Text);
        assert!("pdf".parse::<DisplayFormat>().is_err());
    }

    #[test]
    fn test_json_output() {
        let json = render(&snapshot(), DisplayFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["ranked"][0]["player"]["name"], "Kim");
        assert_eq!(value["ranked"][0]["label"]["kind"], "position");
        assert_eq!(value["guests"][0]["label"]["kind"], "guest");
        assert_eq!(value["guests"][0]["label"]["position"], 1);
    }
}
