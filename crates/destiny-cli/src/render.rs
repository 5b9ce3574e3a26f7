//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use destiny_core::{
  Arcana, MatrixCalculation,
  catalog::{self, ArcanaInfo},
};

const NAMED_LABELS: [&str; 10] = [
  "Day",
  "Month",
  "Year",
  "Destiny",
  "Purpose",
  "Money",
  "Health",
  "Talents",
  "Relationships",
  "Spiritual",
];

const LAYERS: [&str; 5] = ["A", "B", "C", "D", "E"];

fn line(out: &mut String, label: &str, arcana: Arcana) {
  let _ = writeln!(out, "  {label:<14} {arcana:>2}  {}", catalog::info(arcana).name);
}

/// Named positions with their arcana names, then the composite layers.
pub fn matrix(calc: &MatrixCalculation) -> String {
  let mut out = String::new();
  for (label, arcana) in NAMED_LABELS.iter().zip(calc.named()) {
    line(&mut out, label, arcana);
  }
  out.push_str("\n  Composites\n");
  for (layer, triad) in LAYERS.iter().zip(calc.composites.chunks(3)) {
    let values: Vec<String> = triad.iter().map(|a| format!("{a:>2}")).collect();
    let _ = writeln!(out, "  {layer}  {}", values.join(" "));
  }
  out
}

/// Every field of a catalog entry.
pub fn arcana(info: &ArcanaInfo) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "{} {}", info.number, info.name);
  let _ = writeln!(out, "{}\n", info.keywords.join(", "));
  for (heading, text) in [
    ("Positive", info.positive),
    ("Negative", info.negative),
    ("Career", info.career),
    ("Relationships", info.relationships),
    ("Health", info.health),
    ("Spiritual", info.spiritual),
  ] {
    let _ = writeln!(out, "{heading}:\n  {text}");
  }
  out
}

#[cfg(test)]
mod tests {
  use destiny_core::{calculate_matrix, catalog::arcana_info};

  use super::*;

  #[test]
  fn matrix_lists_named_positions_and_layers() {
    let calc = calculate_matrix("15.03.1990").unwrap();
    let text = matrix(&calc);
    assert!(text.contains("Destiny        10  Fortune"), "{text}");
    assert!(text.contains("Year           19"), "{text}");
    assert!(text.contains("  A  18 22  7"), "{text}");
    assert!(text.contains("  E   8  6 11"), "{text}");
    assert_eq!(text.lines().filter(|l| l.starts_with("  ") && l.len() > 3).count(), 16);
  }

  #[test]
  fn arcana_shows_every_section() {
    let text = arcana(arcana_info(22).unwrap());
    assert!(text.starts_with("22 The Fool\n"));
    for heading in ["Positive:", "Negative:", "Career:", "Relationships:", "Health:", "Spiritual:"] {
      assert!(text.contains(heading), "missing {heading}");
    }
  }
}
