//! Prompt text for the language-model worker that writes interpretations and
//! answers questions. The model call happens outside this workspace.

use std::fmt::Write as _;

use crate::{catalog, matrix::COMPOSITE_LEN, record::StoredMatrix};

/// System message to send alongside [`interpretation_prompt`].
pub const INTERPRETATION_SYSTEM: &str =
  "You are a Destiny Matrix reader who gives deep, personal insight.";

/// System message to send alongside [`question_prompt`].
pub const QUESTION_SYSTEM: &str =
  "You are a Destiny Matrix reader answering one specific question.";

/// Full reading request: key numbers plus every position with its arcana.
pub fn interpretation_prompt(matrix: &StoredMatrix) -> String {
  let c = &matrix.calculation;
  let mut out = String::new();

  let _ = writeln!(
    out,
    "Interpret this person's Destiny Matrix in depth.\n\nName: {}\nBirth date: {}\n",
    matrix.name, matrix.birth_date
  );

  out.push_str("Key numbers:\n");
  for (label, value) in [
    ("Destiny", c.destiny),
    ("Purpose", c.purpose),
    ("Money", c.money),
    ("Health", c.health),
    ("Talents", c.talents),
    ("Relationships", c.relationships),
    ("Spiritual", c.spiritual),
  ] {
    let _ = writeln!(out, "- {label}: {value} ({})", catalog::info(value).name);
  }

  // The 22-entry sequence, then layer E.
  let layer_e = &c.composites[COMPOSITE_LEN - 3..];
  let positions = c.all_arcana.iter().chain(layer_e);
  let _ = writeln!(out, "\nAll {} positions:", c.all_arcana.len() + layer_e.len());
  for (i, arcana) in positions.enumerate() {
    let info = catalog::info(*arcana);
    let _ = writeln!(
      out,
      "Position {} - Arcana {} ({}): {}",
      i + 1,
      arcana,
      info.name,
      info.keywords.join(", ")
    );
  }

  out.push_str(
    "\nCover, in order: life purpose and destiny; natural talents; career and \
     money; relationships and love; health and wellbeing; spiritual path; key \
     challenges and lessons. Keep it personal and actionable.\n",
  );
  out
}

/// Request for an answer to `question` in the context of `matrix`.
pub fn question_prompt(matrix: &StoredMatrix, question: &str) -> String {
  let c = &matrix.calculation;
  format!(
    "Destiny Matrix of {name}:\nDestiny {}, Purpose {}, Money {}, Health {}, Talents {}, \
     Relationships {}, Spiritual {}\n\nQuestion: {question}\n\nAnswer in detail, \
     grounded in these numbers.\n",
    c.destiny,
    c.purpose,
    c.money,
    c.health,
    c.talents,
    c.relationships,
    c.spiritual,
    name = matrix.name,
  )
}
