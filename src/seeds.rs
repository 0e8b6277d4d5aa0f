//! Built-in quiz content and the placeholder served when nothing matches.

use crate::domain::{Area, ContentItem};

/// Prompt shown when no content exists for a (level, area) pair.
pub const NO_QUESTION: &str = "No question available";

#[allow(clippy::too_many_arguments)]
fn item(
  id: i64,
  level: u32,
  area: Area,
  question: &str,
  options: &[&str],
  answer: &str,
  hint: &str,
  instruction: &str,
) -> ContentItem {
  ContentItem {
    id,
    level,
    area,
    question: question.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    answer: answer.into(),
    hint: hint.into(),
    instruction: instruction.into(),
  }
}

/// KJV-themed starter content. Ids are stable so reseeding is a no-op.
pub fn seed_content() -> Vec<ContentItem> {
  vec![
    item(
      1, 1, Area::PhonologicalAwareness,
      "What rhymes with \"pray\"? (From Psalm 118:24)",
      &["day", "cat", "run"], "day",
      "Think of a word that sounds like pray, like a bright new day.",
      "Rhyming words end the same. Example: Pray rhymes with day in \"This is the day which the Lord hath made\" (Psalm 118:24 KJV).",
    ),
    item(
      2, 1, Area::Phonics,
      "Blend sounds to make \"God\" (g-o-d)",
      &["god", "dog", "got"], "god",
      "Short o sound like in dog.",
      "Phonics: G + o + d = God, as in \"He that loveth not knoweth not God; for God is love\" (1 John 4:8 KJV).",
    ),
    item(
      3, 2, Area::PhonologicalAwareness,
      "Count syllables in \"Jesus\" (Je-sus)",
      &["1", "2", "3"], "2",
      "Clap it out: Je-sus.",
      "Syllables help rhythm. Jesus has 2, like in \"For unto you is born this day in the city of David a Saviour, which is Christ the Lord\" (Luke 2:11 KJV).",
    ),
    item(
      4, 3, Area::Phonics,
      "What word has silent e: faith (f-a-i-t-h)",
      &["faith", "fat", "fit"], "faith",
      "Silent e makes long a sound.",
      "Silent e in faith, from \"Now faith is the substance of things hoped for, the evidence of things not seen\" (Hebrews 11:1 KJV).",
    ),
    item(
      5, 4, Area::Vocabulary,
      "What means \"love\" in Bible terms? (Charity)",
      &["hate", "kindness", "anger"], "kindness",
      "Unconditional like God's.",
      "Vocabulary: Charity means selfless love, as in \"Thou shalt love thy neighbour as thyself\" (Mark 12:31 KJV).",
    ),
    item(
      6, 5, Area::Comprehension,
      "In the Creation story, what did God make on day 1? (Genesis 1)",
      &["light", "animals", "people"], "light",
      "Read: \"Let there be light.\"",
      "Comprehension: God created light first (Genesis 1:3 KJV: \"And God said, Let there be light: and there was light\"). Answer questions after short passages.",
    ),
  ]
}

/// Returns why an item cannot be served, or `None` when it is well formed.
pub fn validate_item(item: &ContentItem) -> Option<&'static str> {
  if item.level == 0 {
    return Some("level must be positive");
  }
  if item.options.is_empty() {
    return Some("options must not be empty");
  }
  let expected = item.answer.to_lowercase();
  if !item.options.iter().any(|o| o.to_lowercase() == expected) {
    return Some("answer is not one of the options");
  }
  None
}
