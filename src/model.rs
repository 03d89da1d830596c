//! Wire records exchanged with the vocabulary API.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub id: i64,
    pub latin_word: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub german_translation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub word_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accuracy_percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_bronze_card: bool,
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabDraft {
    pub latin_word: String,
    pub german_translation: String,
}

impl VocabDraft {
    /// Builds a create request from raw form input. Both fields are trimmed;
    /// an empty Latin word yields `None`. The German field is kept even when empty.
    pub fn from_form(latin: &str, german: &str) -> Option<Self> {
        let latin = latin.trim();
        if latin.is_empty() {
            return None;
        }
        Some(Self {
            latin_word: latin.to_string(),
            german_translation: german.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedVocab {
    pub id: i64,
    #[serde(default)]
    pub word_type: Option<String>,
}

/// Optional server-side narrowing of the vocabulary list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabQuery {
    pub search: Option<String>,
}

/// Server-issued quiz round identifier. Sent back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoundId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct McRoundStarted {
    pub quiz_round_id: RoundId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SortingRoundStarted {
    pub quizroundid: RoundId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McQuestion {
    pub id: i64,
    pub latin_word: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Payload of `GET /quiz/next`: a one-element array, an empty array, or an
/// `{error}` object once no weak entries remain.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NextQuestion {
    Questions(Vec<McQuestion>),
    Unavailable { error: String },
}

impl NextQuestion {
    pub fn into_first(self) -> Option<McQuestion> {
        match self {
            Self::Questions(qs) => qs.into_iter().next(),
            Self::Unavailable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McAnswer {
    pub quiz_round_id: RoundId,
    pub vocab_entry_id: i64,
    pub selected_option: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishRound {
    pub quiz_round_id: RoundId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardChange {
    Created,
    Removed,
    #[serde(other)]
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accuracy_percent: f64,
    #[serde(default)]
    pub card_change: Option<CardChange>,
}

/// Which drag-to-category quiz a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortingKind {
    Verbs,
    Nouns,
}

impl SortingKind {
    /// Path segment under `/quiz/`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Verbs => "verbs",
            Self::Nouns => "nouns",
        }
    }

    pub fn wrap_item(self, item: String) -> SortItem {
        match self {
            Self::Verbs => SortItem::Verb(item),
            Self::Nouns => SortItem::Noun(item),
        }
    }
}

/// Raw `next` payload of the sorting quizzes; exactly one field is expected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortingNextPayload {
    #[serde(default)]
    pub verb: Option<String>,
    #[serde(default)]
    pub noun: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextItem {
    Item(String),
    /// The server has nothing left for this round; carries its message.
    Exhausted(String),
}

impl SortingNextPayload {
    pub fn into_next(self, kind: SortingKind) -> Option<NextItem> {
        if let Some(err) = self.error {
            return Some(NextItem::Exhausted(err));
        }
        let item = match kind {
            SortingKind::Verbs => self.verb,
            SortingKind::Nouns => self.noun,
        };
        item.map(NextItem::Item)
    }
}

/// The item field of a sorting answer, serialized as `"verb"` or `"noun"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortItem {
    Verb(String),
    Noun(String),
}

impl SortItem {
    pub fn text(&self) -> &str {
        match self {
            Self::Verb(s) | Self::Noun(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortAnswer {
    pub quizroundid: RoundId,
    #[serde(flatten)]
    pub item: SortItem,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SortOutcome {
    pub correct: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub card_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub german_translation: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latin_word: Option<String>,
    #[serde(default)]
    pub accuracy_percent: Option<f64>,
}

/// `{ "error": "..." }` bodies the server attaches to failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
