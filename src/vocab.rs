//! Vocabulary table view-model.
//!
//! The table keeps the list exactly as the server returned it. Sorting and
//! type filtering are applied on read by [`VocabTable::rows`], so what is drawn
//! is always a projection of `entries`.

use std::cmp::Ordering;

use crate::model::VocabEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    LatinWord,
    GermanTranslation,
    WordType,
    AccuracyPercent,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::LatinWord,
        SortColumn::GermanTranslation,
        SortColumn::WordType,
        SortColumn::AccuracyPercent,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Self::LatinWord => "Latin",
            Self::GermanTranslation => "German",
            Self::WordType => "Type",
            Self::AccuracyPercent => "Accuracy",
        }
    }

    fn compare(&self, a: &VocabEntry, b: &VocabEntry) -> Ordering {
        match self {
            Self::LatinWord => a.latin_word.cmp(&b.latin_word),
            Self::GermanTranslation => a.german_translation.cmp(&b.german_translation),
            Self::WordType => a.word_type.cmp(&b.word_type),
            Self::AccuracyPercent => a
                .accuracy_percent
                .partial_cmp(&b.accuracy_percent)
                .unwrap_or(Ordering::Equal),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

/// `column == None` keeps server order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same column flips the direction, a new column starts ascending.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    pub fn indicator(&self, column: SortColumn) -> &'static str {
        if self.column == Some(column) {
            self.direction.arrow()
        } else {
            ""
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    /// Lower-cased word type.
    Only(String),
}

impl TypeFilter {
    pub fn only(word_type: &str) -> Self {
        Self::Only(word_type.to_lowercase())
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(t) => t,
        }
    }

    pub fn matches(&self, entry: &VocabEntry) -> bool {
        match self {
            Self::All => true,
            Self::Only(t) => entry.word_type.to_lowercase() == *t,
        }
    }
}

/// Display cells of one row: Latin, German, type, accuracy, bronze card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabRow {
    pub id: i64,
    pub cells: [String; 5],
}

impl VocabRow {
    pub fn from_entry(e: &VocabEntry) -> Self {
        Self {
            id: e.id,
            cells: [
                e.latin_word.clone(),
                e.german_translation.clone(),
                e.word_type.clone(),
                format!("{:.1}%", e.accuracy_percent),
                if e.has_bronze_card { "🟤" } else { "" }.to_string(),
            ],
        }
    }

    pub fn to_line(&self) -> String {
        self.cells.join(" | ")
    }
}

#[derive(Debug, Default)]
pub struct VocabTable {
    entries: Vec<VocabEntry>,
    pub sort: SortState,
    pub filter: TypeFilter,
    /// Filter options in display order, "all" first.
    filters: Vec<TypeFilter>,
    /// Server-side search term sent with every reload.
    pub search: Option<String>,
    selected: usize,
}

impl VocabTable {
    pub fn new(word_types: &[String]) -> Self {
        let mut filters = vec![TypeFilter::All];
        filters.extend(word_types.iter().map(|t| TypeFilter::only(t)));
        Self {
            filters,
            ..Self::default()
        }
    }

    /// Swaps in a freshly loaded list. The old one is discarded entirely.
    pub fn replace(&mut self, entries: Vec<VocabEntry>) {
        self.entries = entries;
        self.clamp_selection();
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }

    pub fn entry(&self, id: i64) -> Option<&VocabEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// All entries in display order, filtered rows included.
    pub fn sorted(&self) -> Vec<&VocabEntry> {
        let mut out: Vec<&VocabEntry> = self.entries.iter().collect();
        if let Some(col) = self.sort.column {
            out.sort_by(|a, b| {
                let ord = col.compare(a, b);
                match self.sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        out
    }

    /// Visible entries: sorted, then narrowed by the type filter.
    pub fn rows(&self) -> Vec<&VocabEntry> {
        self.sorted()
            .into_iter()
            .filter(|e| self.filter.matches(e))
            .collect()
    }

    pub fn filters(&self) -> &[TypeFilter] {
        &self.filters
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.filter = filter;
        self.clamp_selection();
    }

    pub fn cycle_filter(&mut self) {
        let pos = self
            .filters
            .iter()
            .position(|f| *f == self.filter)
            .unwrap_or(0);
        let next = self
            .filters
            .get((pos + 1) % self.filters.len().max(1))
            .cloned()
            .unwrap_or_default();
        self.set_filter(next);
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.rows().is_empty() {
            None
        } else {
            Some(self.selected)
        }
    }

    pub fn selected_entry(&self) -> Option<&VocabEntry> {
        self.rows().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let n = self.rows().len();
        if n == 0 {
            self.selected = 0;
            return;
        }
        let next = self.selected as isize + delta;
        self.selected = next.clamp(0, n as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        let n = self.rows().len();
        self.selected = self.selected.min(n.saturating_sub(1));
    }
}
