/// The five top-level views. Exactly one is visible at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Section {
    #[default]
    Vocab,
    Quiz,
    Cards,
    Sorting,
    Nouns,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Vocab,
        Section::Quiz,
        Section::Sorting,
        Section::Nouns,
        Section::Cards,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vocab => "vocab",
            Self::Quiz => "quiz",
            Self::Cards => "cards",
            Self::Sorting => "sorting",
            Self::Nouns => "nouns",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Vocab => "Vocabulary",
            Self::Quiz => "Multiple Choice",
            Self::Cards => "Cards",
            Self::Sorting => "Verb Sorting",
            Self::Nouns => "Noun Sorting",
        }
    }
}

#[derive(Debug, Default)]
pub struct Router {
    visible: Section,
}

impl Router {
    /// Unconditional; callers drop whatever round the old section was running.
    pub fn show(&mut self, section: Section) {
        tracing::debug!(section = section.as_str(), "show section");
        self.visible = section;
    }

    pub fn current(&self) -> Section {
        self.visible
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.visible == section
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_section_visible() {
        let mut router = Router::default();
        assert_eq!(router.current(), Section::Vocab);
        for target in Section::ALL {
            router.show(target);
            let visible: Vec<_> = Section::ALL
                .into_iter()
                .filter(|s| router.is_visible(*s))
                .collect();
            assert_eq!(visible, vec![target]);
        }
    }
}
