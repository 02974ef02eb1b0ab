//! The fixed set of interview questions

use serde::Serialize;

/// One of the five selectable interview questions, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterviewQuestion {
    LifeStory,
    Superpower,
    GrowthAreas,
    Misconception,
    PushingLimits,
}

impl InterviewQuestion {
    /// All questions in display order
    pub const ALL: [Self; 5] = [
        Self::LifeStory,
        Self::Superpower,
        Self::GrowthAreas,
        Self::Misconception,
        Self::PushingLimits,
    ];

    /// Question text as shown to the user and sent to the model
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::LifeStory => "What should we know about your life story in a few sentences?",
            Self::Superpower => "What's your #1 superpower?",
            Self::GrowthAreas => "What are the top 3 areas you'd like to grow in?",
            Self::Misconception => "What misconception do your coworkers have about you?",
            Self::PushingLimits => "How do you push your boundaries and limits?",
        }
    }

    /// Zero-based position in [`Self::ALL`]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a question by zero-based index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for InterviewQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

impl Serialize for InterviewQuestion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        QuestionEntry::from(*self).serialize(serializer)
    }
}

/// Wire form of a question
#[derive(Debug, Serialize)]
pub struct QuestionEntry {
    pub index: usize,
    pub text: &'static str,
}

impl From<InterviewQuestion> for QuestionEntry {
    fn from(question: InterviewQuestion) -> Self {
        Self {
            index: question.index(),
            text: question.text(),
        }
    }
}
