//! Free-text answers

/// A text answer as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Primary key
    pub id: i32,

    /// Answer after moderation, if any
    pub reviewed_answer: Option<String>,

    /// Answer as submitted, if any
    pub original_answer: Option<String>,
}

impl Comment {
    /// Creates a comment record
    pub fn new(id: i32, reviewed_answer: Option<&str>, original_answer: Option<&str>) -> Self {
        Self {
            id,
            reviewed_answer: reviewed_answer.map(str::to_string),
            original_answer: original_answer.map(str::to_string),
        }
    }
}
