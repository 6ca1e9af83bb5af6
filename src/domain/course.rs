//! Course records

/// Descriptive fields of a course, everything except the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFields {
    /// Semester the course belongs to
    pub semester: i32,

    /// Degree programme code
    pub degree: String,

    /// German display name
    pub name_de: String,

    /// English display name
    pub name_en: String,
}

/// A course as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Primary key
    pub id: i32,

    /// Fields subject to the permutation
    pub fields: CourseFields,
}

impl Course {
    /// Creates a course record
    pub fn new(
        id: i32,
        semester: i32,
        degree: impl Into<String>,
        name_de: impl Into<String>,
        name_en: impl Into<String>,
    ) -> Self {
        Self {
            id,
            fields: CourseFields {
                semester,
                degree: degree.into(),
                name_de: name_de.into(),
                name_en: name_en.into(),
            },
        }
    }
}
