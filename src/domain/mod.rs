//! Domain models and types for Veil.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Synthetic identities** ([`Person`])
//! - **Records read from the store** ([`User`], [`Course`], [`Comment`])
//! - **Error types** ([`VeilError`]) and the [`Result`] alias
//!
//! Records are plain data. The decisions about what each record becomes live
//! in [`crate::anonymization`].
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, VeilError>`]:
//!
//! ```rust,no_run
//! use veil::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = veil::config::load_config("veil.toml")?;
//!     println!("users table: {}", config.tables.users);
//!     Ok(())
//! }
//! ```

pub mod comment;
pub mod course;
pub mod errors;
pub mod person;
pub mod result;
pub mod user;

pub use comment::Comment;
pub use course::{Course, CourseFields};
pub use errors::VeilError;
pub use person::Person;
pub use result::Result;
pub use user::{Role, User};
