//! Repository trait definitions for persistence operations.
//!
//! This module provides a collection of focused repository traits that abstract
//! the backing store. By splitting responsibilities across multiple traits,
//! implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`schedule`]: Schedule lifecycle (store, fetch, list, dedup lookup)
//! - [`entries`]: Paged entry reads, aggregates and entry mutations
//!
//! # Trait Composition
//!
//! A complete repository implementation implements both traits:
//!
//! ```ignore
//! impl ScheduleRepository for MyRepo { ... }
//! impl EntryRepository for MyRepo { ... }
//! ```
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     // Can use any repository method
//!     let info = repo.store_schedule(&schedule).await?;
//!     repo.fetch_entry_count(&[info.schedule_id]).await?;
//!     Ok(())
//! }
//! ```

pub mod entries;
pub mod error;
pub mod schedule;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use entries::{EntryRepository, FetchWindow};
pub use schedule::ScheduleRepository;

/// Composite trait bound for a complete repository implementation.
///
/// This trait is automatically implemented for any type that implements
/// both repository traits. Use this as a convenient bound when you need
/// access to all repository operations.
pub trait FullRepository: ScheduleRepository + EntryRepository {}

// Blanket implementation: any type implementing both traits automatically implements FullRepository
impl<T> FullRepository for T where T: ScheduleRepository + EntryRepository {}

impl std::fmt::Debug for dyn FullRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FullRepository")
    }
}
