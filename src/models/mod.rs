//! League scheduling domain models.
//!
//! Value types for the entities of one scheduling request and for the
//! schedule produced from them. All are created per request and never
//! mutated once the registry is built.
//!
//! # Entities
//!
//! | Type | Key | Attribute |
//! |------|-----|-----------|
//! | Team | name | strength |
//! | Venue | name | capacity |
//! | Referee | name | level |
//! | TimeSlot | timestamp | |
//! | Fixture | (home, away) | |

mod constraint;
mod fixture;
mod referee;
mod schedule;
mod slot;
mod team;
mod venue;

pub use constraint::{check_schedule, violating_matches, HardConstraint};
pub use fixture::Fixture;
pub use referee::Referee;
pub use schedule::{Schedule, ScheduledMatch, Violation, ViolationType};
pub use slot::TimeSlot;
pub use team::Team;
pub use venue::Venue;
