//! Sports league scheduling.
//!
//! Builds a season schedule from teams, venues, referees and time slots:
//! generates the round-robin fixtures, assigns each one a
//! (slot, venue, referee) triple under hard constraints while minimizing a
//! weighted soft objective, and scores the result.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Team`, `Venue`, `Referee`, `TimeSlot`,
//!   `Fixture`, `ScheduledMatch`, `Schedule`, and the hard-constraint checker
//! - **`validation`**: Input checks and the name-indexed `Registry`
//! - **`generator`**: Deterministic single/double round-robin fixtures
//! - **`scheduler`**: Greedy construction, local improvement, scoring
//! - **`report`**: Day-grouped response with usage statistics
//! - **`request`**: JSON request parsing and the end-to-end pipeline
//! - **`config`**: Objective weights, caps and valid ranges
//!
//! # Example
//!
//! ```
//! use u_league::{LeagueScheduler, ScheduleRequest};
//!
//! let request = ScheduleRequest::from_json(r#"{
//!     "teams": ["Lions", "Tigers"],
//!     "venues": ["Arena"],
//!     "time_slots": ["2024-03-02T15:00"],
//!     "referees": ["Kim"],
//!     "team_strengths": {"Lions": 72, "Tigers": 65}
//! }"#).unwrap();
//!
//! let response = LeagueScheduler::default().run(&request).unwrap();
//! assert_eq!(response.schedule[0][0], ["Lions", "Tigers", "Arena"].map(String::from));
//! ```
//!
//! # References
//!
//! - Kendall et al. (2010), "Scheduling in sports: An annotated bibliography"
//! - Ribeiro (2012), "Sports scheduling: Problems and applications"

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod models;
pub mod report;
pub mod request;
pub mod scheduler;
pub mod validation;

pub use config::{LeagueConfig, MarqueeRule, ObjectiveWeights, RoundRobinMode};
pub use error::{LeagueError, PartialScheduleWarning, Result};
pub use report::{ScheduleResponse, UsageStats};
pub use request::{LeagueScheduler, ScheduleRequest};
pub use scheduler::{LeagueSolver, ScoreReport, SolveResult};
pub use validation::Registry;
