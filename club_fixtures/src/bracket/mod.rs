//! Seeded single-elimination brackets.
//!
//! The tree is a flat array of [`BracketNode`]s in heap order (children of
//! node `i` at `2i + 1` and `2i + 2`), so there are no parent pointers to
//! manage. Results are reported per match with [`Bracket::report_result`];
//! matches become schedulable once both of their slots are filled.
//!
//! ## Example
//!
//! ```
//! use club_fixtures::bracket::{Advancement, BracketEngine};
//! use club_fixtures::fixtures::Participant;
//!
//! let field: Vec<Participant> = (1..=4)
//!     .map(|s| Participant::new(format!("p{s}"), format!("Player {s}"), "club").with_seed(s))
//!     .collect();
//!
//! let mut bracket = BracketEngine::new().build_bracket(&field).unwrap();
//! bracket.report_result("ko-1-1", "p1").unwrap();
//! bracket.report_result("ko-1-2", "p2").unwrap();
//! let result = bracket.report_result("ko-2-1", "p2").unwrap();
//! assert!(matches!(result, Advancement::Champion(_)));
//! ```

pub mod engine;
pub mod errors;
pub mod models;

pub use engine::{BracketEngine, seed_positions};
pub use errors::{BracketError, BracketResult};
pub use models::{Advancement, Bracket, BracketNode, MatchId};
