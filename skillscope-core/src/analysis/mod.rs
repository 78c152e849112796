//! Analysis layer: trigger matching, scoring, and overlap classification
//!
//! Everything in here is pure computation over in-memory catalog and
//! session data. Inputs come from the `discovery` and `ingest` modules;
//! outputs go to `report`.
//!
//! Control flow:
//!
//! ```text
//! catalog + sessions ─► matcher (per prompt × entry)
//!                        │
//!                        ▼
//!                      missed (aggregate + filter) ─► impact (rank)
//!
//! catalog ─► overlap (exact + stemmed passes) ─► findings + hints
//! ```

pub mod impact;
pub mod matcher;
pub mod missed;
pub mod overlap;
pub mod stem;
pub mod usage;

pub use impact::{frequency_score, impact_score, recency_score};
pub use matcher::find_matches;
pub use missed::{detect_missed_opportunities, detect_missed_opportunities_at};
pub use overlap::{compute_overlaps, generate_hint};
pub use stem::{jaccard_similarity, tokenize_and_stem};
pub use usage::{classify_entry, UsageClass};
