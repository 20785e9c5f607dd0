//! # Data Model
//!
//! Plain data shared by every layer: targets, time units, neighbor lists,
//! scores and the records the engine emits.
//!
//! Design rule: no embedding lookups and no I/O beyond reading a target
//! list. This module does not know what a space is.

pub mod score;
pub mod target;
pub mod time;
pub mod neighbor;
pub mod record;

pub use score::{Score, Composites};
pub use target::{Target, TAG_SEPARATOR, load_targets, parse_target_phrases};
pub use time::{Grain, TimeLabel, TimeUnit, PAIR_SEPARATOR};
pub use neighbor::{NeighborSet, Neighborhood};
pub use record::{ScoreRecord, ScoreSheet};
