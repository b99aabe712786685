//! ID utilities (ULIDs).

use ulid::Ulid;

/// Generate a score id. ULIDs sort by creation time, so ordering by id gives
/// creation order.
pub fn new_score_id() -> String {
    Ulid::new().to_string()
}
