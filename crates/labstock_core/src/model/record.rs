//! Shared record attributes.
//!
//! # Responsibility
//! - Provide the name + last-edited attribute pair shared by Item and
//!   SubItem.
//! - Keep edit-stamp refresh in one place.
//!
//! # Invariants
//! - `edited_at` is refreshed whenever a tracked field is written.
//! - `edited_at` is advisory metadata; equality of two documents is
//!   usually checked ignoring it.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Access to the shared record attribute pair.
///
/// Implemented by every named, edit-stamped entity so ordering and
/// edit bookkeeping can be written once.
pub trait Record {
    /// Current record name.
    fn name(&self) -> &str;
    /// Last-edited timestamp in epoch milliseconds.
    fn edited_at(&self) -> i64;
    /// Replaces the name and refreshes the edit stamp.
    fn rename(&mut self, name: impl Into<String>);
}

/// Embedded name + last-edited pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCore {
    /// Record name; the sort key for ordered sequences.
    pub name: String,
    /// Epoch milliseconds of the last tracked write.
    pub edited_at: i64,
}

impl RecordCore {
    /// Creates a core stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            edited_at: now_epoch_ms(),
        }
    }

    /// Replaces the name and refreshes the edit stamp.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Refreshes the edit stamp without changing any field.
    pub fn touch(&mut self) {
        self.edited_at = now_epoch_ms();
    }
}

/// Returns the current wall-clock time in epoch milliseconds.
///
/// Clamps to zero for clocks set before the epoch instead of failing;
/// the stamp is advisory metadata only.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{now_epoch_ms, RecordCore};

    #[test]
    fn rename_refreshes_edit_stamp() {
        let mut core = RecordCore::new("ethanol");
        let before = core.edited_at;
        core.rename("methanol");
        assert_eq!(core.name, "methanol");
        assert!(core.edited_at >= before);
    }

    #[test]
    fn clock_is_past_epoch() {
        assert!(now_epoch_ms() > 0);
    }
}
