//! Per-section "Copied!" indicator state.

use std::collections::HashMap;
use std::time::Duration;

/// How long a section keeps showing "Copied!".
pub const COPY_RESET_DELAY: Duration = Duration::from_secs(1);

/// Proof of a particular copy, handed to the timer that will clear it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyTicket {
    pub section: String,
    generation: u64,
}

/// Per-section "Copied!" flags.
///
/// Each copy bumps a generation counter so a timer left over from an earlier click cannot
/// clear the flag set by a later one.
#[derive(Debug, Clone, Default)]
pub struct CopyIndicators {
    active: HashMap<String, u64>,
    generation: u64,
}

impl CopyIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_copied(&mut self, section: &str) -> CopyTicket {
        self.generation += 1;
        self.active.insert(section.to_string(), self.generation);
        CopyTicket {
            section: section.to_string(),
            generation: self.generation,
        }
    }

    /// Clears the flag if `ticket` is still the latest copy of its section.
    pub fn clear(&mut self, ticket: &CopyTicket) -> bool {
        match self.active.get(&ticket.section) {
            Some(current) if *current == ticket.generation => {
                self.active.remove(&ticket.section);
                true
            }
            _ => false,
        }
    }

    pub fn is_copied(&self, section: &str) -> bool {
        self.active.contains_key(section)
    }

    pub fn reset(&mut self) {
        self.active.clear();
    }
}
