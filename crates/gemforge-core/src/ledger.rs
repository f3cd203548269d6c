//! The gem ledger: the single process-wide currency balance.
//!
//! The balance is a `u64`, which makes two contract points structural:
//! the total can never be negative, and negative amounts cannot be passed
//! in. Write-through persistence and change notifications are wired at the
//! session seam, not here -- the ledger itself is pure state.

/// The gem balance. Exactly one instance exists per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GemLedger {
    total: u64,
}

impl GemLedger {
    /// A ledger starting at zero.
    pub fn new() -> Self {
        Self { total: 0 }
    }

    /// A ledger restored to a persisted total.
    pub fn with_total(total: u64) -> Self {
        Self { total }
    }

    /// Current balance.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Add gems to the balance. Never decreases the total; saturates at
    /// `u64::MAX` rather than wrapping.
    pub fn credit(&mut self, amount: u64) {
        self.total = self.total.saturating_add(amount);
    }

    /// Attempt to spend `amount`. Succeeds and debits iff the balance is
    /// STRICTLY greater than the amount -- spending the exact balance fails.
    /// The strictness is deliberate; see DESIGN.md open questions. On
    /// failure the balance is untouched.
    pub fn try_spend(&mut self, amount: u64) -> bool {
        if self.total > amount {
            self.total -= amount;
            true
        } else {
            false
        }
    }

    /// Balance abbreviated for display: 1500 -> "1.5K", 2_300_000 -> "2.3M".
    pub fn display_text(&self) -> String {
        format_gems(self.total)
    }
}

/// K/M abbreviation used by the display layer.
pub fn format_gems(total: u64) -> String {
    if total >= 1_000_000 {
        format!("{:.1}M", total as f64 / 1_000_000.0)
    } else if total >= 1_000 {
        format!("{:.1}K", total as f64 / 1_000.0)
    } else {
        total.to_string()
    }
}
