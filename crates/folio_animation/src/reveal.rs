//! Reveal triggers
//!
//! A one-shot gate that opens the first time an element is seen inside the
//! margin-adjusted viewport and never closes again.

use folio_core::fsm::StateMachine;
use folio_core::geometry::{Margin, Rect};

/// Reveal lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealState {
    Unrevealed,
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum RevealSignal {
    Enter,
}

/// How much of the element must be visible to count as "in view"
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Amount {
    /// Any visible area
    #[default]
    Some,
    /// The whole element
    All,
    /// At least this fraction of the element's area
    Fraction(f32),
}

impl Amount {
    fn is_met(self, ratio: f32) -> bool {
        match self {
            Amount::Some => ratio > 0.0,
            Amount::All => ratio >= 1.0 - 1e-6,
            Amount::Fraction(f) if f <= 0.0 || f.is_nan() => ratio > 0.0,
            Amount::Fraction(f) => ratio >= f.min(1.0) - 1e-6,
        }
    }
}

/// Visibility test configuration
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InViewOptions {
    /// Applied to the viewport before testing (negative shrinks it)
    pub margin: Margin,
    pub amount: Amount,
}

impl InViewOptions {
    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = amount;
        self
    }
}

/// One-shot reveal gate for a single element
///
/// # Example
///
/// ```rust
/// use folio_animation::reveal::{InViewOptions, RevealTrigger};
/// use folio_core::geometry::{Margin, Rect};
///
/// let mut trigger = RevealTrigger::new(InViewOptions::default().margin(Margin::uniform(-100.0)));
/// let card = Rect::new(0.0, 900.0, 400.0, 200.0);
///
/// // Viewport at the top of the page: card is below the fold
/// assert!(!trigger.observe(&card, &Rect::new(0.0, 0.0, 1280.0, 800.0), 0));
/// // Scrolled down far enough: revealed
/// assert!(trigger.observe(&card, &Rect::new(0.0, 400.0, 1280.0, 800.0), 16));
/// // Scrolled back up: stays revealed
/// trigger.observe(&card, &Rect::new(0.0, 0.0, 1280.0, 800.0), 32);
/// assert!(trigger.is_revealed());
/// ```
#[derive(Debug)]
pub struct RevealTrigger {
    options: InViewOptions,
    machine: StateMachine<RevealState, RevealSignal>,
    revealed_at_ms: Option<u64>,
}

impl RevealTrigger {
    pub fn new(options: InViewOptions) -> Self {
        Self {
            options,
            machine: StateMachine::builder(RevealState::Unrevealed)
                .on(
                    RevealState::Unrevealed,
                    RevealSignal::Enter,
                    RevealState::Revealed,
                )
                .build(),
            revealed_at_ms: None,
        }
    }

    pub fn options(&self) -> &InViewOptions {
        &self.options
    }

    /// Feed a visibility observation of `target` against the current viewport
    ///
    /// Returns `true` only for the observation that opened the gate.
    pub fn observe(&mut self, target: &Rect, viewport: &Rect, now_ms: u64) -> bool {
        if self.is_revealed() {
            return false;
        }
        let ratio = viewport.inset(self.options.margin).coverage_of(target);
        self.observe_ratio(ratio, now_ms)
    }

    /// Feed a precomputed visibility ratio (portion of the target in view)
    pub fn observe_ratio(&mut self, ratio: f32, now_ms: u64) -> bool {
        if self.is_revealed() || !self.options.amount.is_met(ratio) {
            return false;
        }

        self.machine.send(RevealSignal::Enter);
        self.revealed_at_ms = Some(now_ms);
        tracing::debug!(ratio, now_ms, "reveal: element entered view");
        true
    }

    pub fn state(&self) -> RevealState {
        self.machine.current_state()
    }

    pub fn is_revealed(&self) -> bool {
        self.machine.is_in(RevealState::Revealed)
    }

    /// Session time at which the gate opened
    pub fn revealed_at_ms(&self) -> Option<u64> {
        self.revealed_at_ms
    }
}

impl Default for RevealTrigger {
    fn default() -> Self {
        Self::new(InViewOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT_H: f32 = 800.0;

    fn viewport_at(scroll_y: f32) -> Rect {
        Rect::new(0.0, scroll_y, 1280.0, VIEWPORT_H)
    }

    #[test]
    fn test_never_observed_stays_hidden() {
        let trigger = RevealTrigger::default();
        assert_eq!(trigger.state(), RevealState::Unrevealed);
        assert_eq!(trigger.revealed_at_ms(), None);
    }

    #[test]
    fn test_stays_revealed_after_leaving_view() {
        let mut trigger = RevealTrigger::default();
        let target = Rect::new(0.0, 1000.0, 200.0, 200.0);

        assert!(!trigger.observe(&target, &viewport_at(0.0), 0));
        assert!(trigger.observe(&target, &viewport_at(300.0), 100));
        assert_eq!(trigger.revealed_at_ms(), Some(100));

        for (i, scroll_y) in [0.0, 5000.0, 300.0, 0.0].into_iter().enumerate() {
            assert!(!trigger.observe(&target, &viewport_at(scroll_y), 200 + i as u64));
            assert!(trigger.is_revealed());
        }
        // Reveal time is the first entry, never a later one
        assert_eq!(trigger.revealed_at_ms(), Some(100));
    }

    #[test]
    fn test_negative_margin_delays_reveal() {
        let target = Rect::new(0.0, 850.0, 200.0, 200.0);

        // 50px of the target is on screen, but the -100px margin hides it
        let mut with_margin =
            RevealTrigger::new(InViewOptions::default().margin(Margin::uniform(-100.0)));
        assert!(!with_margin.observe(&target, &viewport_at(100.0), 0));
        assert!(with_margin.observe(&target, &viewport_at(200.0), 0));

        let mut without_margin = RevealTrigger::default();
        assert!(without_margin.observe(&target, &viewport_at(100.0), 0));
    }

    #[test]
    fn test_amount_thresholds() {
        let mut half = RevealTrigger::new(InViewOptions::default().amount(Amount::Fraction(0.5)));
        assert!(!half.observe_ratio(0.49, 0));
        assert!(half.observe_ratio(0.5, 1));

        let mut all = RevealTrigger::new(InViewOptions::default().amount(Amount::All));
        assert!(!all.observe_ratio(0.99, 0));
        assert!(all.observe_ratio(1.0, 1));

        let mut any = RevealTrigger::default();
        assert!(!any.observe_ratio(0.0, 0));
        assert!(any.observe_ratio(0.01, 1));
    }

    #[test]
    fn test_independent_triggers_do_not_interact() {
        let mut a = RevealTrigger::default();
        let b = RevealTrigger::default();

        a.observe_ratio(1.0, 0);
        assert!(a.is_revealed());
        assert!(!b.is_revealed());
    }
}
