//! Text and toggle inputs bound to parameter cells.
//!
//! Edits are parsed, clamped into the declared range and sent. Text that
//! doesn't parse to a finite number is dropped without touching the cell.

use tracing::debug;
use tube_types::{ParamKind, ParamRange};

use crate::cell::{ListenerId, ReactiveCell};

/// What happened to one submitted edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    Accepted(f64),
    Clamped { requested: f64, accepted: f64 },
    Ignored,
}

/// A numeric field (slider or number box) for one parameter.
#[derive(Debug, Clone)]
pub struct NumericInput {
    kind: ParamKind,
    range: ParamRange,
    cell: ReactiveCell<f64>,
}

impl NumericInput {
    pub fn new(kind: ParamKind, range: ParamRange, cell: ReactiveCell<f64>) -> Self {
        Self { kind, range, cell }
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn range(&self) -> ParamRange {
        self.range
    }

    pub fn value(&self) -> f64 {
        self.cell.latest()
    }

    /// Parse `text` and send the clamped value to the cell.
    pub fn submit(&self, text: &str) -> InputOutcome {
        match text.trim().parse::<f64>() {
            Ok(value) => self.submit_value(value),
            Err(_) => {
                debug!(param = self.kind.name(), text, "malformed numeric input ignored");
                InputOutcome::Ignored
            }
        }
    }

    /// Clamp `requested` and send it. Non-finite values are ignored.
    pub fn submit_value(&self, requested: f64) -> InputOutcome {
        if !requested.is_finite() {
            debug!(param = self.kind.name(), requested, "non-finite numeric input ignored");
            return InputOutcome::Ignored;
        }
        let accepted = self.range.clamp(requested);
        self.cell.send(accepted);
        if accepted == requested {
            InputOutcome::Accepted(accepted)
        } else {
            InputOutcome::Clamped {
                requested,
                accepted,
            }
        }
    }

    /// Text the field should currently show.
    pub fn display_text(&self) -> String {
        format_value(self.cell.latest())
    }

    /// Keep a display in sync with the cell, including changes made elsewhere.
    pub fn bind_display(&self, show: impl Fn(String) + 'static) -> ListenerId {
        self.cell.add_listener(move |value| show(format_value(*value)))
    }
}

fn format_value(value: f64) -> String {
    format!("{value}")
}

/// The closed/open bottom checkbox.
#[derive(Debug, Clone)]
pub struct ToggleInput {
    cell: ReactiveCell<bool>,
}

impl ToggleInput {
    pub fn new(cell: ReactiveCell<bool>) -> Self {
        Self { cell }
    }

    pub fn set(&self, checked: bool) -> bool {
        self.cell.send(checked)
    }

    pub fn checked(&self) -> bool {
        self.cell.latest()
    }

    pub fn bind_display(&self, show: impl Fn(bool) + 'static) -> ListenerId {
        self.cell.add_listener(move |checked| show(*checked))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use tube_types::ParamLimits;

    use super::*;

    fn height_input() -> (NumericInput, ReactiveCell<f64>) {
        let limits = ParamLimits::default();
        let cell = ReactiveCell::new(limits.height.default);
        (
            NumericInput::new(ParamKind::Height, limits.height, cell.clone()),
            cell,
        )
    }

    #[test]
    fn accepts_in_range_value() {
        let (input, cell) = height_input();
        assert_eq!(input.submit(" 80 "), InputOutcome::Accepted(80.0));
        assert_eq!(cell.latest(), 80.0);
    }

    #[test]
    fn clamps_out_of_range_value() {
        let (input, cell) = height_input();
        assert_eq!(
            input.submit("5000"),
            InputOutcome::Clamped {
                requested: 5000.0,
                accepted: 200.0
            }
        );
        assert_eq!(cell.latest(), 200.0);
    }

    #[test]
    fn ignores_malformed_text() {
        let (input, cell) = height_input();
        for text in ["", "abc", "12mm", "NaN", "inf"] {
            assert_eq!(input.submit(text), InputOutcome::Ignored);
        }
        assert_eq!(cell.latest(), 50.0);
    }

    #[test]
    fn display_follows_external_changes() {
        let (input, cell) = height_input();
        let shown = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&shown);
        input.bind_display(move |text| *sink.borrow_mut() = text);
        assert_eq!(*shown.borrow(), "50");
        cell.send(62.5);
        assert_eq!(*shown.borrow(), "62.5");
        assert_eq!(input.display_text(), "62.5");
    }

    #[test]
    fn toggle_sends_only_changes() {
        let cell = ReactiveCell::new(true);
        let toggle = ToggleInput::new(cell.clone());
        assert!(!toggle.set(true));
        assert!(toggle.set(false));
        assert!(!cell.latest());
    }
}
