//! diagnostics — single-use output slots for optional side records.
//!
//! Purpose
//! -------
//! Give long-running transforms a typed, optional side channel for
//! diagnostics. A caller that wants the record passes
//! `Some(&mut DiagnosticsSlot::new())`; a caller that does not passes `None`
//! and pays nothing for it.
//!
//! Invariants & assumptions
//! ------------------------
//! - A slot must be empty when handed to an operation; operations check this
//!   before doing any work.
//! - A successful operation fills its slot exactly once. Failed operations
//!   leave the slot empty.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the empty → filled transition and the refusal to
//!   overwrite a filled slot.

/// DiagnosticsError — misuse of a [`DiagnosticsSlot`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticsError {
    /// The slot already holds a record.
    SlotNotEmpty,
}

pub type DiagnosticsResult<T> = Result<T, DiagnosticsError>;

impl std::error::Error for DiagnosticsError {}

impl std::fmt::Display for DiagnosticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticsError::SlotNotEmpty => {
                write!(f, "Diagnostics Error: slot must be empty on entry and is filled only once")
            }
        }
    }
}

/// DiagnosticsSlot — optional output parameter holding one fixed-shape record.
///
/// Examples
/// --------
/// ```rust
/// # use rust_event_study::diagnostics::DiagnosticsSlot;
/// let slot: DiagnosticsSlot<u32> = DiagnosticsSlot::new();
/// assert!(slot.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsSlot<T> {
    record: Option<T>,
}

impl<T> DiagnosticsSlot<T> {
    pub fn new() -> Self {
        DiagnosticsSlot { record: None }
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.record.as_ref()
    }

    pub fn into_inner(self) -> Option<T> {
        self.record
    }

    /// Fail with [`DiagnosticsError::SlotNotEmpty`] unless the slot is empty.
    pub(crate) fn ensure_empty(&self) -> DiagnosticsResult<()> {
        if self.record.is_some() {
            return Err(DiagnosticsError::SlotNotEmpty);
        }
        Ok(())
    }

    pub(crate) fn fill(&mut self, record: T) -> DiagnosticsResult<()> {
        self.ensure_empty()?;
        self.record = Some(record);
        Ok(())
    }
}

impl<T> Default for DiagnosticsSlot<T> {
    fn default() -> Self {
        DiagnosticsSlot::new()
    }
}

/// Check an optional slot on entry to an operation.
pub(crate) fn ensure_slot_empty<T>(slot: &Option<&mut DiagnosticsSlot<T>>) -> DiagnosticsResult<()> {
    match slot {
        Some(slot) => slot.ensure_empty(),
        None => Ok(()),
    }
}
