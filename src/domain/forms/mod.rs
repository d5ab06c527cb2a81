//! Client-side form state for the admin views.
//!
//! Nothing here performs I/O; a frontend drives the machine with the
//! responses it receives from the API.

pub mod language;

use derive_more::Display;

use crate::errors::FieldError;

/// `Loading → Populated → Editing → Submitting → (Succeeded | Invalid | Failed)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Loading,
    Populated,
    Editing,
    Submitting,
    Succeeded,
    /// Field errors, from client validation or the server.
    Invalid,
    /// The server rejected the request without field errors, or it never answered.
    Failed,
}

impl FormPhase {
    pub fn accepts_edits(self) -> bool {
        !matches!(self, FormPhase::Loading | FormPhase::Submitting)
    }

    pub fn accepts_submit(self) -> bool {
        matches!(
            self,
            FormPhase::Populated | FormPhase::Editing | FormPhase::Invalid | FormPhase::Failed
        )
    }
}

#[derive(Debug, Display, PartialEq)]
pub enum FormError {
    #[display("cannot {action} while the form is {phase:?}")]
    InvalidTransition { action: &'static str, phase: FormPhase },

    #[display("form has {} invalid field(s)", _0.len())]
    ClientValidation(Vec<FieldError>),
}

impl std::error::Error for FormError {}
