// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Autofill engine.
//!
//! Fills credentials into a page using the same classification cascade as
//! capture, so any page that produced a capture can be filled again. Filling
//! is best-effort per role; a page missing one field still gets the other,
//! and the report says exactly what happened.

use std::sync::Arc;

use tracing::{debug, warn};

use latchkey_core::{
    AutofillRequest, AutofillResponse, FieldRole, LatchkeyError, PageDom, Scope,
};

use crate::rules::locate;

/// Outcome of one fill pass: which roles were written, which could not be
/// located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillReport {
    pub filled: Vec<FieldRole>,
    pub missing: Vec<FieldRole>,
}

impl FillReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && !self.filled.is_empty()
    }

    pub fn is_failed(&self) -> bool {
        self.filled.is_empty()
    }

    /// User-facing summary of the pass.
    pub fn into_response(self) -> AutofillResponse {
        if self.is_failed() {
            return AutofillResponse {
                success: false,
                message: "Could not find any login fields on this page".to_string(),
            };
        }

        let filled: Vec<String> = self.filled.iter().map(|r| r.to_string()).collect();
        let mut message = format!(
            "Filled {} field{}",
            filled.join(" and "),
            if filled.len() > 1 { "s" } else { "" }
        );
        if !self.missing.is_empty() {
            let notes: Vec<String> = self
                .missing
                .iter()
                .map(|r| format!("Could not find {r} field"))
                .collect();
            message.push_str(&format!(". Note: {}", notes.join(", ")));
        }
        AutofillResponse {
            success: true,
            message,
        }
    }
}

/// Writes credentials into classified fields through the DOM boundary.
pub struct AutofillEngine {
    dom: Arc<dyn PageDom>,
}

impl AutofillEngine {
    pub fn new(dom: Arc<dyn PageDom>) -> Self {
        Self { dom }
    }

    fn fill_role(&self, role: FieldRole, value: &str) -> Result<(), LatchkeyError> {
        let Some(handle) = locate(self.dom.as_ref(), Scope::Document, role, false) else {
            return Err(LatchkeyError::FieldNotFound { role });
        };
        self.dom.write_value_and_notify(handle.node, value)?;
        debug!(%role, node = ?handle.node, "field filled");
        Ok(())
    }

    /// Fill both roles, tolerating an unlocatable field. Only a DOM write
    /// failure is a hard error.
    pub fn fill(&self, username: &str, password: &str) -> Result<FillReport, LatchkeyError> {
        let mut report = FillReport {
            filled: Vec::new(),
            missing: Vec::new(),
        };
        for (role, value) in [
            (FieldRole::Username, username),
            (FieldRole::Password, password),
        ] {
            match self.fill_role(role, value) {
                Ok(()) => report.filled.push(role),
                Err(LatchkeyError::FieldNotFound { role }) => {
                    warn!(%role, "could not find field to fill");
                    report.missing.push(role);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    /// Handle a wire autofill request, mapping every outcome, including a
    /// DOM write failure, to a response the requesting surface can display.
    pub fn respond(&self, request: &AutofillRequest) -> AutofillResponse {
        match self.fill(&request.username, &request.password) {
            Ok(report) => report.into_response(),
            Err(e) => {
                warn!(error = %e, "autofill pass failed");
                AutofillResponse {
                    success: false,
                    message: "Could not fill the login fields on this page".to_string(),
                }
            }
        }
    }
}
