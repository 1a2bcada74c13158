// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock page messenger for deterministic testing.
//!
//! `MockMessenger` implements `Messenger` with captured requests and a
//! scriptable autofill response, so controller tests assert on exactly what
//! would cross the page boundary.

use async_trait::async_trait;
use tokio::sync::Mutex;

use latchkey_core::{AutofillRequest, AutofillResponse, LatchkeyError, Messenger};

/// A mock page messenger for testing.
pub struct MockMessenger {
    autofill_requests: Mutex<Vec<AutofillRequest>>,
    surface_opens: Mutex<usize>,
    response: Mutex<AutofillResponse>,
    fail_autofill: Mutex<bool>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self {
            autofill_requests: Mutex::new(Vec::new()),
            surface_opens: Mutex::new(0),
            response: Mutex::new(AutofillResponse {
                success: true,
                message: "Filled username and password fields".to_string(),
            }),
            fail_autofill: Mutex::new(false),
        }
    }

    /// Script the response every subsequent `autofill()` call returns.
    pub async fn set_response(&self, response: AutofillResponse) {
        *self.response.lock().await = response;
    }

    /// Make every subsequent `autofill()` call fail at the transport level.
    pub async fn fail_autofill(&self) {
        *self.fail_autofill.lock().await = true;
    }

    /// All autofill requests captured so far.
    pub async fn autofill_requests(&self) -> Vec<AutofillRequest> {
        self.autofill_requests.lock().await.clone()
    }

    /// How many times the interactive surface was asked to open.
    pub async fn surface_open_count(&self) -> usize {
        *self.surface_opens.lock().await
    }
}

impl Default for MockMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn open_interactive_surface(&self) -> Result<(), LatchkeyError> {
        *self.surface_opens.lock().await += 1;
        Ok(())
    }

    async fn autofill(
        &self,
        request: AutofillRequest,
    ) -> Result<AutofillResponse, LatchkeyError> {
        if *self.fail_autofill.lock().await {
            return Err(LatchkeyError::Messaging {
                message: "mock transport failure".to_string(),
                source: None,
            });
        }
        self.autofill_requests.lock().await.push(request);
        Ok(self.response.lock().await.clone())
    }
}
