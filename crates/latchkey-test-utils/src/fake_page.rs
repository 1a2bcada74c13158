// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptable `PageDom` implementation for engine tests.
//!
//! `FakePage` holds forms, fields, and controls in document order, tracks
//! every value written through `write_value_and_notify`, and lets tests set
//! field values as if the user had typed them.

use std::sync::Mutex;

use latchkey_core::{
    ControlDescriptor, ControlKind, FieldDescriptor, FieldHandle, FormId, LatchkeyError, NodeId,
    PageDom, Scope,
};

struct FakeField {
    handle: FieldHandle,
    value: String,
}

struct FakeControl {
    form: Option<FormId>,
    descriptor: ControlDescriptor,
}

struct Inner {
    hostname: String,
    next_node: u64,
    next_form: u64,
    forms: Vec<FormId>,
    fields: Vec<FakeField>,
    controls: Vec<FakeControl>,
    writes: Vec<(NodeId, String)>,
}

/// A scriptable in-memory page.
pub struct FakePage {
    inner: Mutex<Inner>,
}

impl FakePage {
    pub fn new(hostname: &str) -> Self {
        Self {
            inner: Mutex::new(Inner {
                hostname: hostname.to_string(),
                next_node: 1,
                next_form: 1,
                forms: Vec::new(),
                fields: Vec::new(),
                controls: Vec::new(),
                writes: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a prior test assertion already panicked.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Add a form element; fields reference it through their descriptor.
    pub fn add_form(&self) -> FormId {
        let mut inner = self.lock();
        let form = FormId(inner.next_form);
        inner.next_form += 1;
        inner.forms.push(form);
        form
    }

    /// Add an input field with the given attributes and an empty value.
    pub fn add_field(&self, descriptor: FieldDescriptor) -> NodeId {
        self.add_field_with_value(descriptor, "")
    }

    /// Add an input field that already holds `value`, as if typed by a user.
    pub fn add_field_with_value(&self, descriptor: FieldDescriptor, value: &str) -> NodeId {
        let mut inner = self.lock();
        let node = NodeId(inner.next_node);
        inner.next_node += 1;
        inner.fields.push(FakeField {
            handle: FieldHandle { node, descriptor },
            value: value.to_string(),
        });
        node
    }

    /// Add a clickable control, optionally inside a form.
    pub fn add_control(
        &self,
        form: Option<FormId>,
        kind: ControlKind,
        type_attr: Option<&str>,
        id: Option<&str>,
        class: Option<&str>,
    ) -> NodeId {
        let mut inner = self.lock();
        let node = NodeId(inner.next_node);
        inner.next_node += 1;
        inner.controls.push(FakeControl {
            form,
            descriptor: ControlDescriptor {
                node,
                kind,
                type_attr: type_attr.map(str::to_string),
                id: id.map(str::to_string),
                class: class.map(str::to_string),
            },
        });
        node
    }

    /// Overwrite a field's value directly, bypassing write tracking.
    pub fn set_value(&self, node: NodeId, value: &str) {
        let mut inner = self.lock();
        if let Some(field) = inner.fields.iter_mut().find(|f| f.handle.node == node) {
            field.value = value.to_string();
        }
    }

    /// Every `(node, value)` pair written through the DOM boundary, in order.
    pub fn writes(&self) -> Vec<(NodeId, String)> {
        self.lock().writes.clone()
    }
}

impl PageDom for FakePage {
    fn hostname(&self) -> String {
        self.lock().hostname.clone()
    }

    fn forms(&self) -> Vec<FormId> {
        self.lock().forms.clone()
    }

    fn fields(&self, scope: Scope) -> Vec<FieldHandle> {
        self.lock()
            .fields
            .iter()
            .filter(|f| match scope {
                Scope::Document => true,
                Scope::Form(form) => f.handle.descriptor.form == Some(form),
            })
            .map(|f| f.handle.clone())
            .collect()
    }

    fn controls(&self, scope: Scope) -> Vec<ControlDescriptor> {
        self.lock()
            .controls
            .iter()
            .filter(|c| match scope {
                Scope::Document => true,
                Scope::Form(form) => c.form == Some(form),
            })
            .map(|c| c.descriptor.clone())
            .collect()
    }

    fn read_value(&self, node: NodeId) -> Option<String> {
        self.lock()
            .fields
            .iter()
            .find(|f| f.handle.node == node)
            .map(|f| f.value.clone())
    }

    fn write_value_and_notify(&self, node: NodeId, value: &str) -> Result<(), LatchkeyError> {
        let mut inner = self.lock();
        let Some(field) = inner.fields.iter_mut().find(|f| f.handle.node == node) else {
            return Err(LatchkeyError::Internal(format!(
                "no such node: {node:?}"
            )));
        };
        field.value = value.to_string();
        inner.writes.push((node, value.to_string()));
        Ok(())
    }
}
