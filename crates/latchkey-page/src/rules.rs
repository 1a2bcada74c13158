// SPDX-FileCopyrightText: 2026 Latchkey Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered field-classification rules.
//!
//! Login pages rarely label their inputs helpfully, so classification is a
//! priority-ordered cascade from precise attribute matches down to "any
//! visible text input". Capture and autofill share the exact same rule
//! lists; whatever capture recognizes, autofill can later fill.
//!
//! Rules are pure data matched against snapshotted [`FieldDescriptor`]s,
//! which keeps the cascade unit-testable without any page at all.

use latchkey_core::{
    ControlDescriptor, ControlKind, FieldDescriptor, FieldHandle, FieldKind, FieldRole, PageDom,
    Scope,
};

/// Which descriptor attribute a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Name,
    Id,
    Placeholder,
    Autocomplete,
}

/// How the attribute value is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Case-insensitive substring match.
    Contains(&'static str),
    /// Exact, case-sensitive match.
    Equals(&'static str),
}

/// One step of the classification cascade.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Required input kind, if any.
    pub kind: Option<FieldKind>,
    /// Required attribute condition, if any.
    pub attr: Option<(Attr, Pattern)>,
    /// Whether the field must sit inside a form element.
    pub require_form: bool,
}

impl Rule {
    const fn kind(kind: FieldKind) -> Self {
        Self {
            kind: Some(kind),
            attr: None,
            require_form: false,
        }
    }

    const fn kind_attr(kind: FieldKind, attr: Attr, pattern: Pattern) -> Self {
        Self {
            kind: Some(kind),
            attr: Some((attr, pattern)),
            require_form: false,
        }
    }

    const fn attr(attr: Attr, pattern: Pattern) -> Self {
        Self {
            kind: None,
            attr: Some((attr, pattern)),
            require_form: false,
        }
    }

    /// Structural match against a descriptor; visibility is checked by the
    /// caller, value presence by [`locate`].
    pub fn matches(&self, descriptor: &FieldDescriptor) -> bool {
        if let Some(kind) = self.kind {
            if descriptor.kind != kind {
                return false;
            }
        }
        if self.require_form && descriptor.form.is_none() {
            return false;
        }
        if let Some((attr, pattern)) = self.attr {
            let value = match attr {
                Attr::Name => descriptor.name.as_deref(),
                Attr::Id => descriptor.id.as_deref(),
                Attr::Placeholder => descriptor.placeholder.as_deref(),
                Attr::Autocomplete => descriptor.autocomplete.as_deref(),
            };
            let Some(value) = value else {
                return false;
            };
            match pattern {
                Pattern::Contains(needle) => {
                    if !value.to_lowercase().contains(needle) {
                        return false;
                    }
                }
                Pattern::Equals(expected) => {
                    if value != expected {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Username cascade, most specific first. Email-typed inputs win outright;
/// the bare "any text input" and "first text input in a form" entries are
/// last-resort fallbacks.
static USERNAME_RULES: &[Rule] = &[
    Rule::kind(FieldKind::Email),
    Rule::kind_attr(FieldKind::Text, Attr::Name, Pattern::Contains("user")),
    Rule::kind_attr(FieldKind::Text, Attr::Name, Pattern::Contains("email")),
    Rule::kind_attr(FieldKind::Text, Attr::Id, Pattern::Contains("user")),
    Rule::kind_attr(FieldKind::Text, Attr::Id, Pattern::Contains("email")),
    Rule::kind_attr(FieldKind::Text, Attr::Placeholder, Pattern::Contains("user")),
    Rule::kind_attr(FieldKind::Text, Attr::Placeholder, Pattern::Contains("email")),
    Rule::kind_attr(FieldKind::Text, Attr::Autocomplete, Pattern::Equals("username")),
    Rule::kind_attr(FieldKind::Text, Attr::Autocomplete, Pattern::Equals("email")),
    Rule::attr(Attr::Name, Pattern::Equals("username")),
    Rule::attr(Attr::Name, Pattern::Equals("email")),
    Rule::attr(Attr::Id, Pattern::Equals("username")),
    Rule::attr(Attr::Id, Pattern::Equals("email")),
    Rule::kind(FieldKind::Text),
    Rule {
        kind: Some(FieldKind::Text),
        attr: None,
        require_form: true,
    },
];

/// Password cascade.
static PASSWORD_RULES: &[Rule] = &[
    Rule::kind(FieldKind::Password),
    Rule::attr(Attr::Name, Pattern::Contains("pass")),
    Rule::attr(Attr::Id, Pattern::Contains("pass")),
];

/// The classification cascade for `role`.
pub fn rules_for(role: FieldRole) -> &'static [Rule] {
    match role {
        FieldRole::Username => USERNAME_RULES,
        FieldRole::Password => PASSWORD_RULES,
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|v| v.to_lowercase().contains(needle))
}

/// Whether a clickable control looks like a login/submit trigger: submit
/// inputs, submit-typed buttons, and buttons whose id or class mentions
/// submit, login, or signin.
pub fn is_submit_like(control: &ControlDescriptor) -> bool {
    match control.kind {
        ControlKind::Input => control.type_attr.as_deref() == Some("submit"),
        ControlKind::Button => {
            control.type_attr.as_deref() == Some("submit")
                || ["submit", "login", "signin"].iter().any(|needle| {
                    contains_ci(control.id.as_deref(), needle)
                        || contains_ci(control.class.as_deref(), needle)
                })
        }
    }
}

/// Walk the cascade for `role` over the fields in `scope`.
///
/// Each rule considers only the first field (in document order) that matches
/// it structurally; if that field is hidden, or `require_value` is set and it
/// is empty, the cascade moves on to the next rule rather than scanning
/// further fields.
pub fn locate(
    dom: &dyn PageDom,
    scope: Scope,
    role: FieldRole,
    require_value: bool,
) -> Option<FieldHandle> {
    let fields = dom.fields(scope);
    for rule in rules_for(role) {
        let Some(handle) = fields.iter().find(|f| rule.matches(&f.descriptor)) else {
            continue;
        };
        if !handle.descriptor.visible {
            continue;
        }
        if require_value {
            let has_value = dom
                .read_value(handle.node)
                .is_some_and(|v| !v.is_empty());
            if !has_value {
                continue;
            }
        }
        return Some(handle.clone());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use latchkey_core::NodeId;

    fn text_field(name: Option<&str>, id: Option<&str>) -> FieldDescriptor {
        FieldDescriptor {
            kind: FieldKind::Text,
            name: name.map(str::to_string),
            id: id.map(str::to_string),
            visible: true,
            ..Default::default()
        }
    }

    #[test]
    fn email_kind_outranks_named_text_inputs() {
        let email = FieldDescriptor {
            kind: FieldKind::Email,
            visible: true,
            ..Default::default()
        };
        let named = text_field(Some("username"), None);

        let email_rank = USERNAME_RULES.iter().position(|r| r.matches(&email));
        let named_rank = USERNAME_RULES.iter().position(|r| r.matches(&named));
        assert!(email_rank.unwrap() < named_rank.unwrap());
    }

    #[test]
    fn attribute_substring_match_is_case_insensitive() {
        let field = text_field(Some("UserName"), None);
        let rule = Rule::kind_attr(FieldKind::Text, Attr::Name, Pattern::Contains("user"));
        assert!(rule.matches(&field));
    }

    #[test]
    fn exact_match_rules_accept_any_input_kind() {
        // name="username" matches even on a non-text input.
        let field = FieldDescriptor {
            kind: FieldKind::Other,
            name: Some("username".into()),
            visible: true,
            ..Default::default()
        };
        assert!(USERNAME_RULES.iter().any(|r| r.matches(&field)));
    }

    #[test]
    fn password_rules_catch_name_and_id_variants() {
        let by_kind = FieldDescriptor {
            kind: FieldKind::Password,
            visible: true,
            ..Default::default()
        };
        let by_name = FieldDescriptor {
            kind: FieldKind::Other,
            name: Some("current-password".into()),
            visible: true,
            ..Default::default()
        };
        let by_id = FieldDescriptor {
            kind: FieldKind::Other,
            id: Some("Passphrase".into()),
            visible: true,
            ..Default::default()
        };
        for field in [&by_kind, &by_name, &by_id] {
            assert!(PASSWORD_RULES.iter().any(|r| r.matches(field)), "{field:?}");
        }
    }

    #[test]
    fn username_classifier_prefers_the_email_marked_text_input() {
        use latchkey_test_utils::FakePage;

        let page = FakePage::new("login.example");
        let form = page.add_form();
        page.add_field(FieldDescriptor {
            kind: FieldKind::Password,
            form: Some(form),
            visible: true,
            ..Default::default()
        });
        page.add_field(FieldDescriptor {
            kind: FieldKind::Text,
            form: Some(form),
            visible: true,
            ..Default::default()
        });
        let marked = page.add_field(FieldDescriptor {
            kind: FieldKind::Text,
            name: Some("email".into()),
            form: Some(form),
            visible: true,
            ..Default::default()
        });

        let found = locate(&page, Scope::Form(form), FieldRole::Username, false).unwrap();
        assert_eq!(found.node, marked);
    }

    #[test]
    fn submit_like_controls() {
        let submit_input = ControlDescriptor {
            node: NodeId(1),
            kind: ControlKind::Input,
            type_attr: Some("submit".into()),
            id: None,
            class: None,
        };
        assert!(is_submit_like(&submit_input));

        let login_button = ControlDescriptor {
            node: NodeId(2),
            kind: ControlKind::Button,
            type_attr: Some("button".into()),
            id: None,
            class: Some("btn LoginButton".into()),
        };
        assert!(is_submit_like(&login_button));

        let plain_button = ControlDescriptor {
            node: NodeId(3),
            kind: ControlKind::Button,
            type_attr: Some("button".into()),
            id: Some("toggle-theme".into()),
            class: Some("btn".into()),
        };
        assert!(!is_submit_like(&plain_button));

        // Inputs are only submit-like through their type attribute.
        let login_input = ControlDescriptor {
            node: NodeId(4),
            kind: ControlKind::Input,
            type_attr: Some("button".into()),
            id: Some("login".into()),
            class: None,
        };
        assert!(!is_submit_like(&login_input));
    }
}
