//! Transient input buffers, one per request form.

use serde::Serialize;

use crate::error::{QuestError, Result};
use crate::level::FormKind;

/// Input typed into one form. Fields a form doesn't use stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormDraft {
    /// Book id.
    pub id: String,
    /// Book title.
    pub title: String,
    /// Book author.
    pub author: String,
    /// Publication year.
    pub year: String,
}

impl FormDraft {
    /// Returns `true` if nothing has been typed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.title.is_empty() && self.author.is_empty() && self.year.is_empty()
    }

    fn slot_mut(&mut self, field: &str) -> Option<&mut String> {
        match field {
            "id" => Some(&mut self.id),
            "title" => Some(&mut self.title),
            "author" => Some(&mut self.author),
            "year" => Some(&mut self.year),
            _ => None,
        }
    }

    /// Returns the value typed for `field`, or `None` for an unknown field.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        match field {
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "author" => Some(&self.author),
            "year" => Some(&self.year),
            _ => None,
        }
    }
}

/// The drafts of every form, owned by the session.
///
/// Cleared per form after a successful submission; never filled from
/// server data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormDrafts {
    get_by_id: FormDraft,
    create: FormDraft,
    update: FormDraft,
    patch: FormDraft,
    delete: FormDraft,
}

impl FormDrafts {
    /// Returns the draft of `form`. The collection form has no inputs and
    /// always yields an empty draft.
    #[must_use]
    pub fn get(&self, form: FormKind) -> &FormDraft {
        static EMPTY: FormDraft = FormDraft {
            id: String::new(),
            title: String::new(),
            author: String::new(),
            year: String::new(),
        };
        match form {
            FormKind::GetAll => &EMPTY,
            FormKind::GetById => &self.get_by_id,
            FormKind::Create => &self.create,
            FormKind::Update => &self.update,
            FormKind::Patch => &self.patch,
            FormKind::Delete => &self.delete,
        }
    }

    fn get_mut(&mut self, form: FormKind) -> Option<&mut FormDraft> {
        match form {
            FormKind::GetAll => None,
            FormKind::GetById => Some(&mut self.get_by_id),
            FormKind::Create => Some(&mut self.create),
            FormKind::Update => Some(&mut self.update),
            FormKind::Patch => Some(&mut self.patch),
            FormKind::Delete => Some(&mut self.delete),
        }
    }

    /// Types `value` into `field` of `form`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::InvalidArguments`] if the form has no such field.
    pub fn set(&mut self, form: FormKind, field: &str, value: impl Into<String>) -> Result<()> {
        let known = form.fields().iter().any(|spec| spec.name == field);
        let slot = self
            .get_mut(form)
            .filter(|_| known)
            .and_then(|draft| draft.slot_mut(field))
            .ok_or_else(|| {
                let expected: Vec<_> = form.fields().iter().map(|spec| spec.name).collect();
                QuestError::invalid_arguments(
                    form.endpoint(),
                    format!("unknown field '{field}' (expected one of: {})", expected.join(", ")),
                )
            })?;
        *slot = value.into();
        Ok(())
    }

    /// Empties the draft of `form`.
    pub fn clear(&mut self, form: FormKind) {
        if let Some(draft) = self.get_mut(form) {
            *draft = FormDraft::default();
        }
    }
}
