use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    entities::{
        envelope::ApiResponse,
        programming_language::{LanguagePayload, ProgrammingLanguage},
    },
    errors::FieldError,
    forms::{FormError, FormPhase},
};

/// Loose URL shape accepted by the admin views. The server applies its own,
/// stricter check.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(?:(?:http?)s*://)?[a-z0-9\-%\\&=?.]+\.[a-z]{2,4}/?(?:[^\s<>#%",{}\\|\^\[\]`]+)?"#,
    )
    .expect("URL pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LanguageField {
    Name,
    Description,
    Icon,
    Url,
}

impl LanguageField {
    pub const ALL: [LanguageField; 4] = [
        LanguageField::Name,
        LanguageField::Description,
        LanguageField::Icon,
        LanguageField::Url,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            LanguageField::Name => "programmingLanguageName",
            LanguageField::Description => "programmingLanguageDescription",
            LanguageField::Icon => "programmingLanguageIcon",
            LanguageField::Url => "programmingLanguageURL",
        }
    }

    /// Matches a field name reported by the server, long or short form.
    pub fn from_server(name: &str) -> Option<Self> {
        LanguageField::ALL.into_iter().find(|f| {
            f.wire_name() == name || f.short_name() == name
        })
    }

    fn short_name(self) -> &'static str {
        match self {
            LanguageField::Name => "name",
            LanguageField::Description => "description",
            LanguageField::Icon => "icon",
            LanguageField::Url => "url",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LanguageField::Name => "Language name",
            LanguageField::Description => "Language description",
            LanguageField::Icon => "Language icon",
            LanguageField::Url => "Language URL",
        }
    }

    fn checks_url(self) -> bool {
        matches!(self, LanguageField::Icon | LanguageField::Url)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageFormValues {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub url: String,
}

impl LanguageFormValues {
    pub fn get(&self, field: LanguageField) -> &str {
        match field {
            LanguageField::Name => &self.name,
            LanguageField::Description => &self.description,
            LanguageField::Icon => &self.icon,
            LanguageField::Url => &self.url,
        }
    }

    fn set(&mut self, field: LanguageField, value: String) {
        match field {
            LanguageField::Name => self.name = value,
            LanguageField::Description => self.description = value,
            LanguageField::Icon => self.icon = value,
            LanguageField::Url => self.url = value,
        }
    }
}

impl From<&ProgrammingLanguage> for LanguageFormValues {
    fn from(language: &ProgrammingLanguage) -> Self {
        LanguageFormValues {
            name: language.programming_language_name.clone(),
            description: language.programming_language_description.clone(),
            icon: language.programming_language_icon.clone(),
            url: language.programming_language_url.clone(),
        }
    }
}

/// Create/edit form for a programming language.
///
/// A create form starts `Populated` with blank values; an edit form starts
/// `Loading` until the record arrives.
#[derive(Debug, Clone)]
pub struct LanguageForm {
    id: Option<i32>,
    phase: FormPhase,
    values: LanguageFormValues,
    field_errors: BTreeMap<LanguageField, String>,
    form_error: Option<String>,
}

impl LanguageForm {
    pub fn create() -> Self {
        LanguageForm {
            id: None,
            phase: FormPhase::Populated,
            values: LanguageFormValues::default(),
            field_errors: BTreeMap::new(),
            form_error: None,
        }
    }

    pub fn edit_existing(id: i32) -> Self {
        LanguageForm {
            id: Some(id),
            phase: FormPhase::Loading,
            ..LanguageForm::create()
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn values(&self) -> &LanguageFormValues {
        &self.values
    }

    pub fn field_error(&self, field: LanguageField) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn populate(&mut self, language: &ProgrammingLanguage) -> Result<(), FormError> {
        self.expect_phase("populate", self.phase == FormPhase::Loading)?;

        self.id = Some(language.programming_language_id);
        self.values = LanguageFormValues::from(language);
        self.phase = FormPhase::Populated;
        Ok(())
    }

    /// The record could not be fetched; the form stays unusable until reloaded.
    pub fn load_failed(&mut self, error: impl Into<String>) -> Result<(), FormError> {
        self.expect_phase("fail loading", self.phase == FormPhase::Loading)?;

        self.form_error = Some(error.into());
        self.phase = FormPhase::Failed;
        Ok(())
    }

    pub fn edit(&mut self, field: LanguageField, value: impl Into<String>) -> Result<(), FormError> {
        self.expect_phase("edit", self.phase.accepts_edits())?;

        self.values.set(field, value.into());
        self.field_errors.remove(&field);
        self.form_error = None;
        self.phase = FormPhase::Editing;
        Ok(())
    }

    /// Advisory checks mirroring the server rules.
    pub fn validate(&self) -> BTreeMap<LanguageField, String> {
        LanguageField::ALL
            .into_iter()
            .filter_map(|field| {
                let value = self.values.get(field).trim();
                if value.is_empty() {
                    Some((field, format!("{} cannot be empty", field.label())))
                } else if field.checks_url() && !URL_PATTERN.is_match(value) {
                    Some((field, format!("{} is not a valid URL", field.label())))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Runs client validation and, when it passes, moves to `Submitting` and
    /// returns the request body to send.
    pub fn submit(&mut self) -> Result<LanguagePayload, FormError> {
        self.expect_phase("submit", self.phase.accepts_submit())?;

        let errors = self.validate();
        if !errors.is_empty() {
            let details = errors
                .iter()
                .map(|(field, msg)| FieldError::new(field.wire_name(), msg.clone()))
                .collect();
            self.field_errors = errors;
            self.phase = FormPhase::Invalid;
            return Err(FormError::ClientValidation(details));
        }

        self.field_errors.clear();
        self.form_error = None;
        self.phase = FormPhase::Submitting;

        Ok(LanguagePayload {
            id: self.id,
            name: Some(self.values.name.trim().to_string()),
            description: Some(self.values.description.trim().to_string()),
            icon: Some(self.values.icon.trim().to_string()),
            url: Some(self.values.url.trim().to_string()),
        })
    }

    /// Applies the server's answer to an in-flight submission.
    pub fn resolve(&mut self, response: ApiResponse<ProgrammingLanguage>) -> Result<(), FormError> {
        self.expect_phase("resolve", self.phase == FormPhase::Submitting)?;

        if response.success {
            if let Some(language) = &response.data {
                self.id = Some(language.programming_language_id);
                self.values = LanguageFormValues::from(language);
            }
            self.phase = FormPhase::Succeeded;
            return Ok(());
        }

        self.field_errors = response
            .details
            .iter()
            .filter_map(|d| LanguageField::from_server(&d.field).map(|f| (f, d.message.clone())))
            .collect();
        self.form_error = Some(response.error);
        self.phase = if self.field_errors.is_empty() {
            FormPhase::Failed
        } else {
            FormPhase::Invalid
        };
        Ok(())
    }

    /// The request never produced a response.
    pub fn transport_failed(&mut self, error: impl Into<String>) -> Result<(), FormError> {
        self.expect_phase("fail", self.phase == FormPhase::Submitting)?;

        self.form_error = Some(error.into());
        self.phase = FormPhase::Failed;
        Ok(())
    }

    fn expect_phase(&self, action: &'static str, allowed: bool) -> Result<(), FormError> {
        if allowed {
            Ok(())
        } else {
            Err(FormError::InvalidTransition { action, phase: self.phase })
        }
    }
}
