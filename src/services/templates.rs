// ABOUTME: Email template model and placeholder rendering for admin-managed messages
// ABOUTME: Substitutes {{ name }} placeholders and reports every missing variable at once
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Portal CMS contributors

use crate::errors::{AppError, AppResult, ErrorCode};
use portal_core::models::ContentItem;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeSet, HashMap};
use std::hash::BuildHasher;
use std::sync::LazyLock;

/// Matches `{{ name }}`, `{{name}}`, `{{ customer.first_name }}`
static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.\-]+)\s*\}\}").ok());

fn placeholder_regex() -> AppResult<&'static Regex> {
    PLACEHOLDER
        .as_ref()
        .ok_or_else(|| AppError::internal("Template placeholder pattern failed to compile"))
}

/// Subject and body of a stored email template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    /// Content key of the template
    pub key: String,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

/// Template output after substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedTemplate {
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

impl EmailTemplate {
    /// Read a template from a structured item with `subject` and `body` fields
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` when either field is missing or not a string
    pub fn from_item(item: &ContentItem) -> AppResult<Self> {
        let field = |name: &str| -> AppResult<String> {
            item.fields
                .as_ref()
                .and_then(|fields| fields.get(name))
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| {
                    AppError::new(
                        ErrorCode::InvalidFormat,
                        format!("Email template {} has no string field '{name}'", item.key),
                    )
                })
        };
        Ok(Self {
            key: item.key.clone(),
            subject: field("subject")?,
            body: field("body")?,
        })
    }

    /// Placeholder names used by subject and body, sorted
    ///
    /// # Errors
    ///
    /// Returns `InternalError` if the placeholder pattern is unavailable
    pub fn placeholders(&self) -> AppResult<BTreeSet<String>> {
        let re = placeholder_regex()?;
        Ok([&self.subject, &self.body]
            .into_iter()
            .flat_map(|text| re.captures_iter(text))
            .map(|caps| caps[1].to_owned())
            .collect())
    }

    /// Substitute every placeholder; values are inserted verbatim
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming every placeholder without a value
    pub fn render<S: BuildHasher>(
        &self,
        variables: &HashMap<String, String, S>,
    ) -> AppResult<RenderedTemplate> {
        let missing: Vec<String> = self
            .placeholders()?
            .into_iter()
            .filter(|name| !variables.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::invalid_input(format!(
                "Missing template variables: {}",
                missing.join(", ")
            ))
            .with_details(json!({ "missing": missing })));
        }

        Ok(RenderedTemplate {
            subject: substitute(&self.subject, variables)?,
            body: substitute(&self.body, variables)?,
        })
    }
}

fn substitute<S: BuildHasher>(text: &str, variables: &HashMap<String, String, S>) -> AppResult<String> {
    let re = placeholder_regex()?;
    Ok(re
        .replace_all(text, |caps: &Captures<'_>| {
            variables.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned())
}
