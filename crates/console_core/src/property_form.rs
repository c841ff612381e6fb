//! Property-creation form: required-field checks and multipart submission.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use shared::error::{ConsoleError, FieldErrors};
use thiserror::Error;
use tracing::info;

use crate::RemoteService;

/// Every form field, in submission order, with its inline message.
pub const PROPERTY_FIELDS: [(&str, &str); 20] = [
    ("address", "Address is required"),
    ("building", "Building name is required"),
    ("type", "Select room type"),
    ("furnishing", "Select furnishing"),
    ("tenantType", "Select tenant type"),
    ("bikeparking", "Select Bike parking option"),
    ("carparking", "Select Car parking option"),
    ("powerBackup", "Select power backup"),
    ("geyser", "Select geyser option"),
    ("security", "Select security option"),
    ("cctv", "Select CCTV option"),
    ("bathrooms", "Select bathrooms"),
    ("floor", "Floor is required"),
    ("flat", "Flat number is required"),
    ("colony", "Colony is required"),
    ("area", "Area is required"),
    ("pincode", "Pincode is required"),
    ("rent", "Rent is required"),
    ("advance", "Advance is required"),
    ("contact", "Contact is required"),
];

const IMAGES_PART: &str = "images";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown property field '{0}'")]
pub struct UnknownField(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mime_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            filename,
            mime_type,
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(filename, bytes))
    }
}

#[derive(Debug, Clone, Default)]
pub struct PropertyDraft {
    values: BTreeMap<&'static str, String>,
    images: Vec<ImageAttachment>,
}

impl PropertyDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        let (name, _) = PROPERTY_FIELDS
            .iter()
            .find(|(name, _)| *name == field)
            .ok_or_else(|| UnknownField(field.to_string()))?;
        self.values.insert(*name, value.into());
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    pub fn add_image(&mut self, image: ImageAttachment) {
        self.images.push(image);
    }

    pub fn remove_image(&mut self, index: usize) -> Option<ImageAttachment> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn images(&self) -> &[ImageAttachment] {
        &self.images
    }

    /// Collects a message for every blank required field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let errors: FieldErrors = PROPERTY_FIELDS
            .iter()
            .filter(|(name, _)| self.get(name).map_or(true, |value| value.trim().is_empty()))
            .map(|(name, message)| (name.to_string(), message.to_string()))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn to_submission(&self) -> Result<PropertySubmission, ConsoleError> {
        self.validate().map_err(ConsoleError::Validation)?;
        let fields = PROPERTY_FIELDS
            .iter()
            .map(|(name, _)| (*name, self.get(name).unwrap_or_default().to_string()))
            .collect();
        Ok(PropertySubmission {
            fields,
            images: self.images.clone(),
        })
    }

    pub fn reset(&mut self) {
        self.values.clear();
        self.images.clear();
    }
}

/// A validated form, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySubmission {
    pub fields: Vec<(&'static str, String)>,
    pub images: Vec<ImageAttachment>,
}

impl PropertySubmission {
    pub fn into_multipart(self) -> Result<Form, ConsoleError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for image in self.images {
            let part = Part::bytes(image.bytes)
                .file_name(image.filename)
                .mime_str(&image.mime_type)
                .map_err(|err| ConsoleError::Decode(format!("invalid image type: {err}")))?;
            form = form.part(IMAGES_PART, part);
        }
        Ok(form)
    }
}

/// Validates before touching the network; on success the draft is cleared.
pub async fn submit(remote: &dyn RemoteService, draft: &mut PropertyDraft) -> Result<(), ConsoleError> {
    let submission = draft.to_submission()?;
    let images = submission.images.len();
    remote.create_property(submission).await?;
    info!(images, "property saved");
    draft.reset();
    Ok(())
}

#[cfg(test)]
#[path = "tests/property_form_tests.rs"]
mod tests;
