//! Extractors whose rejections speak the error envelope.

use std::collections::HashMap;

use axum::extract::{FromRequest, FromRequestParts, Multipart};
use vs_core::AppError;
use vs_services::commands::Upload;

use crate::error::ApiError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl<T> ApiJson<T> {
    /// Unwraps a body extracted as `Result<ApiJson<T>, ApiError>`.
    ///
    /// Owner-only routes take the body this way so a malformed payload from
    /// a non-owner still answers 403.
    pub fn deferred(body: Result<Self, ApiError>) -> Result<T, AppError> {
        body.map(|ApiJson(value)| value).map_err(|ApiError(err)| err)
    }
}

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// A fully buffered `multipart/form-data` body.
///
/// Parts with a file name are uploads; every other part is a text field.
/// A repeated name keeps its last value.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await?;
                form.files.insert(
                    name,
                    Upload {
                        file_name,
                        content_type,
                        data,
                    },
                );
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn take_text(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}
