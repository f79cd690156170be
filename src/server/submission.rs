use crate::domain::model::Order;
use crate::domain::order::{LabelDefaults, OrderForm};
use crate::utils::error::{LabelError, Result};
use crate::utils::sanitize::secure_filename;
use crate::utils::validation::{validate_file_extension, Violations};
use axum::extract::Multipart;

pub const FILE_FIELD: &str = "file";

/// An uploaded spreadsheet as received.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A validated upload, ready to be stored.
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    pub stored_name: String,
    pub bytes: Vec<u8>,
}

/// Everything a form post carried, before validation.
#[derive(Debug, Default)]
pub struct Submission {
    pub form: OrderForm,
    pub upload: Option<Upload>,
}

impl Submission {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut submission = Submission::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| LabelError::MultipartError {
                message: e.body_text(),
            })?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| LabelError::MultipartError {
                    message: e.body_text(),
                })?;
                tracing::debug!("Received upload '{}' ({} bytes)", file_name, bytes.len());
                submission.upload = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(|e| LabelError::MultipartError {
                    message: e.body_text(),
                })?;
                submission.form.set(&name, value);
            }
        }

        Ok(submission)
    }

    /// Validates the form fields and the upload in one pass so every problem
    /// is reported together.
    pub fn validate(
        self,
        defaults: &LabelDefaults,
        allowed_extensions: &[String],
    ) -> Result<(Order, AcceptedUpload)> {
        let mut violations = Violations::new();
        let order = self.form.validate_into(defaults, &mut violations);
        let upload = violations.record(accept_upload(self.upload, allowed_extensions));

        violations.into_result()?;
        match (order, upload) {
            (Some(order), Some(upload)) => Ok((order, upload)),
            _ => Err(LabelError::ProcessingError {
                message: "submission validation produced no order".to_string(),
            }),
        }
    }
}

fn accept_upload(upload: Option<Upload>, allowed_extensions: &[String]) -> Result<AcceptedUpload> {
    let upload = match upload {
        Some(upload) if !upload.file_name.is_empty() => upload,
        _ => {
            return Err(LabelError::MissingConfigError {
                field: FILE_FIELD.to_string(),
            })
        }
    };

    let extension = validate_file_extension(FILE_FIELD, &upload.file_name, allowed_extensions)?;
    let suffix = format!(".{}", extension);
    let stored_name = match secure_filename(&upload.file_name) {
        Some(name) if name.to_ascii_lowercase().ends_with(&suffix) && name.len() > suffix.len() => {
            name
        }
        _ => format!("upload{}", suffix),
    };

    Ok(AcceptedUpload {
        stored_name,
        bytes: upload.bytes,
    })
}
