use crate::domain::model::{select, FormInput, UploadedFile};
use crate::utils::error::{Result, UploaderError};
use crate::utils::validation::{validate_file_extension, ALLOWED_EXTENSIONS};
use axum::extract::multipart::{Field, Multipart, MultipartError};

/// The posted form plus a rejected file, if the picked file had a
/// disallowed type. Selections are kept either way so the page can show
/// them again.
#[derive(Debug, Default)]
pub struct ParsedForm {
    pub input: FormInput,
    pub file_error: Option<UploaderError>,
}

fn multipart_error(e: MultipartError) -> UploaderError {
    UploaderError::MultipartError {
        message: e.body_text(),
    }
}

async fn text(field: Field<'_>) -> Result<String> {
    field.text().await.map_err(multipart_error)
}

/// Reads the browser's multipart post. Unknown option values are an error;
/// a file part without a filename means nothing was picked.
pub async fn read_form(mut multipart: Multipart) -> Result<ParsedForm> {
    let mut parsed = ParsedForm::default();
    let details = &mut parsed.input.details;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "scheme_gender" => details.gender = text(field).await?.parse()?,
            "scheme_source" => details.source = text(field).await?.parse()?,
            "scheme_description" => details.description = text(field).await?,
            "scheme_category" => {
                let value = text(field).await?;
                if !value.is_empty() {
                    select(&mut details.category, value.parse()?);
                }
            }
            "scheme_type" => {
                let value = text(field).await?;
                if !value.is_empty() {
                    select(&mut details.scheme_type, value.parse()?);
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if filename.is_empty() {
                    continue;
                }
                if let Err(e) = validate_file_extension(&filename, ALLOWED_EXTENSIONS) {
                    parsed.file_error = Some(e);
                    continue;
                }
                parsed.input.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!("Ignoring unknown form field {}", other),
        }
    }

    Ok(parsed)
}
