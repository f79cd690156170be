use crate::adapters::storage::LocalStorage;
use crate::core::engine::LabelEngine;
use crate::core::pipeline::LabelPipeline;
use crate::core::{ConfigProvider, Storage};
use crate::server::submission::Submission;
use crate::server::workspace::RequestWorkspace;
use crate::server::AppState;
use crate::utils::error::Result;
use axum::{
    extract::{Multipart, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
};

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn return_home() -> Redirect {
    Redirect::to("/")
}

/// Accepts the order form and spreadsheet, and answers with the label archive.
pub async fn generate_labels(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let submission = Submission::from_multipart(multipart).await?;
    let config = state.config.clone();
    let (order, upload) = submission.validate(config.label_defaults(), config.allowed_extensions())?;

    tracing::info!(
        "Generating labels for order '{}' from '{}'",
        order.order_number,
        upload.stored_name
    );

    let workspace = RequestWorkspace::create(config.output_root(), &order.order_number)?;
    let storage: LocalStorage = workspace.storage();

    let upload_path = format!("uploads/{}", upload.stored_name);
    storage.write_file(&upload_path, &upload.bytes).await?;

    let order_number = order.order_number.clone();
    let pipeline = LabelPipeline::new(storage.clone(), config, order, upload_path);
    let archive_path = LabelEngine::new(pipeline).run().await?;
    let archive = storage.read_file(&archive_path).await?;
    drop(workspace);

    let file_name = format!("{}.zip", order_number);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(&file_name)),
        ],
        archive,
    ))
}

/// Attachment header with an ASCII fallback name and the RFC 5987 UTF-8 name.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' { c } else { '_' })
        .collect();
    let encoded = url::form_urlencoded::byte_serialize(file_name.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", fallback, encoded)
}
