//! Handlers for subtitle upload, translation and download.

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use subline_core::error::CoreError;
use subline_core::language::validate_language_code;
use subline_core::srt::{self, SubtitleEntry};
use subline_core::types::DbId;
use subline_pipeline::JobSummary;
use subline_store::{CreateSubtitleSet, StoredSubtitle, SubtitleSet};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field that carries the subtitle file.
pub const UPLOAD_FIELD: &str = "srt";

/// Number of entries echoed back after an upload.
pub const PREVIEW_LIMIT: usize = 5;

/// Filename suggested to the browser for downloads.
pub const DOWNLOAD_FILENAME: &str = "translated.srt";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Verify that a subtitle set exists, returning it.
async fn ensure_set_exists(state: &AppState, set_id: DbId) -> AppResult<SubtitleSet> {
    state.store.find_set(set_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "SubtitleSet",
            id: set_id,
        })
    })
}

// ---------------------------------------------------------------------------
// POST /upload
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// Reject malformed blocks instead of skipping them.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub set_id: DbId,
    pub original_filename: String,
    pub total_subtitles: usize,
    pub preview: Vec<StoredSubtitle>,
}

/// POST /api/v1/upload
///
/// Accept a multipart upload with the file in the `srt` field, parse it and
/// store the entries as a new subtitle set.
pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResult>>)> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.srt").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        upload = Some((filename, data));
    }

    let (original_filename, data) = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Missing '{UPLOAD_FIELD}' file field"))
    })?;

    let content = std::str::from_utf8(&data)
        .map_err(|_| AppError::BadRequest("Subtitle file must be UTF-8 text".to_string()))?;

    let entries = if params.strict {
        srt::parse_strict(content)?
    } else {
        srt::parse(content)
    };

    let set = state
        .store
        .create_set(CreateSubtitleSet {
            original_filename,
            entries,
        })
        .await?;

    let mut preview = state.store.list_entries(set.id).await?;
    preview.truncate(PREVIEW_LIMIT);

    tracing::info!(
        set_id = set.id,
        filename = %set.original_filename,
        total = set.total_subtitles,
        strict = params.strict,
        "Subtitle file uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UploadResult {
                set_id: set.id,
                original_filename: set.original_filename,
                total_subtitles: set.total_subtitles,
                preview,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /translate/{set_id}
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslateResult {
    pub success: bool,
    #[serde(flatten)]
    pub summary: JobSummary,
}

/// POST /api/v1/translate/{set_id}
///
/// Run the translation job for a set and wait for it to finish. The body is
/// optional; without one the configured target language is used.
///
/// The job runs on its own task: if this request is dropped or times out,
/// the job still runs to completion or failure.
pub async fn translate(
    State(state): State<AppState>,
    Path(set_id): Path<DbId>,
    body: Option<Json<TranslateRequest>>,
) -> AppResult<Json<DataResponse<TranslateResult>>> {
    let target_language = body
        .and_then(|Json(req)| req.target_language)
        .unwrap_or_else(|| state.config.target_language.clone());
    validate_language_code(&target_language)?;

    ensure_set_exists(&state, set_id).await?;

    let pipeline = state.pipeline.clone();
    let job = tokio::spawn(async move { pipeline.run(set_id, &target_language).await });

    let summary = job
        .await
        .map_err(|e| AppError::InternalError(format!("Translation task failed to finish: {e}")))??;

    Ok(Json(DataResponse {
        data: TranslateResult {
            success: true,
            summary,
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /download/{set_id}
// ---------------------------------------------------------------------------

/// GET /api/v1/download/{set_id}
///
/// Return the set as an SRT attachment, using each entry's translation when
/// one is stored and its original text otherwise. Works mid-job too.
pub async fn download(
    State(state): State<AppState>,
    Path(set_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries: Vec<SubtitleEntry> = state
        .store
        .list_entries(set_id)
        .await?
        .iter()
        .map(StoredSubtitle::to_output_entry)
        .collect();

    let content = srt::generate(&entries);

    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILENAME}\""),
            ),
        ],
        content,
    ))
}
