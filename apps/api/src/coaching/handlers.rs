use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};

use crate::analysis::heuristics::key_factors;
use crate::analysis::{Recorded, ResultPersister, TextSignalExtractor};
use crate::auth::AuthUser;
use crate::coaching::mentor::{
    mentor_answer, practice_feedback, MentorAnswer, MentorQuestion, PracticeFeedback,
    PracticeRequest,
};
use crate::coaching::progress::{
    recommend, track_progress, ProgressRequest, ProgressUpdate, RecommendationSet,
    RecommendationsRequest, VerdictHistory, PROGRESS_WINDOW,
};
use crate::coaching::prompts::mentor_prompt;
use crate::coaching::resume::{analyze_resume, extract_text, ResumeAnalysis, UploadedDocument};
use crate::errors::AppError;
use crate::extract::{non_blank, JsonBody, UploadForm};
use crate::models::record::Category;
use crate::state::AppState;
use crate::store::{latest_verdict, recent_verdicts};
use crate::venture::funding::ReadinessReport;
use crate::venture::idea::IdeaAssessment;
use crate::venture::market::SwotAnalysis;

/// POST /mentor-qa
pub async fn handle_mentor_qa(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<MentorQuestion>,
) -> Result<Json<Recorded<MentorAnswer>>, AppError> {
    let signal = TextSignalExtractor::new(state.nlp.as_ref())
        .extract("question", &req.question)
        .await?;

    let context = non_blank(req.context);
    let prompt = mentor_prompt(req.question.trim(), context.as_deref(), &key_factors(&signal));
    let answer = state
        .llm
        .predict(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Mentor answer call failed: {e}")))?;

    let recorded = ResultPersister::from_state(&state)
        .record(
            &user.user_id,
            Category::MentorQa,
            mentor_answer(&signal, answer.trim().to_string()),
        )
        .await?;
    Ok(Json(recorded))
}

/// POST /practice-feedback
pub async fn handle_practice_feedback(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<PracticeRequest>,
) -> Result<Json<Recorded<PracticeFeedback>>, AppError> {
    let signal = TextSignalExtractor::new(state.nlp.as_ref())
        .extract("transcript", &req.transcript)
        .await?;

    let recorded = ResultPersister::from_state(&state)
        .record(
            &user.user_id,
            Category::PracticeFeedback,
            practice_feedback(&signal),
        )
        .await?;
    Ok(Json(recorded))
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid upload: {}", e.body_text()))
}

/// Reads the `file` and optional `job_description` fields. Unknown fields are ignored.
async fn read_resume_form(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<(UploadedDocument, Option<String>), AppError> {
    let mut file = None;
    let mut job_description = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > max_bytes {
                    return Err(AppError::Validation(format!(
                        "file is {} bytes; the limit is {max_bytes}",
                        bytes.len()
                    )));
                }
                file = Some(UploadedDocument {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "job_description" => {
                job_description = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let file = file
        .ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    if file.bytes.is_empty() {
        return Err(AppError::Validation("file is empty".to_string()));
    }
    Ok((file, job_description))
}

/// POST /analyze-resume (multipart)
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    user: AuthUser,
    UploadForm(mut multipart): UploadForm,
) -> Result<Json<Recorded<ResumeAnalysis>>, AppError> {
    let (doc, job_description) =
        read_resume_form(&mut multipart, state.config.max_upload_bytes).await?;
    let text = extract_text(&doc).await?;
    let job_description = non_blank(job_description);

    let mut fields = vec![("file", text.as_str())];
    if let Some(jd) = &job_description {
        fields.push(("job_description", jd.as_str()));
    }
    TextSignalExtractor::validate(&fields)?;

    let signals = TextSignalExtractor::new(state.nlp.as_ref())
        .extract_all(&fields)
        .await?;

    // Archive only after analysis succeeded
    let key = doc.archive_key(&user.user_id);
    state
        .archive
        .put(&key, doc.bytes.clone(), doc.archive_content_type())
        .await?;

    let verdict = analyze_resume(&doc, key, &text, &signals[0], signals.get(1));
    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::ResumeAnalysis, verdict)
        .await?;
    Ok(Json(recorded))
}

/// POST /track-progress
pub async fn handle_track_progress(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<ProgressRequest>,
) -> Result<Json<Recorded<ProgressUpdate>>, AppError> {
    let extractor = TextSignalExtractor::new(state.nlp.as_ref());
    let (signal, previous) = tokio::try_join!(
        extractor.extract("update", &req.update),
        recent_verdicts::<ProgressUpdate>(
            state.store.as_ref(),
            &user.user_id,
            Category::Progress,
            PROGRESS_WINDOW,
        ),
    )?;

    let verdict = track_progress(&signal, non_blank(req.milestone), &previous);
    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::Progress, verdict)
        .await?;
    Ok(Json(recorded))
}

/// POST /get-recommendations
///
/// The body is optional; `{"focus": "..."}` moves matching advice to the front.
/// A body that fails to parse is treated as absent.
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    user: AuthUser,
    body: Option<JsonBody<RecommendationsRequest>>,
) -> Result<Json<Recorded<RecommendationSet>>, AppError> {
    let focus = body.and_then(|JsonBody(req)| non_blank(req.focus));
    let store = state.store.as_ref();
    let user_id = user.user_id.as_str();
    let extractor = TextSignalExtractor::new(state.nlp.as_ref());

    let focus_topics = async {
        let topics = match &focus {
            Some(f) => extractor.extract("focus", f).await?.entity_names(),
            None => Vec::new(),
        };
        Ok::<_, AppError>(topics)
    };
    let (readiness, swot, idea, progress, focus_topics) = tokio::try_join!(
        latest_verdict::<ReadinessReport>(store, user_id, Category::Readiness),
        latest_verdict::<SwotAnalysis>(store, user_id, Category::Swot),
        latest_verdict::<IdeaAssessment>(store, user_id, Category::IdeaCheck),
        latest_verdict::<ProgressUpdate>(store, user_id, Category::Progress),
        focus_topics,
    )?;

    let history = VerdictHistory {
        readiness,
        swot,
        idea,
        progress,
    };
    let recorded = ResultPersister::from_state(&state)
        .record(
            user_id,
            Category::Recommendations,
            recommend(&history, focus, focus_topics),
        )
        .await?;
    Ok(Json(recorded))
}
