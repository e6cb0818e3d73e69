use axum::{extract::State, Json};

use crate::analysis::heuristics::{
    financial_concerns, funding_stage, high_value_features, key_factors,
};
use crate::analysis::{Recorded, ResultPersister, TextSignalExtractor};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{non_blank, JsonBody};
use crate::llm_client::predict_json;
use crate::models::record::Category;
use crate::state::AppState;
use crate::venture::deck::{
    assemble_deck, DeckDraft, DeckRequest, PitchDeck, DEFAULT_AUDIENCE,
};
use crate::venture::funding::{
    rank_investors, readiness_report, InvestorMatchReport, InvestorMatchRequest, ReadinessReport,
    ReadinessRequest,
};
use crate::venture::idea::{
    assess_idea, build_guidance, Guidance, GuidanceRequest, IdeaAssessment, IdeaCheckRequest,
};
use crate::venture::market::{
    competitor_landscape, market_analysis, strategy_plan, swot_analysis, CompetitorLandscape,
    CompetitorRequest, MarketAnalysis, MarketAnalysisRequest, StrategyPlan, StrategyRequest,
    SwotAnalysis, SwotRequest,
};
use crate::venture::prompts::{deck_prompt, guidance_prompt, idea_feedback_prompt};

/// POST /idea-check
pub async fn handle_idea_check(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<IdeaCheckRequest>,
) -> Result<Json<Recorded<IdeaAssessment>>, AppError> {
    let signal = TextSignalExtractor::new(state.nlp.as_ref())
        .extract("idea", &req.idea)
        .await?;

    let stage = funding_stage(signal.sentiment.score);
    let prompt = idea_feedback_prompt(req.idea.trim(), &key_factors(&signal), stage.as_str());
    let feedback = state
        .llm
        .predict(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Idea feedback call failed: {e}")))?;

    let verdict = assess_idea(&signal, feedback.trim().to_string());
    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::IdeaCheck, verdict)
        .await?;
    Ok(Json(recorded))
}

/// POST /swot
pub async fn handle_swot(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<SwotRequest>,
) -> Result<Json<Recorded<SwotAnalysis>>, AppError> {
    let signal = TextSignalExtractor::new(state.nlp.as_ref())
        .extract("business_description", &req.business_description)
        .await?;

    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::Swot, swot_analysis(&signal))
        .await?;
    Ok(Json(recorded))
}

/// POST /analyze
pub async fn handle_market_analysis(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<MarketAnalysisRequest>,
) -> Result<Json<Recorded<MarketAnalysis>>, AppError> {
    let signals = TextSignalExtractor::new(state.nlp.as_ref())
        .extract_all(&[
            ("market", req.market.as_str()),
            ("industry", req.industry.as_str()),
            ("trends", req.trends.as_str()),
        ])
        .await?;

    let verdict = market_analysis(&signals[0], &signals[1], &signals[2]);
    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::MarketAnalysis, verdict)
        .await?;
    Ok(Json(recorded))
}

/// POST /competitors
pub async fn handle_competitors(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<CompetitorRequest>,
) -> Result<Json<Recorded<CompetitorLandscape>>, AppError> {
    let extractor = TextSignalExtractor::new(state.nlp.as_ref());
    let verdict = match non_blank(req.product) {
        Some(product) => {
            let signals = extractor
                .extract_all(&[
                    ("competitors", req.competitors.as_str()),
                    ("product", product.as_str()),
                ])
                .await?;
            competitor_landscape(&signals[0], Some(&signals[1]))
        }
        None => {
            let signal = extractor.extract("competitors", &req.competitors).await?;
            competitor_landscape(&signal, None)
        }
    };

    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::Competitors, verdict)
        .await?;
    Ok(Json(recorded))
}

/// POST /strategy
pub async fn handle_strategy(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<StrategyRequest>,
) -> Result<Json<Recorded<StrategyPlan>>, AppError> {
    let signals = TextSignalExtractor::new(state.nlp.as_ref())
        .extract_all(&[
            ("business_description", req.business_description.as_str()),
            ("goals", req.goals.as_str()),
        ])
        .await?;

    let recorded = ResultPersister::from_state(&state)
        .record(
            &user.user_id,
            Category::Strategy,
            strategy_plan(&signals[0], &signals[1]),
        )
        .await?;
    Ok(Json(recorded))
}

/// POST /guidance
pub async fn handle_guidance(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<GuidanceRequest>,
) -> Result<Json<Recorded<Guidance>>, AppError> {
    let signal = TextSignalExtractor::new(state.nlp.as_ref())
        .extract("challenge", &req.challenge)
        .await?;

    let stage = non_blank(req.stage);
    let stage_label = stage
        .clone()
        .unwrap_or_else(|| funding_stage(signal.sentiment.score).as_str().to_string());
    let prompt = guidance_prompt(
        req.challenge.trim(),
        &stage_label,
        &financial_concerns(&signal),
    );
    let advice = state
        .llm
        .predict(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Guidance call failed: {e}")))?;

    let verdict = build_guidance(&signal, stage, advice.trim().to_string());
    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::Guidance, verdict)
        .await?;
    Ok(Json(recorded))
}

/// POST /investor-match
pub async fn handle_investor_match(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<InvestorMatchRequest>,
) -> Result<Json<Recorded<InvestorMatchReport>>, AppError> {
    req.validate()?;

    let labels: Vec<String> = (0..req.investors.len())
        .map(|i| format!("investors[{i}].thesis"))
        .collect();
    let mut fields: Vec<(&str, &str)> = vec![("pitch", req.pitch.as_str())];
    fields.extend(
        labels
            .iter()
            .zip(&req.investors)
            .map(|(label, investor)| (label.as_str(), investor.thesis.as_str())),
    );

    let mut signals = TextSignalExtractor::new(state.nlp.as_ref())
        .extract_all(&fields)
        .await?
        .into_iter();
    let pitch = signals.next().unwrap_or_default();
    let theses: Vec<_> = req
        .investors
        .iter()
        .map(|i| i.name.trim().to_string())
        .zip(signals)
        .collect();

    let recorded = ResultPersister::from_state(&state)
        .record(
            &user.user_id,
            Category::InvestorMatch,
            rank_investors(&pitch, &theses),
        )
        .await?;
    Ok(Json(recorded))
}

/// POST /readiness
pub async fn handle_readiness(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<ReadinessRequest>,
) -> Result<Json<Recorded<ReadinessReport>>, AppError> {
    let signals = TextSignalExtractor::new(state.nlp.as_ref())
        .extract_all(&[
            ("business_plan", req.business_plan.as_str()),
            ("financials", req.financials.as_str()),
            ("team", req.team.as_str()),
        ])
        .await?;

    let verdict = readiness_report(&signals[0], &signals[1], &signals[2]);
    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::Readiness, verdict)
        .await?;
    Ok(Json(recorded))
}

/// POST /generate-deck
pub async fn handle_generate_deck(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(req): JsonBody<DeckRequest>,
) -> Result<Json<Recorded<PitchDeck>>, AppError> {
    if req.startup_name.trim().is_empty() {
        return Err(AppError::Validation(
            "startup_name cannot be empty".to_string(),
        ));
    }
    let signal = TextSignalExtractor::new(state.nlp.as_ref())
        .extract("description", &req.description)
        .await?;

    let audience = non_blank(req.audience).unwrap_or_else(|| DEFAULT_AUDIENCE.to_string());
    let prompt = deck_prompt(
        req.startup_name.trim(),
        req.description.trim(),
        &audience,
        &high_value_features(&signal),
    );
    let draft: DeckDraft = predict_json(state.llm.as_ref(), &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Deck generation failed: {e}")))?;

    let deck = assemble_deck(&req.startup_name, &audience, &signal, draft)?;
    let recorded = ResultPersister::from_state(&state)
        .record(&user.user_id, Category::PitchDeck, deck)
        .await?;
    Ok(Json(recorded))
}
