use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::constants::{DEFAULT_PAGE_LIMIT, FOLIO_STATUS_HEADER, FOLIO_STATUS_OK};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    BookRow, BookSummary, DataResponse, LoadMoreParams, LoadMoreResponse, NotFoundResponse, PopularBook,
    RecommendRequest, RecommendResponse, SearchRequest, SuggestionParams, SuggestionResponse,
};
use crate::gateway::state::HandlerState;
use crate::recommend::RecommendationResult;
use crate::search::SearchQuery;

#[instrument(skip(state))]
pub async fn popular_handler(State(state): State<HandlerState>) -> Response {
    let body: DataResponse<PopularBook> = DataResponse::from_records(state.popular.as_slice());
    with_status(StatusCode::OK, FOLIO_STATUS_OK, body)
}

#[instrument(skip(state))]
pub async fn books_handler(State(state): State<HandlerState>) -> Response {
    let books = state.search.all_books();
    let body: DataResponse<BookRow> = DataResponse::from_records(books.iter());
    with_status(StatusCode::OK, FOLIO_STATUS_OK, body)
}

#[instrument(skip(state, payload), fields(outcome = tracing::field::Empty))]
pub async fn recommend_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    let title = request.user_input.trim();
    if title.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "Please enter a book title.".to_string(),
        ));
    }

    let result = state.recommender.resolve(title);
    tracing::Span::current().record("outcome", tracing::field::display(&result));

    Ok(recommendation_response(&result))
}

#[instrument(skip(state, payload))]
pub async fn search_books_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) = payload.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    let search = Arc::clone(&state.search);
    let books = tokio::task::spawn_blocking(move || {
        search.search_all(request.keyword.as_deref(), request.letter.as_deref())
    })
    .await
    .map_err(|e| GatewayError::Internal(format!("Search task failed: {}", e)))??;

    info!(results = books.len(), "Search completed");

    let body: DataResponse<BookRow> = DataResponse::from_records(&books);
    Ok(with_status(StatusCode::OK, FOLIO_STATUS_OK, body))
}

#[instrument(skip(state, params))]
pub async fn search_suggestions_handler(
    State(state): State<HandlerState>,
    params: Result<Query<SuggestionParams>, QueryRejection>,
) -> Result<Response, GatewayError> {
    let Query(params) = params.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    let books = state.search.suggest(params.q.as_deref().unwrap_or_default());
    let body = SuggestionResponse {
        books: books.iter().map(BookSummary::from).collect(),
    };
    Ok(with_status(StatusCode::OK, FOLIO_STATUS_OK, body))
}

#[instrument(skip(state, params))]
pub async fn load_more_books_handler(
    State(state): State<HandlerState>,
    params: Result<Query<LoadMoreParams>, QueryRejection>,
) -> Result<Response, GatewayError> {
    let Query(params) = params.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;

    let offset = parse_usize_param("offset", params.offset.as_deref(), 0)?;
    let limit = parse_usize_param("limit", params.limit.as_deref(), DEFAULT_PAGE_LIMIT)?;
    if limit > state.max_page_size {
        return Err(GatewayError::InvalidRequest(format!(
            "limit {} exceeds the maximum page size of {}",
            limit, state.max_page_size
        )));
    }

    let query = SearchQuery {
        keyword: params.keyword,
        letter: params.letter,
        offset,
        limit,
    };

    let search = Arc::clone(&state.search);
    let page = tokio::task::spawn_blocking(move || search.search(&query))
        .await
        .map_err(|e| GatewayError::Internal(format!("Search task failed: {}", e)))??;

    let body = LoadMoreResponse {
        data: page.records.iter().map(BookRow::from).collect(),
        has_more: page.has_more,
        total_books: page.total,
    };
    Ok(with_status(StatusCode::OK, FOLIO_STATUS_OK, body))
}

pub(crate) fn recommendation_response(result: &RecommendationResult) -> Response {
    match result {
        RecommendationResult::NotFound { message } => {
            debug!("Title not catalogued");
            with_status(
                StatusCode::NOT_FOUND,
                result.as_header_value(),
                NotFoundResponse {
                    error: message.clone(),
                    data: Vec::new(),
                },
            )
        }
        _ => {
            info!(records = result.records().len(), "Recommendations served");
            with_status(
                StatusCode::OK,
                result.as_header_value(),
                RecommendResponse::from_result(result),
            )
        }
    }
}

pub(crate) fn parse_usize_param(
    name: &str,
    raw: Option<&str>,
    default: usize,
) -> Result<usize, GatewayError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            GatewayError::InvalidRequest(format!(
                "`{}` must be a non-negative integer, got '{}'",
                name, value
            ))
        }),
    }
}

pub(crate) fn with_status<T: Serialize>(
    status: StatusCode,
    folio_status: &'static str,
    body: T,
) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(FOLIO_STATUS_HEADER, HeaderValue::from_static(folio_status));
    (status, headers, Json(body)).into_response()
}

