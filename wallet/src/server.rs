//! HTTP front for browser based gift pages.
//!
//! The browser does the chain work (wallet extension, signing, watching the transfer)
//! and calls in here once a transfer is finalized, and again when someone opens a
//! claim link.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use gift_core::{
    claim::{ClaimOutcome, GiftLookup, Severity},
    link::LinkError,
    service::{GiftRequest, SentGift},
    Account, GiftId, GiftRecord, GiftService, GiftStore,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

/// The gift service shared between request handlers.
pub type SharedService<S> = Arc<Mutex<GiftService<S>>>;

/// Errors a handler can answer with.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound,
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Gift not found".to_owned()),
            ApiError::Internal(e) => {
                log::error!("Request failed: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
        (code, Json(ErrorBody { message })).into_response()
    }
}

/// What the claim page shows: a message, how to style it, and the gift if any.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClaimView {
    pub severity: Severity,
    pub message: String,
    pub claimed: bool,
    pub gift: Option<GiftRecord>,
}

impl From<GiftLookup> for ClaimView {
    fn from(lookup: GiftLookup) -> Self {
        ClaimView {
            severity: lookup.severity(),
            message: lookup.to_string(),
            claimed: false,
            gift: lookup.record().cloned(),
        }
    }
}

impl From<ClaimOutcome> for ClaimView {
    fn from(outcome: ClaimOutcome) -> Self {
        let gift = match &outcome {
            ClaimOutcome::Claimed(gift)
            | ClaimOutcome::AlreadyClaimed(gift)
            | ClaimOutcome::NotClaimable(gift) => Some(gift.clone()),
            ClaimOutcome::NotConnected | ClaimOutcome::NotFound(_) => None,
        };
        ClaimView {
            severity: outcome.severity(),
            message: outcome.to_string(),
            claimed: outcome.is_claimed(),
            gift,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClaimQuery {
    pub gift_id: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub gift_id: String,
    /// Missing when the page has no wallet connected.
    pub claimer_address: Option<String>,
}

/// Build the router. Split from [`serve`] so it can be driven without a socket.
pub fn router<S>(service: SharedService<S>) -> Router
where
    S: GiftStore<Error = anyhow::Error> + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/gifts", get(list_gifts::<S>).post(create_gift::<S>))
        .route("/gifts/:id", get(get_gift::<S>))
        .route("/claim", get(load_claim::<S>).post(confirm_claim::<S>))
        .layer(cors)
        .with_state(service)
}

/// Serve the API until the process is stopped.
pub async fn serve<S>(service: GiftService<S>, addr: SocketAddr) -> anyhow::Result<()>
where
    S: GiftStore<Error = anyhow::Error> + Send + 'static,
{
    let app = router(Arc::new(Mutex::new(service)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Serving gift API on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn list_gifts<S>(
    State(service): State<SharedService<S>>,
) -> Result<Json<Vec<GiftRecord>>, ApiError>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let service = service.lock().await;
    Ok(Json(service.ledger().gifts()?))
}

async fn get_gift<S>(
    State(service): State<SharedService<S>>,
    Path(id): Path<String>,
) -> Result<Json<GiftRecord>, ApiError>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let service = service.lock().await;
    service
        .ledger()
        .find(&GiftId::from(id))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_gift<S>(
    State(service): State<SharedService<S>>,
    Json(request): Json<GiftRequest>,
) -> Result<(StatusCode, Json<SentGift>), ApiError>
where
    S: GiftStore<Error = anyhow::Error>,
{
    if request.sender_address.trim().is_empty() {
        return Err(ApiError::BadRequest("Wallet not connected.".to_owned()));
    }
    crate::recipient_from_string(&request.recipient_address)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    crate::amount_from_string(&request.amount)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut service = service.lock().await;
    let sent = service.create_gift(&request)?;
    Ok((StatusCode::CREATED, Json(sent)))
}

async fn load_claim<S>(
    State(service): State<SharedService<S>>,
    Query(query): Query<ClaimQuery>,
) -> Result<(StatusCode, Json<ClaimView>), ApiError>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let service = service.lock().await;
    let lookup = match query.gift_id.filter(|id| !id.is_empty()) {
        Some(id) => service.lookup_id(&GiftId::from(id))?,
        None => GiftLookup::InvalidLink(LinkError::MissingGiftId),
    };
    let code = match lookup {
        GiftLookup::InvalidLink(_) => StatusCode::BAD_REQUEST,
        GiftLookup::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    Ok((code, Json(lookup.into())))
}

async fn confirm_claim<S>(
    State(service): State<SharedService<S>>,
    Json(request): Json<ClaimRequest>,
) -> Result<(StatusCode, Json<ClaimView>), ApiError>
where
    S: GiftStore<Error = anyhow::Error>,
{
    let claimer = request
        .claimer_address
        .filter(|address| !address.trim().is_empty())
        .map(|address| Account {
            address,
            name: String::new(),
            source: "http".to_owned(),
        });

    let mut service = service.lock().await;
    let outcome = service.confirm_claim(&GiftId::from(request.gift_id), claimer.as_ref())?;
    let code = match outcome {
        ClaimOutcome::Claimed(_) => StatusCode::OK,
        ClaimOutcome::NotConnected => StatusCode::BAD_REQUEST,
        ClaimOutcome::NotFound(_) => StatusCode::NOT_FOUND,
        ClaimOutcome::AlreadyClaimed(_) | ClaimOutcome::NotClaimable(_) => StatusCode::CONFLICT,
    };
    Ok((code, Json(outcome.into())))
}
