//! Invoice and payment routes.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::{Operation, PluginError, Result};
use crate::identity::Identity;
use crate::state::PluginState;
use crate::validation::ValidationError;
use crate::workflow::{
    BalanceResponse, CreateInvoiceRequest, CreateInvoiceResponse, PayInvoiceRequest,
    PayInvoiceResponse,
};

/// Unwrap a JSON body, checking the caller's credential first.
///
/// A missing invoice key takes precedence over a body that fails to decode.
fn decode_body<T>(
    operation: Operation,
    identity: &Identity,
    payload: std::result::Result<Json<T>, JsonRejection>,
) -> Result<T> {
    identity.invoice_key(operation)?;

    payload
        .map(|Json(body)| body)
        .map_err(|rejection| PluginError::InvalidRequest {
            operation,
            reason: ValidationError::MalformedBody(rejection.body_text()),
        })
}

/// Create an invoice for the caller's wallet.
pub async fn create_invoice(
    State(state): State<PluginState>,
    identity: Identity,
    payload: std::result::Result<Json<CreateInvoiceRequest>, JsonRejection>,
) -> Result<Json<CreateInvoiceResponse>> {
    let req = decode_body(Operation::CreateInvoice, &identity, payload)?;
    let response = state.workflow.create_invoice(&identity, req).await?;
    Ok(Json(response))
}

/// Pay a BOLT11 invoice from the caller's wallet.
pub async fn pay_invoice(
    State(state): State<PluginState>,
    identity: Identity,
    payload: std::result::Result<Json<PayInvoiceRequest>, JsonRejection>,
) -> Result<Json<PayInvoiceResponse>> {
    let req = decode_body(Operation::PayInvoice, &identity, payload)?;
    let response = state.workflow.pay_invoice(&identity, req).await?;
    Ok(Json(response))
}

/// Live balance of the caller's wallet.
pub async fn balance(
    State(state): State<PluginState>,
    identity: Identity,
) -> Result<Json<BalanceResponse>> {
    let response = state.workflow.get_balance(&identity).await?;
    Ok(Json(response))
}
