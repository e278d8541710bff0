use actix_web::{HttpResponse, Responder, get, post, web};
use log::debug;

use super::errors::ApiError;
use super::models::{NewTransactionRequest, NewTransactionResponse, PendingResponse};
use crate::ledger::Ledger;

/// Queue a transaction for the next mined block.
#[post("/transactions/new")]
pub async fn post_transaction(
    ledger: web::Data<Ledger>,
    body: web::Json<NewTransactionRequest>,
) -> Result<HttpResponse, ApiError> {
    let index = ledger.add_transaction(&body.sender, &body.recipient, body.amount)?;
    debug!(
        "POST /transactions/new - {} -> {} ({}) goes into block #{}",
        body.sender, body.recipient, body.amount, index
    );
    Ok(HttpResponse::Created().json(NewTransactionResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    }))
}

/// List transactions waiting for the next block.
#[get("/transactions/pending")]
pub async fn get_pending(ledger: web::Data<Ledger>) -> impl Responder {
    let transactions = ledger.pending_transactions();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
