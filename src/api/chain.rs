use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::errors::ApiError;
use super::models::{CancelMiningResponse, MineResponse};
use crate::ledger::Ledger;

/// Get the full blockchain. Peers read this during conflict resolution.
#[get("/chain")]
pub async fn get_chain(ledger: web::Data<Ledger>) -> impl Responder {
    HttpResponse::Ok().json(ledger.chain())
}

/// Mine a new block from the pending pool.
///
/// The proof search runs on the blocking thread pool so chain reads stay
/// responsive while it is in progress.
#[get("/mine")]
pub async fn mine_block(ledger: web::Data<Ledger>) -> Result<HttpResponse, ApiError> {
    let worker = ledger.into_inner();
    let block = web::block(move || worker.mine())
        .await
        .map_err(|e| ApiError::Worker(e.to_string()))??;

    info!(
        "GET /mine - block #{} with {} txs",
        block.index,
        block.transactions.len()
    );
    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New block forged".to_string(),
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}

/// Ask any running proof search to stop.
#[post("/mine/cancel")]
pub async fn cancel_mining(ledger: web::Data<Ledger>) -> impl Responder {
    HttpResponse::Ok().json(CancelMiningResponse {
        cancelled: ledger.cancel_mining(),
    })
}
