use actix_web::{HttpResponse, get, post, web};

use super::errors::ApiError;
use super::models::{RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::ledger::Ledger;
use crate::network::{HttpPeerClient, parse_node_address};

/// Register peers. Every address is checked before any is stored.
#[post("/nodes/register")]
pub async fn register_nodes(
    ledger: web::Data<Ledger>,
    body: web::Json<RegisterNodesRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.nodes.is_empty() {
        return Err(ApiError::BadRequest(
            "Error: Please supply a valid list of nodes".to_string(),
        ));
    }
    for address in &body.nodes {
        parse_node_address(address)?;
    }
    for address in &body.nodes {
        ledger.register_node(address)?;
    }

    let mut total_nodes = ledger.nodes();
    total_nodes.sort();
    Ok(HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added".to_string(),
        total_nodes,
    }))
}

/// Run conflict resolution against every registered peer over HTTP.
#[get("/nodes/resolve")]
pub async fn resolve_nodes(ledger: web::Data<Ledger>) -> HttpResponse {
    let client = HttpPeerClient::new(ledger.config().peer_timeout);
    let replaced = ledger.resolve_conflicts(&client).await;
    let snapshot = ledger.chain();

    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced,
        chain: snapshot.chain,
        length: snapshot.length,
    })
}
