use futures::future::{FutureExt, LocalBoxFuture};
use log::{info, warn};
use std::time::Duration;

use super::{decode_reply, EngineReply, MoveRequest, MoveSource};
use crate::error::RemoteError;

/// Move source backed by the HTTP move service.
#[derive(Clone)]
pub struct HttpMoveSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMoveSource {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(HttpMoveSource {
            client,
            endpoint: format!("{}/move", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

async fn post_move(client: reqwest::Client, endpoint: String, request: MoveRequest) -> Result<EngineReply, RemoteError> {
    let response = client.post(&endpoint).json(&request).send().await?;
    let status = response.status();
    if !status.is_success() {
        warn!("Engine at {} answered HTTP {}", endpoint, status);
        return Err(RemoteError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    let reply = decode_reply(&body)?;
    info!("Engine reply: {:?}", reply);
    Ok(reply)
}

impl MoveSource for HttpMoveSource {
    fn request_move(&self, request: MoveRequest) -> LocalBoxFuture<'static, Result<EngineReply, RemoteError>> {
        info!("Requesting {:?} move for {}", request.method, request.fen);
        post_move(self.client.clone(), self.endpoint.clone(), request).boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SelectionMethod;

    #[test]
    fn endpoint_joins_base_url() {
        let source = HttpMoveSource::new("http://engine.local:8000/", None).unwrap();
        assert_eq!(source.endpoint(), "http://engine.local:8000/move");
    }

    #[actix_rt::test]
    async fn unreachable_service_is_an_error_not_a_move() {
        // Port 9 (discard) is closed on any sane test host.
        let source = HttpMoveSource::new("http://127.0.0.1:9", Some(Duration::from_secs(5))).unwrap();
        let result = source
            .request_move(MoveRequest {
                fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".to_string(),
                depth: 1,
                method: SelectionMethod::Best,
            })
            .await;
        assert!(matches!(result, Err(RemoteError::Transport(_)) | Err(RemoteError::Timeout)));
    }
}
