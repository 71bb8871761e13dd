//! Forwarding of allowed requests to the origin.

use std::str::FromStr;

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{Authority, InvalidUri, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::http::request::request_id;

/// HTTP client bound to a single origin.
#[derive(Clone)]
pub struct OriginForwarder {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl OriginForwarder {
    pub fn new(origin_address: &str) -> Result<Self, InvalidUri> {
        let authority = Authority::from_str(origin_address)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Ok(Self { client, authority })
    }

    /// Point `uri` at the origin, keeping path and query.
    fn origin_uri(&self, uri: &Uri) -> Uri {
        let mut parts = uri.clone().into_parts();
        parts.scheme = Some(Scheme::HTTP);
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Uri::from_parts(parts).unwrap_or_else(|_| uri.clone())
    }
}

/// Proxy the request to the origin and stream the response back.
pub async fn forward_handler(
    State(forwarder): State<OriginForwarder>,
    request: Request<Body>,
) -> Response {
    let request_id = request_id(request.headers()).to_string();
    let (mut parts, body) = request.into_parts();
    parts.uri = forwarder.origin_uri(&parts.uri);

    tracing::debug!(
        request_id = %request_id,
        method = %parts.method,
        uri = %parts.uri,
        "Forwarding to origin"
    );

    match forwarder.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                origin = %forwarder.authority,
                error = %e,
                "Origin request failed"
            );
            (StatusCode::BAD_GATEWAY, "Origin request failed").into_response()
        }
    }
}
