use axum::{
    Form, Json,
    body::Body,
    extract::{FromRequest, Multipart},
    http::{Request, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};

use crate::error::RelayError;

/// Relay request body decoded into JSON, whatever encoding it arrived in
///
/// - `application/json` (and `+json` suffixes): any JSON value
/// - `application/x-www-form-urlencoded`: an object of string fields
/// - `multipart/form-data`: text parts become strings, file parts become
///   standard base64 of their bytes
///
/// Body size is bounded by the router's `DefaultBodyLimit`.
#[derive(Debug)]
pub struct RelayPayload(pub Value);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Multipart,
}

fn body_kind(content_type: &str) -> Option<BodyKind> {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => Some(BodyKind::Json),
        "application/x-www-form-urlencoded" => Some(BodyKind::Form),
        "multipart/form-data" => Some(BodyKind::Multipart),
        other if other.starts_with("application/") && other.ends_with("+json") => Some(BodyKind::Json),
        _ => None,
    }
}

impl<S> FromRequest<S> for RelayPayload
where
    S: Send + Sync,
{
    type Rejection = RelayError;

    async fn from_request(request: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let Some(kind) = body_kind(&content_type) else {
            return Err(RelayError::UnsupportedMediaType(if content_type.is_empty() {
                "missing Content-Type, expected application/json or multipart/form-data".to_owned()
            } else {
                format!("'{content_type}', expected application/json or multipart/form-data")
            }));
        };

        let value = match kind {
            BodyKind::Json => {
                let Json(value) = Json::<Value>::from_request(request, state)
                    .await
                    .map_err(|rejection| RelayError::InvalidRequest {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    })?;
                value
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(request, state)
                    .await
                    .map_err(|rejection| RelayError::InvalidRequest {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    })?;
                Value::Object(pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect())
            }
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(request, state)
                    .await
                    .map_err(|rejection| RelayError::InvalidRequest {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    })?;
                read_multipart(multipart).await?
            }
        };

        Ok(Self(value))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Value, RelayError> {
    let mut fields = Map::new();

    loop {
        let field = multipart.next_field().await.map_err(|e| RelayError::InvalidRequest {
            status: e.status(),
            message: e.body_text(),
        })?;

        let Some(field) = field else {
            break;
        };

        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        let is_file = field.file_name().is_some();

        let value = if is_file {
            let bytes = field.bytes().await.map_err(|e| RelayError::InvalidRequest {
                status: e.status(),
                message: format!("failed to read file field '{name}': {}", e.body_text()),
            })?;
            tracing::debug!(field = %name, bytes = bytes.len(), "encoding uploaded file as base64");
            STANDARD.encode(&bytes)
        } else {
            field.text().await.map_err(|e| RelayError::InvalidRequest {
                status: e.status(),
                message: format!("failed to read field '{name}': {}", e.body_text()),
            })?
        };

        fields.insert(name, Value::String(value));
    }

    Ok(Value::Object(fields))
}
