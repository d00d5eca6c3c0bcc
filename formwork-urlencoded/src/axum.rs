//! Axum extractors for `Form<T>` and `Query<T>`.
//!
//! ```ignore
//! use axum::{Router, routing::{get, post}};
//! use formwork::FormSchema;
//! use formwork_urlencoded::{Form, Query};
//!
//! #[derive(FormSchema, Default)]
//! struct Search {
//!     q: String,
//!     page: u64,
//! }
//!
//! async fn search(Query(params): Query<Search>) -> String {
//!     format!("'{}' page {}", params.q, params.page)
//! }
//!
//! async fn submit(Form(params): Form<Search>) -> String {
//!     params.q
//! }
//!
//! let app: Router = Router::new()
//!     .route("/search", get(search))
//!     .route("/search", post(submit));
//! ```

use std::fmt;

use axum_core::{
    extract::{FromRequest, FromRequestParts, Request},
    response::{IntoResponse, Response},
};
use formwork_core::FormSchema;
use http::{StatusCode, header, request::Parts};
use http_body_util::BodyExt;
use tracing::debug;

use crate::{DecodeError, Form, Query};

/// Why a [`Form`] could not be extracted.
#[derive(Debug)]
pub struct FormRejection {
    kind: FormRejectionKind,
}

#[derive(Debug)]
enum FormRejectionKind {
    BodyError(axum_core::Error),
    DecodeError(DecodeError),
    InvalidUtf8,
    InvalidContentType,
}

impl FormRejection {
    /// The status code of the response.
    pub const fn status(&self) -> StatusCode {
        match &self.kind {
            FormRejectionKind::BodyError(_) => StatusCode::BAD_REQUEST,
            FormRejectionKind::DecodeError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            FormRejectionKind::InvalidUtf8 => StatusCode::BAD_REQUEST,
            FormRejectionKind::InvalidContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// The decoding error, if decoding is what failed.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match &self.kind {
            FormRejectionKind::DecodeError(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for FormRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FormRejectionKind::BodyError(err) => {
                write!(f, "Failed to read request body: {err}")
            }
            FormRejectionKind::DecodeError(err) => {
                write!(f, "Failed to decode form data: {err}")
            }
            FormRejectionKind::InvalidUtf8 => {
                write!(f, "Request body is not valid UTF-8")
            }
            FormRejectionKind::InvalidContentType => {
                write!(
                    f,
                    "Invalid `Content-Type` header: expected `application/x-www-form-urlencoded`"
                )
            }
        }
    }
}

impl std::error::Error for FormRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            FormRejectionKind::BodyError(err) => Some(err),
            FormRejectionKind::DecodeError(err) => Some(err),
            FormRejectionKind::InvalidUtf8 | FormRejectionKind::InvalidContentType => None,
        }
    }
}

impl IntoResponse for FormRejection {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<axum_core::Error> for FormRejection {
    fn from(err: axum_core::Error) -> Self {
        FormRejection {
            kind: FormRejectionKind::BodyError(err),
        }
    }
}

impl From<DecodeError> for FormRejection {
    fn from(err: DecodeError) -> Self {
        FormRejection {
            kind: FormRejectionKind::DecodeError(err),
        }
    }
}

/// Why a [`Query`] could not be extracted.
#[derive(Debug)]
pub struct QueryRejection {
    error: DecodeError,
}

impl QueryRejection {
    /// The status code of the response.
    pub const fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// The decoding error.
    pub fn decode_error(&self) -> &DecodeError {
        &self.error
    }
}

impl fmt::Display for QueryRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to decode query parameters: {}", self.error)
    }
}

impl std::error::Error for QueryRejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl IntoResponse for QueryRejection {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<DecodeError> for QueryRejection {
    fn from(error: DecodeError) -> Self {
        QueryRejection { error }
    }
}

fn is_form_content_type(req: &Request) -> bool {
    let Some(content_type) = req.headers().get(header::CONTENT_TYPE) else {
        return false;
    };
    let Ok(content_type) = content_type.to_str() else {
        return false;
    };
    content_type.starts_with("application/x-www-form-urlencoded")
}

impl<T, S> FromRequest<S> for Form<T>
where
    T: FormSchema,
    S: Send + Sync,
{
    type Rejection = FormRejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if !is_form_content_type(&req) {
            debug!("rejecting form: wrong content type");
            return Err(FormRejection {
                kind: FormRejectionKind::InvalidContentType,
            });
        }

        let bytes = req
            .into_body()
            .collect()
            .await
            .map_err(axum_core::Error::new)?
            .to_bytes();

        let body = std::str::from_utf8(&bytes).map_err(|_| FormRejection {
            kind: FormRejectionKind::InvalidUtf8,
        })?;

        Ok(Form(crate::from_str(body)?))
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: FormSchema,
    S: Send + Sync,
{
    type Rejection = QueryRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        Ok(Query(crate::from_str(query)?))
    }
}
