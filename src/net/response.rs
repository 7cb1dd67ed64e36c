use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use place_picker::SearchError;

pub struct ResponseError(Response);

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        self.0
    }
}

impl<E> From<E> for ResponseError
where
    E: Into<color_eyre::eyre::Error>,
{
    fn from(value: E) -> Self {
        Self(
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Into::<color_eyre::eyre::Error>::into(value).to_string(),
            )
                .into_response(),
        )
    }
}

impl ResponseError {
    pub fn with_status<T>(status_code: StatusCode, data: T) -> Self
    where
        (StatusCode, T): IntoResponse,
    {
        ResponseError((status_code, data).into_response())
    }

    pub fn bad_request<T>(data: T) -> Self
    where
        (StatusCode, T): IntoResponse,
    {
        ResponseError((StatusCode::BAD_REQUEST, data).into_response())
    }

    /// The maps provider, not this server, is at fault
    pub fn bad_gateway(error: SearchError) -> Self {
        ResponseError((StatusCode::BAD_GATEWAY, Json(error)).into_response())
    }
}

pub type Result<T, E = ResponseError> = axum::response::Result<T, E>;
