//! Conversions from external infrastructure errors into domain errors.

use cvm_domain::CvmError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CvmError);

impl From<InfraError> for CvmError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CvmError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        Self(classify_http_error(&err))
    }
}

/// Transport failures become `Network`; a status carried by the error
/// decides between auth, not-found and invalid input.
fn classify_http_error(err: &HttpError) -> CvmError {
    if err.is_timeout() {
        return CvmError::Network("HTTP request timed out".into());
    }
    if err.is_connect() {
        return CvmError::Network("HTTP connection failure".into());
    }
    if err.is_decode() {
        return CvmError::Internal(format!("HTTP response could not be decoded: {err}"));
    }

    let Some(status) = err.status() else {
        return CvmError::Network(err.to_string());
    };
    let message = format!("HTTP {status}");
    match status.as_u16() {
        401 | 403 => CvmError::Auth(message),
        404 => CvmError::NotFound(message),
        429 => CvmError::Network(message),
        400..=499 => CvmError::InvalidInput(message),
        _ => CvmError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn status_error(status: StatusCode) -> HttpError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err()
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let err = status_error(StatusCode::UNAUTHORIZED).await;
        let mapped: CvmError = InfraError::from(err).into();
        match mapped {
            CvmError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_status_404_maps_to_not_found() {
        let mapped: CvmError = InfraError::from(status_error(StatusCode::NOT_FOUND).await).into();
        assert!(matches!(mapped, CvmError::NotFound(_)), "got {mapped:?}");
    }

    #[tokio::test]
    async fn http_status_429_and_5xx_map_to_network() {
        for status in [StatusCode::TOO_MANY_REQUESTS, StatusCode::BAD_GATEWAY] {
            let mapped: CvmError = InfraError::from(status_error(status).await).into();
            assert!(matches!(mapped, CvmError::Network(_)), "{status}: got {mapped:?}");
        }
    }
}
