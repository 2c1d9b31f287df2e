//! Status-capturing wrapper around the downstream service

use axum::http::{Request, Response, StatusCode};
use tower::{Service, ServiceExt};

/// Wraps the remainder of the handler chain and remembers the status of
/// the response it forwards.
///
/// The captured status starts at `200 OK`, since a response that never
/// sets a status explicitly is implicitly successful. Headers and body are
/// passed through untouched.
#[derive(Debug, Clone)]
pub struct StatusCapture<S> {
    inner: S,
    status: StatusCode,
}

impl<S> StatusCapture<S> {
    /// Wrap a service
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            status: StatusCode::OK,
        }
    }

    /// Last status seen on a forwarded response
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Forward a request to the inner service and record the response status
    ///
    /// Errors from the inner service are returned as-is and leave the
    /// captured status unchanged.
    pub async fn run<ReqBody, ResBody>(
        &mut self,
        request: Request<ReqBody>,
    ) -> Result<Response<ResBody>, <S as Service<Request<ReqBody>>>::Error>
    where
        S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    {
        let response = self.inner.ready().await?.call(request).await?;
        self.status = response.status();
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;
    use std::convert::Infallible;
    use tower::service_fn;

    fn respond_with(
        status: StatusCode,
    ) -> impl Service<Request<()>, Response = Response<String>, Error = Infallible> + Clone {
        service_fn(move |_req: Request<()>| async move {
            Ok::<_, Infallible>(
                Response::builder()
                    .status(status)
                    .header(CONTENT_TYPE, "text/plain")
                    .body("hello".to_string())
                    .unwrap(),
            )
        })
    }

    #[test]
    fn test_defaults_to_ok() {
        let capture = StatusCapture::new(respond_with(StatusCode::NOT_FOUND));
        assert_eq!(capture.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_records_forwarded_status() {
        let mut capture = StatusCapture::new(respond_with(StatusCode::NOT_FOUND));

        let response = capture.run(Request::new(())).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(capture.status(), response.status());
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let mut capture = StatusCapture::new(respond_with(StatusCode::CREATED));

        let response = capture.run(Request::new(())).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(response.into_body(), "hello");
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let mut capture = StatusCapture::new(service_fn(|req: Request<u16>| async move {
            let status = StatusCode::from_u16(*req.body()).unwrap();
            Ok::<_, Infallible>(Response::builder().status(status).body(()).unwrap())
        }));

        capture.run(Request::new(500)).await.unwrap();
        capture.run(Request::new(204)).await.unwrap();

        assert_eq!(capture.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_inner_error_is_forwarded() {
        let mut capture = StatusCapture::new(service_fn(|_req: Request<()>| async {
            Err::<Response<()>, _>("boom")
        }));

        let result = capture.run(Request::new(())).await;

        assert_eq!(result.unwrap_err(), "boom");
        assert_eq!(capture.status(), StatusCode::OK);
    }
}
