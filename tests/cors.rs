use bytes::Bytes;
use corsgate::middleware::{Cors, CorsInfo};
use corsgate::{Error, Request, Response};
use http::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, HeaderValue, ORIGIN,
};
use http::{Method, StatusCode};

fn request(method: Method, origin: &str, body: &'static str) -> Request {
    http::Request::builder()
        .method(method)
        .uri("/v2/keys/message")
        .header(ORIGIN, origin)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
        .into()
}

async fn echo(req: Request) -> Response {
    Response::builder()
        .status(StatusCode::CREATED)
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("http://set-by-handler"))
        .text(String::from_utf8_lossy(req.body()).into_owned())
}

#[tokio::test]
async fn handler_response_keeps_its_own_headers_and_body() {
    let info: CorsInfo = "http://a.com".parse().unwrap();
    let cors = Cors::new(info, echo);

    let res = cors.handle(request(Method::POST, "http://a.com", "hello")).await;

    assert_eq!(res.status_code(), StatusCode::CREATED);
    assert_eq!(res.body(), b"hello");
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");

    let origins: Vec<_> = res.headers().get_all(ACCESS_CONTROL_ALLOW_ORIGIN).iter().collect();
    assert_eq!(origins, ["http://set-by-handler", "http://a.com"]);
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_METHODS], "POST, GET, OPTIONS, PUT, DELETE");
}

#[tokio::test]
async fn every_non_options_method_reaches_the_handler() {
    let cors = Cors::new(CorsInfo::new(["*"]).unwrap(), |req: Request| async move {
        req.method().to_string()
    });

    for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
        let res = cors.handle(request(method.clone(), "http://x.test", "")).await;
        assert_eq!(res.body(), method.as_str().as_bytes());
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}

#[tokio::test]
async fn stacked_middleware_answers_preflight_at_the_outer_layer() {
    let inner = Cors::new(CorsInfo::new(["http://inner.test"]).unwrap(), echo);
    let outer = Cors::new(CorsInfo::new(["http://outer.test"]).unwrap(), inner);

    let res = outer.handle(request(Method::OPTIONS, "http://outer.test", "")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "http://outer.test");
    assert!(res.body().is_empty());

    let res = outer.handle(request(Method::GET, "http://inner.test", "")).await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
    let origins: Vec<_> = res.headers().get_all(ACCESS_CONTROL_ALLOW_ORIGIN).iter().collect();
    assert_eq!(origins, ["http://set-by-handler", "http://inner.test"]);
}

#[tokio::test]
async fn shared_registry_across_middleware() {
    let info = std::sync::Arc::new(CorsInfo::new(["http://a.com"]).unwrap());
    let first = Cors::new(info.clone(), |_req: Request| async { "first" });
    let second = Cors::new(info, |_req: Request| async { "second" });

    for cors in [&first, &second] {
        let res = cors.handle(request(Method::GET, "http://a.com", "")).await;
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "http://a.com");
    }
    assert_eq!(first.info(), second.info());
}

#[test]
fn flag_value_rejects_a_bad_entry_anywhere_in_the_list() {
    let err = "http://a.com, *, http://b.com:99999".parse::<CorsInfo>().unwrap_err();
    match err {
        Error::InvalidOrigin { origin, .. } => assert_eq!(origin, "http://b.com:99999"),
        other => panic!("unexpected error: {other}"),
    }
}
