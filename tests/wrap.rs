use std::sync::{Arc, Mutex};

use quill::http::StatusCode;
use quill::{compose, wrap_fn, App, Body, BoxWrap, Handler, Rejection, Request, Response, Wrap};

type Log = Arc<Mutex<Vec<String>>>;

fn record(log: &Log, name: &'static str) -> impl Wrap {
    let log = log.clone();
    wrap_fn(move |req, next| {
        let log = log.clone();
        Box::pin(async move {
            log.lock().unwrap().push(format!("{name} in"));
            let response = next.call(req).await;
            log.lock().unwrap().push(format!("{name} out"));
            response
        })
    })
}

fn get(uri: &str) -> Request {
    Request::builder().uri(uri).build().unwrap()
}

#[tokio::test]
async fn first_middleware_is_outermost() {
    let log = Log::default();

    let handler_log = log.clone();
    let pipeline = App::new()
        .get("/", move |_: Request| {
            let log = handler_log.clone();
            async move {
                log.lock().unwrap().push("handler".to_owned());
                "..."
            }
        })
        .wrap(record(&log, "a"))
        .wrap(record(&log, "b"))
        .wrap(record(&log, "c"))
        .build()
        .unwrap();

    pipeline.serve(get("/")).await;

    assert_eq!(
        *log.lock().unwrap(),
        ["a in", "b in", "c in", "handler", "c out", "b out", "a out"]
    );
}

#[tokio::test]
async fn short_circuit_skips_the_rest_of_the_chain() {
    let log = Log::default();

    let pipeline = App::new()
        .get("/", |_: Request| async { "unreachable" })
        .wrap(record(&log, "outer"))
        .wrap(wrap_fn(|_, _| {
            Box::pin(async {
                Ok::<_, Rejection>(Response::text("stop").with_status(StatusCode::FORBIDDEN))
            })
        }))
        .wrap(record(&log, "inner"))
        .build()
        .unwrap();

    let response = pipeline.serve(get("/")).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(*log.lock().unwrap(), ["outer in", "outer out"]);
}

#[tokio::test]
async fn middleware_can_pass_a_modified_request() {
    let pipeline = App::new()
        .get("/", |req: Request| async move {
            req.param("user").unwrap_or("anonymous").to_owned()
        })
        .wrap(wrap_fn(|req, next| {
            Box::pin(async move { next.call(req.with_param("user", "ada")).await })
        }))
        .build()
        .unwrap();

    let response = pipeline.serve(get("/")).await;
    assert_eq!(response.body, Body::from("ada"));
}

#[tokio::test]
async fn compose_folds_a_list() {
    let log = Log::default();

    let handler = compose(
        vec![
            BoxWrap::new(record(&log, "1")),
            BoxWrap::new(record(&log, "2")),
        ],
        |_: Request| async { StatusCode::NO_CONTENT },
    );

    let response = handler.call(get("/anything")).await.unwrap();

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(*log.lock().unwrap(), ["1 in", "2 in", "2 out", "1 out"]);
}

#[tokio::test]
async fn per_route_middleware_only_wraps_its_route() {
    let log = Log::default();

    let pipeline = App::new()
        .get("/wrapped", (|_: Request| async { "wrapped" }).wrap(record(&log, "route")))
        .get("/plain", |_: Request| async { "plain" })
        .build()
        .unwrap();

    pipeline.serve(get("/plain")).await;
    assert!(log.lock().unwrap().is_empty());

    pipeline.serve(get("/wrapped")).await;
    assert_eq!(*log.lock().unwrap(), ["route in", "route out"]);
}
