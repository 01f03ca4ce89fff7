use quill::http::StatusCode;
use quill::wrap::{wrap_fn, JsonBody, Trace};
use quill::{App, Json, Request, Response};
use quill_hyper::Server;
use serde_json::Value;
use tokio::net::TcpListener;

async fn hello(req: Request) -> String {
    let name = req.path_params().get("name").unwrap_or("stranger");
    format!("Hello, {}!", name)
}

async fn echo(req: Request) -> Json<Value> {
    Json(req.describe())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let pipeline = App::new()
        .get("/hello/:name", hello)
        .get("/echo/*", echo)
        .wrap(Trace)
        .wrap(wrap_fn(|req, next| {
            Box::pin(async move {
                if req.header("x-blocked").is_some() {
                    return Ok(Response::text("blocked").with_status(StatusCode::FORBIDDEN));
                }
                next.call(req).await
            })
        }))
        .wrap(JsonBody)
        .build()
        .expect("invalid routes");

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    Server::new(pipeline)
        .serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}
