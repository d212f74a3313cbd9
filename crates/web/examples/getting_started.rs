use http::Method;
use strada_web::{handler_fn, App, Flow, HandlerFuture, Request, Response, Server};

fn log_requests<'a>(req: &'a mut Request, _res: &'a mut Response) -> HandlerFuture<'a> {
    Box::pin(async move {
        println!("{} {}", req.method(), req.target());
        Ok(Flow::Next)
    })
}

fn hello<'a>(_req: &'a mut Request, res: &'a mut Response) -> HandlerFuture<'a> {
    Box::pin(async move {
        res.send("hello world").await?;
        Ok(Flow::Done)
    })
}

fn show_user<'a>(req: &'a mut Request, res: &'a mut Response) -> HandlerFuture<'a> {
    Box::pin(async move {
        let id = req.param("id").unwrap_or("unknown").to_owned();
        res.cookie("last-seen", &id);
        res.json(&serde_json::json!({ "id": id })).await?;
        Ok(Flow::Done)
    })
}

#[tokio::main]
async fn main() {
    let mut app = App::new();
    app.register("/", Method::GET, handler_fn(log_requests))
        .register("/hello", Method::GET, handler_fn(hello))
        .register("/users/:id", Method::GET, handler_fn(show_user));

    let server = Server::builder().address("127.0.0.1:8080").app(app).build().unwrap();
    server.start().await;
}
