use http::Method;
use strada_web::{App, DeployMode, ServeDir, Server};

#[tokio::main]
async fn main() {
    let mut app = App::new();
    app.register("/", Method::GET, ServeDir::new("./public").with_mode(DeployMode::Test));

    let server = Server::builder().address("127.0.0.1:8080").app(app).build().unwrap();
    server.start().await;
}
