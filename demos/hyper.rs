use hyper::body::Incoming;
use hyper::server::conn::http1::Builder as ConnectionBuilder;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use slotmux::{handler, Body, BoxHandler, Router};
use tokio::net::TcpListener;

// GET /
async fn index(_req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    Ok(Response::new(Body::from("Hello, world!")))
}

// GET /users/{id}.{format?} — captured slots arrive in the query string
async fn user(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let query = req.uri().query().unwrap_or("");
    Ok(Response::new(Body::from(format!("user {}", query))))
}

// GET /files/{path*}
async fn files(req: Request<Incoming>) -> hyper::Result<Response<Body>> {
    let query = req.uri().query().unwrap_or("");
    Ok(Response::new(Body::from(format!("files {}", query))))
}

#[tokio::main]
async fn main() {
    let mut router: Router<BoxHandler<Incoming>> = Router::new();
    router.get("/", handler(index)).unwrap();
    router.get("/users/{id}.{format?}", handler(user)).unwrap();
    router.get("/files/{path*}", handler(files)).unwrap();

    // unmatched requests fall through to a plain-text 404
    let service = router.into_service();

    let listener = TcpListener::bind(("127.0.0.1", 3000)).await.unwrap();
    println!("listening on http://127.0.0.1:3000");

    loop {
        let service = service.clone();
        let (tcp, _) = listener.accept().await.unwrap();
        tokio::task::spawn(async move {
            if let Err(err) = ConnectionBuilder::new()
                .serve_connection(TokioIo::new(tcp), service)
                .await
            {
                println!("Error serving connection: {:?}", err);
            }
        });
    }
}
