//! Local HTTP endpoints for exercising the real clients

use actix_web::{App, HttpResponse, HttpServer, http::StatusCode, web};

/// Serve `body` with `status` for every request and return the base URL
pub(crate) async fn serve_fixed(status: u16, body: &'static str) -> String {
    let status = StatusCode::from_u16(status).expect("valid status code");
    let server = HttpServer::new(move || {
        App::new().default_service(web::to(move || async move {
            HttpResponse::build(status)
                .content_type("application/json")
                .body(body)
        }))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .expect("bind local port");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

/// Base URL of a local port nothing listens on
pub(crate) fn closed_endpoint() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{addr}")
}
