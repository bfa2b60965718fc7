//! End-to-end: a real listener, raw HTTP/1.1 over TCP.

use std::net::SocketAddr;

use restish::{App, Matched, Request, Resource, Route, Server, status};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

fn app() -> App {
    let item = |id: String| {
        let html_id = id.clone();
        Resource::new()
            .route(Route::get().accept("html"), move |_req: Request| {
                let body = format!("<p>{html_id}</p>");
                async move { status::ok(body) }
            })
            .route(Route::get().accept("json"), move |_req: Request| {
                let body = format!(r#"{{"id":"{id}"}}"#);
                async move { status::ok(body) }
            })
    };
    let root = Resource::new()
        .post(|req: Request| async move {
            let size = req.body().len().to_string();
            status::created("/items/1", size)
        })
        .child("items/{id}", move |_req: &Request, m: Matched| {
            m.param("id").map(|id| item(id.to_owned()))
        });
    App::new(root).with_prefix("/api")
}

async fn send(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    stream.write_all(raw.as_bytes()).await.expect("write");
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.expect("read");
    String::from_utf8_lossy(&out).into_owned()
}

#[tokio::test]
async fn serves_negotiated_resources_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(Server::serve_listener(listener, app(), async {
        let _ = stopped.await;
    }));

    let res = send(
        addr,
        "GET /api/items/7 HTTP/1.1\r\nhost: localhost\r\naccept: application/json\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 200 OK"), "{res}");
    assert!(res.contains("content-type: application/json"), "{res}");
    assert!(res.ends_with(r#"{"id":"7"}"#), "{res}");

    let res = send(
        addr,
        "POST /api HTTP/1.1\r\nhost: localhost\r\ncontent-length: 5\r\nconnection: close\r\n\r\nhello",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 201 Created"), "{res}");
    assert!(res.contains("location: /items/1"), "{res}");
    assert!(res.ends_with("\r\n\r\n5"), "{res}");

    let res = send(addr, "DELETE /api HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n").await;
    assert!(res.starts_with("HTTP/1.1 405 Method Not Allowed"), "{res}");
    assert!(res.contains("allow: POST"), "{res}");

    let res = send(addr, "GET /elsewhere HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n").await;
    assert!(res.starts_with("HTTP/1.1 404 Not Found"), "{res}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
