//! A small notes API: child lookup, content negotiation, status helpers.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:8080/notes/1
//!   curl -i -H 'accept: application/json' http://localhost:8080/notes/1
//!   curl -i -H 'accept: image/png' http://localhost:8080/notes/1
//!   curl -i -X POST -d 'buy milk' http://localhost:8080/notes
//!   curl -i -X DELETE http://localhost:8080/notes
//!   curl -i http://localhost:8080/notes/99

use restish::{
    App, ClientError, Matched, Request, Resource, Route, Server, Settings, UrlExt, setup_app,
    status,
};

const NOTES: [&str; 2] = ["write the docs", "ship it"];

#[tokio::main]
async fn main() -> Result<(), restish::Error> {
    let settings = Settings::load()?;
    setup_app(&settings);

    let root = Resource::new()
        .get(|_req: Request| async { status::see_other("/notes") })
        .child("notes", |_req: &Request, _m: Matched| notes());

    let app = App::new(root).with_prefix(&settings.server.prefix);
    Server::from_settings(&settings)?.serve(app).await
}

// /notes
fn notes() -> Resource {
    Resource::new()
        .route(Route::get().accept("text/plain"), |_req: Request| async {
            status::ok(NOTES.join("\n"))
        })
        .route(Route::post().content_type("*/*"), |req: Request| async move {
            if req.body().is_empty() {
                return Err(ClientError::BadRequest);
            }
            // Nothing is stored; the next id is reported back.
            let location = req
                .path_url()
                .map(|url| url.child(&(NOTES.len() + 1).to_string()).to_string())
                .map_err(|_| ClientError::BadRequest)?;
            Ok(status::created(&location, req.body().clone()))
        })
        .child("{id}", |_req: &Request, m: Matched| note(m.param("id").unwrap_or_default()))
}

// /notes/{id}
fn note(id: &str) -> Result<Resource, ClientError> {
    let index: usize = id.parse().map_err(|_| ClientError::NotFound)?;
    let text = *NOTES.get(index.wrapping_sub(1)).ok_or(ClientError::NotFound)?;

    Ok(Resource::new()
        .route(Route::get().accept("text/plain"), move |_req: Request| async move {
            status::ok(text)
        })
        .route(Route::get().accept("json"), move |_req: Request| async move {
            status::ok(format!(r#"{{"id":{index},"text":"{text}"}}"#))
        })
        .route(Route::get().accept("html"), move |_req: Request| async move {
            status::ok(format!("<p>{text}</p>"))
        }))
}
