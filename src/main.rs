mod config;
mod error;
mod number;
mod source;
mod window;
mod window_actor;

use std::{process::exit, sync::Arc};

use actix_web::{
    get,
    web::{Data, Json, Path},
    App, HttpServer,
};
use config::Config;
use error::ApiError;
use number::Number;
use ractor::{call, Actor, ActorRef};
use serde::Serialize;
use source::{HttpNumberSource, NumberKind, NumberSource};
use tracing::{debug, error, info};
use tracing_subscriber::{
    fmt::format::FmtSpan, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};
use window_actor::{WindowManager, WindowMsg};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NumbersResponse {
    window_prev_state: Vec<Number>,
    window_curr_state: Vec<Number>,
    numbers: Vec<Number>,
    avg: Number,
}

#[get("/numbers/{kind}")]
#[tracing::instrument(level = "info", skip(source, window))]
async fn numbers(
    kind: Path<String>,
    source: Data<dyn NumberSource>,
    window: Data<ActorRef<WindowManager>>,
) -> Result<Json<NumbersResponse>, ApiError> {
    let kind: NumberKind = kind.parse()?;

    // The fetch stays outside the window actor so a slow upstream never holds
    // up other requests.
    let fetched = source.fetch_numbers(kind).await;
    debug!("New numbers: {:?}", fetched);

    let transition = call!(window, WindowMsg::Apply, fetched.clone())
        .map_err(|e| ApiError::WindowUnavailable(e.to_string()))?;

    Ok(Json(NumbersResponse {
        window_prev_state: transition.prev,
        window_curr_state: transition.curr,
        numbers: fetched,
        avg: transition.avg,
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            exit(1);
        }
    };

    let source: Arc<dyn NumberSource> =
        match HttpNumberSource::new(config.source_url.clone(), config.fetch_timeout) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                error!("Could not set up the HTTP client: {}", e);
                exit(1);
            }
        };

    // The one and only window. Requests reach it through the actor.
    let manager = WindowManager {
        capacity: config.window_size,
    };
    let (window, _) = match Actor::spawn(Some("window".to_string()), manager, ()).await {
        Ok(spawned) => spawned,
        Err(e) => {
            error!("Could not start the window manager: {}", e);
            exit(1);
        }
    };

    info!(
        "Listening on {}:{} with a window of {} numbers from {}",
        config.host, config.port, config.window_size, config.source_url
    );

    HttpServer::new(move || {
        App::new()
            .app_data(Data::from(source.clone()))
            .app_data(Data::new(window.clone()))
            .service(numbers)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
