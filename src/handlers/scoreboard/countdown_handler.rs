use std::convert::Infallible;
use std::time::Duration;

use actix_web::{http::header, web, HttpResponse, ResponseError, Result};
use bytes::Bytes;
use chrono::Utc;
use futures::stream;

use crate::scoreboard::countdown::CountdownView;
use crate::scoreboard::service::ScoreboardService;

const TICK: Duration = Duration::from_secs(1);

fn sse_frame(view: &CountdownView) -> Option<Bytes> {
    match serde_json::to_string(view) {
        Ok(json) => Some(Bytes::from(format!("event: tick\ndata: {}\n\n", json))),
        Err(e) => {
            tracing::error!("Failed to encode countdown tick: {}", e);
            None
        }
    }
}

/// Server-sent countdown for one event: a tick per second until the first
/// "in progress" tick. The interval is dropped with the stream when the
/// client goes away.
#[tracing::instrument(name = "Stream countdown", skip(path, service), fields(event_id = %path))]
pub async fn stream_countdown(
    path: web::Path<String>,
    service: web::Data<ScoreboardService>,
) -> Result<HttpResponse> {
    let event = match service.countdown_target(&path).await {
        Ok(event) => event,
        Err(e) => {
            tracing::info!("No countdown for {}: {}", path, e);
            return Ok(e.error_response());
        }
    };

    let zone = service.zone();
    let target = event.date_time;
    let ticks = tokio::time::interval(TICK);

    let frames = stream::unfold((ticks, false), move |(mut ticks, finished)| async move {
        if finished {
            return None;
        }
        ticks.tick().await;
        let view = CountdownView::at(Utc::now(), target, zone);
        let frame = sse_frame(&view)?;
        Some((Ok::<_, Infallible>(frame), (ticks, view.in_progress)))
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(frames))
}
