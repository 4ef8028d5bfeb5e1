use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Local};
use std::time::Duration;

use crate::shared::format::format_number;

/// Однострочный лог HTTP запроса в консоль:
/// время, длительность, размер ответа, статус, метод и путь.
///
/// The body is buffered to measure its size and passed on unchanged.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let size = format_number(bytes.len());
            println!(
                "{}",
                request_line(Local::now(), start.elapsed(), &size, parts.status, &method, &path)
            );
            tracing::debug!(
                "HTTP: {} {} -> {} ({} bytes)",
                method,
                path,
                parts.status.as_u16(),
                size
            );
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            println!(
                "{}",
                request_line(Local::now(), start.elapsed(), "error", parts.status, &method, &path)
            );
            tracing::warn!("HTTP: cannot read response body of {} {}: {}", method, path, e);
            Response::from_parts(parts, Body::default())
        }
    }
}

/// Голубое время для 200, коричневое для остальных
fn request_line(
    at: DateTime<Local>,
    elapsed: Duration,
    size: &str,
    status: StatusCode,
    method: &Method,
    path: &str,
) -> String {
    let color = if status == StatusCode::OK { "36" } else { "33" };
    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        color,
        at.format("%H:%M:%S"),
        elapsed.as_millis(),
        size,
        status.as_u16(),
        method.as_str(),
        path
    )
}
