use crate::conf::StaticFilesConfig;
use crate::ctx::RequestCtx;
use crate::static_files::resolve::{ResolveError, resolve_static_path};
use crate::static_files::{StaticBody, StaticResponse};
use bytes::BytesMut;
use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use pingora::prelude::*;
use pingora_http::ResponseHeader;
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 32 * 1024;

/// Resolve a fall-through request against the static files directory.
pub async fn handle_static_request(
    static_files: Option<&StaticFilesConfig>,
    method: Option<&Method>,
    request_path: &str,
) -> StaticResponse {
    let Some(static_files) = static_files else {
        return error_response(StatusCode::NOT_FOUND);
    };

    if !matches!(method, Some(&Method::GET) | Some(&Method::HEAD)) {
        let mut resp = error_response(StatusCode::METHOD_NOT_ALLOWED);
        resp.headers
            .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        return resp;
    }

    let path = match resolve_static_path(&static_files.dir, request_path, static_files.spa_fallback)
    {
        Ok(p) => p,
        Err(e) => return error_response(map_resolve_error(e)),
    };

    let file = match tokio::fs::File::open(&path).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to open static file");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let len = match file.metadata().await {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to stat static file");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(mime.essence_str()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    StaticResponse {
        status: StatusCode::OK,
        headers,
        body: StaticBody::File { file, len },
    }
}

/// Answer a request that matched no proxy rule. Always finishes the request.
pub async fn respond_with_static(
    session: &mut Session,
    ctx: &RequestCtx,
    static_files: Option<&StaticFilesConfig>,
) -> Result<bool> {
    if ctx.is_upgrade_req {
        // Nothing local can accept an upgrade.
        session.respond_error(StatusCode::NOT_FOUND.as_u16()).await?;
        return Ok(true);
    }

    let static_resp =
        handle_static_request(static_files, ctx.method.as_ref(), &ctx.route_path).await;

    let mut resp = ResponseHeader::build(static_resp.status, None)?;
    for (name, value) in static_resp.headers.iter() {
        resp.insert_header(name.clone(), value.clone())?;
    }

    // Write headers (not end-of-stream yet)
    session.write_response_header(Box::new(resp), false).await?;

    match static_resp.body {
        StaticBody::File { mut file, len } if !ctx.is_head() => {
            let mut remaining = len;
            let mut buf = BytesMut::with_capacity(CHUNK_SIZE);

            while remaining > 0 {
                let to_read = usize::try_from(remaining).map_or(CHUNK_SIZE, |r| r.min(CHUNK_SIZE));
                buf.resize(to_read, 0);

                let n = file
                    .read(&mut buf[..])
                    .await
                    .map_err(|_| Error::new(Custom("static file read error")))?;

                if n == 0 {
                    break;
                }

                remaining -= n as u64;
                buf.truncate(n);

                session
                    .write_response_body(Some(buf.split().freeze()), false)
                    .await?;
            }

            session.write_response_body(None, true).await?;
        }

        // HEAD requests and empty bodies end right after the headers.
        _ => {
            session.write_response_body(None, true).await?;
        }
    }

    tracing::debug!(
        path = %ctx.route_path,
        status = static_resp.status.as_u16(),
        "served fall-through request locally"
    );

    Ok(true)
}

fn map_resolve_error(err: ResolveError) -> StatusCode {
    match err {
        ResolveError::NotFound => StatusCode::NOT_FOUND,
        ResolveError::Forbidden => StatusCode::FORBIDDEN,
        ResolveError::BadPath => StatusCode::BAD_REQUEST,
    }
}

fn error_response(status: StatusCode) -> StaticResponse {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("0"));

    StaticResponse {
        status,
        headers,
        body: StaticBody::Empty,
    }
}
