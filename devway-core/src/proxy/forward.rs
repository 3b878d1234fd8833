use crate::route::ProxyRule;
use http::{HeaderValue, Uri, Version, header};
use pingora::prelude::*;
use pingora_http::RequestHeader;

/// Rewrite the upstream request header for the matched rule.
///
/// Method, remaining headers and body are forwarded untouched.
pub(crate) fn prepare_upstream_request(
    upstream: &mut RequestHeader,
    rule: &ProxyRule,
    path_and_query: &str,
    is_upgrade_req: bool,
) -> Result<()> {
    let uri = rule
        .target
        .upstream_uri(path_and_query)
        .parse::<Uri>()
        .map_err(|_| Error::new(Custom("invalid upstream uri")))?;
    upstream.set_uri(uri);

    if rule.change_origin {
        upstream.insert_header(header::HOST, rule.target.authority())?;
    }

    if is_upgrade_req {
        if rule.websocket {
            // Upgrade is an HTTP/1.1 mechanism (HTTP/2 forbids it)
            upstream.set_version(Version::HTTP_11);

            // Upstreams can be picky if these are missing; client values are replaced.
            upstream.insert_header(header::UPGRADE, "websocket")?;
            upstream.insert_header(header::CONNECTION, "Upgrade")?;
        } else {
            strip_upgrade(upstream)?;
        }
    }

    Ok(())
}

/// Turn an upgrade request into a plain HTTP request.
fn strip_upgrade(upstream: &mut RequestHeader) -> Result<()> {
    upstream.remove_header(&header::UPGRADE);

    let remaining = upstream
        .headers
        .get(header::CONNECTION)
        .and_then(|v| v.to_str().ok())
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty() && !token.eq_ignore_ascii_case("upgrade"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    if remaining.is_empty() {
        upstream.remove_header(&header::CONNECTION);
    } else {
        let value = HeaderValue::from_str(&remaining)
            .map_err(|_| Error::new(Custom("invalid connection header")))?;
        upstream.insert_header(header::CONNECTION, value)?;
    }

    Ok(())
}
