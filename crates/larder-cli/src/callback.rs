//! Loopback listener for the OAuth redirect, used by `larder auth login`.

use std::time::{Duration, Instant};

use anyhow::{Context, bail};

/// Query parameters delivered to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback {
    pub code: String,
    pub state: String,
}

/// Split a loopback redirect URI into `host:port` to bind and the path to
/// wait on. Only `http://127.0.0.1:<port>` and `http://localhost:<port>`
/// are accepted.
pub fn loopback_target(redirect_uri: &str) -> anyhow::Result<(String, String)> {
    let rest = redirect_uri
        .strip_prefix("http://")
        .with_context(|| format!("redirect URI {redirect_uri} is not a loopback http URL"))?;
    let (authority, path) = rest
        .split_once('/')
        .map_or((rest, "/".to_string()), |(a, p)| (a, format!("/{p}")));
    let Some((host, port)) = authority.rsplit_once(':') else {
        bail!("redirect URI {redirect_uri} must include a port");
    };
    if host != "127.0.0.1" && host != "localhost" {
        bail!("redirect URI host {host} is not loopback; use `larder auth url` instead");
    }
    port.parse::<u16>()
        .with_context(|| format!("invalid port in redirect URI {redirect_uri}"))?;
    Ok((format!("127.0.0.1:{port}"), path))
}

/// Pull `code` and `state` out of a callback query string.
///
/// Returns `Ok(None)` when neither is present, so unrelated requests can be
/// ignored. A provider `error` parameter is an error.
pub fn parse_query(query: &str) -> anyhow::Result<Option<Callback>> {
    let mut code = None;
    let mut state = None;
    let mut error = None;
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let value = urlencoding::decode(value)
            .with_context(|| format!("invalid URL encoding in '{key}'"))?
            .into_owned();
        match key {
            "code" => code = Some(value),
            "state" => state = Some(value),
            "error" | "error_description" => {
                error = Some(error.map_or(value.clone(), |e: String| format!("{e}: {value}")));
            }
            _ => {}
        }
    }

    if let Some(error) = error {
        bail!("authorization was not granted: {error}");
    }
    match (code, state) {
        (Some(code), Some(state)) => Ok(Some(Callback { code, state })),
        (None, None) => Ok(None),
        _ => bail!("callback is missing its code or state"),
    }
}

/// Block until `path` receives a callback or `timeout` elapses.
///
/// Other paths (favicon, preflight) get a 204 and are ignored.
pub fn wait_for_callback(
    server: &tiny_http::Server,
    path: &str,
    timeout: Duration,
) -> anyhow::Result<Callback> {
    let deadline = Instant::now() + timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            bail!("OAuth callback timed out after {}s", timeout.as_secs());
        }
        let Some(request) = server
            .recv_timeout(remaining)
            .context("callback listener failed")?
        else {
            bail!("OAuth callback timed out after {}s", timeout.as_secs());
        };

        let url = request.url().to_string();
        let (request_path, query) = url.split_once('?').unwrap_or((url.as_str(), ""));
        if request_path != path {
            let _ = request.respond(tiny_http::Response::from_string("").with_status_code(204));
            continue;
        }

        match parse_query(query) {
            Ok(Some(callback)) => {
                let _ = request.respond(html("Larder is connected. You can close this tab."));
                return Ok(callback);
            }
            Ok(None) => {
                let _ = request.respond(html("Waiting for authorization."));
            }
            Err(error) => {
                let _ = request.respond(html("Authorization failed. Check the terminal."));
                return Err(error);
            }
        }
    }
}

fn html(message: &str) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = format!("<html><body><p>{message}</p></body></html>");
    let response = tiny_http::Response::from_string(body);
    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
