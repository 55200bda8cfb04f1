use std::collections::HashMap;
use std::time::Duration;

use reqwest::Client;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT: u64 = 15;

/// Outcome of an HTTP GET: status code plus decoded body text.
///
/// Non-2xx statuses are returned to the caller rather than mapped to an
/// error, because some of them carry meaning (a 404 from the repository API
/// means "path absent", not "request failed").
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Makes an HTTP GET request to the specified URL
///
/// # Arguments
/// * `url` - The URL to request
/// * `headers` - Optional custom headers
///
/// # Returns
/// * `Ok(HttpResponse)` - Status and body, for any status the server sent
/// * `Err(String)` - Error message if the request could not complete
pub async fn web_get_async(
    url: &str,
    headers: Option<&HashMap<String, String>>,
) -> Result<HttpResponse, String> {
    let client = match Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT))
        .user_agent("submerge")
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return Err(format!("Failed to build HTTP client: {}", e));
        }
    };

    // Build request with headers if specified
    let mut request_builder = client.get(url);
    if let Some(custom_headers) = headers {
        for (key, value) in custom_headers {
            request_builder = request_builder.header(key, value);
        }
    }

    let response = match request_builder.send().await {
        Ok(resp) => resp,
        Err(e) => {
            return Err(format!("Failed to send request: {}", e));
        }
    };

    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => Ok(HttpResponse { status, body }),
        Err(e) => Err(format!("Failed to read response body: {}", e)),
    }
}

/// Synchronous version of `web_get_async` that uses a tokio runtime to run
/// the async function. The pipeline is a strictly sequential batch job, so a
/// current-thread runtime per call is enough.
pub fn web_get(
    url: &str,
    headers: Option<&HashMap<String, String>>,
) -> Result<HttpResponse, String> {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            return Err(format!("Failed to create tokio runtime: {}", e));
        }
    };

    rt.block_on(web_get_async(url, headers))
}
