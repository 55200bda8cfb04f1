use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::warn;
use serde::Deserialize;

use crate::errors::MergeError;
use crate::settings::GithubSettings;
use crate::sources::{is_yaml_path, SourceFetcher};
use crate::utils::{desensitize_url, web_get};

/// Contents API directory entry
#[derive(Debug, Deserialize)]
struct ContentsItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    type_field: String,
}

/// Contents API file payload
#[derive(Debug, Deserialize)]
struct ContentsFile {
    encoding: String,
    content: String,
}

/// Fetches source files from a (typically private) GitHub repository via
/// the contents API, authenticated with a personal access token.
pub struct GithubFetcher {
    owner: String,
    repository: String,
    branch: String,
    token: String,
}

impl GithubFetcher {
    pub fn new(settings: &GithubSettings, token: String) -> Self {
        GithubFetcher {
            owner: settings.owner.clone(),
            repository: settings.repository.clone(),
            branch: settings.branch.clone(),
            token,
        }
    }

    /// Access token from the `GITHUB_TOKEN` environment variable.
    pub fn token_from_env() -> Result<String, MergeError> {
        match std::env::var("GITHUB_TOKEN") {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(MergeError::Settings(
                "GITHUB_TOKEN environment variable is not set".to_string(),
            )),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        let base = format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.owner,
            self.repository,
            path.trim_start_matches('/')
        );
        if self.branch.is_empty() {
            base
        } else {
            format!("{}?ref={}", base, self.branch)
        }
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), format!("token {}", self.token));
        headers.insert(
            "Accept".to_string(),
            "application/vnd.github.v3+json".to_string(),
        );
        headers
    }

    /// GET one contents-API path. `Ok(None)` on 404.
    fn get(&self, path: &str) -> Result<Option<String>, MergeError> {
        let url = self.contents_url(path);
        let headers = self.headers();
        let response = web_get(&url, Some(&headers)).map_err(|e| {
            MergeError::SourceUnavailable(format!("{}: {}", desensitize_url(&url), e))
        })?;

        if response.status == 404 {
            return Ok(None);
        }
        if !response.is_success() {
            return Err(MergeError::SourceUnavailable(format!(
                "{}: HTTP {}",
                desensitize_url(&url),
                response.status
            )));
        }
        Ok(Some(response.body))
    }
}

impl SourceFetcher for GithubFetcher {
    fn fetch(&self, path: &str) -> Result<Option<String>, MergeError> {
        let body = match self.get(path)? {
            Some(body) => body,
            None => return Ok(None),
        };

        let file: ContentsFile = serde_json::from_str(&body).map_err(|e| {
            MergeError::SourceUnavailable(format!("{}: unexpected API payload: {}", path, e))
        })?;
        if file.encoding != "base64" {
            return Err(MergeError::SourceUnavailable(format!(
                "{}: unsupported content encoding {:?}",
                path, file.encoding
            )));
        }

        let text = decode_base64_content(&file.content)
            .map_err(|e| MergeError::SourceUnavailable(format!("{}: {}", path, e)))?;
        Ok(Some(text))
    }

    fn list_dir(&self, dir: &str) -> Result<Vec<String>, MergeError> {
        let body = match self.get(dir)? {
            Some(body) => body,
            None => {
                warn!("Directory not found in repository: {}", dir);
                return Ok(Vec::new());
            }
        };

        let items: Vec<ContentsItem> = serde_json::from_str(&body).map_err(|e| {
            MergeError::SourceUnavailable(format!("{}: unexpected API payload: {}", dir, e))
        })?;

        let mut paths: Vec<String> = items
            .into_iter()
            .filter(|item| item.type_field == "file" && is_yaml_path(&item.name))
            .map(|item| item.path)
            .collect();
        // The API lists alphabetically already; sort anyway so ordering is a
        // local guarantee instead of an API one
        paths.sort();
        Ok(paths)
    }
}

/// The contents API wraps base64 bodies at 60 columns; strip the line breaks
/// before decoding.
fn decode_base64_content(content: &str) -> Result<String, String> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| format!("invalid base64 content: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("content is not valid UTF-8: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(branch: &str) -> GithubFetcher {
        GithubFetcher {
            owner: "octo".to_string(),
            repository: "clash-config".to_string(),
            branch: branch.to_string(),
            token: "tok".to_string(),
        }
    }

    #[test]
    fn test_contents_url_default_branch() {
        assert_eq!(
            fetcher("").contents_url("proxies/sub-a.yaml"),
            "https://api.github.com/repos/octo/clash-config/contents/proxies/sub-a.yaml"
        );
    }

    #[test]
    fn test_contents_url_with_branch() {
        assert_eq!(
            fetcher("main").contents_url("/rules"),
            "https://api.github.com/repos/octo/clash-config/contents/rules?ref=main"
        );
    }

    #[test]
    fn test_auth_headers() {
        let headers = fetcher("").headers();
        assert_eq!(headers.get("Authorization").unwrap(), "token tok");
        assert_eq!(
            headers.get("Accept").unwrap(),
            "application/vnd.github.v3+json"
        );
    }

    #[test]
    fn test_decode_wrapped_base64() {
        let encoded = STANDARD.encode("proxies:\n  - name: HK-01\n");
        // Reproduce the API's line wrapping
        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);
        assert_eq!(
            decode_base64_content(&wrapped).unwrap(),
            "proxies:\n  - name: HK-01\n"
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_base64_content("?!not-base64").is_err());
    }
}
