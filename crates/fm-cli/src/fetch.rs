use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::{info, warn};
use reqwest::header::{CACHE_CONTROL, USER_AGENT};
use reqwest::StatusCode;

use fm_core::{Category, SourceLoader, Sources};

const CLIENT_USER_AGENT: &str = concat!("FilterMerge/", env!("CARGO_PKG_VERSION"));
const CACHE_BUSTED_HOST: &str = "raw.githubusercontent.com";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
}

#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub backup_dir: PathBuf,
    pub timeout: Duration,
    /// Skip the network and serve every source from its backup copy.
    pub offline: bool,
}

/// Fetched source texts, keyed by category and source URL.
#[derive(Debug, Default)]
pub struct FetchedSources {
    texts: HashMap<(Category, String), String>,
}

impl SourceLoader for FetchedSources {
    fn load(&self, category: Category, source: &str) -> Option<String> {
        self.texts.get(&(category, source.to_string())).cloned()
    }
}

/// Fetch every configured source, falling back to backups on failure.
pub fn fetch_all(sources: &Sources, opts: &FetchOptions) -> Result<FetchedSources, String> {
    prepare_backup_dirs(&opts.backup_dir)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    runtime.block_on(fetch_all_async(sources, opts))
}

async fn fetch_all_async(sources: &Sources, opts: &FetchOptions) -> Result<FetchedSources, String> {
    let fetcher = Fetcher::new(opts.clone())
        .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

    let mut handles = Vec::with_capacity(sources.total());
    for category in Category::ALL {
        for url in sources.for_category(category) {
            let fetcher = fetcher.clone();
            let url = url.clone();
            handles.push(tokio::spawn(async move {
                let text = fetcher.fetch(category, &url).await;
                (category, url, text)
            }));
        }
    }

    let mut fetched = FetchedSources::default();
    for handle in handles {
        let (category, url, text) = handle
            .await
            .map_err(|e| format!("Fetch task failed: {}", e))?;
        if let Some(text) = text {
            fetched.texts.insert((category, url), text);
        }
    }

    Ok(fetched)
}

#[derive(Debug, Clone)]
struct Fetcher {
    client: reqwest::Client,
    opts: FetchOptions,
}

impl Fetcher {
    fn new(opts: FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(opts.timeout).build()?;
        Ok(Self { client, opts })
    }

    /// Remote text on success, backup copy otherwise.
    async fn fetch(&self, category: Category, url: &str) -> Option<String> {
        let backup = backup_path(&self.opts.backup_dir, category, url);
        info!("[{}] fetching {}", category.as_str().to_ascii_uppercase(), url);

        if !self.opts.offline {
            match self.fetch_remote(url).await {
                Ok(text) => {
                    if let Err(e) = tokio::fs::write(&backup, &text).await {
                        warn!("Failed to write backup '{}': {}", backup.display(), e);
                    }
                    return Some(text);
                }
                Err(e) => warn!("Download failed for {}, using backup: {}", url, e),
            }
        }

        read_backup(&backup).await
    }

    async fn fetch_remote(&self, url: &str) -> Result<String, FetchError> {
        let request_url = cache_busted_url(url, unix_now());
        let response = self
            .client
            .get(&request_url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text().await?)
    }
}

async fn read_backup(path: &Path) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Some(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("No backup at '{}'", path.display());
            None
        }
        Err(e) => {
            warn!("Failed to read backup '{}': {}", path.display(), e);
            None
        }
    }
}

pub fn prepare_backup_dirs(backup_dir: &Path) -> Result<(), String> {
    for category in Category::ALL {
        let dir = backup_dir.join(category.as_str());
        fs::create_dir_all(&dir)
            .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;
    }
    Ok(())
}

/// Backup location for a source: `<backup>/<category>/<sanitized url>.txt`.
pub fn backup_path(backup_dir: &Path, category: Category, url: &str) -> PathBuf {
    backup_dir.join(category.as_str()).join(backup_file_name(url))
}

/// Every character outside `[A-Za-z0-9]` becomes `_`.
pub fn backup_file_name(url: &str) -> String {
    let mut name: String = url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    name.push_str(".txt");
    name
}

/// Append a timestamp query to raw GitHub URLs so CDN caches are bypassed.
pub fn cache_busted_url(url: &str, now_secs: u64) -> String {
    if !url.contains(CACHE_BUSTED_HOST) {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", url, sep, now_secs)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
