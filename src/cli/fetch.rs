//! Fetch command implementation
//!
//! All targets are requested concurrently through one request cache, so a
//! target repeated on the command line costs a single network call.

use futures::future::join_all;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::cli::{CommandContext, FetchArgs, OutputFormat};
use crate::client::RequestOptions;
use crate::error::{Error, Result};
use crate::output::json::format_json;

#[derive(Serialize)]
struct FetchResult {
    url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FetchArgs {
    /// Build request options from the flags
    pub fn request_options(&self) -> Result<RequestOptions> {
        let method = Method::from_bytes(self.method.to_uppercase().as_bytes())
            .map_err(|_| Error::Other(format!("Invalid HTTP method: {}", self.method)))?;

        let mut options = RequestOptions::new().with_method(method);
        for header in &self.headers {
            let (name, value) = header.split_once(':').ok_or_else(|| {
                Error::Other(format!("Invalid header '{}', expected 'Name: value'", header))
            })?;
            options = options.with_header(name.trim(), value.trim());
        }
        if let Some(ref body) = self.body {
            options = options.with_body(body.clone());
        }

        Ok(options)
    }
}

/// Run the fetch command
pub async fn run(ctx: &CommandContext, args: &FetchArgs) -> Result<()> {
    let options = args.request_options()?;
    let urls = args
        .targets
        .iter()
        .map(|target| ctx.config.resolve_url(target))
        .collect::<Result<Vec<_>>>()?;

    let cache = ctx.request_cache()?;
    let outcomes = join_all(urls.iter().map(|url| cache.fetch_cached(url, &options))).await;

    let stats = cache.stats();
    log::debug!(
        "Cache after fetch: {} entries ({} ready, {} in flight)",
        stats.total_entries,
        stats.ready,
        stats.in_flight
    );

    let mut first_error = None;
    let results: Vec<FetchResult> = urls
        .into_iter()
        .zip(outcomes)
        .map(|(url, outcome)| match outcome {
            Ok(data) => FetchResult {
                url,
                data: Some(data),
                error: None,
            },
            Err(err) => {
                let message = err.to_string();
                first_error.get_or_insert(err);
                FetchResult {
                    url,
                    data: None,
                    error: Some(message),
                }
            }
        })
        .collect();

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&results)?),
        OutputFormat::Pretty | OutputFormat::Table => {
            for result in &results {
                match (&result.data, &result.error) {
                    (Some(data), _) => {
                        println!("# {}", result.url);
                        println!("{}", serde_json::to_string_pretty(data)?);
                    }
                    (None, Some(error)) => eprintln!("# {} failed: {}", result.url, error),
                    (None, None) => (),
                }
            }
        }
    }

    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
