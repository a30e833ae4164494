//! HTTP client layer: typed GETs against the backend with a small
//! freshness-window cache keyed by path + report.

use std::cell::RefCell;
use std::collections::HashMap;

use gloo_net::http::Request;
use log::debug;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Backend base URL. Host and port are fixed; everything below it is a
/// path from the table in the module docs.
pub const BASE_URL: &str = "http://localhost:8000";

/// How long a cached body stays fresh. A knob, not a contract.
pub const STALE_MS: f64 = 60_000.0;

/// Everything that can go wrong talking to the backend.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FetchError {
	#[error("request to {path} failed: {detail}")]
	Transport { path: String, detail: String },
	#[error("could not decode response from {path}: {detail}")]
	Decode { path: String, detail: String },
	#[error("analysis stream had no readable body")]
	StreamAbsent,
}

impl FetchError {
	pub fn transport(path: &str, detail: impl ToString) -> Self {
		FetchError::Transport {
			path: path.to_string(),
			detail: detail.to_string(),
		}
	}

	pub fn decode(path: &str, detail: impl ToString) -> Self {
		FetchError::Decode {
			path: path.to_string(),
			detail: detail.to_string(),
		}
	}
}

/// Response-body cache. Time is injected so the eviction policy is plain
/// arithmetic; the wasm wrapper below feeds it `js_sys::Date::now()`.
pub struct QueryCache {
	stale_ms: f64,
	entries: HashMap<String, CachedBody>,
}

struct CachedBody {
	fetched_at_ms: f64,
	body: String,
}

impl QueryCache {
	pub fn new(stale_ms: f64) -> Self {
		Self {
			stale_ms,
			entries: HashMap::new(),
		}
	}

	/// Returns the cached body if one exists and is still fresh.
	pub fn lookup(&self, key: &str, now_ms: f64) -> Option<&str> {
		let entry = self.entries.get(key)?;
		if now_ms - entry.fetched_at_ms < self.stale_ms {
			Some(&entry.body)
		} else {
			None
		}
	}

	pub fn store(&mut self, key: String, body: String, now_ms: f64) {
		self.entries.insert(
			key,
			CachedBody {
				fetched_at_ms: now_ms,
				body,
			},
		);
	}
}

/// Cache key: logical path plus the report parameter it was fetched with.
pub fn cache_key(path: &str, report: Option<&str>) -> String {
	match report {
		Some(report) => format!("{path}?report={report}"),
		None => path.to_string(),
	}
}

thread_local! {
	static CACHE: RefCell<QueryCache> = RefCell::new(QueryCache::new(STALE_MS));
}

/// GET `path` (with an optional `report` query value, forwarded verbatim)
/// and decode the JSON body. A fresh cache hit skips the network entirely.
pub async fn get_json<T: DeserializeOwned>(
	path: &str,
	report: Option<&str>,
) -> Result<T, FetchError> {
	let key = cache_key(path, report);
	let now = js_sys::Date::now();

	let cached = CACHE.with(|cache| {
		cache
			.borrow()
			.lookup(&key, now)
			.map(|body| body.to_string())
	});
	if let Some(body) = cached {
		debug!("cache hit for {key}");
		return serde_json::from_str(&body).map_err(|err| FetchError::decode(path, err));
	}

	let url = match report {
		Some(report) => format!("{BASE_URL}{path}?report={report}"),
		None => format!("{BASE_URL}{path}"),
	};
	let response = Request::get(&url)
		.send()
		.await
		.map_err(|err| FetchError::transport(path, err))?;
	if !response.ok() {
		return Err(FetchError::transport(
			path,
			format!("status {}", response.status()),
		));
	}

	let body = response
		.text()
		.await
		.map_err(|err| FetchError::transport(path, err))?;
	let parsed = serde_json::from_str::<T>(&body).map_err(|err| FetchError::decode(path, err))?;

	CACHE.with(|cache| cache.borrow_mut().store(key, body, now));
	Ok(parsed)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn cache_serves_fresh_entries_only() {
		let mut cache = QueryCache::new(1_000.0);
		cache.store("k".to_string(), "[]".to_string(), 0.0);

		assert_eq!(cache.lookup("k", 500.0), Some("[]"));
		assert_eq!(cache.lookup("k", 999.9), Some("[]"));
		assert_eq!(cache.lookup("k", 1_000.0), None);
		assert_eq!(cache.lookup("other", 0.0), None);
	}

	#[test]
	fn newer_fetch_replaces_stale_body() {
		let mut cache = QueryCache::new(1_000.0);
		cache.store("k".to_string(), "old".to_string(), 0.0);
		cache.store("k".to_string(), "new".to_string(), 2_000.0);
		assert_eq!(cache.lookup("k", 2_500.0), Some("new"));
	}

	#[test]
	fn keys_include_the_report_parameter() {
		assert_eq!(cache_key("/subreddits", None), "/subreddits");
		assert_eq!(
			cache_key("/subreddits", Some("tesla")),
			"/subreddits?report=tesla"
		);
		assert_ne!(
			cache_key("/subreddits", Some("tesla")),
			cache_key("/subreddits", Some("latest"))
		);
	}
}
