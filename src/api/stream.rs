//! Streaming analysis controller.
//!
//! Drives one `/analysis/analyze` run end-to-end: opens the long-lived
//! response, splits the byte stream into lines (keeping the unterminated
//! tail across chunk boundaries so no event is lost mid-chunk), parses
//! `data: ` lines as progress events, and moves the store to `Finish` on
//! a terminal stage or transport failure. A failed run is not retried.

use gloo_net::http::Request;
use log::warn;
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::ReadableStreamDefaultReader;

use super::client::{BASE_URL, FetchError};
use crate::store::{AnalysisEvent, AppStore};

const ANALYZE_PATH: &str = "/analysis/analyze";
const DATA_PREFIX: &str = "data: ";

/// Incremental line splitter over raw byte chunks. Complete lines come out
/// as they arrive; a trailing fragment without its newline stays buffered
/// until the next chunk (or [`LineBuffer::flush`] at end of stream).
#[derive(Default)]
pub struct LineBuffer {
	pending: Vec<u8>,
}

impl LineBuffer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Feed one chunk, returning every line completed by it.
	pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
		self.pending.extend_from_slice(chunk);

		let mut lines = Vec::new();
		while let Some(newline) = self.pending.iter().position(|&b| b == b'\n') {
			let rest = self.pending.split_off(newline + 1);
			let mut line = std::mem::replace(&mut self.pending, rest);
			line.pop(); // the newline itself
			if line.last() == Some(&b'\r') {
				line.pop();
			}
			lines.push(String::from_utf8_lossy(&line).into_owned());
		}
		lines
	}

	/// Drain whatever is left once the stream ends.
	pub fn flush(&mut self) -> Option<String> {
		if self.pending.is_empty() {
			return None;
		}
		let line = String::from_utf8_lossy(&self.pending).into_owned();
		self.pending.clear();
		Some(line)
	}
}

#[derive(Deserialize)]
struct ProgressPayload {
	stage: String,
	message: String,
}

/// Parse one stream line. Returns the `(stage, message)` pair for a
/// well-formed `data: ` line. SSE framing lines (`event:`, keep-alive
/// blanks) and malformed JSON yield `None`; the latter is logged and
/// swallowed so a garbled line never ends the run.
pub fn parse_event_line(line: &str) -> Option<(String, String)> {
	let payload = line.strip_prefix(DATA_PREFIX)?;
	match serde_json::from_str::<ProgressPayload>(payload) {
		Ok(event) => Some((event.stage, event.message)),
		Err(err) => {
			warn!("skipping malformed analysis event: {err}");
			None
		}
	}
}

/// `complete` and `error` end the run.
pub fn is_terminal_stage(stage: &str) -> bool {
	matches!(stage, "complete" | "error")
}

/// Kick off one analysis run. Must only be invoked from `Start` or
/// `Finish`; a second invocation while one is in flight overwrites state
/// and is not guarded here.
pub fn run_analysis(store: AppStore) {
	store.begin_analysis();
	spawn_local(async move {
		if let Err(err) = stream_events(&store).await {
			store.push_event(AnalysisEvent {
				stage: "error".to_string(),
				message: err.to_string(),
				at_ms: js_sys::Date::now(),
			});
		}
		store.finish_analysis();
	});
}

async fn stream_events(store: &AppStore) -> Result<(), FetchError> {
	let url = format!("{BASE_URL}{ANALYZE_PATH}");
	let response = Request::get(&url)
		.send()
		.await
		.map_err(|err| FetchError::transport(ANALYZE_PATH, err))?;
	if !response.ok() {
		return Err(FetchError::transport(
			ANALYZE_PATH,
			format!("status {}", response.status()),
		));
	}

	let body = response.body().ok_or(FetchError::StreamAbsent)?;
	let reader: ReadableStreamDefaultReader = body
		.get_reader()
		.dyn_into()
		.map_err(|_| FetchError::StreamAbsent)?;

	let mut buffer = LineBuffer::new();
	loop {
		let chunk = JsFuture::from(reader.read())
			.await
			.map_err(|err| FetchError::transport(ANALYZE_PATH, format!("{err:?}")))?;
		let done = js_sys::Reflect::get(&chunk, &"done".into())
			.ok()
			.and_then(|v| v.as_bool())
			.unwrap_or(true);
		if done {
			break;
		}

		let value = js_sys::Reflect::get(&chunk, &"value".into())
			.map_err(|err| FetchError::transport(ANALYZE_PATH, format!("{err:?}")))?;
		let bytes = js_sys::Uint8Array::new(&value).to_vec();

		for line in buffer.push(&bytes) {
			if handle_line(store, &line) {
				// Terminal stage: stop reading further chunks.
				let _ = reader.cancel();
				return Ok(());
			}
		}
	}

	if let Some(line) = buffer.flush() {
		handle_line(store, &line);
	}
	Ok(())
}

/// Append a parsed event with its capture timestamp. Returns true when the
/// event carried a terminal stage.
fn handle_line(store: &AppStore, line: &str) -> bool {
	let Some((stage, message)) = parse_event_line(line) else {
		return false;
	};
	let terminal = is_terminal_stage(&stage);
	store.push_event(AnalysisEvent {
		stage,
		message,
		at_ms: js_sys::Date::now(),
	});
	terminal
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_complete_lines_per_chunk() {
		let mut buffer = LineBuffer::new();
		let lines = buffer.push(b"data: {\"a\":1}\ndata: {\"b\":2}\n");
		assert_eq!(lines, vec!["data: {\"a\":1}", "data: {\"b\":2}"]);
		assert_eq!(buffer.flush(), None);
	}

	#[test]
	fn keeps_unterminated_tail_across_chunks() {
		let mut buffer = LineBuffer::new();
		assert!(buffer.push(b"data: {\"stage\":\"rank").is_empty());
		let lines = buffer.push(b"ing\",\"message\":\"m\"}\nevent: progress\n");
		assert_eq!(
			lines,
			vec!["data: {\"stage\":\"ranking\",\"message\":\"m\"}", "event: progress"]
		);
	}

	#[test]
	fn strips_carriage_returns_and_flushes_the_rest() {
		let mut buffer = LineBuffer::new();
		assert_eq!(buffer.push(b"one\r\ntwo"), vec!["one"]);
		assert_eq!(buffer.flush(), Some("two".to_string()));
		assert_eq!(buffer.flush(), None);
	}

	#[test]
	fn parses_data_lines_only() {
		let parsed =
			parse_event_line(r#"data: {"stage":"ranking","message":"Ranking subreddits"}"#);
		assert_eq!(
			parsed,
			Some(("ranking".to_string(), "Ranking subreddits".to_string()))
		);

		assert_eq!(parse_event_line("event: progress"), None);
		assert_eq!(parse_event_line(""), None);
		assert_eq!(parse_event_line(": keep-alive"), None);
	}

	#[test]
	fn malformed_json_is_swallowed_not_fatal() {
		assert_eq!(parse_event_line("data: {bad json"), None);
		// A later well-formed line still parses.
		assert!(parse_event_line(r#"data: {"stage":"saving","message":"ok"}"#).is_some());
	}

	#[test]
	fn extra_payload_fields_are_ignored() {
		let parsed = parse_event_line(
			r#"data: {"stage":"complete","message":"Full analysis complete!","success":true}"#,
		);
		assert_eq!(
			parsed,
			Some(("complete".to_string(), "Full analysis complete!".to_string()))
		);
	}

	#[test]
	fn terminal_stages() {
		assert!(is_terminal_stage("complete"));
		assert!(is_terminal_stage("error"));
		assert!(!is_terminal_stage("ranking"));
		assert!(!is_terminal_stage("saving"));
	}
}
