//! Console reporting of probe outcomes.

use dlprobe_core::filename::derive_filename;
use dlprobe_core::interpret::decode_disposition;
use dlprobe_core::{ProbeError, ProbeListener, ProbeResult};

/// Prints completions to stdout and failures to stderr.
pub struct ConsoleListener {
    pub json: bool,
}

impl ProbeListener for ConsoleListener {
    fn on_complete(&self, url: &str, result: &ProbeResult) {
        let final_url = result.redirect_url.as_deref().unwrap_or(url);
        let save_as = derive_filename(final_url, result.server_file_name.as_deref());

        if self.json {
            let doc = serde_json::json!({
                "url": url,
                "save_as": save_as,
                "result": result,
            });
            match serde_json::to_string_pretty(&doc) {
                Ok(s) => println!("{s}"),
                Err(e) => eprintln!("could not encode result: {e}"),
            }
            return;
        }

        println!("URL:           {url}");
        println!("Status:        {}", result.status_code);
        println!("Length:        {}", length_str(result.content_length));
        println!("Range resume:  {}", yes_no(result.supports_range_resume));
        println!("Chunked:       {}", yes_no(result.is_chunk_encoded));
        if let Some(target) = &result.redirect_url {
            println!("Redirected to: {target}");
        }
        if let Some(name) = &result.server_file_name {
            println!("Server name:   {name}");
        }
        if let Some(raw) = disposition_text(result) {
            println!("Disposition:   {raw}");
        }
        if let Some(hint) = &result.checksum_hint {
            println!("Content-MD5:   {hint}");
        }
        println!("Save as:       {save_as}");
        println!("New task:      {}", yes_no(result.is_new_task));
        println!(
            "Strategy:      {}",
            if result.segmentable() {
                "segmented (resumable)"
            } else {
                "single stream"
            }
        );
    }

    fn on_fail(&self, _url: &str, error: &ProbeError) {
        let verdict = if error.needs_retry() {
            "retryable"
        } else {
            "fatal"
        };
        eprintln!("{error} ({verdict})");
    }
}

/// Raw `Content-Disposition` header recovered from its stored form.
pub(crate) fn disposition_text(result: &ProbeResult) -> Option<String> {
    result.disposition_raw.as_deref().and_then(decode_disposition)
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn length_str(len: i64) -> String {
    if len < 0 {
        "unknown".to_string()
    } else {
        format!("{len} bytes")
    }
}
