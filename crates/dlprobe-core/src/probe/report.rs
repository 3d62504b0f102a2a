//! Terminal outcome reporting.

use crate::error::ProbeError;

use super::ProbeResult;

/// Receives the single terminal outcome of a probe. Redirect hops are not reported.
pub trait ProbeListener {
    fn on_complete(&self, url: &str, result: &ProbeResult);
    fn on_fail(&self, url: &str, error: &ProbeError);
}

/// Invokes exactly one listener callback for `outcome`; failures are logged first.
pub fn dispatch(url: &str, outcome: &Result<ProbeResult, ProbeError>, listener: &dyn ProbeListener) {
    match outcome {
        Ok(result) => listener.on_complete(url, result),
        Err(err) => {
            tracing::error!(
                url = %err.url,
                path = ?err.local_path,
                need_retry = err.needs_retry(),
                "{}",
                err
            );
            listener.on_fail(url, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeErrorKind;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl ProbeListener for Recorder {
        fn on_complete(&self, url: &str, result: &ProbeResult) {
            self.events
                .borrow_mut()
                .push(format!("complete {} {}", url, result.status_code));
        }

        fn on_fail(&self, url: &str, error: &ProbeError) {
            self.events
                .borrow_mut()
                .push(format!("fail {} retry={}", url, error.needs_retry()));
        }
    }

    fn result() -> ProbeResult {
        ProbeResult {
            status_code: 206,
            content_length: 10,
            supports_range_resume: true,
            is_chunk_encoded: false,
            is_redirect: false,
            redirect_url: None,
            server_file_name: None,
            checksum_hint: None,
            is_new_task: false,
            disposition_raw: None,
        }
    }

    #[test]
    fn complete_reported_once() {
        let rec = Recorder::default();
        dispatch("http://a/", &Ok(result()), &rec);
        assert_eq!(*rec.events.borrow(), vec!["complete http://a/ 206".to_string()]);
    }

    #[test]
    fn failure_reported_once_with_retry_flag() {
        let rec = Recorder::default();
        let err = ProbeError::new("http://a/", ProbeErrorKind::NotFound);
        dispatch("http://a/", &Err(err), &rec);
        assert_eq!(*rec.events.borrow(), vec!["fail http://a/ retry=false".to_string()]);
    }
}
