//! Upload service - drives one submission of the form through a transport.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::{RwSignal, SignalUpdate};

use crate::state::UploadForm;
use crate::types::{SelectedFile, TransferProgress, TransportError, UploadError, UploadReply, UploadResult};

/// Receives progress reports while a request is in flight.
pub type ProgressSink = Rc<dyn Fn(TransferProgress)>;

/// Something that can POST a file as multipart field `file`.
#[allow(async_fn_in_trait)]
pub trait UploadTransport {
    /// Payload type of the files this transport sends.
    type Blob;

    /// Send `file`, reporting progress to `progress`, and return the
    /// parsed reply.
    async fn send(
        &self,
        file: &SelectedFile<Self::Blob>,
        progress: ProgressSink,
    ) -> Result<UploadReply, TransportError>;
}

/// Shared, mutable access to a form's state.
///
/// Returns `None` when the state no longer exists.
pub trait FormCell<B> {
    fn with_form<R>(&self, f: impl FnOnce(&mut UploadForm<B>) -> R) -> Option<R>;
}

impl<B: 'static> FormCell<B> for RwSignal<UploadForm<B>> {
    fn with_form<R>(&self, f: impl FnOnce(&mut UploadForm<B>) -> R) -> Option<R> {
        self.try_update(f)
    }
}

impl<B> FormCell<B> for Rc<RefCell<UploadForm<B>>> {
    fn with_form<R>(&self, f: impl FnOnce(&mut UploadForm<B>) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

/// Submit the form's current file through `transport`.
///
/// The form moves to `Submitting` before the request starts and to
/// `Succeeded`/`Failed` when it ends. A call while another submission is
/// in flight returns [`UploadError::AlreadySubmitting`] without sending.
pub async fn submit<B, C, T>(form: &C, transport: &T) -> UploadResult<UploadReply>
where
    C: FormCell<B> + Clone + 'static,
    T: UploadTransport<Blob = B>,
    B: Clone + 'static,
{
    let file = form
        .with_form(|f| f.begin_submit())
        .ok_or(UploadError::Unmounted)??;

    log::info!("📤 Uploading {} ({})", file.name, file.display_size());

    let sink_form = form.clone();
    let sink: ProgressSink = Rc::new(move |report: TransferProgress| {
        if let Some(Some(percent)) = sink_form.with_form(|f| f.record_progress(report)) {
            log::debug!("Upload progress: {}%", percent);
        }
    });

    let outcome = transport.send(&file, sink).await;

    match &outcome {
        Ok(reply) => log::info!("✅ Upload finished: {}", reply.message),
        Err(e) => log::warn!("❌ Upload failed: {}", e),
    }

    form.with_form(|f| f.finish(&outcome))
        .ok_or(UploadError::Unmounted)?;

    Ok(outcome?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UploadPhase;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use std::cell::Cell;

    type Form = Rc<RefCell<UploadForm<Vec<u8>>>>;

    /// Replays fixed progress reports, then returns a fixed outcome.
    struct MockTransport {
        reports: Vec<(u64, u64)>,
        outcome: Result<UploadReply, TransportError>,
        calls: Cell<usize>,
        /// Progress displayed by `watch` after each report
        watch: Option<Form>,
        displayed: RefCell<Vec<u8>>,
    }

    impl MockTransport {
        fn new(reports: Vec<(u64, u64)>, outcome: Result<UploadReply, TransportError>) -> Self {
            Self {
                reports,
                outcome,
                calls: Cell::new(0),
                watch: None,
                displayed: RefCell::new(Vec::new()),
            }
        }

        fn watching(mut self, form: &Form) -> Self {
            self.watch = Some(form.clone());
            self
        }
    }

    impl UploadTransport for MockTransport {
        type Blob = Vec<u8>;

        async fn send(
            &self,
            _file: &SelectedFile<Vec<u8>>,
            progress: ProgressSink,
        ) -> Result<UploadReply, TransportError> {
            self.calls.set(self.calls.get() + 1);
            for &(loaded, total) in &self.reports {
                progress(TransferProgress::new(loaded, total));
                if let Some(form) = &self.watch {
                    self.displayed.borrow_mut().push(form.borrow().progress());
                }
            }
            self.outcome.clone()
        }
    }

    /// Holds the request open until the test releases it.
    struct GatedTransport {
        gate: RefCell<Option<oneshot::Receiver<Result<UploadReply, TransportError>>>>,
        calls: Cell<usize>,
    }

    impl UploadTransport for GatedTransport {
        type Blob = Vec<u8>;

        async fn send(
            &self,
            _file: &SelectedFile<Vec<u8>>,
            _progress: ProgressSink,
        ) -> Result<UploadReply, TransportError> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take().ok_or(TransportError::Aborted)?;
            gate.await.unwrap_or(Err(TransportError::Aborted))
        }
    }

    fn form_with(name: &str, content: &[u8]) -> Form {
        let form = Rc::new(RefCell::new(UploadForm::new()));
        form.borrow_mut()
            .select_file(SelectedFile::new(name, content.len() as u64, content.to_vec()))
            .unwrap();
        form
    }

    fn ok(message: &str) -> Result<UploadReply, TransportError> {
        Ok(UploadReply {
            message: message.to_string(),
        })
    }

    #[test]
    fn test_no_file_never_calls_transport() {
        let form: Form = Rc::new(RefCell::new(UploadForm::new()));
        let transport = MockTransport::new(vec![(1, 1)], ok("unused"));

        let result = block_on(submit(&form, &transport));

        assert_eq!(result, Err(UploadError::NoFileSelected));
        assert_eq!(transport.calls.get(), 0);
        assert_eq!(form.borrow().status(), "Please select a file to upload");
    }

    #[test]
    fn test_upload_scenario() {
        let form = form_with("a.txt", b"0123456789");
        let transport = MockTransport::new(vec![(5, 10), (10, 10)], ok("ok")).watching(&form);

        let result = block_on(submit(&form, &transport));

        assert_eq!(result, ok("ok").map_err(UploadError::from));
        assert_eq!(*transport.displayed.borrow(), vec![50, 100]);
        assert_eq!(transport.calls.get(), 1);

        let form = form.borrow();
        assert_eq!(form.status(), "ok");
        assert_eq!(form.progress(), 0);
        assert_eq!(form.progress_text(), None);
    }

    #[test]
    fn test_transport_failure() {
        let form = form_with("a.txt", b"0123456789");
        let transport =
            MockTransport::new(vec![(3, 10)], Err(TransportError::Timeout)).watching(&form);

        let result = block_on(submit(&form, &transport));

        assert_eq!(result, Err(UploadError::Transport(TransportError::Timeout)));
        assert_eq!(*transport.displayed.borrow(), vec![30]);

        let form = form.borrow();
        assert_eq!(form.status(), "Failed to upload file");
        assert_eq!(form.progress(), 0);
        assert!(matches!(form.phase(), UploadPhase::Failed { .. }));
    }

    #[test]
    fn test_displayed_progress_is_monotonic() {
        let form = form_with("a.txt", b"0123456789");
        let transport = MockTransport::new(
            vec![(2, 10), (6, 10), (4, 10), (6, 0), (10, 10)],
            ok("done"),
        )
        .watching(&form);

        block_on(submit(&form, &transport)).unwrap();

        let displayed = transport.displayed.borrow().clone();
        assert_eq!(displayed, vec![20, 60, 60, 60, 100]);
        assert!(displayed.windows(2).all(|w| w[0] <= w[1]));
        assert!(displayed.iter().all(|p| *p <= 100));
    }

    #[test]
    fn test_second_submit_while_in_flight() {
        let form = form_with("a.txt", b"abc");
        let (release, gate) = oneshot::channel();
        let transport = GatedTransport {
            gate: RefCell::new(Some(gate)),
            calls: Cell::new(0),
        };

        block_on(async {
            let mut first = Box::pin(submit(&form, &transport));
            assert!(futures::poll!(&mut first).is_pending());
            assert!(form.borrow().is_submitting());

            let second = submit(&form, &transport).await;
            assert_eq!(second, Err(UploadError::AlreadySubmitting));
            assert_eq!(transport.calls.get(), 1);

            release.send(ok("first")).unwrap();
            assert_eq!(first.await, ok("first").map_err(UploadError::from));
        });

        assert_eq!(form.borrow().status(), "first");
    }

    #[test]
    fn test_new_selection_after_failure_allows_resubmit() {
        let form = form_with("a.txt", b"abc");
        let failing = MockTransport::new(vec![], Err(TransportError::Network));
        block_on(submit(&form, &failing)).unwrap_err();

        form.borrow_mut()
            .select_file(SelectedFile::new("b.txt", 2, b"bb".to_vec()))
            .unwrap();
        let working = MockTransport::new(vec![(2, 2)], ok("stored b.txt"));
        let reply = block_on(submit(&form, &working)).unwrap();

        assert_eq!(reply.message, "stored b.txt");
        assert_eq!(form.borrow().file().map(|f| f.name.clone()), Some("b.txt".into()));
    }
}
