use super::types::{FileId, SelectedFile, UploadStatus, UploadedFile};
use crate::utils::file_size::FileSizeUtils;

/// Everything the shell renders about the current batch.
///
/// Updates never touch a published value in place: each transition below
/// returns a fresh state whose selection is a modified copy.
#[derive(Debug, Clone, Default)]
pub struct BatchState {
    pub selection: Vec<SelectedFile>,
    pub results: Vec<UploadedFile>,
    pub is_submitting: bool,
}

impl BatchState {
    pub fn total_bytes(&self) -> u64 {
        self.selection.iter().map(|file| file.size).sum()
    }

    pub fn summary(&self) -> String {
        FileSizeUtils::selection_summary(self.selection.len(), self.total_bytes())
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting && !self.selection.is_empty()
    }

    /// Something to clear and no batch running.
    pub fn can_reset(&self) -> bool {
        !self.is_submitting && !(self.selection.is_empty() && self.results.is_empty())
    }

    pub fn file(&self, id: FileId) -> Option<&SelectedFile> {
        self.selection.iter().find(|file| file.id == id)
    }

    fn with_file(&self, id: FileId, update: impl FnOnce(&mut SelectedFile)) -> Self {
        let mut selection = self.selection.clone();
        if let Some(file) = selection.iter_mut().find(|file| file.id == id) {
            update(file);
        }
        Self {
            selection,
            results: self.results.clone(),
            is_submitting: self.is_submitting,
        }
    }

    /// New selection; results no longer backed by a Done entry are dropped.
    pub(crate) fn with_selection(&self, selection: Vec<SelectedFile>) -> Self {
        Self {
            selection,
            results: self.results.clone(),
            is_submitting: self.is_submitting,
        }
        .without_stale_results()
    }

    pub(crate) fn with_uploading(&self, id: FileId) -> Self {
        self.with_file(id, |file| {
            file.status = UploadStatus::Uploading;
            file.percent = 0;
        })
        .without_stale_results()
    }

    /// `None` when the event would not change what observers see.
    pub(crate) fn with_progress(&self, id: FileId, sent: u64, total: u64) -> Option<Self> {
        let percent = progress_percent(sent, total)?;
        let file = self.file(id)?;
        if file.status != UploadStatus::Uploading || percent <= file.percent {
            return None;
        }
        Some(self.with_file(id, |file| file.percent = percent))
    }

    pub(crate) fn with_done(&self, id: FileId, url: String) -> Self {
        let mut next = self.with_file(id, |file| {
            file.status = UploadStatus::Done;
            file.percent = 100;
        });
        if let Some(file) = next.file(id) {
            let uploaded = UploadedFile {
                name: file.name.clone(),
                url,
            };
            next.results.push(uploaded);
        }
        next
    }

    pub(crate) fn with_error(&self, id: FileId) -> Self {
        self.with_file(id, |file| file.status = UploadStatus::Error)
    }

    /// Keeps each result only while a Done entry of the same name is left
    /// to account for it, so `results` stays a subset of the Done files.
    fn without_stale_results(mut self) -> Self {
        let mut done: Vec<&str> = self
            .selection
            .iter()
            .filter(|file| file.status == UploadStatus::Done)
            .map(|file| file.name.as_str())
            .collect();
        self.results.retain(|result| {
            match done.iter().position(|name| *name == result.name) {
                Some(index) => {
                    done.swap_remove(index);
                    true
                }
                None => false,
            }
        });
        self
    }
}

/// `round(100 * sent / total)`, capped at 100; no value for an empty body.
pub fn progress_percent(sent: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = (sent as f64 / total as f64 * 100.0).round();
    Some(percent.clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::types::Payload;
    use bytes::Bytes;

    fn file(name: &str, size: u64) -> SelectedFile {
        SelectedFile::new(name, size, Payload::Bytes(Bytes::new()))
    }

    fn state(files: Vec<SelectedFile>) -> BatchState {
        BatchState {
            selection: files,
            ..BatchState::default()
        }
    }

    #[test]
    fn summary_uses_megabytes_from_one_million_bytes() {
        let batch = state(vec![file("a.png", 500_000), file("b.png", 700_000)]);
        assert_eq!(batch.summary(), "Selected 2, total size 1.20MB");

        let batch = state(vec![file("a.png", 999), file("a.png", 1)]);
        assert_eq!(batch.summary(), "Selected 2, total size 1.00KB");
    }

    #[test]
    fn percent_rounds_and_caps() {
        assert_eq!(progress_percent(0, 200), Some(0));
        assert_eq!(progress_percent(1, 200), Some(1));
        assert_eq!(progress_percent(1, 3), Some(33));
        assert_eq!(progress_percent(2, 3), Some(67));
        assert_eq!(progress_percent(300, 200), Some(100));
        assert_eq!(progress_percent(10, 0), None);
    }

    #[test]
    fn progress_never_goes_backwards() {
        let a = file("a.png", 100);
        let id = a.id;
        let batch = state(vec![a]).with_uploading(id);

        let batch = batch.with_progress(id, 60, 100).unwrap();
        assert_eq!(batch.file(id).unwrap().percent, 60);

        assert!(batch.with_progress(id, 40, 100).is_none());
        assert!(batch.with_progress(id, 60, 100).is_none());

        let batch = batch.with_progress(id, 150, 100).unwrap();
        assert_eq!(batch.file(id).unwrap().percent, 100);
    }

    #[test]
    fn progress_ignored_outside_uploading() {
        let a = file("a.png", 100);
        let id = a.id;
        let batch = state(vec![a]);
        assert!(batch.with_progress(id, 50, 100).is_none());

        let done = batch.with_uploading(id).with_done(id, "u".into());
        assert!(done.with_progress(id, 50, 100).is_none());
    }

    #[test]
    fn transitions_leave_the_previous_state_untouched() {
        let a = file("a.png", 10);
        let b = file("a.png", 20);
        let (a_id, b_id) = (a.id, b.id);
        let before = state(vec![a, b]);

        let after = before
            .with_uploading(b_id)
            .with_done(b_id, "https://img/b".into());

        assert_eq!(before.file(b_id).unwrap().status, UploadStatus::Pending);
        assert!(before.results.is_empty());

        assert_eq!(after.file(a_id).unwrap().status, UploadStatus::Pending);
        assert_eq!(after.file(b_id).unwrap().status, UploadStatus::Done);
        assert_eq!(after.file(b_id).unwrap().percent, 100);
        assert_eq!(
            after.results,
            vec![UploadedFile {
                name: "a.png".into(),
                url: "https://img/b".into()
            }]
        );
    }

    #[test]
    fn reset_allowed_while_only_results_remain() {
        assert!(!BatchState::default().can_reset());

        let only_results = BatchState {
            results: vec![UploadedFile {
                name: "a.png".into(),
                url: "https://img/a".into(),
            }],
            ..BatchState::default()
        };
        assert!(only_results.can_reset());
        assert!(!only_results.can_submit());

        let running = BatchState {
            is_submitting: true,
            ..only_results
        };
        assert!(!running.can_reset());
    }

    #[test]
    fn dropping_a_done_file_drops_its_result() {
        let a = file("a.png", 10);
        let b = file("b.png", 10);
        let (a_id, b_id) = (a.id, b.id);
        let batch = state(vec![a, b])
            .with_uploading(a_id)
            .with_done(a_id, "https://img/a".into())
            .with_uploading(b_id)
            .with_done(b_id, "https://img/b".into());

        let kept: Vec<_> = batch
            .selection
            .iter()
            .filter(|f| f.id != a_id)
            .cloned()
            .collect();
        let next = batch.with_selection(kept);

        let names: Vec<_> = next.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b.png"]);
        assert_eq!(batch.results.len(), 2);
    }

    #[test]
    fn duplicate_names_keep_one_result_per_done_entry() {
        let first = file("a.png", 10);
        let second = file("a.png", 20);
        let (first_id, second_id) = (first.id, second.id);
        let batch = state(vec![first, second])
            .with_uploading(first_id)
            .with_done(first_id, "https://img/1".into())
            .with_uploading(second_id)
            .with_done(second_id, "https://img/2".into());
        assert_eq!(batch.results.len(), 2);

        let again = batch.with_uploading(second_id);
        assert_eq!(again.results.len(), 1);
        assert_eq!(again.file(first_id).unwrap().status, UploadStatus::Done);
    }

    #[test]
    fn error_keeps_file_out_of_results() {
        let a = file("a.png", 10);
        let id = a.id;
        let batch = state(vec![a]).with_uploading(id).with_error(id);
        assert_eq!(batch.file(id).unwrap().status, UploadStatus::Error);
        assert!(batch.results.is_empty());
        assert!(batch.file(id).unwrap().status.is_terminal());
    }
}
