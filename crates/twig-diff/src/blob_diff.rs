//! Line-level diff of file contents.
//!
//! Uses the `similar` crate (Myers diff algorithm). Consecutive lines of the
//! same kind are merged into one [`DiffRun`], and within each changed region
//! the removed lines come before the added ones.

use similar::{ChangeTag, TextDiff};

/// What happened to a run of lines between the old and new content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present in both.
    Equal,
    /// Present only in the new content.
    Added,
    /// Present only in the old content.
    Removed,
}

/// A maximal run of lines sharing one [`ChangeKind`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffRun {
    pub kind: ChangeKind,
    /// The lines concatenated, terminators included.
    pub text: String,
    /// Number of lines in `text`.
    pub lines: usize,
}

impl DiffRun {
    fn new(kind: ChangeKind, text: impl Into<String>, lines: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            lines,
        }
    }
}

/// Diff two texts line by line.
pub fn diff_text(old: &str, new: &str) -> Vec<DiffRun> {
    let diff = TextDiff::from_lines(old, new);
    let mut runs: Vec<DiffRun> = Vec::new();
    let mut removed = DiffRun::new(ChangeKind::Removed, String::new(), 0);
    let mut added = DiffRun::new(ChangeKind::Added, String::new(), 0);

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => {
                removed.text.push_str(change.value());
                removed.lines += 1;
            }
            ChangeTag::Insert => {
                added.text.push_str(change.value());
                added.lines += 1;
            }
            ChangeTag::Equal => {
                flush(&mut runs, &mut removed);
                flush(&mut runs, &mut added);
                match runs.last_mut() {
                    Some(last) if last.kind == ChangeKind::Equal => {
                        last.text.push_str(change.value());
                        last.lines += 1;
                    }
                    _ => runs.push(DiffRun::new(ChangeKind::Equal, change.value(), 1)),
                }
            }
        }
    }
    flush(&mut runs, &mut removed);
    flush(&mut runs, &mut added);
    runs
}

fn flush(runs: &mut Vec<DiffRun>, pending: &mut DiffRun) {
    if pending.lines == 0 {
        return;
    }
    let kind = pending.kind;
    runs.push(std::mem::replace(pending, DiffRun::new(kind, String::new(), 0)));
}

/// The result of diffing two blobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobDiff {
    pub runs: Vec<DiffRun>,
    /// At least one side was not valid UTF-8.
    pub binary: bool,
}

impl BlobDiff {
    /// Returns `true` if the two blobs are identical.
    pub fn is_unchanged(&self) -> bool {
        self.runs.iter().all(|r| r.kind == ChangeKind::Equal)
    }

    /// Total number of lines added.
    pub fn additions(&self) -> usize {
        self.count(ChangeKind::Added)
    }

    /// Total number of lines removed.
    pub fn deletions(&self) -> usize {
        self.count(ChangeKind::Removed)
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.runs
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.lines)
            .sum()
    }
}

/// Diff two byte slices.
///
/// UTF-8 content is diffed line by line. Anything else gets a synthetic
/// removed/added pair noting the byte sizes.
pub fn diff_blobs(old: &[u8], new: &[u8]) -> BlobDiff {
    match (std::str::from_utf8(old), std::str::from_utf8(new)) {
        (Ok(old), Ok(new)) => BlobDiff {
            runs: diff_text(old, new),
            binary: false,
        },
        _ => make_binary_diff(old, new),
    }
}

fn make_binary_diff(old: &[u8], new: &[u8]) -> BlobDiff {
    let describe = |data: &[u8]| format!("(binary content, {} bytes)\n", data.len());

    let mut runs = Vec::new();
    if old == new {
        runs.push(DiffRun::new(ChangeKind::Equal, describe(old), 1));
    } else {
        if !old.is_empty() {
            runs.push(DiffRun::new(ChangeKind::Removed, describe(old), 1));
        }
        if !new.is_empty() {
            runs.push(DiffRun::new(ChangeKind::Added, describe(new), 1));
        }
    }
    BlobDiff { runs, binary: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(runs: &[DiffRun]) -> Vec<ChangeKind> {
        runs.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn identical_text_is_one_equal_run() {
        let runs = diff_text("a\nb\nc\n", "a\nb\nc\n");
        assert_eq!(runs, vec![DiffRun::new(ChangeKind::Equal, "a\nb\nc\n", 3)]);
    }

    #[test]
    fn both_empty_has_no_runs() {
        assert!(diff_text("", "").is_empty());
    }

    #[test]
    fn inserted_middle_line() {
        let runs = diff_text("a\nb", "a\nx\nb");
        assert_eq!(
            runs,
            vec![
                DiffRun::new(ChangeKind::Equal, "a\n", 1),
                DiffRun::new(ChangeKind::Added, "x\n", 1),
                DiffRun::new(ChangeKind::Equal, "b", 1),
            ]
        );
    }

    #[test]
    fn empty_old_is_one_added_run() {
        let runs = diff_text("", "a\nb");
        assert_eq!(runs, vec![DiffRun::new(ChangeKind::Added, "a\nb", 2)]);
    }

    #[test]
    fn empty_new_is_one_removed_run() {
        let runs = diff_text("a\nb", "");
        assert_eq!(runs, vec![DiffRun::new(ChangeKind::Removed, "a\nb", 2)]);
    }

    #[test]
    fn disjoint_text_is_removed_then_added() {
        let runs = diff_text("a\nb\nc\n", "x\ny\n");
        assert_eq!(
            runs,
            vec![
                DiffRun::new(ChangeKind::Removed, "a\nb\nc\n", 3),
                DiffRun::new(ChangeKind::Added, "x\ny\n", 2),
            ]
        );
    }

    #[test]
    fn modified_line_between_context() {
        let runs = diff_text("a\nb\nc\n", "a\nB\nc\n");
        assert_eq!(
            kinds(&runs),
            vec![
                ChangeKind::Equal,
                ChangeKind::Removed,
                ChangeKind::Added,
                ChangeKind::Equal
            ]
        );
        assert_eq!(runs[1].text, "b\n");
        assert_eq!(runs[2].text, "B\n");
    }

    #[test]
    fn blob_diff_counts_lines() {
        let diff = diff_blobs(b"line1\nline2\nline3\n", b"line1\nchanged\nline3\nline4\n");
        assert!(!diff.binary);
        assert!(!diff.is_unchanged());
        assert_eq!(diff.deletions(), 1);
        assert_eq!(diff.additions(), 2);
    }

    #[test]
    fn identical_blobs_are_unchanged() {
        let diff = diff_blobs(b"same\n", b"same\n");
        assert!(diff.is_unchanged());
        assert_eq!(diff.additions(), 0);
        assert_eq!(diff.deletions(), 0);
    }

    #[test]
    fn binary_content_gets_size_summary() {
        let diff = diff_blobs(&[0xff, 0xfe, 0x00], b"text\n");
        assert!(diff.binary);
        assert_eq!(kinds(&diff.runs), vec![ChangeKind::Removed, ChangeKind::Added]);
        assert_eq!(diff.runs[0].text, "(binary content, 3 bytes)\n");
        assert_eq!(diff.runs[1].text, "(binary content, 5 bytes)\n");
    }

    #[test]
    fn identical_binary_is_unchanged() {
        let data = [0xffu8, 0x00, 0x80];
        let diff = diff_blobs(&data, &data);
        assert!(diff.binary);
        assert!(diff.is_unchanged());
    }

    fn join(runs: &[DiffRun], keep: ChangeKind) -> String {
        runs.iter()
            .filter(|r| r.kind == ChangeKind::Equal || r.kind == keep)
            .map(|r| r.text.as_str())
            .collect()
    }

    proptest! {
        #[test]
        fn runs_reconstruct_both_sides(
            old in proptest::collection::vec("[abc]{0,2}\n?", 0..12),
            new in proptest::collection::vec("[abc]{0,2}\n?", 0..12),
        ) {
            let old: String = old.concat();
            let new: String = new.concat();
            let runs = diff_text(&old, &new);

            prop_assert_eq!(join(&runs, ChangeKind::Removed), old);
            prop_assert_eq!(join(&runs, ChangeKind::Added), new);
            prop_assert!(runs.windows(2).all(|w| w[0].kind != w[1].kind));
            prop_assert!(runs.iter().all(|r| r.lines > 0));
        }
    }
}
