use similar::{ChangeTag, TextDiff};

/// Context lines carried on each side of a change, matching the usual
/// unified-diff presentation.
const CONTEXT_LINES: usize = 3;

/// The result of diffing two revisions of a page's content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobDiff {
    /// The diff hunks.
    pub hunks: Vec<DiffHunk>,
    /// Total number of lines in the old content.
    pub old_lines: usize,
    /// Total number of lines in the new content.
    pub new_lines: usize,
}

impl BlobDiff {
    /// Whether the two revisions are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Lines added across all hunks.
    pub fn additions(&self) -> usize {
        self.count_lines(|l| matches!(l, DiffLine::Added(_)))
    }

    /// Lines removed across all hunks.
    pub fn deletions(&self) -> usize {
        self.count_lines(|l| matches!(l, DiffLine::Removed(_)))
    }

    fn count_lines(&self, pred: impl Fn(&DiffLine) -> bool) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| pred(l))
            .count()
    }
}

/// A contiguous region of changes in a diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffHunk {
    /// 1-based line where the hunk starts in the old content.
    pub old_start: usize,
    /// Lines of old content covered by the hunk.
    pub old_count: usize,
    /// 1-based line where the hunk starts in the new content.
    pub new_start: usize,
    /// Lines of new content covered by the hunk.
    pub new_count: usize,
    /// The individual diff lines in this hunk.
    pub lines: Vec<DiffLine>,
}

/// A single line in a diff hunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// Present in both revisions.
    Context(String),
    /// Added by the new revision.
    Added(String),
    /// Removed from the old revision.
    Removed(String),
}

/// Compute a line-by-line diff between two revisions of a blob.
///
/// Content is interpreted as UTF-8 text. When either side is not valid
/// UTF-8 (an image, say), the result is a single synthetic hunk summarizing
/// byte counts rather than a line diff.
pub fn diff_blobs(old: &[u8], new: &[u8]) -> BlobDiff {
    let (Ok(old_text), Ok(new_text)) = (std::str::from_utf8(old), std::str::from_utf8(new))
    else {
        return binary_summary(old, new);
    };

    let mut diff = BlobDiff {
        hunks: Vec::new(),
        old_lines: old_text.lines().count(),
        new_lines: new_text.lines().count(),
    };
    if old_text == new_text {
        return diff;
    }

    let text_diff = TextDiff::from_lines(old_text, new_text);
    for group in text_diff.grouped_ops(CONTEXT_LINES) {
        let Some(first_op) = group.first() else {
            continue;
        };
        let mut hunk = DiffHunk {
            old_start: first_op.old_range().start + 1,
            old_count: 0,
            new_start: first_op.new_range().start + 1,
            new_count: 0,
            lines: Vec::new(),
        };
        for change in group.iter().flat_map(|op| text_diff.iter_changes(op)) {
            let text = change.value().trim_end_matches('\n').to_string();
            let line = match change.tag() {
                ChangeTag::Equal => {
                    hunk.old_count += 1;
                    hunk.new_count += 1;
                    DiffLine::Context(text)
                }
                ChangeTag::Delete => {
                    hunk.old_count += 1;
                    DiffLine::Removed(text)
                }
                ChangeTag::Insert => {
                    hunk.new_count += 1;
                    DiffLine::Added(text)
                }
            };
            hunk.lines.push(line);
        }
        diff.hunks.push(hunk);
    }
    diff
}

/// One synthetic hunk standing in for content we cannot split into lines.
fn binary_summary(old: &[u8], new: &[u8]) -> BlobDiff {
    let mut hunk = DiffHunk {
        old_start: 1,
        old_count: 0,
        new_start: 1,
        new_count: 0,
        lines: Vec::new(),
    };
    if !old.is_empty() {
        hunk.old_count = 1;
        hunk.lines
            .push(DiffLine::Removed(format!("(binary content, {} bytes)", old.len())));
    }
    if !new.is_empty() {
        hunk.new_count = 1;
        hunk.lines
            .push(DiffLine::Added(format!("(binary content, {} bytes)", new.len())));
    }
    BlobDiff {
        hunks: vec![hunk],
        old_lines: 0,
        new_lines: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_page_diffs_empty() {
        let page = b"# Home\n\nwelcome\n";
        let diff = diff_blobs(page, page);
        assert!(diff.is_empty());
        assert_eq!((diff.additions(), diff.deletions()), (0, 0));
        assert_eq!(diff.old_lines, 3);
    }

    #[test]
    fn appending_a_section_counts_as_additions_only() {
        let diff = diff_blobs(
            b"# Home\n\nwelcome\n",
            b"# Home\n\nwelcome\n\n## See also\n",
        );
        assert!(diff.additions() >= 1);
        assert_eq!(diff.deletions(), 0);
        assert_eq!(diff.new_lines, 5);
    }

    #[test]
    fn dropping_a_line_counts_as_deletions_only() {
        let diff = diff_blobs(b"intro\nstale note\noutro\n", b"intro\noutro\n");
        assert!(diff.deletions() >= 1);
        assert_eq!(diff.additions(), 0);
    }

    #[test]
    fn rewording_produces_a_paired_remove_and_add() {
        let diff = diff_blobs(b"hello world\n", b"hello wiki\n");
        assert!(diff.additions() >= 1);
        assert!(diff.deletions() >= 1);
        // One line replaced: the hunk covers the same span on both sides.
        assert_eq!(diff.hunks[0].old_count, diff.hunks[0].new_count);
    }

    #[test]
    fn page_creation_and_deletion_degrade_cleanly() {
        let created = diff_blobs(b"", b"brand new page\n");
        assert!(created.additions() >= 1);
        assert_eq!(created.deletions(), 0);

        let deleted = diff_blobs(b"old page\n", b"");
        assert!(deleted.deletions() >= 1);
        assert_eq!(deleted.additions(), 0);
    }

    #[test]
    fn binary_revisions_summarize_byte_counts() {
        let diff = diff_blobs(&[0xFF, 0xD8, 0xFF], &[0x89, 0x50, 0x4E, 0x47]);
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(
            diff.hunks[0].lines,
            vec![
                DiffLine::Removed("(binary content, 3 bytes)".into()),
                DiffLine::Added("(binary content, 4 bytes)".into()),
            ]
        );
    }

    #[test]
    fn changes_carry_surrounding_context() {
        let old = b"a\nb\nc\nd\ne\nf\ng\nh\n";
        let new = b"a\nb\nc\nd\nEDIT\nf\ng\nh\n";

        let diff = diff_blobs(old, new);
        let hunk = &diff.hunks[0];
        assert!(hunk.old_start >= 1 && hunk.new_start >= 1);
        assert!(
            hunk.lines.iter().any(|l| matches!(l, DiffLine::Context(_))),
            "hunk should include context lines"
        );
    }

    #[test]
    fn far_apart_edits_split_into_hunks() {
        let old = b"1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n11\n12\n13\n14\n15\n16\n17\n18\n19\n20\n";
        let new = b"ONE\n2\n3\n4\n5\n6\n7\n8\n9\n10\n11\n12\n13\n14\n15\n16\n17\n18\n19\nTWENTY\n";

        let diff = diff_blobs(old, new);
        assert_eq!(diff.hunks.len(), 2);
        assert_eq!(diff.additions(), 2);
        assert_eq!(diff.deletions(), 2);
    }
}
