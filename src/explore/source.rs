//! Line model for the source panel.

/// One display line of a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine<'a> {
	/// 1-indexed line number.
	pub number: u32,
	/// Line text without its terminator.
	pub text: &'a str,
	/// Whether this is the selected node's line.
	pub highlighted: bool,
}

/// Split `content` into numbered lines, marking `highlight` when it is in
/// range. An out-of-range line (e.g. from another file) marks nothing.
pub fn source_lines(content: &str, highlight: Option<u32>) -> Vec<SourceLine<'_>> {
	content
		.lines()
		.zip(1u32..)
		.map(|(text, number)| SourceLine {
			number,
			text,
			highlighted: highlight == Some(number),
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use test_case::test_case;

	use super::*;

	fn highlighted(lines: &[SourceLine<'_>]) -> Vec<u32> {
		lines.iter().filter(|l| l.highlighted).map(|l| l.number).collect()
	}

	#[test]
	fn lines_are_numbered_from_one() {
		let lines = source_lines("package metric\n\nfunc Gather() {}\n", None);
		assert_eq!(
			lines.iter().map(|l| (l.number, l.text)).collect::<Vec<_>>(),
			vec![(1, "package metric"), (2, ""), (3, "func Gather() {}")]
		);
	}

	#[test_case(Some(2), vec![2] ; "in range")]
	#[test_case(Some(1), vec![1] ; "first line")]
	#[test_case(Some(3), vec![3] ; "last line")]
	#[test_case(Some(0), vec![] ; "zero")]
	#[test_case(Some(120), vec![] ; "past the end")]
	#[test_case(None, vec![] ; "no line")]
	fn at_most_one_line_is_highlighted(line: Option<u32>, expected: Vec<u32>) {
		let lines = source_lines("a\nb\nc", line);
		assert_eq!(lines.len(), 3);
		assert_eq!(highlighted(&lines), expected);
	}

	#[test]
	fn crlf_terminators_are_stripped() {
		let lines = source_lines("a\r\nb\r\n", Some(2));
		assert_eq!(lines[1].text, "b");
		assert!(lines[1].highlighted);
	}

	#[test]
	fn empty_content_has_no_lines() {
		assert!(source_lines("", Some(1)).is_empty());
	}
}
