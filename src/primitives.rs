//! String primitives shared by both patch-matching strategies: Levenshtein
//! distance, indentation extraction, and dedent.

/// Levenshtein edit distance between two strings, operating on code points
/// (not bytes), so multi-byte characters count as a single edit unit.
pub fn levenshtein(a: &str, b: &str) -> usize {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();

	if a.is_empty() {
		return b.len();
	}
	if b.is_empty() {
		return a.len();
	}

	let mut prev: Vec<usize> = (0..=b.len()).collect();
	let mut curr = vec![0usize; b.len() + 1];

	for i in 1..=a.len() {
		curr[0] = i;
		for j in 1..=b.len() {
			let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
			curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
		}
		std::mem::swap(&mut prev, &mut curr);
	}

	prev[b.len()]
}

/// Longest prefix of `line` consisting only of space or horizontal tab.
pub fn leading_indent(line: &str) -> &str {
	let end = line
		.char_indices()
		.find(|(_, c)| *c != ' ' && *c != '\t')
		.map(|(idx, _)| idx)
		.unwrap_or(line.len());
	&line[..end]
}

/// Shortest `leading_indent` among the non-blank lines of `text`; empty if
/// `text` has no non-blank line.
pub fn common_indent(text: &str) -> String {
	let mut shortest: Option<&str> = None;

	for line in text.split('\n') {
		if line.trim().is_empty() {
			continue;
		}
		let indent = leading_indent(line);
		shortest = match shortest {
			Some(s) if s.chars().count() <= indent.chars().count() => Some(s),
			_ => Some(indent),
		};
	}

	shortest.unwrap_or("").to_string()
}

/// Strips `common_indent(text)` from every line that begins with it; other
/// lines are left unchanged.
pub fn dedent(text: &str) -> String {
	let indent = common_indent(text);
	if indent.is_empty() {
		return text.to_string();
	}

	text.split('\n')
		.map(|line| line.strip_prefix(indent.as_str()).unwrap_or(line))
		.collect::<Vec<_>>()
		.join("\n")
}

/// Strips a trailing `\r` from every line, normalizing `\r\n` patch content
/// to `\n` without touching the source line view.
pub fn strip_crlf(text: &str) -> String {
	if !text.contains('\r') {
		return text.to_string();
	}
	text.replace("\r\n", "\n").replace('\r', "\n")
}
