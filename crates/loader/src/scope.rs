//! Selector scoping.
//!
//! [`scope_stylesheet`] rewrites a stylesheet so every rule only matches
//! inside `#target`. It is a single tokenizing pass, not a CSS parser: it
//! tracks brace depth and skips string literals and comments, so braces
//! inside `content: "}"` or `/* } */` never end a rule.
//!
//! [`scope_query`] is the matching rule for the accessor handed to scripts.

/// At-rules whose blocks hold ordinary style rules.
const GROUPING_AT_RULES: &[&str] = &["media", "supports", "layer", "container", "document", "scope"];

/// Prefixes every selector of every style rule in `css` with `#target`.
///
/// Statement at-rules (`@import`) and non-grouping block at-rules
/// (`@font-face`, `@keyframes`) are copied unchanged; rules nested in
/// grouping at-rules (`@media`, `@supports`) are scoped.
pub fn scope_stylesheet(css: &str, target: &str) -> String {
	let mut scoper = Scoper {
		src: css,
		pos: 0,
		out: String::with_capacity(css.len() + css.len() / 4),
		prefix: format!("#{target} "),
	};
	scoper.rule_list(false);
	scoper.out
}

/// Scopes a selector the way a script's accessor does.
///
/// Markup literals (`<div>`) and bare id selectors (`#menu`) pass through;
/// anything else is searched inside `#target` only.
pub fn scope_query(target: &str, selector: &str) -> String {
	let trimmed = selector.trim_start();
	let markup = trimmed.starts_with('<') && trimmed.len() >= 3 && trimmed.as_bytes()[2..].contains(&b'>');
	let bare_id = selector
		.strip_prefix('#')
		.is_some_and(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
	if markup || bare_id {
		return selector.to_string();
	}
	if target.starts_with('#') {
		format!("{target} {selector}")
	} else {
		format!("#{target} {selector}")
	}
}

/// How a prelude scan ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
	OpenBrace,
	Semicolon,
	CloseBrace,
	Eof,
}

struct Scoper<'a> {
	src: &'a str,
	pos: usize,
	out: String,
	prefix: String,
}

impl Scoper<'_> {
	fn bytes(&self) -> &[u8] {
		self.src.as_bytes()
	}

	fn peek(&self) -> Option<u8> {
		self.bytes().get(self.pos).copied()
	}

	fn copy_to(&mut self, end: usize) {
		self.out.push_str(&self.src[self.pos..end]);
		self.pos = end;
	}

	/// Processes rules until EOF, or until the `}` closing a grouping
	/// at-rule when `nested`. The closing brace is left for the caller.
	fn rule_list(&mut self, nested: bool) {
		loop {
			let end = skip_trivia(self.bytes(), self.pos);
			self.copy_to(end);
			match self.peek() {
				None => return,
				Some(b'}') if nested => return,
				Some(b'}') | Some(b';') => self.copy_to(self.pos + 1),
				Some(b'@') => self.at_rule(),
				Some(_) => self.style_rule(),
			}
		}
	}

	fn style_rule(&mut self) {
		let (end, stop) = prelude_end(self.bytes(), self.pos);
		if stop != Stop::OpenBrace {
			// Not a rule: copy it and let the rule list deal with the stop.
			self.copy_to(end);
			return;
		}
		let scoped = self.scope_selector_list(&self.src[self.pos..end]);
		self.out.push_str(&scoped);
		self.pos = end;
		let close = block_end(self.bytes(), self.pos);
		self.copy_to(close);
	}

	fn at_rule(&mut self) {
		let name_start = self.pos + 1;
		let name_end = self.bytes()[name_start..]
			.iter()
			.position(|b| !(b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_'))
			.map_or(self.src.len(), |n| name_start + n);
		let name = self.src[name_start..name_end].to_ascii_lowercase();
		let name = strip_vendor_prefix(&name);
		let grouping = GROUPING_AT_RULES.contains(&name);

		let (end, stop) = prelude_end(self.bytes(), self.pos);
		match stop {
			Stop::Semicolon => self.copy_to(end + 1),
			Stop::OpenBrace if grouping => {
				self.copy_to(end + 1);
				self.rule_list(true);
				if self.peek() == Some(b'}') {
					self.copy_to(self.pos + 1);
				}
			}
			Stop::OpenBrace => {
				let close = block_end(self.bytes(), end);
				self.copy_to(close);
			}
			Stop::CloseBrace | Stop::Eof => self.copy_to(end),
		}
	}

	fn scope_selector_list(&self, list: &str) -> String {
		let bytes = list.as_bytes();
		let mut parts = Vec::new();
		let mut start = 0;
		let mut depth = 0usize;
		let mut i = 0;
		while i < bytes.len() {
			match bytes[i] {
				b'"' | b'\'' => {
					i = skip_string(bytes, i);
					continue;
				}
				b'/' if bytes.get(i + 1) == Some(&b'*') => {
					i = skip_comment(bytes, i);
					continue;
				}
				b'(' | b'[' => depth += 1,
				b')' | b']' => depth = depth.saturating_sub(1),
				b',' if depth == 0 => {
					parts.push(&list[start..i]);
					start = i + 1;
				}
				_ => {}
			}
			i += 1;
		}
		parts.push(&list[start..]);

		let mut scoped = String::with_capacity(list.len() + parts.len() * self.prefix.len());
		for (n, part) in parts.iter().enumerate() {
			if n > 0 {
				scoped.push(',');
			}
			let body = part.trim_start();
			if body.is_empty() {
				scoped.push_str(part);
				continue;
			}
			scoped.push_str(&part[..part.len() - body.len()]);
			scoped.push_str(&self.prefix);
			scoped.push_str(body);
		}
		scoped
	}
}

fn strip_vendor_prefix(name: &str) -> &str {
	if let Some(rest) = name.strip_prefix('-') {
		if let Some(dash) = rest.find('-') {
			return &rest[dash + 1..];
		}
	}
	name
}

/// Skips whitespace and comments.
fn skip_trivia(bytes: &[u8], mut i: usize) -> usize {
	loop {
		match bytes.get(i) {
			Some(b) if b.is_ascii_whitespace() => i += 1,
			Some(b'/') if bytes.get(i + 1) == Some(&b'*') => i = skip_comment(bytes, i),
			_ => return i,
		}
	}
}

/// `i` is at an opening quote. Returns the index past the closing quote.
fn skip_string(bytes: &[u8], i: usize) -> usize {
	let quote = bytes[i];
	let mut j = i + 1;
	while j < bytes.len() {
		match bytes[j] {
			b'\\' => j += 2,
			b if b == quote => return j + 1,
			_ => j += 1,
		}
	}
	bytes.len()
}

/// `i` is at `/*`. Returns the index past `*/`.
fn skip_comment(bytes: &[u8], i: usize) -> usize {
	let mut j = i + 2;
	while j + 1 < bytes.len() {
		if bytes[j] == b'*' && bytes[j + 1] == b'/' {
			return j + 2;
		}
		j += 1;
	}
	bytes.len()
}

/// Finds where a rule or at-rule prelude ends: the first `{`, `;` or `}`
/// outside strings, comments, parentheses and brackets.
fn prelude_end(bytes: &[u8], mut i: usize) -> (usize, Stop) {
	let mut depth = 0usize;
	while i < bytes.len() {
		match bytes[i] {
			b'"' | b'\'' => {
				i = skip_string(bytes, i);
				continue;
			}
			b'/' if bytes.get(i + 1) == Some(&b'*') => {
				i = skip_comment(bytes, i);
				continue;
			}
			b'(' | b'[' => depth += 1,
			b')' | b']' => depth = depth.saturating_sub(1),
			b'{' if depth == 0 => return (i, Stop::OpenBrace),
			b';' if depth == 0 => return (i, Stop::Semicolon),
			b'}' if depth == 0 => return (i, Stop::CloseBrace),
			_ => {}
		}
		i += 1;
	}
	(bytes.len(), Stop::Eof)
}

/// `open` is at `{`. Returns the index past its matching `}`.
fn block_end(bytes: &[u8], open: usize) -> usize {
	let mut depth = 0usize;
	let mut i = open;
	while i < bytes.len() {
		match bytes[i] {
			b'"' | b'\'' => {
				i = skip_string(bytes, i);
				continue;
			}
			b'/' if bytes.get(i + 1) == Some(&b'*') => {
				i = skip_comment(bytes, i);
				continue;
			}
			b'{' => depth += 1,
			b'}' => {
				depth -= 1;
				if depth == 0 {
					return i + 1;
				}
			}
			_ => {}
		}
		i += 1;
	}
	bytes.len()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn scopes_each_top_level_rule() {
		assert_eq!(scope_stylesheet("a{color:red}b{color:blue}", "x"), "#x a{color:red}#x b{color:blue}");
	}

	#[test]
	fn keeps_whitespace_layout() {
		assert_eq!(scope_stylesheet("a {\n  top: 0;\n}\n\nb > c {}\n", "nav"), "#nav a {\n  top: 0;\n}\n\n#nav b > c {}\n");
	}

	#[test]
	fn scopes_every_selector_in_a_list() {
		assert_eq!(scope_stylesheet("h1, h2,h3 { margin: 0 }", "x"), "#x h1, #x h2,#x h3 { margin: 0 }");
		assert_eq!(scope_stylesheet("a:is(b, c){}", "x"), "#x a:is(b, c){}");
	}

	#[test]
	fn braces_in_strings_and_comments_do_not_end_rules() {
		assert_eq!(
			scope_stylesheet("a::after{content:\"}\"}/* } */b[title='{']{}", "x"),
			"#x a::after{content:\"}\"}/* } */#x b[title='{']{}"
		);
	}

	#[test]
	fn grouping_at_rules_scope_their_contents() {
		assert_eq!(
			scope_stylesheet("@media (max-width: 600px) { a { x: y } b, c { z: w } }", "x"),
			"@media (max-width: 600px) { #x a { x: y } #x b, #x c { z: w } }"
		);
		assert_eq!(scope_stylesheet("@-moz-document url-prefix(){a{}}", "x"), "@-moz-document url-prefix(){#x a{}}");
	}

	#[test]
	fn other_at_rules_pass_through() {
		let css = "@import url(\"a;b.css\");@charset \"utf-8\";@keyframes spin{from{top:0}to{top:1px}}@font-face{font-family:x}a{}";
		assert_eq!(
			scope_stylesheet(css, "x"),
			"@import url(\"a;b.css\");@charset \"utf-8\";@keyframes spin{from{top:0}to{top:1px}}@font-face{font-family:x}#x a{}"
		);
	}

	#[test]
	fn malformed_input_is_copied() {
		assert_eq!(scope_stylesheet("a{color:red", "x"), "#x a{color:red");
		assert_eq!(scope_stylesheet("}a{}", "x"), "}#x a{}");
		assert_eq!(scope_stylesheet("dangling", "x"), "dangling");
		assert_eq!(scope_stylesheet("", "x"), "");
	}

	#[test]
	fn non_ascii_text_survives() {
		assert_eq!(scope_stylesheet("a::before{content:'→}'}é{}", "x"), "#x a::before{content:'→}'}#x é{}");
	}

	#[test]
	fn query_scoping() {
		assert_eq!(scope_query("menu", ".item"), "#menu .item");
		assert_eq!(scope_query("#menu", "li > a"), "#menu li > a");
		assert_eq!(scope_query("menu", "#other"), "#other");
		assert_eq!(scope_query("menu", "<li>"), "<li>");
		assert_eq!(scope_query("menu", "  <p class=\"x\">text</p>"), "  <p class=\"x\">text</p>");
		assert_eq!(scope_query("menu", "#other .child"), "#menu #other .child");
		assert_eq!(scope_query("menu", "<>"), "#menu <>");
	}
}
