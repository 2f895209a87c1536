use lasso::Rodeo;
use unicode_width::UnicodeWidthStr as _;

use crate::{
	common::Span,
	frontend::{elaborate::ElaborationErrorKind, pretty::pretty_print},
	ir::syntax::Arena,
};

/// Renders a message about `span` followed by the offending line and a caret underline.
pub fn format_line_error(source: &str, span: Span, message: &str) -> String {
	const TAB_REPLACEMENT: &str = "   ";

	let line_count = source.split('\n').count();
	let line_number = span.begin.line.clamp(1, line_count);
	let line = source.split('\n').nth(line_number - 1).unwrap_or_default();

	let chars: Vec<char> = line.chars().collect();
	let begin = span.begin.column.saturating_sub(1).min(chars.len());
	let end = if span.end.line == span.begin.line { span.end.column.saturating_sub(1).clamp(begin, chars.len()) } else { chars.len() };
	let before: String = chars[..begin].iter().collect();
	let underlined: String = chars[begin..end].iter().collect();

	let visual_line = line.replace('\t', TAB_REPLACEMENT).trim_end().to_owned();
	let visual_offset = before.replace('\t', TAB_REPLACEMENT).width();
	let visual_width = underlined.replace('\t', TAB_REPLACEMENT).width().max(1);

	let displayed_line_number = line_number.to_string();
	let dummy_line_number = " ".repeat(displayed_line_number.len());
	let mut report = format!("[{}] error: {message}\n", span.begin);
	report.push_str(&format!("{} |\n", dummy_line_number));
	report.push_str(&format!("{} | {}\n", displayed_line_number, visual_line));
	report.push_str(&format!("{} | {}{}", dummy_line_number, " ".repeat(visual_offset), "^".repeat(visual_width)));
	report
}

pub fn display_error(kind: &ElaborationErrorKind, arena: &Arena, interner: &Rodeo) -> String {
	let print = |term| pretty_print(term, arena, interner);
	match *kind {
		ElaborationErrorKind::NotInScope(name) => format!("`{}` is not in scope", interner.resolve(&name)),
		ElaborationErrorKind::ExpectedReal { found } => format!("expected a term of type ℝ, found one of type {}", print(found)),
		ElaborationErrorKind::ExpectedFunction { found } => format!("expected a function, found a term of type {}", print(found)),
		ElaborationErrorKind::ExpectedType { found } => format!("expected a type, found a term of type {}", print(found)),
		ElaborationErrorKind::Mismatch { expected, found } =>
			format!("type mismatch\nexpected: {}\nfound: {}", print(expected), print(found)),
	}
}
