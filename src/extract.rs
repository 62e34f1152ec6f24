// src/extract.rs

//! Code-block extraction from literate Markdown documents.
//!
//! Parsing follows CommonMark via `pulldown-cmark`. Two kinds of block count
//! as code:
//!
//! - fenced blocks (three or more backticks or tildes). The first word of
//!   the info string is the block's language.
//! - indented blocks (four spaces or a tab), which cannot interrupt a
//!   paragraph. These can be switched off.
//!
//! CommonMark lets an unclosed fence run to the end of the document; here
//! that is reported as [`ExtractError::UnterminatedFence`] since it almost
//! always swallows the rest of a tutorial by accident.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("code fence opened on line {line} is never closed")]
    UnterminatedFence { line: usize },
}

/// One extracted block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language from the fence info string, if any.
    pub lang: Option<String>,
    /// 1-based line where the block starts.
    pub line: usize,
    /// Block body without the fences and without the final newline.
    pub content: String,
}

/// Extraction knobs, usually taken from `[generate]`.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Keep only fenced blocks in one of these languages (case-insensitive).
    /// Empty keeps all. Unlabelled and indented blocks are always kept.
    pub languages: Vec<String>,
    pub indented_blocks: bool,
}

struct OpenBlock {
    lang: Option<String>,
    fenced: bool,
    line: usize,
    span: Range<usize>,
    body: String,
}

/// `python` from `python title="x"`, `{.python}` or `.python`.
fn info_lang(info: &str) -> Option<String> {
    info.split_whitespace()
        .next()
        .map(|word| {
            word.trim_start_matches('{')
                .trim_end_matches('}')
                .trim_start_matches('.')
        })
        .filter(|word| !word.is_empty())
        .map(str::to_string)
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

/// Whether the source of a fenced block ends with a matching closing fence.
fn fence_is_closed(source: &str) -> bool {
    let mut lines = source.trim_end_matches(['\n', '\r']).lines();
    let Some(opening) = lines.next().map(str::trim_start) else {
        return false;
    };
    let Some(ch) = opening.chars().next().filter(|c| *c == '`' || *c == '~') else {
        return false;
    };
    let open_len = opening.chars().take_while(|c| *c == ch).count();

    // The closing fence may sit behind block quote markers.
    match lines.last() {
        Some(last) => {
            let closing = last.trim_start_matches(|c: char| c == '>' || c.is_whitespace()).trim_end();
            closing.chars().all(|c| c == ch) && closing.chars().count() >= open_len
        }
        None => false,
    }
}

fn wants_lang(opts: &ExtractOptions, lang: Option<&str>) -> bool {
    match lang {
        None => true,
        Some(_) if opts.languages.is_empty() => true,
        Some(lang) => opts.languages.iter().any(|l| l.eq_ignore_ascii_case(lang)),
    }
}

/// Extract every code block from `text`, in document order.
pub fn extract_code_blocks(
    text: &str,
    opts: &ExtractOptions,
) -> Result<Vec<CodeBlock>, ExtractError> {
    let mut blocks = Vec::new();
    let mut open: Option<OpenBlock> = None;

    for (event, span) in Parser::new(text).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let (lang, fenced) = match kind {
                    CodeBlockKind::Fenced(info) => (info_lang(&info), true),
                    CodeBlockKind::Indented => (None, false),
                };
                open = Some(OpenBlock {
                    lang,
                    fenced,
                    line: line_of(text, span.start),
                    span,
                    body: String::new(),
                });
            }
            Event::Text(chunk) => {
                if let Some(block) = open.as_mut() {
                    block.body.push_str(&chunk);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                let Some(block) = open.take() else {
                    continue;
                };
                if block.fenced && !fence_is_closed(&text[block.span.clone()]) {
                    return Err(ExtractError::UnterminatedFence { line: block.line });
                }
                if !block.fenced && !opts.indented_blocks {
                    continue;
                }
                if !wants_lang(opts, block.lang.as_deref()) {
                    continue;
                }
                let content = block.body.strip_suffix('\n').unwrap_or(&block.body).to_string();
                blocks.push(CodeBlock {
                    lang: block.lang,
                    line: block.line,
                    content,
                });
            }
            _ => {}
        }
    }

    Ok(blocks)
}

/// Render blocks into one script: bodies separated by a blank line, with a
/// trailing newline. Returns `None` when there is nothing to write.
pub fn render_blocks(blocks: &[CodeBlock]) -> Option<String> {
    if blocks.is_empty() {
        return None;
    }
    let mut out = blocks
        .iter()
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    out.push('\n');
    Some(out)
}
