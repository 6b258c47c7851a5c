//! Whitespace-only HTML pretty-printer.
//!
//! Block elements get one line per tag with two-space indentation. Text
//! elements, `<title>`, `<script>`, `<style>` and `<noscript>` are kept on a
//! single line with their content untouched, so inline markup and embedded
//! payloads (boilerplate CSS, JSON) are never altered.

const INDENT: &str = "  ";

const VOID_TAGS: &[&str] = &["meta", "link", "source", "br", "img"];

/// Elements whose content is emitted verbatim on the opening line.
const UNFORMATTED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "span", "title", "script", "style", "noscript",
];

/// Elements whose content is raw text, not markup.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq)]
enum Token<'a> {
    Declaration(&'a str),
    Open { name: String, raw: &'a str },
    Close { name: String, raw: &'a str },
    Text(&'a str),
}

impl<'a> Token<'a> {
    fn raw(&self) -> &'a str {
        match self {
            Token::Declaration(raw) | Token::Text(raw) => *raw,
            Token::Open { raw, .. } | Token::Close { raw, .. } => *raw,
        }
    }
}

fn tag_name(raw: &str) -> String {
    raw.trim_start_matches(['<', '/'])
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// End (exclusive) of the tag starting at `start`, skipping quoted `>`.
fn tag_end(html: &str, start: usize) -> usize {
    let mut quote: Option<char> = None;
    for (offset, ch) in html[start..].char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '>') => return start + offset + 1,
            _ => {}
        }
    }
    html.len()
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        if !rest.starts_with('<') {
            let end = rest.find('<').map(|i| pos + i).unwrap_or(html.len());
            tokens.push(Token::Text(&html[pos..end]));
            pos = end;
            continue;
        }

        let end = tag_end(html, pos);
        let raw = &html[pos..end];
        if raw.starts_with("<!") {
            tokens.push(Token::Declaration(raw));
        } else if raw.starts_with("</") {
            tokens.push(Token::Close {
                name: tag_name(raw),
                raw,
            });
        } else {
            let name = tag_name(raw);
            let raw_text = RAW_TEXT_TAGS.contains(&name.as_str());
            let closing = format!("</{}", name);
            tokens.push(Token::Open { name, raw });

            if raw_text {
                let content_end = html[end..]
                    .find(&closing)
                    .map(|i| end + i)
                    .unwrap_or(html.len());
                if content_end > end {
                    tokens.push(Token::Text(&html[end..content_end]));
                }
                pos = content_end;
                continue;
            }
        }
        pos = end;
    }
    tokens
}

/// Index of the close token matching the open token at `open`.
fn matching_close(tokens: &[Token], open: usize, name: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::Open { name: n, .. } if n == name && !VOID_TAGS.contains(&name) => depth += 1,
            Token::Close { name: n, .. } if n == name => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn push_line(lines: &mut Vec<String>, depth: usize, line: &str) {
    lines.push(format!("{}{}", INDENT.repeat(depth), line));
}

/// Re-indents `html`. Only whitespace between tags changes.
pub fn pretty_print(html: &str) -> String {
    let tokens = tokenize(html);
    let mut lines: Vec<String> = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Declaration(raw) => push_line(&mut lines, depth, raw),
            Token::Text(raw) => {
                let text = raw.trim();
                if !text.is_empty() {
                    push_line(&mut lines, depth, text);
                }
            }
            Token::Close { raw, .. } => {
                depth = depth.saturating_sub(1);
                push_line(&mut lines, depth, raw);
            }
            Token::Open { name, raw } => {
                if VOID_TAGS.contains(&name.as_str()) {
                    push_line(&mut lines, depth, raw);
                } else if let Some(close) = UNFORMATTED_TAGS
                    .contains(&name.as_str())
                    .then(|| matching_close(&tokens, i, name))
                    .flatten()
                {
                    let line: String = tokens[i..=close].iter().map(Token::raw).collect();
                    push_line(&mut lines, depth, &line);
                    i = close;
                } else if matches!(tokens.get(i + 1), Some(Token::Close { name: n, .. }) if n == name)
                {
                    push_line(&mut lines, depth, &format!("{}{}", raw, tokens[i + 1].raw()));
                    i += 1;
                } else {
                    push_line(&mut lines, depth, raw);
                    depth += 1;
                }
            }
        }
        i += 1;
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
