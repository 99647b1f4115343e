//! Cosmetic passes applied to formatted output.
//!
//! The formatter produces structurally correct output; these byte-level
//! passes take care of presentation details that are easier to enforce on
//! the finished text: comment spacing, the space before `/>`, single-line
//! comment normalization and CRLF line endings. [`apply`] runs all of them
//! in order.

use memchr::{memchr, memmem};

/// Runs every pass over `input` and returns the finished bytes.
pub fn apply(input: &[u8]) -> Vec<u8> {
    let buf = trim_prologue(input);
    let buf = space_comment_after_tag(&buf);
    let buf = space_before_self_close(&buf);
    let buf = normalize_single_line_comments(&buf);
    normalize_line_endings(&buf)
}

/// Drops everything before the first `<`, removing byte order marks and
/// stray prologue whitespace. Input without any `<` is returned unchanged.
pub fn trim_prologue(input: &[u8]) -> Vec<u8> {
    match memchr(b'<', input) {
        Some(start) => input[start..].to_vec(),
        None => input.to_vec(),
    }
}

/// Rewrites `>\t<!--` and `><!--` to `> <!--`, so a comment trailing an
/// element on the same line is separated by exactly one space.
pub fn space_comment_after_tag(input: &[u8]) -> Vec<u8> {
    let buf = replace_all(input, b">\t<!--", b"> <!--");
    replace_all(&buf, b"><!--", b"> <!--")
}

/// Ensures every `/>` is preceded by a space. A `"` keeps its spacing as
/// produced by the quote pass; a single quote does not exempt.
pub fn space_before_self_close(input: &[u8]) -> Vec<u8> {
    let buf = replace_all(input, b"\"/>", b"\" />");
    let mut out = Vec::with_capacity(buf.len());
    let mut rest: &[u8] = &buf;
    while let Some(i) = memmem::find(rest, b"/>") {
        out.extend_from_slice(&rest[..i]);
        let needs_space = !matches!(out.last(), None | Some(&b' ') | Some(&b'"'));
        if needs_space {
            out.push(b' ');
        }
        out.extend_from_slice(b"/>");
        rest = &rest[i + 2..];
    }
    out.extend_from_slice(rest);
    out
}

/// Re-wraps every comment that fits on one line as `<!-- body -->`: the
/// body is trimmed, internal runs of blanks collapse to single spaces, and
/// an empty body becomes `<!-- -->`. Multi-line comments pass through.
pub fn normalize_single_line_comments(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = memmem::find(rest, b"<!--") {
        out.extend_from_slice(&rest[..start]);
        let tail = &rest[start..];
        match memmem::find(&tail[4..], b"-->") {
            Some(len) => {
                let body = &tail[4..4 + len];
                if body.iter().any(|&b| b == b'\r' || b == b'\n') {
                    out.extend_from_slice(&tail[..4 + len + 3]);
                } else {
                    out.extend_from_slice(b"<!--");
                    let collapsed = collapse_blanks(body);
                    if collapsed.is_empty() {
                        out.extend_from_slice(b" ");
                    } else {
                        out.push(b' ');
                        out.extend_from_slice(&collapsed);
                        out.push(b' ');
                    }
                    out.extend_from_slice(b"-->");
                }
                rest = &tail[4 + len + 3..];
            }
            None => {
                // Unterminated comment: keep the rest as it is.
                out.extend_from_slice(tail);
                return out;
            }
        }
    }
    out.extend_from_slice(rest);
    out
}

/// Normalizes all line endings to CRLF: a lone CR or a lone LF becomes
/// CRLF, existing CRLF pairs are kept.
pub fn normalize_line_endings(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len() + input.len() / 16);
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'\r' => {
                out.extend_from_slice(b"\r\n");
                if input.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => out.extend_from_slice(b"\r\n"),
            b => out.push(b),
        }
        i += 1;
    }
    out
}

/// Trims surrounding blanks and collapses internal runs of blanks to
/// single spaces.
fn collapse_blanks(body: &[u8]) -> Vec<u8> {
    let mut collapsed = Vec::with_capacity(body.len());
    let mut in_run = true;
    for &b in body {
        if b == b' ' || b == b'\t' {
            if !in_run {
                collapsed.push(b' ');
                in_run = true;
            }
        } else {
            collapsed.push(b);
            in_run = false;
        }
    }
    while collapsed.last() == Some(&b' ') {
        collapsed.pop();
    }
    collapsed
}

fn replace_all(input: &[u8], needle: &[u8], with: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut rest = input;
    while let Some(i) = memmem::find(rest, needle) {
        out.extend_from_slice(&rest[..i]);
        out.extend_from_slice(with);
        rest = &rest[i + needle.len()..];
    }
    out.extend_from_slice(rest);
    out
}
