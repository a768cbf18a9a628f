//! Structured views over raw worker output

use crate::dto::{DependencyToken, TaggedToken};
use crate::error::{ApiError, Result};
use farasa_engine::Task;

/// Undo segmentation marks in one word
pub fn desegment_word(word: &str) -> String {
    let mut joined = word.replace("ل+ال+", "لل");
    if !word.contains("ال+ال") {
        joined = joined.replace("ل+ال", "لل");
    }
    joined.replace('+', "").replace("للل", "لل")
}

/// Undo segmentation marks in every `separator`-delimited word, joining with spaces
pub fn desegment(text: &str, separator: &str) -> String {
    text.split(separator)
        .map(desegment_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse slash-delimited POS tagger output.
///
/// The first and last whitespace-separated items mark the start and end of
/// the sentence and are skipped. Items without a slash are sub-tokens that
/// wait for the next single-slash item, whose tag holds one `+`-separated
/// tag per pending sub-token. Items with several slashes (dates, fractions)
/// take the tag after the last slash.
pub fn parse_tagged(tagged_text: &str, combine_subtokens: bool) -> Result<Vec<TaggedToken>> {
    let items: Vec<&str> = tagged_text.split_whitespace().collect();
    let inner = match items.len() {
        0..=2 => &[][..],
        n => &items[1..n - 1],
    };

    let mut tokens = Vec::new();
    let mut pending: Vec<&str> = Vec::new();
    for item in inner {
        match item.matches('/').count() {
            0 => pending.push(item),
            1 => {
                let (token, tag) = item.split_once('/').unwrap_or((item, ""));
                if pending.is_empty() {
                    tokens.push(TaggedToken::new(token, tag));
                    continue;
                }
                pending.push(token);
                let tags: Vec<&str> = tag.split('+').collect();
                if tags.len() != pending.len() {
                    return Err(ApiError::Parse {
                        task: Task::Pos,
                        reason: format!(
                            "{} sub-tokens but {} tags in '{item}'",
                            pending.len(),
                            tags.len()
                        ),
                    });
                }
                let mut pairs = pending.drain(..).zip(tags);
                if combine_subtokens {
                    if let Some((first_token, first_tag)) = pairs.next() {
                        let mut combined = TaggedToken::new(first_token, first_tag);
                        for (token, tag) in pairs {
                            combined.push(token, tag);
                        }
                        tokens.push(combined);
                    }
                } else {
                    tokens.extend(pairs.map(|(token, tag)| TaggedToken::new(token, tag)));
                }
            }
            _ => {
                let (token, tag) = item.rsplit_once('/').unwrap_or((item, ""));
                tokens.push(TaggedToken::new(token, tag));
            }
        }
    }
    Ok(tokens)
}

/// Parse tab-separated dependency parser output into sentences.
///
/// Rows are `index, word, lemma, pos, xpos, morph..., head, relation`.
/// Blank lines separate sentences; heads resolve within their sentence.
pub fn parse_dependencies(output: &str) -> Result<Vec<Vec<DependencyToken>>> {
    let mut sentences = Vec::new();
    let mut current = Vec::new();
    for row in output.lines().map(str::trim_end) {
        if row.is_empty() {
            if !current.is_empty() {
                sentences.push(resolve_heads(std::mem::take(&mut current))?);
            }
            continue;
        }
        current.push(parse_row(row)?);
    }
    if !current.is_empty() {
        sentences.push(resolve_heads(current)?);
    }
    Ok(sentences)
}

fn parse_row(row: &str) -> Result<DependencyToken> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < 7 {
        return Err(malformed(format!(
            "expected at least 7 columns, got {} in '{row}'",
            fields.len()
        )));
    }
    let n = fields.len();
    let index = parse_position(fields[0], row)?;
    let head = parse_position(fields[n - 2], row);
    let relation = fields[n - 1];

    let (dep, head_index) = if relation == "---" {
        ("root".to_string(), index)
    } else {
        (relation.to_lowercase(), head?)
    };

    Ok(DependencyToken {
        index,
        text: fields[1].to_string(),
        lemma: fields[2].to_string(),
        pos: fields[3].to_uppercase(),
        xpos: fields[4].to_string(),
        morph: fields[5..n - 2].iter().map(|m| m.to_string()).collect(),
        head_index,
        head: String::new(),
        dep,
    })
}

/// One-based column value to zero-based position
fn parse_position(field: &str, row: &str) -> Result<usize> {
    field
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| malformed(format!("invalid position '{field}' in '{row}'")))
}

fn resolve_heads(mut tokens: Vec<DependencyToken>) -> Result<Vec<DependencyToken>> {
    let heads = tokens
        .iter()
        .map(|token| {
            tokens
                .get(token.head_index)
                .map(|head| head.text.clone())
                .ok_or_else(|| {
                    malformed(format!(
                        "token {} points at missing head {}",
                        token.index + 1,
                        token.head_index + 1
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;
    for (token, head) in tokens.iter_mut().zip(heads) {
        token.head = head;
    }
    Ok(tokens)
}

fn malformed(reason: String) -> ApiError {
    ApiError::Parse {
        task: Task::DepParse,
        reason,
    }
}
