// Colored terminal output for comparisons and token dumps.
//
// Everything writes to an `impl Write` so the interactive loop can be
// driven from tests; main.rs passes stdout.

use std::io::{self, Write};

use colored::Colorize;

use crate::profile::ProfileRecord;
use crate::similarity::SimilarityResult;

/// Longest bio shown before truncating.
const BIO_PREVIEW_CHARS: usize = 300;

/// Print both bios, the scored result, and any follow relation.
pub fn write_comparison(
    out: &mut impl Write,
    a: &ProfileRecord,
    b: &ProfileRecord,
    result: &SimilarityResult,
) -> io::Result<()> {
    write_bio(out, a)?;
    writeln!(out)?;
    write_bio(out, b)?;
    writeln!(out)?;

    writeln!(out, "{}", colorize_score(result))?;

    if a.follows(b) {
        writeln!(out, "{} follows {}", a.handle(), b.handle())?;
    }
    if b.follows(a) {
        writeln!(out, "{} follows {}", b.handle(), a.handle())?;
    }
    Ok(())
}

fn write_bio(out: &mut impl Write, profile: &ProfileRecord) -> io::Result<()> {
    let name = profile.display_name().unwrap_or(profile.handle());
    writeln!(out, "{}", format!("User bio for {name}").bold())?;
    match profile.bio().filter(|bio| !bio.trim().is_empty()) {
        Some(bio) => writeln!(out, "{}", super::truncate_chars(bio, BIO_PREVIEW_CHARS)),
        None => writeln!(out, "{}", "(no bio)".dimmed()),
    }
}

/// Render the result, coloring the score line by strength.
fn colorize_score(result: &SimilarityResult) -> String {
    let score_line = format!("Similarity score: {:6.4}", result.score());
    let colored_line = if result.score() >= 0.5 {
        score_line.bright_green().bold()
    } else if result.score() > 0.0 {
        score_line.bright_yellow().bold()
    } else {
        score_line.dimmed()
    };
    format!("{colored_line}\n{}", result.justification())
}

/// Print tokens one per line with their position.
pub fn write_tokens(out: &mut impl Write, tokens: &[String]) -> io::Result<()> {
    for (i, token) in tokens.iter().enumerate() {
        writeln!(out, "  {:>3}. {}", i, token)?;
    }
    writeln!(out, "{}", format!("{} tokens", tokens.len()).dimmed())
}
