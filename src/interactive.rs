// Interactive comparison loop.
//
// Prompts for two handles, fetches both profiles, prints the comparison,
// and offers another round. A handle that fails to fetch is asked for
// again without losing the other one. End of input exits cleanly.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::warn;

use crate::output::terminal::write_comparison;
use crate::profile::ProfileRecord;
use crate::similarity::compare;
use crate::source::{normalize_handle, ProfileSource};
use crate::text::Tokenizer;

const INTRO: &str = "\nThis will compute the similarity between two Bluesky users \
on a scale of zero (completely distinct) to 1 (identical).\n";

/// Run the prompt loop until the user declines another pair or input ends.
pub async fn run<R: BufRead, W: Write>(
    source: &dyn ProfileSource,
    tokenizer: &Tokenizer,
    mut input: R,
    mut out: W,
) -> Result<()> {
    writeln!(out, "{INTRO}")?;

    loop {
        let Some(first) = prompt_profile(source, "first", &mut input, &mut out).await? else {
            break;
        };
        let Some(second) = prompt_profile(source, "second", &mut input, &mut out).await? else {
            break;
        };

        writeln!(out, "\nComputing similarity...\n")?;
        let result = compare(&first, &second, tokenizer);
        write_comparison(&mut out, &first, &second, &result)?;

        writeln!(out, "\n\nTry another pair? (Y/N)")?;
        match read_line(&mut input)? {
            Some(answer) if !wants_to_stop(&answer) => continue,
            _ => break,
        }
    }

    writeln!(out, "\nGood-bye.\n")?;
    Ok(())
}

/// Keep asking until a profile loads. `None` means input ended.
async fn prompt_profile<R: BufRead, W: Write>(
    source: &dyn ProfileSource,
    which: &str,
    input: &mut R,
    out: &mut W,
) -> Result<Option<ProfileRecord>> {
    loop {
        writeln!(out, "\nPlease enter the handle of the {which} user:")?;
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        let handle = normalize_handle(&line);
        if handle.is_empty() {
            continue;
        }

        writeln!(out, "\nGetting information for {handle}. Please wait...")?;
        match source.fetch(handle).await {
            Ok(profile) => return Ok(Some(profile)),
            Err(e) => {
                warn!(handle = handle, error = %e, "Profile fetch failed");
                writeln!(out, "ERROR: could not obtain information for user '{handle}': {e:#}")?;
            }
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// An empty answer or "N"/"n" ends the session.
fn wants_to_stop(answer: &str) -> bool {
    answer.is_empty() || answer.eq_ignore_ascii_case("n")
}
