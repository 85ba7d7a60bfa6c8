//! Interactive query shell.
//!
//! Reads one query per line from stdin, runs it through the pipeline, and
//! prints the answer as it streams in. `exit`, `quit`, or EOF terminates
//! the loop normally. Execution is deliberately single-threaded and
//! blocking: each query waits for the full streamed answer before the next
//! prompt appears.

use anyhow::Result;
use futures::StreamExt;
use std::io::{BufRead, Write};

use crate::pipeline::QueryPipeline;

pub async fn run_chat(pipeline: &QueryPipeline) -> Result<()> {
    println!("wordsmith — ask a question about Wordsmith (exit/quit to leave)");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!();
            break;
        }

        let query = line.trim_end_matches(['\n', '\r']);
        if query.trim().eq_ignore_ascii_case("exit") || query.trim().eq_ignore_ascii_case("quit") {
            break;
        }
        if query.trim().is_empty() {
            continue;
        }

        answer_query(pipeline, query).await?;
    }

    Ok(())
}

/// Run a single query and print the streamed answer (used by the shell and
/// the one-shot `ask` command).
pub async fn answer_query(pipeline: &QueryPipeline, query: &str) -> Result<()> {
    let mut stream = pipeline.run(query).await?;
    let mut stdout = std::io::stdout();

    while let Some(delta) = stream.next().await {
        print!("{}", delta?);
        stdout.flush()?;
    }
    println!();

    Ok(())
}
