//! Command-line front end: `rmf ask`, `rmf chat`, `rmf status`, `rmf personas`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rmf_agent::{ChatResponse, Orchestrator, PersonaCatalog, Settings, Status};
use rmf_core::{History, Turn};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "rmf", about = "Ask NIST SP 800-53 questions against a local knowledge base", version)]
pub struct Cli {
    /// Index directory (overrides RMF_INDEX_PATH)
    #[arg(long, global = true)]
    pub index: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Answer a single question
    Ask {
        /// The question; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Interactive session that keeps conversation history
    Chat,

    /// Show the selected backend and index size
    Status,

    /// List the specialist personas
    Personas,
}

/// Execute a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    if cli.command == Command::Personas {
        print_personas(PersonaCatalog::standard(), cli.json)?;
        return Ok(());
    }

    let mut settings = Settings::from_env().context("invalid configuration")?;
    if let Some(index) = cli.index {
        settings.index_path = index;
    }
    let orchestrator = Orchestrator::from_settings(&settings).context("failed to start backend")?;

    match cli.command {
        Command::Ask { question } => {
            let question = question.join(" ");
            let response = orchestrator.route_and_answer(&question, &History::new()).await?;
            println!("{}", render_response(&response, cli.json)?);
        }
        Command::Chat => chat(&orchestrator, cli.json).await?,
        Command::Status => println!("{}", render_status(&orchestrator.status().await, cli.json)?),
        Command::Personas => {}
    }
    Ok(())
}

async fn chat(orchestrator: &Orchestrator, json: bool) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    let mut history = History::new();
    println!("Ask about NIST controls. /reset clears history, /quit exits.");

    loop {
        let line = match editor.readline("rmf> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let question = line.trim();
        match question {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                history = History::new();
                println!("History cleared.");
                continue;
            }
            _ => {}
        }
        editor.add_history_entry(question)?;

        match orchestrator.route_and_answer(question, &history).await {
            Ok(response) => {
                println!("{}\n", render_response(&response, json)?);
                history.push(Turn::User(question.to_string()));
                history.push(Turn::Assistant(response.answer));
            }
            Err(e) => {
                warn!(error = %e, "question failed");
                eprintln!("error: {e}");
            }
        }
    }
    Ok(())
}

/// Text or JSON rendering of an answer.
pub fn render_response(response: &ChatResponse, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(response)?);
    }

    let mut out = format!("[{}]\n\n{}", response.persona_name, response.answer.trim_end());
    if !response.sources.is_empty() {
        out.push_str("\n\nSources:");
        for (i, source) in response.sources.iter().enumerate() {
            let page = source.page.map_or_else(|| "?".to_string(), |p| p.to_string());
            out.push_str(&format!("\n  {}. {} (p.{page})", i + 1, source.source));
        }
    }
    Ok(out)
}

pub fn render_status(status: &Status, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(status)?);
    }
    let index = match status.indexed_chunks {
        Some(n) => format!("{n} chunks"),
        None => "unavailable (run ingestion)".to_string(),
    };
    Ok(format!(
        "backend: {}\nchat model: {}\nindex: {index}",
        status.backend, status.chat_model
    ))
}

fn print_personas(catalog: &PersonaCatalog, json: bool) -> Result<()> {
    if json {
        let list: Vec<serde_json::Value> = catalog
            .iter()
            .map(|p| serde_json::json!({ "id": p.id, "name": p.name }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        for persona in catalog.iter() {
            println!("{:<22} {}", persona.id.as_str(), persona.name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmf_agent::PersonaId;
    use rmf_rag::Citation;

    fn response() -> ChatResponse {
        ChatResponse {
            answer: "**AC-2** governs accounts [p.5].\n".to_string(),
            sources: vec![
                Citation { source: "A.pdf".into(), page: Some(5), snippet: "AC-2".into() },
                Citation { source: "B.pdf".into(), page: None, snippet: "AU-6".into() },
            ],
            persona_id: PersonaId::NistSpecialist,
            persona_name: "NIST Controls Specialist".to_string(),
        }
    }

    #[test]
    fn ask_joins_words_and_accepts_global_flags() {
        let cli = Cli::try_parse_from(["rmf", "ask", "What", "is", "AC-2?", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Command::Ask { question: vec!["What".into(), "is".into(), "AC-2?".into()] }
        );
    }

    #[test]
    fn ask_requires_a_question() {
        assert!(Cli::try_parse_from(["rmf", "ask"]).is_err());
    }

    #[test]
    fn text_rendering_lists_sources() {
        let text = render_response(&response(), false).unwrap();
        assert_eq!(
            text,
            "[NIST Controls Specialist]\n\n**AC-2** governs accounts [p.5].\n\nSources:\n  1. A.pdf (p.5)\n  2. B.pdf (p.?)"
        );
    }

    #[test]
    fn json_rendering_keeps_field_names() {
        let value: serde_json::Value =
            serde_json::from_str(&render_response(&response(), true).unwrap()).unwrap();
        assert_eq!(value["persona_id"], "NIST_SPECIALIST");
        assert_eq!(value["sources"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn status_without_index() {
        let status = Status {
            backend: "ollama".into(),
            chat_model: "llama3".into(),
            indexed_chunks: None,
        };
        assert_eq!(
            render_status(&status, false).unwrap(),
            "backend: ollama\nchat model: llama3\nindex: unavailable (run ingestion)"
        );
    }
}
