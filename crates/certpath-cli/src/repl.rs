//! Interactive loop
//!
//! Reads one command per line from stdin while the autosave worker runs in
//! the background.

use crate::render;
use anyhow::Context;
use certpath_core::{spawn_autosave, MentorSession, Tracker, TrackerConfig, TrackerError};
use certpath_model::{search, Mutation, PhaseId, ProgressSummary};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
commands:
  show                      print the roadmap
  cert <phase> <code>       rotate a certification status
  project <phase> <title>   rotate a project status
  skill <phase> <name>      toggle a skill
  status                    session and sync state
  progress                  progress summary
  search <query>            find certs, projects and skills
  ask <question>            ask the mentor about your roadmap
  signin | signout          remote session
  demo | exit-demo          explore with demo data
  export [dir]              write a dated backup
  schedule                  weekly study plan
  quit                      save and leave
";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Input {
    Show,
    Edit(Mutation),
    Status,
    Progress,
    Search(String),
    Ask(String),
    SignIn,
    SignOut,
    Demo,
    ExitDemo,
    Export(Option<PathBuf>),
    Schedule,
    Help,
    Quit,
}

/// Parse a line; `Ok(None)` for blank input
pub(crate) fn parse(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let input = match word {
        "" => return Ok(None),
        "show" => Input::Show,
        "cert" | "project" | "skill" => {
            let (phase, target) = rest
                .split_once(char::is_whitespace)
                .ok_or_else(|| format!("usage: {word} <phase> <name>"))?;
            let phase = PhaseId(
                phase
                    .parse()
                    .map_err(|_| format!("phase must be a number, got {phase:?}"))?,
            );
            let target = target.trim().to_string();
            Input::Edit(match word {
                "cert" => Mutation::RotateCertification {
                    phase,
                    code: target,
                },
                "project" => Mutation::RotateProject {
                    phase,
                    title: target,
                },
                _ => Mutation::ToggleSkill {
                    phase,
                    name: target,
                },
            })
        }
        "status" => Input::Status,
        "progress" => Input::Progress,
        "search" if !rest.is_empty() => Input::Search(rest.to_string()),
        "search" => return Err("usage: search <query>".to_string()),
        "ask" if !rest.is_empty() => Input::Ask(rest.to_string()),
        "ask" => return Err("usage: ask <question>".to_string()),
        "signin" => Input::SignIn,
        "signout" => Input::SignOut,
        "demo" => Input::Demo,
        "exit-demo" => Input::ExitDemo,
        "export" => Input::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "schedule" => Input::Schedule,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command {other:?}, try help")),
    };
    Ok(Some(input))
}

fn report(result: Result<(), TrackerError>) {
    if let Err(e) = result {
        println!("{e}");
    }
}

/// Run until `quit` or end of input
pub(crate) async fn run(tracker: Arc<Tracker>, config: &TrackerConfig) -> anyhow::Result<()> {
    let autosave = spawn_autosave(Arc::clone(&tracker));
    // No model backend ships with the CLI; the session answers with a hint
    let mut mentor = MentorSession::new(None);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("certpath {} - type help for commands", certpath_core::VERSION);

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let input = match parse(&line) {
            Ok(Some(input)) => input,
            Ok(None) => continue,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match input {
            Input::Show => print!("{}", render::roadmap(&tracker.document())),
            Input::Edit(mutation) => {
                if tracker.apply(&mutation) {
                    println!("{mutation} ({})", tracker.sync_status());
                } else {
                    println!("no such item in phase {}", mutation.phase());
                }
            }
            Input::Status => {
                let snap = tracker.snapshot();
                print!("{}", render::status(&snap.session, snap.status, &snap.stats));
            }
            Input::Progress => {
                let summary = ProgressSummary::of(&tracker.document());
                print!("{}", render::progress(&summary));
            }
            Input::Search(query) => {
                let doc = tracker.document();
                print!("{}", render::search(&search(&doc, &query)));
            }
            Input::Ask(question) => {
                let reply = mentor.ask(&tracker.document(), &question).await;
                print!("{}", render::chat(&reply));
            }
            Input::SignIn => match tracker.sign_in().await {
                Ok(identity) => {
                    println!("signed in as {} ({})", identity.name, tracker.sync_status());
                }
                Err(e) => println!("{e}"),
            },
            Input::SignOut => report(tracker.sign_out().await),
            Input::Demo => report(tracker.enter_demo()),
            Input::ExitDemo => report(tracker.exit_demo()),
            Input::Export(dir) => {
                let dir = dir.unwrap_or_else(|| config.data_dir.clone());
                match tracker.export(&dir).await {
                    Ok(path) => println!("exported {}", path.display()),
                    Err(e) => println!("{e}"),
                }
            }
            Input::Schedule => print!("{}", render::schedule()),
            Input::Help => print!("{HELP}"),
            Input::Quit => break,
        }
    }

    let status = tracker.flush().await;
    autosave.shutdown().await;
    tracker.close();
    tracing::info!(%status, "tracker closed");
    Ok(())
}
