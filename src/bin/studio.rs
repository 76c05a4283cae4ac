use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use log::info;

use persona_studio::core::truncate_for_display;
use persona_studio::{
    Action, Config, OpenAiProvider, Outcome, Role, SessionStore, Speaker, View,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // The openai crate reads the key from the environment.
    // Set both OPENAI_API_KEY and OPENAI_KEY for compatibility
    std::env::set_var("OPENAI_API_KEY", &config.openai_api_key);
    std::env::set_var("OPENAI_KEY", &config.openai_api_key);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting persona studio (model: {})", config.openai_model);

    let provider = Arc::new(OpenAiProvider::new(config.openai_model.clone()));
    let store = SessionStore::new(config, provider.clone(), provider);
    let (session_id, session) = store.create_session();
    info!("Console bound to session {session_id}");

    println!("persona studio - type 'help' for commands");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.splitn(2, ' ');
        let command = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or("").trim();

        let action = match command {
            "quit" | "exit" => break,
            "help" => {
                print_help();
                continue;
            }
            "history" => {
                let ctx = session.lock().await;
                for message in ctx.chat.history() {
                    let who = match message.role {
                        Role::User => "you",
                        Role::Assistant => ctx.chat.active_agent().unwrap_or("agent"),
                    };
                    println!("{}: {}", who, truncate_for_display(&message.content));
                }
                continue;
            }
            "transcript" => {
                let ctx = session.lock().await;
                for entry in ctx.debate.transcript() {
                    let who = ctx.debate.participant(entry.speaker).unwrap_or("?");
                    println!("{}: {}", who, truncate_for_display(&entry.content));
                }
                continue;
            }
            "home" => Action::Navigate(View::Home),
            "agents" => Action::Navigate(View::Agents),
            "chat" => Action::Navigate(View::Chat),
            "debate" => Action::Navigate(View::Debate),
            "create" => match parse_create(rest) {
                Ok(action) => action,
                Err(e) => {
                    println!("error: {e}");
                    continue;
                }
            },
            "show" => Action::ShowAgent(rest.to_string()),
            "use" => Action::SelectChatAgent(rest.to_string()),
            "say" => Action::SendChat(rest.to_string()),
            "bind" => match parse_bind(rest) {
                Ok(action) => action,
                Err(e) => {
                    println!("error: {e}");
                    continue;
                }
            },
            "converse" => Action::Converse,
            other => {
                println!("unknown command '{other}' - type 'help'");
                continue;
            }
        };

        let mut ctx = session.lock().await;
        match ctx.dispatch(action).await {
            Ok(outcome) => render(&outcome),
            // Every action error is recoverable; show it and keep going
            Err(e) => println!("error: {e}"),
        }
    }

    store.remove(&session_id);
    Ok(())
}

fn parse_create(rest: &str) -> Result<Action> {
    let mut parts = rest.splitn(2, ' ');
    let name = parts.next().unwrap_or("").trim();
    let path = parts.next().unwrap_or("").trim();
    if name.is_empty() || path.is_empty() {
        anyhow::bail!("usage: create <name> <document-path>");
    }

    let bytes = std::fs::read(path)?;
    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();

    Ok(Action::CreateAgent {
        name: name.to_string(),
        filename,
        bytes,
    })
}

fn parse_bind(rest: &str) -> Result<Action> {
    let mut parts = rest.splitn(2, ' ');
    let slot = match parts.next().unwrap_or("") {
        "1" => Speaker::First,
        "2" => Speaker::Second,
        _ => anyhow::bail!("usage: bind <1|2> <agent-name>"),
    };
    let name = parts.next().unwrap_or("").trim();
    if name.is_empty() {
        anyhow::bail!("usage: bind <1|2> <agent-name>");
    }

    Ok(Action::BindDebater {
        slot,
        name: name.to_string(),
    })
}

fn render(outcome: &Outcome) {
    match outcome {
        Outcome::ViewChanged(view) => println!("-- {view:?} --"),
        Outcome::Notice(text) => println!("{text}"),
        Outcome::AgentCreated { name } => println!("Agent {name} created!"),
        Outcome::AgentList { names } => {
            for name in names {
                println!("- {name}");
            }
        }
        Outcome::AgentPrompt {
            name,
            persona_prompt,
        } => {
            println!("{name}'s persona prompt:");
            println!("{}", truncate_for_display(persona_prompt));
        }
        Outcome::ChatAgentSelected { name } => println!("Now chatting with {name}"),
        Outcome::ChatReply { agent, reply } => {
            println!("{agent}: {}", truncate_for_display(reply));
        }
        Outcome::DebaterBound { slot, name } => {
            let label = match slot {
                Speaker::First => "1",
                Speaker::Second => "2",
            };
            println!("Debater {label} is now {name}");
        }
        Outcome::DebateExchange {
            second_speaker,
            second_reply,
            first_speaker,
            first_reply,
        } => {
            println!("{second_speaker}: {}", truncate_for_display(second_reply));
            println!("{first_speaker}: {}", truncate_for_display(first_reply));
        }
    }
}

fn print_help() {
    println!(
        "commands:\n\
         \x20 home | agents | chat | debate    switch view\n\
         \x20 create <name> <path>             create an agent from a document\n\
         \x20 show <name>                      print an agent's persona prompt\n\
         \x20 use <name>                       pick the chat agent\n\
         \x20 say <text>                       send a chat message\n\
         \x20 bind <1|2> <name>                seat a debater\n\
         \x20 converse                         advance the debate one exchange\n\
         \x20 history                          show the chat history\n\
         \x20 transcript                       show the debate transcript\n\
         \x20 quit"
    );
}
