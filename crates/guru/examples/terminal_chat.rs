//! # Terminal chat
//!
//! A line-based front end for a single [`Session`]: pick one of the suggested
//! prompts by number or type your own message, and watch the reply stream in.
//!
//! Usage:
//!   export GROQ_API_KEY=gsk_…        # or put it in .guru/secrets.toml
//!   cargo run -p guru --example terminal_chat [config.toml]
//!
//! Commands: `/key` enters an API key, `/reset` starts over, `/quit` exits.
//! Set `RUST_LOG=guru=debug` to see what the controller is doing.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use guru::{
    ChatController, GuruConfig, Reconciliation, Session,
    assembler::{DisplaySink, DisplayUpdate},
    prompt::PromptPool,
};
use tracing_subscriber::EnvFilter;

/// Prints only the part of each update that was not on screen yet.
#[derive(Default)]
struct Stdout {
    shown: usize,
}

impl DisplaySink for Stdout {
    fn publish(&mut self, update: &DisplayUpdate) {
        if let Some(fresh) = update.text.get(self.shown..) {
            print!("{fresh}");
            io::stdout().flush().ok();
        }
        self.shown = update.text.len();
        if !update.in_progress {
            println!();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = GuruConfig::load(config_path.as_deref())?;
    let pool = PromptPool::builtin();

    let controller = ChatController::from_config(&config)?;
    let mut session = Session::start(pool, config.stored_credential()?)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if let Some(prompts) = session.suggested_prompts() {
            println!("Try one of these:");
            for (i, prompt) in prompts.iter().enumerate() {
                println!("  [{}] {prompt}", i + 1);
            }
        }

        match controller.reconcile(&mut session, Stdout::default()).await {
            Ok(Reconciliation::AwaitingCredential) => {
                print!("Groq API key: ");
                io::stdout().flush()?;
                let Some(key) = lines.next().transpose()? else {
                    break;
                };
                if let Err(e) = session.enter_credential(key) {
                    eprintln!("{e}");
                }
                continue;
            }
            Ok(_) => {}
            Err(e) => eprintln!("\nError: {e}\nSend another message, or `/key` to retry with a new key."),
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();

        let submitted = match line {
            "/quit" => break,
            "/key" => {
                print!("Groq API key: ");
                io::stdout().flush()?;
                let Some(key) = lines.next().transpose()? else {
                    break;
                };
                session.enter_credential(key)
            }
            "/reset" => {
                session.reset(pool)?;
                continue;
            }
            _ => match pick(&session, line) {
                Some(prompt) => {
                    println!("You: {prompt}");
                    controller.on_suggested_prompt_click(&mut session, &prompt)
                }
                None => controller.on_free_text_submit(&mut session, line),
            },
        };
        if let Err(e) = submitted {
            eprintln!("{e}");
        }
    }

    Ok(())
}

/// The suggestion a numeric answer refers to.
fn pick(session: &Session, line: &str) -> Option<String> {
    let n: usize = line.parse().ok()?;
    let prompts = session.suggested_prompts()?;
    prompts.get(n.checked_sub(1)?).cloned()
}
