use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use lingo::{
    config::{ConfigStore, FileConfigStore},
    error::SinkError,
    events::EventSink,
    lexicon::Thesaurus,
    logging,
    registry::SessionRegistry,
    translator::{random_word, GlossaryTranslator},
    vocabulary::{RandomSelector, Vocabulary},
    ChannelId, GameHub, GameServices, InboundText, OutboundEvent, UserId,
};
use std::{
    error::Error,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::{
        mpsc::{self, Receiver, RecvTimeoutError},
        Arc,
    },
    thread,
    time::Duration,
};
use tracing::warn;

const TICK_RATE_MS: u64 = 100;
const LOCAL_USER: UserId = 1;
const LOCAL_CHANNEL: ChannelId = 1;

/// guess English words from their translation, against the clock
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed word game: each round shows an English word translated into another language, and you have three tries to name the original word or a synonym."
)]
pub struct Cli {
    /// path to a JSON config file (defaults to the platform config dir)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// seconds allowed per answer, overrides the config file
    #[clap(short = 't', long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// embedded word list to draw from, overrides the config file
    #[clap(long)]
    vocabulary: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// play the word guessing game; type `/exit` to stop
    Play {
        /// target language code (e.g. 'fr', 'es')
        #[clap(short = 'l', long)]
        lang: Option<String>,
    },
    /// show a random word and its translation
    RandomWord {
        /// target language code (e.g. 'fr', 'es')
        #[clap(short = 'l', long)]
        lang: Option<String>,
    },
    /// list supported language codes
    Languages,
}

/// Prints game events for the single local player
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, _user: UserId, _channel: ChannelId, event: OutboundEvent) -> Result<(), SinkError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", event.text()).map_err(|e| SinkError::Transport(e.to_string()))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init_tracing();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let mut config = store.load();
    if let Some(secs) = cli.timeout {
        config.answer_timeout_secs = secs;
    }
    if let Some(ref name) = cli.vocabulary {
        config.vocabulary = name.clone();
    }

    let translator = GlossaryTranslator::embedded()?;
    let vocabulary = Vocabulary::embedded(&config.vocabulary)?;

    match cli.command {
        Command::Languages => {
            for (code, name) in translator.languages() {
                println!("`{code}` - {name}");
            }
            Ok(())
        }
        Command::RandomWord { lang } => {
            let lang = lang.unwrap_or_else(|| config.default_language.clone());
            let lang = checked_language(&translator, lang);
            match random_word(&mut rand::thread_rng(), &vocabulary, &translator, &lang) {
                Ok(Some(card)) => {
                    println!(
                        "🔤 The word **`{}`** translates to **`{}`** in **{}**.",
                        card.word, card.translation, card.language
                    );
                    Ok(())
                }
                Ok(None) => {
                    println!("❌ Couldn't fetch a random word. Try again later.");
                    Ok(())
                }
                Err(err) => {
                    warn!(error = %err, "translation error");
                    println!("❌ Couldn't translate the word. Please try again.");
                    Err(err.into())
                }
            }
        }
        Command::Play { lang } => {
            let lang = lang.unwrap_or_else(|| config.default_language.clone());
            let lang = checked_language(&translator, lang);
            let services = GameServices {
                vocabulary: Arc::new(vocabulary),
                selector: Arc::new(RandomSelector),
                translator: Arc::new(translator),
                lexicon: Arc::new(Thesaurus::embedded()?),
                sink: Arc::new(ConsoleSink),
                registry: Arc::new(SessionRegistry::new()),
                answer_timeout: config.answer_timeout(),
            };
            play(GameHub::new(services), &lang)
        }
    }
}

/// Exit with a usage error unless `lang` has a glossary
fn checked_language(translator: &GlossaryTranslator, lang: String) -> String {
    if !translator.supports(&lang) {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::InvalidValue,
            format!("invalid language code `{lang}`, try `lingo languages`"),
        )
        .exit();
    }
    lang.to_lowercase()
}

fn play(hub: GameHub, lang: &str) -> Result<(), Box<dyn Error>> {
    let handle = hub.start_game(LOCAL_USER, LOCAL_CHANNEL, lang)?;
    let lines = stdin_lines();

    while !handle.is_finished() {
        match lines.recv_timeout(Duration::from_millis(TICK_RATE_MS)) {
            Ok(line) => match line.trim() {
                "" => {}
                "/exit" => match hub.exit_game(LOCAL_USER) {
                    Ok(()) => println!("✅ You've exited the word guessing game."),
                    Err(_) => println!("❌ You're not currently playing the game."),
                },
                "/help" => print_help(),
                answer => {
                    hub.submit(InboundText::new(LOCAL_USER, LOCAL_CHANNEL, answer));
                }
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // stdin closed
                let _ = hub.exit_game(LOCAL_USER);
                break;
            }
        }
    }

    handle.join();
    Ok(())
}

fn stdin_lines() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    rx
}

fn print_help() {
    println!("Commands:");
    println!("  /exit  leave the word guessing game");
    println!("  /help  show this list");
    println!("Anything else is taken as your answer.");
}
