#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use {
    std::{
        future,
        path::PathBuf,
        time::Duration,
    },
    chrono::{
        TimeDelta,
        prelude::*,
    },
    if_chain::if_chain,
    lazy_regex::regex_captures,
    proc_macro2 as _, // feature config required for Span::start used in CustomExit impl
    tokio::{
        io::{
            AsyncBufReadExt as _,
            AsyncWriteExt as _,
            BufReader,
            stdin,
        },
        select,
        time::sleep,
    },
    wheel::{
        fs::{
            self,
            File,
        },
        traits::IoResultExt as _,
    },
    randodraft::{
        catalog::SettingPool,
        room::{
            JoinPolicy,
            Output,
            Room,
            RoomConfig,
        },
        seed::Polling,
        session::DraftSession,
    },
    crate::{
        config::Config,
        zsr::Zsr,
    },
};

mod config;
mod zsr;

#[derive(clap::Parser)]
#[clap(version)]
struct Args {
    /// Read the config from this file instead of the platform's config directory.
    #[clap(long)]
    config: Option<PathBuf>,
    /// Draft settings from this `.draft.rs` catalog instead of the built-in tournament one.
    #[clap(long)]
    catalog: Option<PathBuf>,
    /// Write randobot.log even if logging is disabled in the config.
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)] Config(#[from] config::Error),
    #[error(transparent)] Json(#[from] serde_json::Error),
    #[error(transparent)] Wheel(#[from] wheel::Error),
    #[error(transparent)] Zsr(#[from] zsr::Error),
    #[error("error parsing draft catalog: {source}")]
    DraftParse {
        file: String,
        source: syn::Error,
    },
}

impl wheel::CustomExit for Error {
    fn exit(self, cmd_name: &'static str) -> ! {
        match self {
            Self::DraftParse { file, source } => {
                eprintln!("{cmd_name}: error parsing draft catalog {file}: {source}");
                let start = source.span().start();
                eprintln!("line {}, column {}", start.line, start.column);
            }
            _ => {
                eprintln!("{cmd_name}: {self}");
                eprintln!("debug info: {self:?}");
            }
        }
        std::process::exit(1)
    }
}

fn print_outputs(outputs: &[Output]) {
    for output in outputs {
        match output {
            Output::Message(text) => println!("{text}"),
            Output::Pinned(text) => println!("[pinned] {text}"),
            Output::RaceInfo(info) => println!("[race info] {}", info.replace('\n', " | ")),
            Output::JoinPolicy(JoinPolicy::Open) => println!("[join policy] open"),
            Output::JoinPolicy(JoinPolicy::InviteOnly) => println!("[join policy] invitational"),
        }
    }
}

async fn wait_until(deadline: Option<DateTime<Utc>>) {
    if let Some(deadline) = deadline {
        sleep((deadline - Utc::now()).to_std().unwrap_or_default()).await;
    } else {
        future::pending().await
    }
}

#[wheel::main(custom_exit)]
async fn main(args: Args) -> Result<(), Error> {
    let config = Config::load(args.config).await?;
    let mut log_file = if config.log || args.verbose {
        Some(File::create("randobot.log").await?)
    } else {
        None
    };

    macro_rules! log {
        ($($fmt:tt)*) => {{
            if let Some(ref mut log_file) = log_file {
                log_file.write_all(Local::now().format("%Y-%m-%d %H:%M:%S ").to_string().as_bytes()).await.at("randobot.log")?;
                log_file.write_all(format!($($fmt)*).as_bytes()).await.at("randobot.log")?;
                log_file.write_all(b"\n").await.at("randobot.log")?;
                log_file.flush().await.at("randobot.log")?;
            }
        }};
    }

    let pool = if let Some(path) = args.catalog {
        let source = fs::read_to_string(&path).await?;
        SettingPool::parse(&source).map_err(|source| Error::DraftParse { file: path.display().to_string(), source })?
    } else {
        SettingPool::tournament().map_err(|source| Error::DraftParse { file: format!("tournament.draft.rs"), source })?
    };
    log!("loaded draft catalog with {} settings", pool.len());
    let zsr = Zsr::new(config.api_key)?;
    let mut room = Room::new(RoomConfig {
        default_preset: config.default_preset,
        polling: Polling {
            max_attempts: config.status_checks,
            interval: Duration::from_secs(config.status_interval),
        },
        reveal_delay: TimeDelta::minutes(config.reveal_delay),
        pool,
    });
    let mut rng = rand::rng();
    let mut lines = BufReader::new(stdin()).lines();
    loop {
        let line = select! {
            line = lines.next_line() => line.at_unknown()?,
            () = wait_until(room.reveal_deadline()) => {
                log!("timed reveal");
                print_outputs(&room.reveal_due(Utc::now()));
                continue
            }
        };
        let Some(line) = line else { break };
        if let Some((_, name, score)) = regex_captures!(r"^/enter (\S+)(?: (-?[0-9]+))?$", &line) {
            room.enter(name, score.parse().ok());
            log!("{name} entered the room");
        } else if let Some((_, name)) = regex_captures!(r"^/monitor (\S+)$", &line) {
            room.add_monitor(name);
            log!("{name} is now a race monitor");
        } else if let Some((_, name)) = regex_captures!(r"^/leave (\S+)$", &line) {
            room.leave(name);
            log!("{name} left the room");
        } else if let Some((_, state)) = regex_captures!(r"^/restore (.+)$", &line) {
            // takes a `draft state` line from the log
            match serde_json::from_str::<DraftSession>(state) {
                Ok(session) => {
                    println!("[restored] {}", session.status());
                    room.restore(session);
                    log!("restored draft state: {state}");
                }
                Err(e) => eprintln!("invalid draft state: {e}"),
            }
        } else if let Some((_, sender, text)) = regex_captures!(r"^(\S+): (.*)$", &line) {
            let outputs = room.handle(&zsr, sender, text, Utc::now(), &mut rng).await;
            log!("{sender}: {text} -> {outputs:?}");
            print_outputs(&outputs);
            if_chain! {
                if !outputs.is_empty();
                if let Some(session) = room.session();
                then {
                    log!("draft state: {}", serde_json::to_string(session)?);
                }
            }
        } else {
            eprintln!("unrecognized input, expected `<name>: <message>`, `/enter <name> [score]`, `/monitor <name>`, `/leave <name>`, or `/restore <draft state>`");
        }
    }
    Ok(())
}
