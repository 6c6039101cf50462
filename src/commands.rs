//! Command dispatch.
//!
//! Commands that work on the open file run inside one session acquisition:
//! load, run, save, print the status footer. The session is saved on every
//! path, and a failing command leaves it as it was loaded unless the failure
//! itself is defined to change it (opening a missing file closes the current
//! one). Index commands never touch the session.

mod files;
mod lookup;
mod view;

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

use crate::cli::Commands;
use crate::config::Config;
use crate::detect::prepare_state_dir;
use crate::edit;
use crate::error::{SessedError, Stream};
use crate::extract::symbols::DefinitionKind;
use crate::range::parse_range;
use crate::session::{Session, SessionStore};

/// Captured output of one command.
#[derive(Debug, Default)]
pub struct Console {
    pub out: Vec<u8>,
    pub err: Vec<u8>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `error` to the stream it belongs on.
    pub fn report(&mut self, error: &anyhow::Error) {
        let (stream, text) = match error.downcast_ref::<SessedError>() {
            Some(e) => (e.stream(), e.to_string()),
            None => (Stream::Stderr, format!("error: {:#}", error)),
        };

        let target = match stream {
            Stream::Stdout => &mut self.out,
            Stream::Stderr => &mut self.err,
        };
        target.extend_from_slice(text.as_bytes());
        if !text.ends_with('\n') {
            target.push(b'\n');
        }
    }

    /// Flushes the captured streams into `out` and `err`.
    pub fn write_to<O: Write, E: Write>(&self, out: &mut O, err: &mut E) -> std::io::Result<()> {
        out.write_all(&self.out)?;
        out.flush()?;
        err.write_all(&self.err)?;
        err.flush()
    }
}

/// Runs `command` and returns whether it succeeded. All output lands in
/// `console`; `input` supplies standard input for commands that read a body.
pub async fn execute<I>(
    command: Commands,
    state_dir: Option<PathBuf>,
    input: I,
    console: &mut Console,
) -> bool
where
    I: AsyncReadExt + Unpin,
{
    match run(command, state_dir, input, console).await {
        Ok(success) => success,
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            console.report(&e);
            false
        }
    }
}

async fn run<I>(
    command: Commands,
    state_dir: Option<PathBuf>,
    input: I,
    console: &mut Console,
) -> Result<bool>
where
    I: AsyncReadExt + Unpin,
{
    let state_dir = prepare_state_dir(state_dir).await?;
    let config = Config::load(&state_dir).await?;

    match command {
        Commands::Init { path } => lookup::init(&state_dir, path, &mut console.out).await?,
        Commands::FindDef { name } => {
            lookup::find(&state_dir, DefinitionKind::Def, &name, &mut console.out).await?
        }
        Commands::FindClass { name } => {
            lookup::find(&state_dir, DefinitionKind::Class, &name, &mut console.out).await?
        }
        command => return with_session(&state_dir, &config, command, input, console).await,
    }

    Ok(true)
}

/// Acquires the session, runs `command` against it and always releases it.
/// A failing command is reported before the footer and yields `Ok(false)`.
async fn with_session<I>(
    state_dir: &Path,
    config: &Config,
    command: Commands,
    input: I,
    console: &mut Console,
) -> Result<bool>
where
    I: AsyncReadExt + Unpin,
{
    let store = SessionStore::new(state_dir);
    let mut session = store.acquire(config).await?;

    let result = dispatch(&mut session, config, command, input, &mut console.out).await;

    let success = match result {
        Ok(()) => true,
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            console.report(&e);
            false
        }
    };

    store.release(&session).await?;
    session.write_footer(&mut console.out)?;

    Ok(success)
}

async fn dispatch<I, W>(
    session: &mut Session,
    config: &Config,
    command: Commands,
    input: I,
    out: &mut W,
) -> Result<()>
where
    I: AsyncReadExt + Unpin,
    W: Write,
{
    match command {
        Commands::Open { path } => view::open(session, &path.join(" "), config, out).await,
        Commands::Close => {
            session.close();
            Ok(())
        }
        Commands::Status => Ok(()),
        Commands::List { range } => {
            let range = if range.is_empty() {
                "1".to_string()
            } else {
                range.join(" ")
            };
            view::list(session, &range, config, out)
        }
        Commands::Search { pattern } => view::search(session, &pattern.join(" "), config, out),
        Commands::Scroll { direction } => view::scroll(session, direction, config, out),
        Commands::Select { range } => {
            let range = parse_range(&range.join(" "), None)?;
            edit::select(session, range, out)
        }
        Commands::Rewrite => {
            session.path()?;
            if session.selection.is_none() {
                return Err(SessedError::NoSelectionPending.into());
            }
            let body = read_input(input).await?;
            edit::rewrite(session, &body, config, out).await
        }
        Commands::Edit { range } => {
            let range = parse_range(&range.join(" "), None)?;
            session.path()?;
            let body = read_input(input).await?;
            edit::replace(session, range, &body, config, out).await
        }
        Commands::Create { path } => {
            let path = path.join(" ");
            files::ensure_absent(Path::new(&path))?;
            let body = read_input(input).await?;
            files::create(session, Path::new(&path), &body, out).await
        }
        Commands::Init { .. } | Commands::FindDef { .. } | Commands::FindClass { .. } => {
            unreachable!("index commands run without a session")
        }
    }
}

async fn read_input<I>(mut input: I) -> Result<String>
where
    I: AsyncReadExt + Unpin,
{
    let mut body = String::new();
    input
        .read_to_string(&mut body)
        .await
        .context("Failed to read standard input")?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn closed_stdout_is_an_error() {
        let mut console = Console::new();
        console.out.extend_from_slice(b"no file loaded\n");

        let err = console
            .write_to(&mut ClosedPipe, &mut Vec::new())
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn errors_land_on_their_stream() {
        let mut console = Console::new();
        console.report(&SessedError::NoMatches.into());
        console.report(&SessedError::NoFileLoaded.into());

        let mut out = Vec::new();
        let mut err = Vec::new();
        console.write_to(&mut out, &mut err).unwrap();
        assert_eq!(out, b"no matches found\n");
        assert_eq!(err, b"No file loaded. Please open a file first.\n");
    }
}
