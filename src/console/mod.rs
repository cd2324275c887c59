//! Console layer - the line-based menu people use at the till.
//!
//! [`Console`] reads one line per answer from any async reader and writes to
//! any async writer, so the same loop drives a terminal in production and byte
//! buffers in tests. It only translates text to session calls and results back
//! to text; all rules live in [`crate::core`].

mod commands;
pub mod menu;

use crate::{
    core::{DirectoryOutcome, Session, input},
    errors::{Error, Result},
    store::RecordStore,
};
use menu::{MENU_HINT, MENU_LINES, MenuChoice};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{error, info};

const BANNER: &str = "TOC LEDGER";
const RULE: &str = "------------------------------";

/// The menu loop bound to one session.
pub struct Console<R, W, S> {
    lines: Lines<R>,
    out: W,
    session: Session<S>,
}

impl<R, W, S> Console<R, W, S>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: RecordStore,
{
    /// Binds `session` to a line reader and an output.
    #[must_use]
    pub fn new(reader: R, out: W, session: Session<S>) -> Self {
        Self {
            lines: reader.lines(),
            out,
            session,
        }
    }

    /// The session being driven.
    #[must_use]
    pub const fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Gives back the session and the writer.
    pub fn into_parts(self) -> (Session<S>, W) {
        (self.session, self.out)
    }

    /// Runs the login prompt and then the menu until the user quits or input
    /// ends.
    ///
    /// Problems with what was typed, and store failures, are printed and the
    /// loop carries on. Only a failure of the console itself ends it early.
    pub async fn run(&mut self) -> Result<()> {
        self.say(BANNER).await?;
        if !self.log_in().await? {
            info!("Input closed before anyone logged in");
            return Ok(());
        }

        loop {
            self.show_menu().await?;
            let Some(selection) = self.prompt("Selection: ").await? else {
                break;
            };
            let Some(choice) = MenuChoice::parse(&selection) else {
                self.say(MENU_HINT).await?;
                continue;
            };
            if choice == MenuChoice::Quit {
                self.say("Goodbye").await?;
                break;
            }
            if let Err(err) = self.dispatch(choice).await {
                self.report(err).await?;
            }
        }
        Ok(())
    }

    async fn log_in(&mut self) -> Result<bool> {
        loop {
            let Some(answer) = self.prompt("Member number: ").await? else {
                return Ok(false);
            };
            let attempt = match input::parse_member_id(&answer) {
                Ok(id) => self.session.login(id).await,
                Err(err) => Err(err),
            };
            match attempt {
                Ok(true) => return Ok(true),
                Ok(false) => self.say("Member does not exist").await?,
                Err(err) => self.report(err).await?,
            }
        }
    }

    async fn show_menu(&mut self) -> Result<()> {
        let member = self.session.current_member();
        let welcome = format!("Welcome {} - {}", member.name, member.id);

        self.say("").await?;
        self.say(RULE).await?;
        self.say(&welcome).await?;
        self.say("Choose an option:").await?;
        for line in MENU_LINES {
            self.say(line).await?;
        }
        self.say(RULE).await
    }

    /// Prints a recoverable error; hands back the ones that are not.
    async fn report(&mut self, err: Error) -> Result<()> {
        match err {
            Error::Io(_) => Err(err),
            err if err.is_store_failure() => {
                error!("Store failure: {}", err);
                self.say(&format!(
                    "{err}. Please try again, or contact one of the TOC's admins if it keeps happening."
                ))
                .await
            }
            err => self.say(&err.to_string()).await,
        }
    }

    async fn say_outcome(&mut self, outcome: DirectoryOutcome) -> Result<()> {
        let text = match outcome {
            DirectoryOutcome::Applied => "Done",
            DirectoryOutcome::NotAuthorized => "Sorry you must be an admin",
            DirectoryOutcome::NotFound => "No such member or item",
            DirectoryOutcome::AlreadyExists => "That member or item already exists",
            DirectoryOutcome::RefusedSelf => "You cannot do that to your own membership",
        };
        self.say(text).await
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    /// Shows `label` and reads the answer; `None` once input has ended.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.out.write_all(label.as_bytes()).await?;
        self.out.flush().await?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|answer| answer.trim().to_string()))
    }
}
