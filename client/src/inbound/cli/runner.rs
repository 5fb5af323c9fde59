//! Dispatches parsed commands to the domain services.
//!
//! Every command except the account ones restores the persisted session
//! first and refuses to run without one. Output goes to the supplied
//! writer; failures come back as [`CliError`] for the binary to report.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::debug;

use super::args::{Command, QueryArgs, ReportArgs, SignInArgs, SignUpArgs};
use super::render;
use crate::domain::ports::{AuthApi, RecordsApi, SessionStore};
use crate::domain::{
    AuthGateway, ClientError, QueryClient, QueryResult, ReportForm, ReportStatus,
    ReportSubmitter, SIGNED_IN_MESSAGE, SIGNED_OUT_MESSAGE, Session, SignUpOutcome,
};

/// Message shown when a gated command runs without a valid session.
pub const SIGN_IN_REQUIRED_MESSAGE: &str =
    "You are not signed in. Run `landslide sign-in` first.";

/// Failure of a single command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A domain component refused the request.
    #[error("{0}")]
    Client(#[from] ClientError),
    /// Output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Runs commands against one gateway, query client and report submitter.
pub struct CommandRunner<A, R, S> {
    gateway: AuthGateway<A, S>,
    query: QueryClient<R>,
    reports: ReportSubmitter<R>,
}

impl<A, R, S> CommandRunner<A, R, S>
where
    A: AuthApi,
    R: RecordsApi,
    S: SessionStore,
{
    /// Wire the services over the given adapters.
    pub fn new(auth: Arc<A>, records: Arc<R>, store: Arc<S>, fallback_base: u64) -> Self {
        Self {
            gateway: AuthGateway::new(auth, store),
            query: QueryClient::new(Arc::clone(&records)),
            reports: ReportSubmitter::with_fallback_base(records, fallback_base),
        }
    }

    /// Run `command`, writing its output to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Client`] with a user-facing message when the
    /// command fails, or [`CliError::Output`] when writing fails.
    pub async fn run(&mut self, command: &Command, out: &mut impl Write) -> Result<(), CliError> {
        match command {
            Command::SignIn(args) => self.sign_in(args, out).await,
            Command::SignUp(args) => self.sign_up(args, out).await,
            Command::SignOut => {
                self.gateway.sign_out();
                writeln!(out, "{SIGNED_OUT_MESSAGE}")?;
                Ok(())
            }
            Command::Whoami => {
                let session = self.require_session().await?;
                render::write_identity(out, &session)?;
                Ok(())
            }
            Command::Query(args) => self.query(args, out).await,
            Command::Report(args) => self.report(args, out).await,
            Command::NextId => {
                let session = self.require_session().await?;
                let form = self.prepared_form(&session).await?;
                if let Some(id) = form.landslide_id() {
                    render::write_next_id(out, id)?;
                }
                Ok(())
            }
        }
    }

    async fn sign_in(&mut self, args: &SignInArgs, out: &mut impl Write) -> Result<(), CliError> {
        let session = self.gateway.sign_in(&args.email, &args.password).await?;
        writeln!(out, "{SIGNED_IN_MESSAGE}")?;
        render::write_identity(out, &session)?;
        Ok(())
    }

    async fn sign_up(&mut self, args: &SignUpArgs, out: &mut impl Write) -> Result<(), CliError> {
        let outcome = self
            .gateway
            .sign_up(&args.username, &args.email, &args.password)
            .await;
        match outcome {
            SignUpOutcome::SignedIn(ref session) => {
                writeln!(out, "{}", outcome.user_message())?;
                render::write_identity(out, session)?;
                Ok(())
            }
            SignUpOutcome::CreatedLoginFailed(ref error) => Err(ClientError::new(
                error.kind(),
                outcome.user_message(),
            )
            .into()),
            SignUpOutcome::Failed(error) => Err(error.into()),
        }
    }

    async fn query(&mut self, args: &QueryArgs, out: &mut impl Write) -> Result<(), CliError> {
        let session = self.require_session().await?;
        let filter = args.to_filter();
        debug!(filters = filter.len(), "running query");
        match self.query.submit_query(&session, &filter).await {
            QueryResult::Error(error) => Err(error.into()),
            result if args.geojson => Ok(render::write_geojson(out, &result)?),
            result => Ok(render::write_table(out, &result)?),
        }
    }

    async fn report(&mut self, args: &ReportArgs, out: &mut impl Write) -> Result<(), CliError> {
        let session = self.require_session().await?;
        let mut form = self.prepared_form(&session).await?;
        form.capture_click(args.lat, args.lng)?;
        form.ls_type = args.ls_type;
        form.ls_source = args.ls_source;
        form.impact = args.impact;
        form.wea13_type = args.wea13_type;
        form.wea13_id.clone_from(&args.wea13_id);

        self.reports.submit(&session, &mut form).await?;
        if let ReportStatus::Success(message) = form.status() {
            writeln!(out, "{message}")?;
        }
        if let Some(next) = form.landslide_id() {
            render::write_next_id(out, next)?;
        }
        Ok(())
    }

    async fn require_session(&mut self) -> Result<Session, ClientError> {
        self.gateway.restore_session().await;
        self.gateway
            .session()
            .cloned()
            .ok_or_else(|| ClientError::authentication(SIGN_IN_REQUIRED_MESSAGE))
    }

    async fn prepared_form(&self, session: &Session) -> Result<ReportForm, ClientError> {
        let form = self.reports.prepare(session).await;
        match form.status() {
            ReportStatus::Error(message) => Err(ClientError::connectivity(message.as_str())),
            _ => Ok(form),
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
