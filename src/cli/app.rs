use super::ui;
use crate::core::document::OutputDocument;
use crate::core::{MAX_DAYS, RateError};
use crate::service::RateService;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// How an interactive run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Rates were written to the given file.
    Saved(PathBuf),
    /// The day count was not an integer or was out of range.
    InvalidInput,
    /// Anything else went wrong; nothing was announced on stdout.
    Failed,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Saved(_))
    }
}

/// Interactive front end: asks for a day count, fetches, saves.
pub struct ConsoleApp {
    service: RateService,
    output_path: PathBuf,
    days: Option<i64>,
    today: Option<NaiveDate>,
}

impl ConsoleApp {
    pub fn new<P: AsRef<Path>>(service: RateService, output_path: P) -> Self {
        ConsoleApp {
            service,
            output_path: output_path.as_ref().to_path_buf(),
            days: None,
            today: None,
        }
    }

    /// Uses `days` instead of prompting when it is set.
    pub fn with_days(mut self, days: Option<i64>) -> Self {
        self.days = days;
        self
    }

    /// Pins the first requested date instead of the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub async fn run(&self) -> RunOutcome {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        self.run_with(&mut input, &mut std::io::stdout(), &mut std::io::stderr())
            .await
    }

    /// Runs against the given streams. Reports either a success message on
    /// `out` or a single error line on `err`, never both.
    pub async fn run_with<R, O, E>(
        &self,
        input: &mut R,
        out: &mut O,
        err: &mut E,
    ) -> RunOutcome
    where
        R: BufRead,
        O: Write,
        E: Write,
    {
        match self.execute(input, out, err).await {
            Ok(path) => {
                let message = format!("Data saved to file {}", path.display());
                let _ = writeln!(out, "\n{}", ui::style_text(&message, ui::StyleType::Success));
                RunOutcome::Saved(path)
            }
            Err(e) if is_user_input(&e) => {
                debug!(error = %e, "Rejected day count");
                let message = format!("Invalid input: {e}");
                let _ = writeln!(err, "{}", ui::style_text(&message, ui::StyleType::Error));
                RunOutcome::InvalidInput
            }
            Err(e) => {
                error!(error = ?e, "Run failed");
                let message = format!("An error occurred: {e}");
                let _ = writeln!(err, "{}", ui::style_text(&message, ui::StyleType::Error));
                RunOutcome::Failed
            }
        }
    }

    async fn execute<R, O, E>(&self, input: &mut R, out: &mut O, err: &mut E) -> Result<PathBuf>
    where
        R: BufRead,
        O: Write,
        E: Write,
    {
        let days = match self.days {
            Some(days) => days,
            None => prompt_days(input, out)?,
        };
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());

        let results = self
            .service
            .get_rates_for_days_from(today, days, err)
            .await?;

        OutputDocument::from_results(&results).write_to(&self.output_path)?;

        if !results.is_empty() {
            writeln!(out, "{}", ui::rates_table(&results)).context("Failed to print rates")?;
        }
        Ok(self.output_path.clone())
    }
}

fn prompt_days<R: BufRead, O: Write>(input: &mut R, out: &mut O) -> Result<i64> {
    write!(out, "Enter number of days (max {MAX_DAYS}): ")?;
    out.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read number of days")?;
    if read == 0 {
        anyhow::bail!("no number of days given: standard input is closed");
    }
    Ok(parse_days(&line)?)
}

pub fn parse_days(line: &str) -> Result<i64, RateError> {
    let trimmed = line.trim();
    trimmed.parse().map_err(|_| RateError::InvalidInput {
        input: trimmed.to_string(),
    })
}

fn is_user_input(e: &anyhow::Error) -> bool {
    e.downcast_ref::<RateError>()
        .is_some_and(RateError::is_user_input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DailyRateProvider, DateKey, RawRateRecord};
    use async_trait::async_trait;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DailyRateProvider for CountingProvider {
        async fn fetch_rates(
            &self,
            _session: &reqwest::Client,
            _date: DateKey,
        ) -> Result<RawRateRecord, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({
                "exchangeRate": [
                    {"currency": "EUR", "purchaseRate": 45.0, "saleRate": 45.9},
                    {"currency": "USD", "purchaseRate": 41.0}
                ]
            }))
        }
    }

    fn app(provider: Arc<CountingProvider>, dir: &TempDir) -> ConsoleApp {
        ConsoleApp::new(
            RateService::new(provider),
            dir.path().join("exchange_rates.json"),
        )
        .with_today(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
    }

    async fn run(app: &ConsoleApp, input: &str) -> (RunOutcome, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let outcome = app
            .run_with(&mut Cursor::new(input.as_bytes()), &mut out, &mut err)
            .await;
        (
            outcome,
            console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string(),
            console::strip_ansi_codes(&String::from_utf8(err).unwrap()).to_string(),
        )
    }

    #[test]
    fn test_parse_days() {
        assert_eq!(parse_days("3\n").unwrap(), 3);
        assert_eq!(parse_days("  -1 ").unwrap(), -1);
        assert!(matches!(
            parse_days("three"),
            Err(RateError::InvalidInput { input }) if input == "three"
        ));
        assert!(parse_days("").is_err());
        assert!(parse_days("2.5").is_err());
    }

    #[tokio::test]
    async fn test_run_saves_document() -> Result<()> {
        let dir = TempDir::new()?;
        let provider = Arc::new(CountingProvider::default());
        let app = app(provider.clone(), &dir);

        let (outcome, out, err) = run(&app, "2\n").await;

        let path = dir.path().join("exchange_rates.json");
        assert_eq!(outcome, RunOutcome::Saved(path.clone()));
        assert!(out.starts_with("Enter number of days (max 10): "));
        assert!(out.contains(&format!("Data saved to file {}", path.display())));
        assert!(err.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);

        let doc = OutputDocument::read_from(&path)?;
        let value = serde_json::to_value(&doc)?;
        assert_eq!(
            value,
            json!([
                {"2025-01-10": {
                    "EUR": {"purchase": 45.0, "sale": 45.9},
                    "USD": {"purchase": 41.0, "sale": null}
                }},
                {"2025-01-09": {
                    "EUR": {"purchase": 45.0, "sale": 45.9},
                    "USD": {"purchase": 41.0, "sale": null}
                }}
            ])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_non_numeric_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(CountingProvider::default());
        let app = app(provider.clone(), &dir);

        let (outcome, out, err) = run(&app, "ten\n").await;

        assert_eq!(outcome, RunOutcome::InvalidInput);
        assert_eq!(err, "Invalid input: 'ten' is not a whole number of days\n");
        assert!(!out.contains("Data saved"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("exchange_rates.json").exists());
    }

    #[tokio::test]
    async fn test_out_of_range_input_is_reported() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(CountingProvider::default());
        let app = app(provider.clone(), &dir);

        let (outcome, _, err) = run(&app, "11\n").await;

        assert_eq!(outcome, RunOutcome::InvalidInput);
        assert!(err.starts_with("Invalid input: number of days must be between 1 and 10"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_line_is_invalid() {
        let dir = TempDir::new().unwrap();
        let app = app(Arc::new(CountingProvider::default()), &dir);

        let (outcome, _, err) = run(&app, "\n").await;

        assert_eq!(outcome, RunOutcome::InvalidInput);
        assert_eq!(err, "Invalid input: '' is not a whole number of days\n");
    }

    #[tokio::test]
    async fn test_closed_stdin_is_a_failure_not_invalid_input() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(CountingProvider::default());
        let app = app(provider.clone(), &dir);

        let (outcome, out, err) = run(&app, "").await;

        assert_eq!(outcome, RunOutcome::Failed);
        assert_eq!(
            err,
            "An error occurred: no number of days given: standard input is closed\n"
        );
        assert!(!out.contains("Data saved"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("exchange_rates.json").exists());
    }

    #[tokio::test]
    async fn test_preset_days_skip_prompt() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(CountingProvider::default());
        let app = app(provider.clone(), &dir).with_days(Some(1));

        let (outcome, out, _) = run(&app, "").await;

        assert!(outcome.is_success());
        assert!(!out.contains("Enter number of days"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported_once() {
        let dir = TempDir::new().unwrap();
        let app = ConsoleApp::new(
            RateService::new(Arc::new(CountingProvider::default())),
            dir.path().join("missing").join("exchange_rates.json"),
        )
        .with_days(Some(1));

        let (outcome, out, err) = run(&app, "").await;

        assert_eq!(outcome, RunOutcome::Failed);
        assert!(!out.contains("Data saved"));
        assert_eq!(err.lines().count(), 1);
        assert!(err.starts_with("An error occurred: failed to write"));
    }
}
